//! Minimum-role route layers.
//!
//! ```rust,ignore
//! use axum::{Router, middleware};
//! use crate::middleware::role::require_admin;
//!
//! let admin_routes = Router::new()
//!     .route("/accounts/{id}", get(get_account))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
//! ```

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use pennywise_core::{AppError, AuthorizationGuard, Role};
use tracing::warn;

use crate::middleware::auth::CurrentAccount;
use crate::state::AppState;

pub const ACCESS_DENIED: &str = "Access denied";

/// Lets the request through when the caller's role ranks at least `minimum`.
///
/// The loaded account is left in the request extensions for
/// [`CurrentAccount`] to reuse.
pub async fn require_role(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    minimum: Role,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let CurrentAccount(account) = CurrentAccount::from_request_parts(&mut parts, &state).await?;

    if !AuthorizationGuard::require_role(&account, minimum) {
        warn!(account_id = %account.id, role = %account.role, required = %minimum, "Role check failed");
        return Err(AppError::forbidden(ACCESS_DENIED));
    }

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_role(State(state), req, next, Role::Admin).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}
