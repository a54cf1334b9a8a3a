use axum::{
    Router,
    routing::{get, put},
};

use super::controller::{get_account, update_access};
use crate::state::AppState;

/// Mounted behind the admin role layer.
pub fn init_admin_router() -> Router<AppState> {
    Router::new()
        .route("/accounts/{id}", get(get_account))
        .route("/accounts/{id}/access", put(update_access))
}
