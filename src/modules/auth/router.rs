use axum::{
    Router,
    routing::{get, post, put},
};

use super::controller::{change_password, get_profile, login, register, update_profile};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", get(get_profile).put(update_profile))
        .route("/password", put(change_password))
}
