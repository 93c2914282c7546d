use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};

use super::handlers::{delete_profile, get_profile, login, register, update_profile};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/profile", get(get_profile))
        .route("/profile", patch(update_profile))
        .route("/profile", delete(delete_profile))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
}
