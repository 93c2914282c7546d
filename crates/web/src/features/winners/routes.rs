use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use super::handlers::{create_winner, delete_winner, list_winners};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_winner))
        .route("/:id", delete(delete_winner))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new().route("/", get(list_winners)).merge(protected)
}
