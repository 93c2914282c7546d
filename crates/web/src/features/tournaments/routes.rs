use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};

use super::handlers::{
    create_tournament, delete_tournament, get_tournament, list_participants,
    list_tournaments, list_user_tournaments, register, remove_participant, update_tournament,
    withdraw,
};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_tournament))
        .route("/:id", patch(update_tournament))
        .route("/:id", delete(delete_tournament))
        .route("/:id/register", post(register))
        .route("/:id/register", delete(withdraw))
        .route("/:id/participants", get(list_participants))
        .route("/:id/participants/:registration_id", delete(remove_participant))
        .route("/user/registered", get(list_user_tournaments))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/", get(list_tournaments))
        .route("/:id", get(get_tournament))
        .merge(protected)
}
