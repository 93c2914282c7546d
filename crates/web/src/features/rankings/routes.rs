use axum::{Router, routing::get};

use super::handlers::{get_overall_ranking, get_season_ranking};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_overall_ranking))
        .route("/season", get(get_season_ranking))
}
