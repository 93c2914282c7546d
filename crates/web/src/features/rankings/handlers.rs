use axum::{Json, extract::State};
use storage::{
    Database,
    dto::ranking::{RankingEntry, RankingScope},
};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/rankings",
    responses(
        (status = 200, description = "All-time leaderboard ordered by points", body = Vec<RankingEntry>)
    ),
    tag = "rankings"
)]
pub async fn get_overall_ranking(
    State(db): State<Database>,
) -> Result<Json<Vec<RankingEntry>>, WebError> {
    let entries = services::leaderboard(db.pool(), RankingScope::Overall).await?;

    Ok(Json(entries))
}

#[utoipa::path(
    get,
    path = "/api/rankings/season",
    responses(
        (status = 200, description = "Current-season leaderboard ordered by season points", body = Vec<RankingEntry>)
    ),
    tag = "rankings"
)]
pub async fn get_season_ranking(
    State(db): State<Database>,
) -> Result<Json<Vec<RankingEntry>>, WebError> {
    let entries = services::leaderboard(db.pool(), RankingScope::Season).await?;

    Ok(Json(entries))
}
