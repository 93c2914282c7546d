use sqlx::PgPool;
use storage::{
    dto::ranking::{RankingEntry, RankingScope},
    error::Result,
    repository::ranking::RankingRepository,
};

use crate::retry::with_read_retry;

/// Fetch the leaderboard for the requested scope
pub async fn leaderboard(pool: &PgPool, scope: RankingScope) -> Result<Vec<RankingEntry>> {
    with_read_retry(|| async move { RankingRepository::new(pool).leaderboard(scope).await }).await
}
