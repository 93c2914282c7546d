use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One row on the leaderboard, ranked by overall or season points.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RankingEntry {
    pub ranking: i64,
    pub user_id: Uuid,
    pub username: String,
    pub points: i32,
    pub avatar: Option<String>,
}

/// Which points column the leaderboard is ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingScope {
    Overall,
    Season,
}

impl RankingScope {
    pub fn as_column(&self) -> &'static str {
        match self {
            RankingScope::Overall => "points",
            RankingScope::Season => "season_points",
        }
    }
}
