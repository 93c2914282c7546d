use sqlx::{PgPool, QueryBuilder};

use crate::dto::ranking::{RankingEntry, RankingScope};
use crate::error::Result;

/// Read-only leaderboard projections over the users table.
pub struct RankingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RankingRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Rank every user by the requested points column, highest first.
    pub async fn leaderboard(&self, scope: RankingScope) -> Result<Vec<RankingEntry>> {
        let column = scope.as_column();

        let mut query = QueryBuilder::new("SELECT ROW_NUMBER() OVER (ORDER BY ");
        query.push(column);
        query.push(" DESC, username ASC) AS ranking, id AS user_id, username, ");
        query.push(column);
        query.push(" AS points, avatar FROM users ORDER BY ranking");

        let entries: Vec<RankingEntry> = query.build_query_as().fetch_all(self.pool).await?;

        Ok(entries)
    }
}
