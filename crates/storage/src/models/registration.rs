use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One user's claim on one seat in one tournament. Existence implies the
/// registration is active; there is no separate approval state.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Registration {
    pub id: i32,
    pub tournament_id: i32,
    pub user_id: Uuid,
    pub team_name: Option<String>,
    pub registered_at: DateTime<Utc>,
}
