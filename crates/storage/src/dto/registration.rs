use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::TournamentStatus;

/// Request payload for registering for a tournament
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(max = 255, message = "Team name must be at most 255 characters"))]
    pub team_name: Option<String>,
}

/// One participant row on the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ParticipantResponse {
    pub registration_id: i32,
    pub user_id: Uuid,
    pub username: String,
    pub team_name: Option<String>,
    pub registered_at: DateTime<Utc>,
}

/// A tournament the user is registered for, annotated with their own entry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RegisteredTournamentRow {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub location: String,
    pub maps_link: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub registration_deadline: DateTime<Utc>,
    pub max_participants: i32,
    pub current_participants: i32,
    pub fee: Decimal,
    pub team_name: Option<String>,
    pub registered_at: DateTime<Utc>,
}

/// `RegisteredTournamentRow` with the derived status attached
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisteredTournamentResponse {
    #[serde(flatten)]
    pub tournament: RegisteredTournamentRow,
    pub status: TournamentStatus,
}

impl From<RegisteredTournamentRow> for RegisteredTournamentResponse {
    fn from(row: RegisteredTournamentRow) -> Self {
        let status = TournamentStatus::derive(Utc::now(), row.start_date, row.end_date);
        Self {
            tournament: row,
            status,
        }
    }
}
