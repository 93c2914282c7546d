use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request payload for recording a tournament winner
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateWinnerRequest {
    pub user_id: Uuid,

    pub tournament_id: Option<i32>,

    #[validate(range(min = 1))]
    pub season_number: Option<i32>,

    pub win_date: NaiveDate,

    #[validate(length(max = 1024))]
    pub picture_url: Option<String>,
}

/// Winner joined with user and tournament display fields
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WinnerResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tournament_id: Option<i32>,
    pub season_number: Option<i32>,
    pub win_date: NaiveDate,
    pub picture_url: Option<String>,
    pub username: String,
    pub avatar: Option<String>,
    pub tournament_name: Option<String>,
}
