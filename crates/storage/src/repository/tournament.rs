use sqlx::PgPool;

use crate::dto::tournament::CreateTournamentRequest;
use crate::error::{Result, StorageError};
use crate::models::Tournament;

const TOURNAMENT_COLUMNS: &str = "id, name, description, location, maps_link, start_date, \
     end_date, registration_deadline, max_participants, current_participants, fee, created_at";

/// Repository for Tournament database operations
pub struct TournamentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TournamentRepository<'a> {
    /// Create a new TournamentRepository
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all tournaments, most recent start date first
    pub async fn list(&self) -> Result<Vec<Tournament>> {
        let tournaments = sqlx::query_as::<_, Tournament>(&format!(
            "SELECT {TOURNAMENT_COLUMNS} FROM tournaments ORDER BY start_date DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(tournaments)
    }

    /// Get a tournament by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Tournament> {
        let tournament = sqlx::query_as::<_, Tournament>(&format!(
            "SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(tournament)
    }

    /// Create a new tournament with a participant count of zero
    pub async fn create(&self, req: &CreateTournamentRequest) -> Result<Tournament> {
        let tournament = sqlx::query_as::<_, Tournament>(&format!(
            r#"
            INSERT INTO tournaments (
                name, description, location, maps_link,
                start_date, end_date, registration_deadline,
                max_participants, fee
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {TOURNAMENT_COLUMNS}
            "#
        ))
        .bind(&req.name)
        .bind(&req.description)
        .bind(&req.location)
        .bind(&req.maps_link)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.registration_deadline)
        .bind(req.max_participants)
        .bind(req.fee)
        .fetch_one(self.pool)
        .await?;

        Ok(tournament)
    }

    /// Overwrite a tournament with the merged field set. The participant
    /// counter is owned by the registration service and is not touched here.
    pub async fn update(&self, id: i32, req: &CreateTournamentRequest) -> Result<Tournament> {
        let tournament = sqlx::query_as::<_, Tournament>(&format!(
            r#"
            UPDATE tournaments
            SET
                name = $2,
                description = $3,
                location = $4,
                maps_link = $5,
                start_date = $6,
                end_date = $7,
                registration_deadline = $8,
                max_participants = $9,
                fee = $10
            WHERE id = $1
            RETURNING {TOURNAMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&req.name)
        .bind(&req.description)
        .bind(&req.location)
        .bind(&req.maps_link)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.registration_deadline)
        .bind(req.max_participants)
        .bind(req.fee)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(tournament)
    }

    /// Delete a tournament by ID; registrations cascade with it
    pub async fn delete(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM tournaments WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
