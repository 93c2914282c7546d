use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::winner::{CreateWinnerRequest, WinnerResponse};
use crate::error::{Result, StorageError};

const WINNER_SELECT: &str = r#"
    SELECT w.id, w.user_id, w.tournament_id, w.season_number, w.win_date,
           w.picture_url, u.username, u.avatar, t.name AS tournament_name
    FROM winners w
    INNER JOIN users u ON w.user_id = u.id
    LEFT JOIN tournaments t ON w.tournament_id = t.id
"#;

/// Repository for the winners gallery
pub struct WinnerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WinnerRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all winners, most recent win first
    pub async fn list(&self) -> Result<Vec<WinnerResponse>> {
        let winners = sqlx::query_as::<_, WinnerResponse>(&format!(
            "{WINNER_SELECT} ORDER BY w.win_date DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(winners)
    }

    /// Record a winner and return the joined display row
    pub async fn create(&self, req: &CreateWinnerRequest) -> Result<WinnerResponse> {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO winners (user_id, tournament_id, season_number, win_date, picture_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(req.user_id)
        .bind(req.tournament_id)
        .bind(req.season_number)
        .bind(req.win_date)
        .bind(&req.picture_url)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.is_foreign_key_violation() {
                StorageError::ConstraintViolation("Unknown user or tournament".to_string())
            } else {
                err
            }
        })?;

        let winner =
            sqlx::query_as::<_, WinnerResponse>(&format!("{WINNER_SELECT} WHERE w.id = $1"))
                .bind(id)
                .fetch_one(self.pool)
                .await?;

        Ok(winner)
    }

    /// Delete a winner by ID
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM winners WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
