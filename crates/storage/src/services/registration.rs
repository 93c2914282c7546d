use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Registration, Tournament};

const TOURNAMENT_COLUMNS: &str = "id, name, description, location, maps_link, start_date, \
     end_date, registration_deadline, max_participants, current_participants, fee, created_at";

const REGISTRATION_COLUMNS: &str = "id, tournament_id, user_id, team_name, registered_at";

/// The only mutation entry point for joining or leaving a tournament.
///
/// Every operation runs in a single transaction holding a row lock on the
/// tournament, so the participant counter always equals the number of rows
/// in the ledger and two callers racing for the last seat cannot both win.
pub struct RegistrationService<'a> {
    pool: &'a PgPool,
}

impl<'a> RegistrationService<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Register a user for a tournament.
    ///
    /// Fails with `NotFound`, `RegistrationClosed`, `AlreadyRegistered` or
    /// `TournamentFull`; on any failure the transaction rolls back whole.
    pub async fn register(
        &self,
        tournament_id: i32,
        user_id: Uuid,
        team_name: Option<&str>,
    ) -> Result<Registration> {
        let mut tx = self.pool.begin().await?;

        let tournament = lock_tournament(&mut tx, tournament_id).await?;

        if Utc::now() > tournament.registration_deadline {
            return Err(StorageError::RegistrationClosed);
        }

        // The row lock freezes the counter, so a full tournament is
        // reported as full even to users who already hold a seat.
        if tournament.is_full() {
            return Err(StorageError::TournamentFull);
        }

        let existing: Option<(i32,)> = sqlx::query_as(
            "SELECT id FROM tournament_registrations WHERE tournament_id = $1 AND user_id = $2",
        )
        .bind(tournament_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        if existing.is_some() {
            return Err(StorageError::AlreadyRegistered);
        }

        // Guarded increment: zero rows affected means the last seat is gone,
        // even if the earlier read saw a free one.
        let claimed = sqlx::query(
            r#"
            UPDATE tournaments
            SET current_participants = current_participants + 1
            WHERE id = $1 AND current_participants < max_participants
            "#,
        )
        .bind(tournament_id)
        .execute(&mut *tx)
        .await?;

        if claimed.rows_affected() == 0 {
            return Err(StorageError::TournamentFull);
        }

        let registration = sqlx::query_as::<_, Registration>(&format!(
            r#"
            INSERT INTO tournament_registrations (tournament_id, user_id, team_name)
            VALUES ($1, $2, $3)
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(tournament_id)
        .bind(user_id)
        .bind(team_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.is_unique_violation() {
                StorageError::AlreadyRegistered
            } else {
                err
            }
        })?;

        tx.commit().await?;

        Ok(registration)
    }

    /// Withdraw a user from a tournament. A second withdraw for the same
    /// pair fails with `NotRegistered` and leaves the counter untouched.
    pub async fn withdraw(&self, tournament_id: i32, user_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        lock_tournament(&mut tx, tournament_id).await?;

        let deleted = sqlx::query(
            "DELETE FROM tournament_registrations WHERE tournament_id = $1 AND user_id = $2",
        )
        .bind(tournament_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if deleted.rows_affected() == 0 {
            return Err(StorageError::NotRegistered);
        }

        recount_participants(&mut tx, tournament_id).await?;

        tx.commit().await?;

        Ok(())
    }

    /// Remove a participant by registration ID (admin dashboard path).
    pub async fn remove_participant(
        &self,
        tournament_id: i32,
        registration_id: i32,
        is_admin: bool,
    ) -> Result<()> {
        if !is_admin {
            return Err(StorageError::Forbidden);
        }

        let mut tx = self.pool.begin().await?;

        lock_tournament(&mut tx, tournament_id).await?;

        let deleted = sqlx::query(
            "DELETE FROM tournament_registrations WHERE id = $1 AND tournament_id = $2",
        )
        .bind(registration_id)
        .bind(tournament_id)
        .execute(&mut *tx)
        .await?;

        if deleted.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        recount_participants(&mut tx, tournament_id).await?;

        tx.commit().await?;

        Ok(())
    }
}

/// Load the tournament under a row lock so concurrent mutations of the same
/// tournament serialize on it.
async fn lock_tournament(
    tx: &mut Transaction<'_, Postgres>,
    tournament_id: i32,
) -> Result<Tournament> {
    let tournament = sqlx::query_as::<_, Tournament>(&format!(
        "SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE id = $1 FOR UPDATE"
    ))
    .bind(tournament_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(StorageError::NotFound)?;

    Ok(tournament)
}

/// The counter is a materialized view of the ledger: after any removal it is
/// recomputed from the authoritative count, inside the same transaction.
async fn recount_participants(
    tx: &mut Transaction<'_, Postgres>,
    tournament_id: i32,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE tournaments
        SET current_participants = (
            SELECT COUNT(*) FROM tournament_registrations WHERE tournament_id = $1
        )
        WHERE id = $1
        "#,
    )
    .bind(tournament_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
