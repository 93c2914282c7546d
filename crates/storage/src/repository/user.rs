use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::User;

const USER_COLUMNS: &str = "id, username, email, password_hash, avatar, is_admin, \
     points, season_points, created_at";

/// Repository for User database operations
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Create a new account. Username and email uniqueness is enforced by
    /// the database; violations surface as `ConstraintViolation`.
    pub async fn create(&self, username: &str, email: &str, password_hash: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.is_unique_violation() {
                StorageError::ConstraintViolation(
                    "Username or email is already registered".to_string(),
                )
            } else {
                err
            }
        })?;

        Ok(user)
    }

    /// Update profile fields. `None` leaves the stored value unchanged.
    pub async fn update_profile(
        &self,
        id: Uuid,
        username: Option<&str>,
        avatar: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET
                username = COALESCE($2, username),
                avatar = COALESCE($3, avatar),
                password_hash = COALESCE($4, password_hash)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(username)
        .bind(avatar)
        .bind(password_hash)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.is_unique_violation() {
                StorageError::ConstraintViolation("Username is already taken".to_string())
            } else {
                err
            }
        })?
        .ok_or(StorageError::NotFound)?;

        Ok(user)
    }

    /// Delete a user and their registrations, recomputing the affected
    /// tournament counters in the same transaction so the counter never
    /// drifts from the ledger.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        // Lock the user row up front. A concurrent registration takes a
        // KEY SHARE lock on it for the foreign key, so this blocks new
        // registrations from slipping in between the ledger sweep below
        // and the user delete.
        let locked: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM users WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        if locked.is_none() {
            return Err(StorageError::NotFound);
        }

        let affected: Vec<(i32,)> = sqlx::query_as(
            "DELETE FROM tournament_registrations WHERE user_id = $1 RETURNING tournament_id",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        for (tournament_id,) in affected {
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
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
