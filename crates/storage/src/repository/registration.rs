use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::registration::{ParticipantResponse, RegisteredTournamentRow};
use crate::error::Result;

/// Read-side queries over the registration ledger. Mutations go through
/// `services::registration` so counter updates stay transactional.
pub struct RegistrationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RegistrationRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Whether the user holds an active registration for the tournament
    pub async fn is_registered(&self, tournament_id: i32, user_id: Uuid) -> Result<bool> {
        let row: Option<(i32,)> = sqlx::query_as(
            "SELECT id FROM tournament_registrations WHERE tournament_id = $1 AND user_id = $2",
        )
        .bind(tournament_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.is_some())
    }

    /// All participants of a tournament with their display name, in
    /// registration order
    pub async fn list_by_tournament(&self, tournament_id: i32) -> Result<Vec<ParticipantResponse>> {
        let participants = sqlx::query_as::<_, ParticipantResponse>(
            r#"
            SELECT tr.id AS registration_id, tr.user_id, u.username,
                   tr.team_name, tr.registered_at
            FROM tournament_registrations tr
            INNER JOIN users u ON tr.user_id = u.id
            WHERE tr.tournament_id = $1
            ORDER BY tr.registered_at ASC
            "#,
        )
        .bind(tournament_id)
        .fetch_all(self.pool)
        .await?;

        Ok(participants)
    }

    /// All tournaments the user is registered for, joined with their own
    /// entry, most recent start date first
    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<RegisteredTournamentRow>> {
        let tournaments = sqlx::query_as::<_, RegisteredTournamentRow>(
            r#"
            SELECT t.id, t.name, t.description, t.location, t.maps_link,
                   t.start_date, t.end_date, t.registration_deadline,
                   t.max_participants, t.current_participants, t.fee,
                   tr.team_name, tr.registered_at
            FROM tournaments t
            INNER JOIN tournament_registrations tr ON t.id = tr.tournament_id
            WHERE tr.user_id = $1
            ORDER BY t.start_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(tournaments)
    }
}
