use sqlx::PgPool;
use storage::{
    dto::registration::{ParticipantResponse, RegisteredTournamentRow},
    dto::tournament::CreateTournamentRequest,
    error::Result,
    models::{Registration, Tournament},
    repository::registration::RegistrationRepository,
    repository::tournament::TournamentRepository,
    services::registration::RegistrationService,
};
use uuid::Uuid;

use crate::retry::with_read_retry;

/// List all tournaments
pub async fn list_tournaments(pool: &PgPool) -> Result<Vec<Tournament>> {
    with_read_retry(|| async move { TournamentRepository::new(pool).list().await }).await
}

/// Get a tournament by ID
pub async fn get_tournament(pool: &PgPool, id: i32) -> Result<Tournament> {
    with_read_retry(|| async move { TournamentRepository::new(pool).find_by_id(id).await }).await
}

/// Create a new tournament
pub async fn create_tournament(
    pool: &PgPool,
    request: &CreateTournamentRequest,
) -> Result<Tournament> {
    let repo = TournamentRepository::new(pool);
    repo.create(request).await
}

/// Overwrite a tournament with the merged field set
pub async fn update_tournament(
    pool: &PgPool,
    id: i32,
    merged: &CreateTournamentRequest,
) -> Result<Tournament> {
    let repo = TournamentRepository::new(pool);
    repo.update(id, merged).await
}

/// Delete a tournament and its registrations
pub async fn delete_tournament(pool: &PgPool, id: i32) -> Result<()> {
    let repo = TournamentRepository::new(pool);
    repo.delete(id).await
}

/// Register the caller for a tournament
pub async fn register(
    pool: &PgPool,
    tournament_id: i32,
    user_id: Uuid,
    team_name: Option<&str>,
) -> Result<Registration> {
    RegistrationService::new(pool)
        .register(tournament_id, user_id, team_name)
        .await
}

/// Withdraw the caller from a tournament
pub async fn withdraw(pool: &PgPool, tournament_id: i32, user_id: Uuid) -> Result<()> {
    RegistrationService::new(pool)
        .withdraw(tournament_id, user_id)
        .await
}

/// Remove a participant by registration ID (admin path)
pub async fn remove_participant(
    pool: &PgPool,
    tournament_id: i32,
    registration_id: i32,
    is_admin: bool,
) -> Result<()> {
    RegistrationService::new(pool)
        .remove_participant(tournament_id, registration_id, is_admin)
        .await
}

/// List participants of a tournament with their display name
pub async fn list_participants(
    pool: &PgPool,
    tournament_id: i32,
) -> Result<Vec<ParticipantResponse>> {
    // Surface NotFound for unknown tournaments rather than an empty list.
    get_tournament(pool, tournament_id).await?;

    with_read_retry(|| async move {
        RegistrationRepository::new(pool)
            .list_by_tournament(tournament_id)
            .await
    })
    .await
}

/// List tournaments the user is registered for
pub async fn list_user_tournaments(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<RegisteredTournamentRow>> {
    with_read_retry(|| async move {
        RegistrationRepository::new(pool).list_by_user(user_id).await
    })
    .await
}
