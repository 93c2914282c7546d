use sqlx::PgPool;
use storage::{
    dto::winner::{CreateWinnerRequest, WinnerResponse},
    error::Result,
    repository::winner::WinnerRepository,
};
use uuid::Uuid;

use crate::retry::with_read_retry;

/// List all winners, most recent win first
pub async fn list_winners(pool: &PgPool) -> Result<Vec<WinnerResponse>> {
    with_read_retry(|| async move { WinnerRepository::new(pool).list().await }).await
}

/// Record a tournament winner
pub async fn create_winner(pool: &PgPool, request: &CreateWinnerRequest) -> Result<WinnerResponse> {
    let repo = WinnerRepository::new(pool);
    repo.create(request).await
}

/// Delete a winner entry
pub async fn delete_winner(pool: &PgPool, id: Uuid) -> Result<()> {
    let repo = WinnerRepository::new(pool);
    repo.delete(id).await
}
