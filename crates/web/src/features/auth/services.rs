use sqlx::PgPool;
use storage::{
    dto::user::{LoginRequest, RegisterUserRequest, UpdateProfileRequest},
    models::User,
    repository::user::UserRepository,
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};
use crate::retry::with_read_retry;
use crate::utils::password;

/// Create a new account with a freshly hashed password
pub async fn register_user(pool: &PgPool, req: &RegisterUserRequest) -> WebResult<User> {
    let password_hash = password::hash_password(&req.password)
        .map_err(|e| WebError::InternalServerError(format!("Password hash error: {}", e)))?;

    let repo = UserRepository::new(pool);
    let user = repo
        .create(&req.username, &req.email, &password_hash)
        .await?;

    Ok(user)
}

/// Check credentials and return the user, or `InvalidCredentials`.
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn authenticate(pool: &PgPool, req: &LoginRequest) -> WebResult<User> {
    let repo = UserRepository::new(pool);
    let user = repo
        .find_by_email(&req.email)
        .await?
        .ok_or(WebError::InvalidCredentials)?;

    let valid = password::verify_password(&req.password, &user.password_hash)
        .map_err(|e| WebError::InternalServerError(format!("Password verify error: {}", e)))?;

    if !valid {
        return Err(WebError::InvalidCredentials);
    }

    Ok(user)
}

/// Load the caller's profile
pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> WebResult<User> {
    let user = with_read_retry(|| async move {
        UserRepository::new(pool).find_by_id(user_id).await
    })
    .await?;
    Ok(user)
}

/// Apply profile changes, rehashing the password if one was provided
pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    req: &UpdateProfileRequest,
) -> WebResult<User> {
    let password_hash = match &req.password {
        Some(password) => Some(password::hash_password(password).map_err(|e| {
            WebError::InternalServerError(format!("Password hash error: {}", e))
        })?),
        None => None,
    };

    let repo = UserRepository::new(pool);
    let user = repo
        .update_profile(
            user_id,
            req.username.as_deref(),
            req.avatar.as_deref(),
            password_hash.as_deref(),
        )
        .await?;

    Ok(user)
}

/// Delete the caller's account, cascading their registrations and repairing
/// the affected tournament counters
pub async fn delete_account(pool: &PgPool, user_id: Uuid) -> WebResult<()> {
    let repo = UserRepository::new(pool);
    repo.delete(user_id).await?;
    Ok(())
}
