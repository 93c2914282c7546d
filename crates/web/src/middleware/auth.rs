use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use storage::error::StorageError;
use storage::repository::user::UserRepository;
use uuid::Uuid;

use crate::error::{WebError, WebResult};
use crate::retry::with_read_retry;
use crate::state::AppState;

/// The verified caller, inserted as a request extension by `require_auth`.
///
/// Admin authority is this explicit flag, loaded fresh from the users table
/// on every request and checked per-operation in handlers.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub is_admin: bool,
}

impl CurrentUser {
    pub fn require_admin(&self) -> WebResult<()> {
        if self.is_admin {
            Ok(())
        } else {
            Err(WebError::Storage(StorageError::Forbidden))
        }
    }
}

/// Verify the bearer token and attach the caller to the request.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> WebResult<Response> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(WebError::Unauthorized)?;

    let claims = state.jwt.verify(token).map_err(|e| {
        tracing::warn!("Rejected bearer token: {}", e);
        WebError::Unauthorized
    })?;

    let pool = state.db.pool();
    let user_id = claims.sub;
    let user = with_read_retry(|| async move {
        UserRepository::new(pool).find_by_id(user_id).await
    })
    .await
    .map_err(|e| match e {
        StorageError::NotFound => WebError::Unauthorized,
        other => WebError::Storage(other),
    })?;

    req.extensions_mut().insert(CurrentUser {
        id: user.id,
        username: user.username,
        is_admin: user.is_admin,
    });

    Ok(next.run(req).await)
}
