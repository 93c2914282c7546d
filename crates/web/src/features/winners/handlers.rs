use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::winner::{CreateWinnerRequest, WinnerResponse},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::CurrentUser;

use super::services;

#[utoipa::path(
    get,
    path = "/api/winners",
    responses(
        (status = 200, description = "All winners, most recent first", body = Vec<WinnerResponse>)
    ),
    tag = "winners"
)]
pub async fn list_winners(
    State(db): State<Database>,
) -> Result<Json<Vec<WinnerResponse>>, WebError> {
    let winners = services::list_winners(db.pool()).await?;

    Ok(Json(winners))
}

#[utoipa::path(
    post,
    path = "/api/winners",
    request_body = CreateWinnerRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Winner recorded", body = WinnerResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin privileges required"),
        (status = 409, description = "Unknown user or tournament")
    ),
    tag = "winners"
)]
pub async fn create_winner(
    State(db): State<Database>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateWinnerRequest>,
) -> Result<Response, WebError> {
    user.require_admin()?;

    req.validate()?;

    let winner = services::create_winner(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(winner)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/winners/{id}",
    params(
        ("id" = Uuid, Path, description = "Winner ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Winner deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Winner not found")
    ),
    tag = "winners"
)]
pub async fn delete_winner(
    State(db): State<Database>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    user.require_admin()?;

    services::delete_winner(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
