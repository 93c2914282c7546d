use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::registration::{ParticipantResponse, RegisterRequest, RegisteredTournamentResponse},
    dto::tournament::{CreateTournamentRequest, TournamentResponse, UpdateTournamentRequest},
    models::Registration,
};
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::CurrentUser;

use super::services;

#[utoipa::path(
    get,
    path = "/api/tournaments",
    responses(
        (status = 200, description = "List all tournaments with derived status", body = Vec<TournamentResponse>)
    ),
    tag = "tournaments"
)]
pub async fn list_tournaments(
    State(db): State<Database>,
) -> Result<Json<Vec<TournamentResponse>>, WebError> {
    let tournaments = services::list_tournaments(db.pool()).await?;

    let response: Vec<TournamentResponse> = tournaments
        .into_iter()
        .map(TournamentResponse::from)
        .collect();

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/tournaments/{id}",
    params(
        ("id" = i32, Path, description = "Tournament ID")
    ),
    responses(
        (status = 200, description = "Tournament found", body = TournamentResponse),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn get_tournament(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    let tournament = services::get_tournament(db.pool(), id).await?;

    Ok(Json(TournamentResponse::from(tournament)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/tournaments",
    request_body = CreateTournamentRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Tournament created successfully", body = TournamentResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin privileges required")
    ),
    tag = "tournaments"
)]
pub async fn create_tournament(
    State(db): State<Database>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateTournamentRequest>,
) -> Result<Response, WebError> {
    user.require_admin()?;

    req.validate()?;
    req.validate_dates()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    let tournament = services::create_tournament(db.pool(), &req).await?;

    Ok((
        StatusCode::CREATED,
        Json(TournamentResponse::from(tournament)),
    )
        .into_response())
}

#[utoipa::path(
    patch,
    path = "/api/tournaments/{id}",
    params(
        ("id" = i32, Path, description = "Tournament ID")
    ),
    request_body = UpdateTournamentRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Tournament updated successfully", body = TournamentResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn update_tournament(
    State(db): State<Database>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(update_req): Json<UpdateTournamentRequest>,
) -> Result<Response, WebError> {
    user.require_admin()?;

    update_req.validate()?;

    // Merge over the existing record, then re-validate the whole thing
    // under the same rules as create.
    let existing = services::get_tournament(db.pool(), id).await?;
    let merged = update_req.apply(&existing);
    merged.validate()?;
    merged
        .validate_dates()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    let updated = services::update_tournament(db.pool(), id, &merged).await?;

    Ok(Json(TournamentResponse::from(updated)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/tournaments/{id}",
    params(
        ("id" = i32, Path, description = "Tournament ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Tournament deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn delete_tournament(
    State(db): State<Database>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    user.require_admin()?;

    services::delete_tournament(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/tournaments/{id}/register",
    params(
        ("id" = i32, Path, description = "Tournament ID")
    ),
    request_body = RegisterRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Registered successfully", body = Registration),
        (status = 400, description = "Registration deadline has passed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Tournament not found"),
        (status = 409, description = "Tournament full or already registered")
    ),
    tag = "registrations"
)]
pub async fn register(
    State(db): State<Database>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(req): Json<RegisterRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let registration =
        services::register(db.pool(), id, user.id, req.team_name.as_deref()).await?;

    Ok((StatusCode::CREATED, Json(registration)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/tournaments/{id}/register",
    params(
        ("id" = i32, Path, description = "Tournament ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Withdrawn successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Tournament not found or not registered")
    ),
    tag = "registrations"
)]
pub async fn withdraw(
    State(db): State<Database>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    services::withdraw(db.pool(), id, user.id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    get,
    path = "/api/tournaments/{id}/participants",
    params(
        ("id" = i32, Path, description = "Tournament ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Participants in registration order", body = Vec<ParticipantResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Tournament not found")
    ),
    tag = "registrations"
)]
pub async fn list_participants(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<ParticipantResponse>>, WebError> {
    let participants = services::list_participants(db.pool(), id).await?;

    Ok(Json(participants))
}

#[utoipa::path(
    delete,
    path = "/api/tournaments/{id}/participants/{registration_id}",
    params(
        ("id" = i32, Path, description = "Tournament ID"),
        ("registration_id" = i32, Path, description = "Registration ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Participant removed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Registration not found in this tournament")
    ),
    tag = "registrations"
)]
pub async fn remove_participant(
    State(db): State<Database>,
    Extension(user): Extension<CurrentUser>,
    Path((id, registration_id)): Path<(i32, i32)>,
) -> Result<Response, WebError> {
    services::remove_participant(db.pool(), id, registration_id, user.is_admin).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    get,
    path = "/api/tournaments/user/registered",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Tournaments the caller is registered for", body = Vec<RegisteredTournamentResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "registrations"
)]
pub async fn list_user_tournaments(
    State(db): State<Database>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<RegisteredTournamentResponse>>, WebError> {
    let rows = services::list_user_tournaments(db.pool(), user.id).await?;

    let response: Vec<RegisteredTournamentResponse> = rows
        .into_iter()
        .map(RegisteredTournamentResponse::from)
        .collect();

    Ok(Json(response))
}
