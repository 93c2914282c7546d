use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::user::{
        AuthResponse, LoginRequest, RegisterUserRequest, UpdateProfileRequest, UserResponse,
    },
};
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::CurrentUser;
use crate::utils::jwt::JwtKeys;

use super::services;

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "Account created, token issued", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username or email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(db): State<Database>,
    State(jwt): State<JwtKeys>,
    Json(req): Json<RegisterUserRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let user = services::register_user(db.pool(), &req).await?;

    let token = jwt
        .sign(user.id)
        .map_err(|e| WebError::InternalServerError(format!("JWT sign error: {}", e)))?;

    tracing::info!(username = %user.username, "New account registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserResponse::from(user),
        }),
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted, token issued", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(db): State<Database>,
    State(jwt): State<JwtKeys>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, WebError> {
    req.validate()?;

    let user = services::authenticate(db.pool(), &req).await?;

    let token = jwt
        .sign(user.id)
        .map_err(|e| WebError::InternalServerError(format!("JWT sign error: {}", e)))?;

    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from(user),
    }))
}

#[utoipa::path(
    get,
    path = "/api/auth/profile",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "The caller's profile", body = UserResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth"
)]
pub async fn get_profile(
    State(db): State<Database>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<UserResponse>, WebError> {
    let profile = services::get_profile(db.pool(), user.id).await?;

    Ok(Json(UserResponse::from(profile)))
}

#[utoipa::path(
    patch,
    path = "/api/auth/profile",
    request_body = UpdateProfileRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Username already taken")
    ),
    tag = "auth"
)]
pub async fn update_profile(
    State(db): State<Database>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, WebError> {
    req.validate()?;

    let profile = services::update_profile(db.pool(), user.id, &req).await?;

    Ok(Json(UserResponse::from(profile)))
}

#[utoipa::path(
    delete,
    path = "/api/auth/profile",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Account deleted along with its registrations"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth"
)]
pub async fn delete_profile(
    State(db): State<Database>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Response, WebError> {
    services::delete_account(db.pool(), user.id).await?;

    tracing::info!(username = %user.username, "Account deleted");

    Ok(StatusCode::NO_CONTENT.into_response())
}
