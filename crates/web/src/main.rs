use anyhow::Context;
use axum::Router;
use storage::Database;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;
mod retry;
mod state;
mod utils;

use config::Config;
use state::AppState;
use utils::jwt::JwtKeys;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::tournaments::handlers::list_tournaments,
        features::tournaments::handlers::get_tournament,
        features::tournaments::handlers::create_tournament,
        features::tournaments::handlers::update_tournament,
        features::tournaments::handlers::delete_tournament,
        features::tournaments::handlers::register,
        features::tournaments::handlers::withdraw,
        features::tournaments::handlers::list_participants,
        features::tournaments::handlers::remove_participant,
        features::tournaments::handlers::list_user_tournaments,
        features::rankings::handlers::get_overall_ranking,
        features::rankings::handlers::get_season_ranking,
        features::winners::handlers::list_winners,
        features::winners::handlers::create_winner,
        features::winners::handlers::delete_winner,
        features::auth::handlers::register,
        features::auth::handlers::login,
        features::auth::handlers::get_profile,
        features::auth::handlers::update_profile,
        features::auth::handlers::delete_profile,
    ),
    components(
        schemas(
            storage::dto::tournament::CreateTournamentRequest,
            storage::dto::tournament::UpdateTournamentRequest,
            storage::dto::tournament::TournamentResponse,
            storage::dto::registration::RegisterRequest,
            storage::dto::registration::ParticipantResponse,
            storage::dto::registration::RegisteredTournamentRow,
            storage::dto::registration::RegisteredTournamentResponse,
            storage::dto::ranking::RankingEntry,
            storage::dto::winner::CreateWinnerRequest,
            storage::dto::winner::WinnerResponse,
            storage::dto::user::RegisterUserRequest,
            storage::dto::user::LoginRequest,
            storage::dto::user::UpdateProfileRequest,
            storage::dto::user::UserResponse,
            storage::dto::user::AuthResponse,
            storage::models::Tournament,
            storage::models::TournamentStatus,
            storage::models::Registration,
        )
    ),
    tags(
        (name = "tournaments", description = "Tournament catalog endpoints"),
        (name = "registrations", description = "Tournament registration endpoints"),
        (name = "rankings", description = "Public leaderboard endpoints"),
        (name = "winners", description = "Winners gallery endpoints"),
        (name = "auth", description = "Account and profile endpoints"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting Kubb club API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let state = AppState {
        db,
        jwt: JwtKeys::new(&config.jwt_secret, config.token_ttl_hours),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest(
            "/api/tournaments",
            features::tournaments::routes::routes(state.clone()),
        )
        .nest("/api/rankings", features::rankings::routes::routes())
        .nest(
            "/api/winners",
            features::winners::routes::routes(state.clone()),
        )
        .nest("/api/auth", features::auth::routes::routes(state.clone()))
        .layer(cors)
        .with_state(state);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", bind_address);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .context("Failed to bind listener")?;
    axum::serve(listener, app).await?;

    Ok(())
}
