use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gujarati_rewards_server::routes::{
    admin_stats, get_progress, health_check, register_user, start_session, track_activity,
};
use gujarati_rewards_server::{open_database, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gujarati_rewards_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Gujarati Rewards Server...");

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "Environment: {}, Server: {}",
        config.environment,
        config.server_address()
    );

    // Open the embedded database (creates tables on first run)
    let db = open_database(&config.database_path)?;

    // Configure CORS
    let origins = config
        .allowed_origins
        .iter()
        .map(|s| s.parse().expect("invalid origin in ALLOWED_ORIGINS"))
        .collect::<Vec<axum::http::HeaderValue>>();
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers(Any);

    // Create app state
    let state = AppState::new(db, config.clone());

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/register", post(register_user))
        .route("/api/session/start", post(start_session))
        .route("/api/activity", post(track_activity))
        .route("/api/progress", get(get_progress))
        .route("/admin/stats", get(admin_stats))
        .layer(cors)
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server_address().parse()?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
