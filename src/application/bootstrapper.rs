//! Application bootstrapper
//!
//! Handles all initialization and setup for the EduPlay backend.

use std::net::SocketAddr;

use axum::{extract::DefaultBodyLimit, http::HeaderValue, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, CONFIG};
use crate::db;
use crate::endpoints;
use crate::services::{bootstrap, PdfStorage};
use crate::state::AppState;

/// Bootstrap and run the application
pub async fn run() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    init_tracing();

    tracing::info!("Starting EduPlay backend v{}", CONFIG.version);

    let state = init_services().await?;
    let app = create_app(state);

    serve(app).await
}

/// Initialize tracing/logging
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("eduplay={},tower_http=info", CONFIG.log_level).into()
    });

    match CONFIG.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_ansi(false))
            .init(),
    }
}

/// Initialize all application services
async fn init_services() -> anyhow::Result<AppState> {
    let conn = db::connect().await?;
    tracing::info!("Database connection established");

    if let (Some(email), Some(password)) = (
        CONFIG.auth.admin_email.as_deref(),
        CONFIG.auth.admin_password.as_deref(),
    ) {
        if let Some(admin) = bootstrap::ensure_admin_account(&conn, email, password).await? {
            tracing::info!("Created administrator account {}", admin.email);
        }
    }

    tokio::fs::create_dir_all(&CONFIG.storage.dir).await?;
    let storage = PdfStorage::new(CONFIG.storage.dir.clone());
    tracing::info!("Serving uploads from {}", CONFIG.storage.dir.display());

    Ok(AppState::new(conn, storage))
}

/// Create the main application router
fn create_app(state: AppState) -> Router {
    endpoints::create_router(state)
        .layer(DefaultBodyLimit::max(CONFIG.storage.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&CONFIG.server.allowed_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

/// Start the HTTP server
async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", CONFIG.server.host, CONFIG.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
