use axum::{Json, Router, routing::get};
use serde::Serialize;
use sheetdeck_server::auth::{AuthAppState, CredentialService, MemoryUserStore, auth_routes};
use sheetdeck_server::config::Config;
use sheetdeck_server::deck::{DeckAppState, deck_routes};
use sheetdeck_server::google::{GoogleDrive, GoogleSheets, GoogleSlides, TokenProvider};
use sheetdeck_server::sheet::{SheetAppState, sheet_routes};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application start time for uptime calculation
static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_seconds: u64,
}

async fn health() -> Json<HealthResponse> {
    let uptime = START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0);
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: uptime,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Record server start time
    START_TIME.set(Instant::now()).ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sheetdeck=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = Config::from_env();
    info!(
        "Loaded configuration: host={}, port={}",
        config.host, config.port
    );
    if !config.google.is_complete() {
        warn!(
            "Google OAuth2 credentials incomplete - Sheets/Slides/Drive calls will be rejected upstream"
        );
    }
    if let Some(ref folder) = config.default_slides_folder_id {
        info!("Default slides folder: {}", folder);
    }

    // One HTTP client and token provider shared by all Google backends
    let http = reqwest::Client::new();
    let tokens = Arc::new(TokenProvider::new(http.clone(), config.google.clone()));

    let sheets = Arc::new(GoogleSheets::new(http.clone(), tokens.clone()));
    let slides = Arc::new(GoogleSlides::new(http.clone(), tokens.clone()));
    let drive = Arc::new(GoogleDrive::new(http, tokens));

    let users = Arc::new(MemoryUserStore::new());
    let credentials = Arc::new(CredentialService::new(users, config.jwt_secret.clone()));

    let auth_state = AuthAppState { credentials };
    let deck_state = DeckAppState {
        decks: slides,
        assets: drive.clone(),
        default_folder_id: config.default_slides_folder_id.clone(),
    };
    let sheet_state = SheetAppState {
        sheets,
        assets: drive,
        default_folder_id: config.default_slides_folder_id.clone(),
    };

    // Build CORS layer (any origin; browser clients call this directly)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_routes(auth_state))
        .nest(
            "/data-sheets",
            deck_routes(deck_state).merge(sheet_routes(sheet_state)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start the server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("sheetdeck server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
