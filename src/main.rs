//! PlumbID - plumbing & heating part identification server.
//!
//! Serves a single form. A submission may carry a photo, which is OCR'd and
//! merged with the typed query before it is sent to the parts search API.

mod config;
mod ocr;
mod pipeline;
mod query;
mod render;
mod schema;
mod search;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use config::{Settings, SettingsStatus};
use ocr::ocr_space::OcrSpaceProvider;
use pipeline::{Photo, Pipeline, Report, Resolution, Submission};
use search::HttpSearchClient;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    settings: Arc<Settings>,
    pipeline: Pipeline,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "plumb_id=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Arc::new(Settings::from_env());
    let status = settings.status();
    info!(
        "Settings loaded: api_set={} ocr_key_set={}",
        status.api_set, status.ocr_key_set
    );

    let client = reqwest::Client::builder()
        .user_agent(concat!("plumb-id/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let ocr = Arc::new(OcrSpaceProvider::new(client.clone(), &settings));
    let search = Arc::new(HttpSearchClient::new(client, &settings));

    let state = AppState {
        settings: settings.clone(),
        pipeline: Pipeline::new(ocr, search),
    };

    let app = create_router(state);

    // Run server
    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    info!("Server listening on http://{}", settings.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/search", post(search_form))
        .route("/api/search", post(api_search))
        .route("/api/settings", get(api_settings))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10MB
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// The empty form.
async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render::page::form_page(state.settings.status()))
}

/// Which settings are configured. Never the values.
async fn api_settings(State(state): State<AppState>) -> Json<SettingsStatus> {
    Json(state.settings.status())
}

/// Form submission; responds with the rendered results page.
async fn search_form(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>, (StatusCode, String)> {
    let submission = read_submission(multipart).await?;
    let typed = submission.text.clone();
    let report = state.pipeline.run(submission).await;
    Ok(Html(render::page::report_page(
        state.settings.status(),
        &typed,
        &report,
    )))
}

/// Same as the form submission, as JSON.
async fn api_search(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Report>), (StatusCode, String)> {
    let submission = read_submission(multipart).await?;
    let report = state.pipeline.run(submission).await;
    let status = match report.resolution {
        Resolution::Found { .. } => StatusCode::OK,
        Resolution::NothingToSearch => StatusCode::UNPROCESSABLE_ENTITY,
        Resolution::Failed { .. } => StatusCode::BAD_GATEWAY,
    };
    Ok((status, Json(report)))
}

// ============================================================================
// Helper functions
// ============================================================================

/// Read the `q` text field and the optional `photo` file field.
async fn read_submission(mut multipart: Multipart) -> Result<Submission, (StatusCode, String)> {
    let mut submission = Submission::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (StatusCode::BAD_REQUEST, format!("Multipart error: {}", e))
    })? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("q") => {
                submission.text = field.text().await.map_err(|e| {
                    (StatusCode::BAD_REQUEST, format!("Failed to read query: {}", e))
                })?;
            }
            Some("photo") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    (StatusCode::BAD_REQUEST, format!("Failed to read photo: {}", e))
                })?;
                // Browsers send an empty part when no file was chosen.
                if !bytes.is_empty() {
                    submission.photo = Some(Photo {
                        filename,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(submission)
}
