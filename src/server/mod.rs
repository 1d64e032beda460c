pub mod handlers;
pub mod types;

use crate::{
    config::Config, extraction::GeminiVisionClient, llm::OpenAiClient, prompts::PromptStore,
    Result,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Phone photos of wine lists easily exceed axum's 2 MiB default.
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

pub async fn run(config: Config) -> Result<()> {
    // Load prompt files before constructing clients; the extraction client
    // carries its instruction prompt for the lifetime of the process.
    let prompts = PromptStore::load(&config.server.prompts_dir).await?;

    let extraction = GeminiVisionClient::new(
        config.extraction.clone(),
        prompts.image_processing_prompt().to_string(),
    );
    let generation = OpenAiClient::new(config.generation.clone());

    let state = handlers::AppState {
        prompts: Arc::new(prompts),
        extraction: Arc::new(extraction),
        generation: Arc::new(generation),
    };

    let app = router(state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(state: handlers::AppState) -> Router {
    Router::new()
        .route("/api/recommend", post(handlers::recommend))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
