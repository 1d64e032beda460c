use super::types::{ErrorResponse, HealthResponse, RecommendationRequest};
use crate::{
    extraction::{ExtractionBackend, ImageUpload},
    llm::GenerationBackend,
    prompts::PromptStore,
};
use axum::{
    Json,
    body::Body,
    extract::{Multipart, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use std::{convert::Infallible, sync::Arc};
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub prompts: Arc<PromptStore>,
    pub extraction: Arc<dyn ExtractionBackend>,
    pub generation: Arc<dyn GenerationBackend>,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Wine recommendation endpoint: multipart `prompt` plus optional menu
/// `images`, answered with an incrementally flushed text stream.
pub async fn recommend(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, HandlerError> {
    let request = parse_recommendation_request(multipart)
        .await
        .map_err(bad_request)?;

    info!(
        "Received recommendation request with {} image(s)",
        request.images.len()
    );

    // The extraction backend is only ever contacted when images arrived.
    let wine_list = if request.images.is_empty() {
        None
    } else {
        match state.extraction.extract_wine_list(request.images).await {
            Ok(text) => Some(text),
            Err(e) => {
                error!("Image processing error: {}", e);
                return Err(bad_request(format!("Failed to process image: {}", e)));
            }
        }
    };

    let user_content = state
        .prompts
        .render_user_prompt(&request.prompt, wine_list.as_deref())
        .map_err(|e| {
            error!("Failed to render user prompt: {}", e);
            internal_error("An unexpected error occurred")
        })?;

    let stream = state
        .generation
        .stream_recommendation(state.prompts.sommelier_system_prompt(), &user_content)
        .await
        .map_err(|e| {
            error!("Generation backend error: {}", e);
            internal_error("An error occurred while generating recommendations")
        })?;

    // Past this point the status code is committed; backend failures travel
    // in-band as marker frames.
    let body = Body::from_stream(stream.map(|chunk| Ok::<_, Infallible>(chunk.into_text())));

    Ok(([(header::CONTENT_TYPE, "text/event-stream")], body).into_response())
}

async fn parse_recommendation_request(
    mut multipart: Multipart,
) -> Result<RecommendationRequest, String> {
    let mut prompt = None;
    let mut images = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Malformed multipart body: {}", e))?
    {
        match field.name().map(str::to_string).as_deref() {
            Some("prompt") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| format!("Failed to read prompt field: {}", e))?;
                prompt = Some(text);
            }
            Some("images") => {
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Failed to read image upload: {}", e))?;
                images.push(ImageUpload {
                    bytes: bytes.to_vec(),
                    content_type,
                });
            }
            // Unknown fields are ignored rather than rejected.
            _ => {}
        }
    }

    let prompt = prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| "Missing required field: prompt".to_string())?;

    Ok(RecommendationRequest { prompt, images })
}

fn bad_request(detail: impl Into<String>) -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
}

fn internal_error(detail: impl Into<String>) -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
}
