use crate::extraction::ImageUpload;
use serde::Serialize;

/// One inbound recommendation call, assembled from the multipart form.
/// Discarded when the request completes.
#[derive(Debug)]
pub struct RecommendationRequest {
    pub prompt: String,
    pub images: Vec<ImageUpload>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}
