use super::types::*;
use crate::{Error, Result, config::ExtractionConfig};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use futures::future::join_all;
use tracing::{debug, error, info};

/// Narrow seam over the image-understanding backend so orchestration code
/// never names the provider.
#[async_trait]
pub trait ExtractionBackend: Send + Sync {
    /// Submits all images in one call and returns the combined wine-list
    /// text the backend transcribed from them.
    async fn extract_wine_list(&self, images: Vec<ImageUpload>) -> Result<String>;
}

pub struct GeminiVisionClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    instruction: String,
}

impl GeminiVisionClient {
    /// `instruction` is the image-processing prompt loaded at startup; it is
    /// appended after the image parts on every call.
    pub fn new(config: ExtractionConfig, instruction: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
            api_key: config.api_key,
            instruction,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl ExtractionBackend for GeminiVisionClient {
    async fn extract_wine_list(&self, images: Vec<ImageUpload>) -> Result<String> {
        debug!("Encoding {} menu image(s) for extraction", images.len());

        // Fan out the base64 work, then make a single combined call carrying
        // every image part plus the instruction. No retry on failure.
        let encoders = images
            .into_iter()
            .map(|image| tokio::task::spawn_blocking(move || encode_image(image)));

        let mut parts = Vec::new();
        for encoded in join_all(encoders).await {
            let part =
                encoded.map_err(|e| Error::extraction(format!("Image encoding failed: {}", e)))?;
            parts.push(part);
        }
        parts.push(GeminiPart::text(&self.instruction));

        let request = GenerateContentRequest {
            contents: vec![GeminiContent { parts }],
        };

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::extraction(format!("Extraction request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::extraction(format!("Extraction request failed: {}", e)))?;

        if !status.is_success() {
            error!("Extraction backend returned status {}: {}", status, body);
            // Surface the backend's own message when the error body parses.
            if let Ok(error_response) = serde_json::from_str::<GeminiErrorResponse>(&body) {
                return Err(Error::extraction(error_response.error.message));
            }
            return Err(Error::extraction(format!(
                "Extraction backend returned status {}",
                status
            )));
        }

        let response: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            Error::extraction(format!("Failed to parse extraction response: {}", e))
        })?;

        let text = response
            .text()
            .ok_or_else(|| Error::extraction("No text content in extraction response"))?;

        info!(
            "Extraction backend returned {} characters of menu text",
            text.len()
        );

        Ok(text)
    }
}

fn encode_image(image: ImageUpload) -> GeminiPart {
    GeminiPart::inline(STANDARD.encode(&image.bytes), image.content_type)
}
