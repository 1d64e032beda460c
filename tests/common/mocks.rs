use async_trait::async_trait;
use sommelier_rust::{
    Error, Result,
    extraction::{ExtractionBackend, ImageUpload},
    llm::{GenerationBackend, RecommendationStream, StreamChunk},
};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// Mock extraction backend recording how many images each call carried.
pub struct MockExtractionBackend {
    wine_list: String,
    error: Option<String>,
    pub calls: Arc<Mutex<Vec<usize>>>,
}

impl MockExtractionBackend {
    pub fn returning(wine_list: impl Into<String>) -> Self {
        Self {
            wine_list: wine_list.into(),
            error: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(error: impl Into<String>) -> Self {
        Self {
            wine_list: String::new(),
            error: Some(error.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl ExtractionBackend for MockExtractionBackend {
    async fn extract_wine_list(&self, images: Vec<ImageUpload>) -> Result<String> {
        self.calls.lock().unwrap().push(images.len());

        if let Some(ref error) = self.error {
            return Err(Error::extraction(error.clone()));
        }

        Ok(self.wine_list.clone())
    }
}

/// Mock generation backend replaying a fixed chunk sequence and recording
/// the (system prompt, user content) pairs it was asked to stream.
pub struct MockGenerationBackend {
    chunks: Vec<StreamChunk>,
    open_error: Option<String>,
    pub requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockGenerationBackend {
    /// The chunk sequence must end with `StreamChunk::Done`, matching the
    /// real client's contract.
    pub fn streaming(chunks: Vec<StreamChunk>) -> Self {
        Self {
            chunks,
            open_error: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_to_open(error: impl Into<String>) -> Self {
        Self {
            chunks: Vec::new(),
            open_error: Some(error.into()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn stream_recommendation(
        &self,
        system_prompt: &str,
        user_content: &str,
    ) -> Result<RecommendationStream> {
        self.requests
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_content.to_string()));

        if let Some(ref error) = self.open_error {
            return Err(Error::generation(error.clone()));
        }

        let (tx, rx) = mpsc::channel(self.chunks.len().max(1));
        for chunk in self.chunks.clone() {
            tx.try_send(chunk).expect("channel sized for all chunks");
        }

        Ok(ReceiverStream::new(rx))
    }
}
