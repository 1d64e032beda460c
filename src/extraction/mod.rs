mod client;
mod types;

pub use client::{ExtractionBackend, GeminiVisionClient};
pub use types::ImageUpload;
