mod client;
mod types;

pub use client::{GenerationBackend, OpenAiClient};
pub use types::{RecommendationStream, STREAM_DONE_MARKER, STREAM_ERROR_MARKER, StreamChunk};
