use tokio_stream::wrappers::ReceiverStream;

/// Literal end-of-stream marker, always the final frame of a response
/// stream. Lets consumers tell normal completion apart from the transport
/// dropping the connection.
pub const STREAM_DONE_MARKER: &str = "[DONE]";

/// Literal marker for a backend failure after streaming has begun. The
/// status code is already on the wire by then, so the failure travels
/// in-band; `STREAM_DONE_MARKER` still follows it.
pub const STREAM_ERROR_MARKER: &str = "[ERROR]";

/// One element of a recommendation stream, in arrival order. Chunks are
/// append-only from the caller's perspective: nothing is retracted or
/// reordered, and `Done` is always last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamChunk {
    /// One non-empty fragment of generated text.
    Delta(String),
    Error,
    Done,
}

impl StreamChunk {
    /// Wire form written to the HTTP response body, one chunk per frame.
    pub fn into_text(self) -> String {
        match self {
            StreamChunk::Delta(text) => text,
            StreamChunk::Error => STREAM_ERROR_MARKER.to_string(),
            StreamChunk::Done => STREAM_DONE_MARKER.to_string(),
        }
    }
}

/// Lazy, finite, non-restartable chunk sequence handed to the HTTP layer,
/// drained exactly once.
pub type RecommendationStream = ReceiverStream<StreamChunk>;
