use super::types::{RecommendationStream, StreamChunk};
use crate::{Error, Result, config::GenerationConfig};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessageArgs,
        ChatCompletionRequestUserMessageContent, CreateChatCompletionRequestArgs,
        CreateChatCompletionStreamResponse,
    },
};
use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

/// Bound on fragments the HTTP layer has not yet drained; the only
/// backpressure beyond the transport itself.
const STREAM_CHANNEL_CAPACITY: usize = 32;

/// Narrow seam over the text-generation backend.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Opens one streaming completion. `Err` means nothing has been sent to
    /// the caller yet and a status code can still be chosen; failures after
    /// that arrive in-band as `StreamChunk::Error`.
    async fn stream_recommendation(
        &self,
        system_prompt: &str,
        user_content: &str,
    ) -> Result<RecommendationStream>;
}

pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiClient {
    pub fn new(config: GenerationConfig) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_key(config.api_key);

        if !config.base_url.is_empty() {
            openai_config = openai_config.with_api_base(config.base_url);
        }

        let client = Client::with_config(openai_config);

        Self {
            client,
            model: config.model,
        }
    }
}

#[async_trait]
impl GenerationBackend for OpenAiClient {
    async fn stream_recommendation(
        &self,
        system_prompt: &str,
        user_content: &str,
    ) -> Result<RecommendationStream> {
        debug!("Opening streaming chat completion with model {}", self.model);

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(ChatCompletionRequestSystemMessageContent::Text(
                    system_prompt.to_string(),
                ))
                .build()
                .map_err(|e| Error::generation(format!("Failed to build system message: {}", e)))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(ChatCompletionRequestUserMessageContent::Text(
                    user_content.to_string(),
                ))
                .build()
                .map_err(|e| Error::generation(format!("Failed to build user message: {}", e)))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .stream(true)
            .build()?;

        let mut backend = self.client.chat().create_stream(request).await?;

        // Poll once before handing the stream out: connection and auth
        // failures surface on the first item, while the response status is
        // still open.
        let first = match backend.next().await {
            Some(Err(e)) => return Err(Error::generation(e.to_string())),
            other => other,
        };

        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);

        tokio::spawn(async move {
            if let Some(Ok(chunk)) = first {
                if !forward_content(&tx, chunk).await {
                    return;
                }
            }

            while let Some(event) = backend.next().await {
                match event {
                    Ok(chunk) => {
                        if !forward_content(&tx, chunk).await {
                            return;
                        }
                    }
                    Err(e) => {
                        warn!("Generation stream failed mid-response: {}", e);
                        let _ = tx.send(StreamChunk::Error).await;
                        let _ = tx.send(StreamChunk::Done).await;
                        return;
                    }
                }
            }

            let _ = tx.send(StreamChunk::Done).await;
        });

        Ok(ReceiverStream::new(rx))
    }
}

/// Forwards the chunk's first-choice content, skipping role-only and empty
/// deltas. Returns false when the receiver is gone, meaning the caller
/// disconnected and the backend stream should be abandoned.
async fn forward_content(
    tx: &mpsc::Sender<StreamChunk>,
    chunk: CreateChatCompletionStreamResponse,
) -> bool {
    let Some(content) = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
    else {
        return true;
    };

    if content.is_empty() {
        return true;
    }

    tx.send(StreamChunk::Delta(content)).await.is_ok()
}
