use crate::analyzer::wire::{
    AnthropicBlock, AnthropicContent, AnthropicMessage, Base64Source, ChatContent, ChatMessage,
    ChatPart, ChatRequest, ChatResponse, ImageUrl, MessagesRequest, MessagesResponse,
};
use crate::analyzer::prompts::VISION_INSTRUCTION;
use crate::error::ChokwadiError;
use crate::models::ImageMediaType;
use crate::providers::{ProviderConfig, ProviderKind, ProviderSettings};
use base64::Engine;
use futures::future::BoxFuture;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub const MAX_TOKENS: u32 = 1024;
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// What a single oracle call carries besides the system prompt.
#[derive(Debug, Clone, Copy)]
pub enum OraclePayload<'a> {
    Text(&'a str),
    Vision {
        image: &'a [u8],
        media_type: ImageMediaType,
    },
}

/// One language-model backend. Implementations make exactly one attempt per call.
pub trait OracleBackend: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn model_name(&self) -> &str;

    fn complete<'a>(
        &'a self,
        system_prompt: &'a str,
        payload: OraclePayload<'a>,
    ) -> BoxFuture<'a, Result<String, ChokwadiError>>;
}

pub struct AnthropicBackend {
    config: ProviderConfig,
    client: Client,
}

pub struct OpenAiBackend {
    config: ProviderConfig,
    client: Client,
}

fn encode_image(image: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(image)
}

fn require_key(config: &ProviderConfig) -> Result<&str, ChokwadiError> {
    config
        .api_key
        .as_deref()
        .ok_or_else(|| ChokwadiError::provider_call(config.kind.as_str(), "API key not configured"))
}

async fn read_error_body(kind: ProviderKind, resp: reqwest::Response) -> ChokwadiError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let snippet: String = body.chars().take(300).collect();
    tracing::debug!(provider = %kind, status = %status, body = %snippet, "Oracle returned error status");
    ChokwadiError::provider_call(kind.as_str(), format!("HTTP {}: {}", status, snippet))
}

impl AnthropicBackend {
    pub fn new(config: ProviderConfig, client: Client) -> Self {
        Self { config, client }
    }

    fn build_request(&self, system_prompt: &str, payload: OraclePayload<'_>) -> MessagesRequest {
        let content = match payload {
            OraclePayload::Text(user_message) => AnthropicContent::Text(user_message.to_string()),
            OraclePayload::Vision { image, media_type } => AnthropicContent::Blocks(vec![
                AnthropicBlock::Image {
                    source: Base64Source {
                        source_type: "base64".to_string(),
                        media_type: media_type.as_mime().to_string(),
                        data: encode_image(image),
                    },
                },
                AnthropicBlock::Text {
                    text: VISION_INSTRUCTION.to_string(),
                },
            ]),
        };

        MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: MAX_TOKENS,
            system: system_prompt.to_string(),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content,
            }],
        }
    }

    async fn send(&self, request: MessagesRequest) -> Result<String, ChokwadiError> {
        let api_key = require_key(&self.config)?;

        let resp = self
            .client
            .post(format!("{}/v1/messages", self.config.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(read_error_body(self.kind(), resp).await);
        }

        let parsed: MessagesResponse = resp.json().await?;
        Ok(parsed.joined_text())
    }
}

impl OracleBackend for AnthropicBackend {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn complete<'a>(
        &'a self,
        system_prompt: &'a str,
        payload: OraclePayload<'a>,
    ) -> BoxFuture<'a, Result<String, ChokwadiError>> {
        Box::pin(async move {
            let request = self.build_request(system_prompt, payload);
            self.send(request).await
        })
    }
}

impl OpenAiBackend {
    pub fn new(config: ProviderConfig, client: Client) -> Self {
        Self { config, client }
    }

    fn build_request(&self, system_prompt: &str, payload: OraclePayload<'_>) -> ChatRequest {
        let user_content = match payload {
            OraclePayload::Text(user_message) => ChatContent::Text(user_message.to_string()),
            OraclePayload::Vision { image, media_type } => ChatContent::Parts(vec![
                ChatPart::Text {
                    text: VISION_INSTRUCTION.to_string(),
                },
                ChatPart::ImageUrl {
                    image_url: ImageUrl {
                        url: format!("data:{};base64,{}", media_type.as_mime(), encode_image(image)),
                    },
                },
            ]),
        };

        ChatRequest {
            model: self.config.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: ChatContent::Text(system_prompt.to_string()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_content,
                },
            ],
        }
    }

    async fn send(&self, request: ChatRequest) -> Result<String, ChokwadiError> {
        let api_key = require_key(&self.config)?;

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(read_error_body(self.kind(), resp).await);
        }

        let parsed: ChatResponse = resp.json().await?;
        Ok(parsed.first_text().unwrap_or_default().to_string())
    }
}

impl OracleBackend for OpenAiBackend {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn complete<'a>(
        &'a self,
        system_prompt: &'a str,
        payload: OraclePayload<'a>,
    ) -> BoxFuture<'a, Result<String, ChokwadiError>> {
        Box::pin(async move {
            let request = self.build_request(system_prompt, payload);
            self.send(request).await
        })
    }
}

/// Routes a call to the backend registered for a provider and folds every failure
/// (transport, status, decoding, empty text, timeout) into `ChokwadiError::ProviderCall`.
/// Makes no retries.
pub struct OracleInvoker {
    backends: HashMap<ProviderKind, Arc<dyn OracleBackend>>,
    timeout: Duration,
}

impl OracleInvoker {
    pub fn new(timeout: Duration) -> Self {
        Self {
            backends: HashMap::new(),
            timeout,
        }
    }

    /// Registers both HTTP backends from the configuration snapshot.
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, ChokwadiError> {
        let client = Client::builder().timeout(settings.timeout()).build()?;

        Ok(Self::new(settings.timeout())
            .with_backend(Arc::new(AnthropicBackend::new(
                settings.anthropic.clone(),
                client.clone(),
            )))
            .with_backend(Arc::new(OpenAiBackend::new(settings.openai.clone(), client))))
    }

    pub fn with_backend(mut self, backend: Arc<dyn OracleBackend>) -> Self {
        self.backends.insert(backend.kind(), backend);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn model_name(&self, provider: ProviderKind) -> Option<&str> {
        self.backends.get(&provider).map(|backend| backend.model_name())
    }

    pub async fn invoke_text(
        &self,
        provider: ProviderKind,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, ChokwadiError> {
        self.invoke(provider, system_prompt, OraclePayload::Text(user_message))
            .await
    }

    pub async fn invoke_vision(
        &self,
        provider: ProviderKind,
        system_prompt: &str,
        image: &[u8],
        media_type: ImageMediaType,
    ) -> Result<String, ChokwadiError> {
        self.invoke(
            provider,
            system_prompt,
            OraclePayload::Vision { image, media_type },
        )
        .await
    }

    pub async fn invoke(
        &self,
        provider: ProviderKind,
        system_prompt: &str,
        payload: OraclePayload<'_>,
    ) -> Result<String, ChokwadiError> {
        let start_time = std::time::Instant::now();
        let result = self.attempt(provider, system_prompt, payload).await;
        let duration_ms = start_time.elapsed().as_millis() as u64;

        match result {
            Ok(text) => {
                tracing::debug!(provider = %provider, duration_ms, "Oracle call succeeded");
                Ok(text)
            }
            Err(e) => {
                tracing::warn!(provider = %provider, duration_ms, error = %e, "Oracle call failed");
                Err(normalize(provider, e))
            }
        }
    }

    async fn attempt(
        &self,
        provider: ProviderKind,
        system_prompt: &str,
        payload: OraclePayload<'_>,
    ) -> Result<String, ChokwadiError> {
        let backend = self.backends.get(&provider).ok_or_else(|| {
            ChokwadiError::provider_call(provider.as_str(), "no backend registered")
        })?;

        let text = tokio::time::timeout(self.timeout, backend.complete(system_prompt, payload))
            .await
            .map_err(|_| {
                ChokwadiError::provider_call(
                    provider.as_str(),
                    format!("timed out after {}s", self.timeout.as_secs()),
                )
            })??;

        if text.trim().is_empty() {
            return Err(ChokwadiError::provider_call(provider.as_str(), "empty response"));
        }

        Ok(text)
    }
}

fn normalize(provider: ProviderKind, error: ChokwadiError) -> ChokwadiError {
    match error {
        e @ ChokwadiError::ProviderCall { .. } => e,
        other => ChokwadiError::provider_call(provider.as_str(), other.to_string()),
    }
}
