use crate::analyzer::llm_client::{OracleInvoker, OraclePayload};
use crate::analyzer::prompts::PromptTemplate;
use crate::error::ChokwadiError;
use crate::localization;
use crate::models::{AnalysisRequest, ImageMediaType};
use crate::providers::{ProviderKind, ProviderRegistry};
use std::sync::Arc;

/// Builds prompts per content type and runs them against the current provider with a
/// single fallback attempt. Public entry points always return a non-empty string.
pub struct ContentAnalyzer {
    registry: Arc<ProviderRegistry>,
    invoker: OracleInvoker,
}

impl ContentAnalyzer {
    /// Fails with `ChokwadiError::Config` when no provider has a credential.
    pub fn new(registry: Arc<ProviderRegistry>, invoker: OracleInvoker) -> Result<Self, ChokwadiError> {
        let primary = registry.active_provider()?;
        let fallback = registry
            .fallback_provider()
            .map(|kind| kind.as_str())
            .unwrap_or("none");
        tracing::info!(
            provider = %primary,
            fallback,
            mode = registry.settings().mode.as_str(),
            "Content analyzer ready"
        );

        Ok(Self { registry, invoker })
    }

    pub fn from_registry(registry: Arc<ProviderRegistry>) -> Result<Self, ChokwadiError> {
        let invoker = OracleInvoker::from_settings(registry.settings())?;
        Self::new(registry, invoker)
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> String {
        let system_prompt = PromptTemplate::build_system_prompt(request.content_type());
        let user_message = PromptTemplate::build_user_message(request);

        tracing::info!(
            content_type = %request.content_type(),
            content_length = request.content().len(),
            "Analysing content"
        );

        self.run_with_fallback(&system_prompt, OraclePayload::Text(&user_message))
            .await
    }

    pub async fn analyze_image(&self, image: &[u8], media_type: ImageMediaType) -> String {
        let system_prompt = PromptTemplate::build_vision_system_prompt();

        tracing::info!(
            media_type = media_type.as_mime(),
            size_bytes = image.len(),
            "Analysing image"
        );

        self.run_with_fallback(&system_prompt, OraclePayload::Vision { image, media_type })
            .await
    }

    async fn run_with_fallback(&self, system_prompt: &str, payload: OraclePayload<'_>) -> String {
        let primary = match self.registry.current_provider() {
            Ok(kind) => kind,
            Err(e) => {
                tracing::error!(error = %e, "No provider available for analysis");
                return localization::apology().to_string();
            }
        };
        let fallback = self.registry.fallback_provider();

        if let Ok(text) = self.invoker.invoke(primary, system_prompt, payload).await {
            return text;
        }

        if let Some(secondary) = Self::distinct_fallback(primary, fallback) {
            tracing::warn!(primary = %primary, fallback = %secondary, "Primary provider failed, trying fallback");
            if let Ok(text) = self.invoker.invoke(secondary, system_prompt, payload).await {
                return text;
            }
        }

        tracing::error!(primary = %primary, "All analysis attempts failed");
        localization::apology().to_string()
    }

    // A runtime override can point at the static fallback; calling it twice would be a retry.
    fn distinct_fallback(primary: ProviderKind, fallback: Option<ProviderKind>) -> Option<ProviderKind> {
        fallback.filter(|kind| *kind != primary)
    }
}
