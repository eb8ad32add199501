use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChokwadiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider {provider} call failed: {reason}")]
    ProviderCall { provider: String, reason: String },

    #[error("Could not parse URL: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Media download failed: {0}")]
    MediaDownload(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Invalid command line arguments: {0}")]
    InvalidArguments(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl ChokwadiError {
    pub fn no_credentials() -> Self {
        ChokwadiError::Config(
            "No AI API keys configured! Set ANTHROPIC_API_KEY or OPENAI_API_KEY.".to_string(),
        )
    }

    pub fn provider_call(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        ChokwadiError::ProviderCall {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    /// Process exit code used by the command-line front end.
    pub fn exit_code(&self) -> i32 {
        match self {
            ChokwadiError::InvalidArguments(_) => 2,
            ChokwadiError::Config(_) => 3,
            _ => 1,
        }
    }
}
