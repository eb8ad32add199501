use crate::error::ChokwadiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_CLAUDE_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 45;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Anthropic,
    OpenAi,
}

/// How the operator asked for a backend to be chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Auto,
    Explicit(ProviderKind),
}

#[derive(Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

/// Static configuration snapshot, read once at startup.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub mode: SelectionMode,
    pub anthropic: ProviderConfig,
    pub openai: ProviderConfig,
    pub timeout_seconds: u64,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Anthropic, ProviderKind::OpenAi];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAi => "openai",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "Anthropic Claude",
            ProviderKind::OpenAi => "OpenAI GPT",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "anthropic" | "claude" => Some(ProviderKind::Anthropic),
            "openai" | "gpt" => Some(ProviderKind::OpenAi),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SelectionMode {
    pub fn parse(value: &str) -> Result<Self, ChokwadiError> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("auto") {
            return Ok(SelectionMode::Auto);
        }

        ProviderKind::from_str(trimmed)
            .map(SelectionMode::Explicit)
            .ok_or_else(|| {
                ChokwadiError::Config(format!(
                    "Unknown AI_PROVIDER '{}'. Use 'auto', 'anthropic' or 'openai'",
                    trimmed
                ))
            })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionMode::Auto => "auto",
            SelectionMode::Explicit(kind) => kind.as_str(),
        }
    }
}

impl ProviderConfig {
    pub fn new(kind: ProviderKind, api_key: Option<String>, model: impl Into<String>) -> Self {
        let base_url = match kind {
            ProviderKind::Anthropic => DEFAULT_ANTHROPIC_BASE_URL,
            ProviderKind::OpenAi => DEFAULT_OPENAI_BASE_URL,
        };

        Self {
            kind,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: model.into(),
            base_url: base_url.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

// Keys stay out of logs and panic messages.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("credential_present", &self.has_credential())
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ProviderSettings {
    pub fn new(mode: SelectionMode, anthropic_key: Option<String>, openai_key: Option<String>) -> Self {
        Self {
            mode,
            anthropic: ProviderConfig::new(ProviderKind::Anthropic, anthropic_key, DEFAULT_CLAUDE_MODEL),
            openai: ProviderConfig::new(ProviderKind::OpenAi, openai_key, DEFAULT_OPENAI_MODEL),
            timeout_seconds: DEFAULT_ORACLE_TIMEOUT_SECS,
        }
    }

    pub fn from_env() -> Result<Self, ChokwadiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the snapshot from any key lookup, so tests never touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ChokwadiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = SelectionMode::parse(&lookup("AI_PROVIDER").unwrap_or_default())?;

        let mut anthropic = ProviderConfig::new(
            ProviderKind::Anthropic,
            lookup("ANTHROPIC_API_KEY"),
            lookup("CLAUDE_MODEL").unwrap_or_else(|| DEFAULT_CLAUDE_MODEL.to_string()),
        );
        if let Some(base_url) = lookup("ANTHROPIC_BASE_URL") {
            anthropic = anthropic.with_base_url(base_url);
        }

        let mut openai = ProviderConfig::new(
            ProviderKind::OpenAi,
            lookup("OPENAI_API_KEY"),
            lookup("OPENAI_CHAT_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
        );
        if let Some(base_url) = lookup("OPENAI_BASE_URL") {
            openai = openai.with_base_url(base_url);
        }

        let timeout_seconds = match lookup("CHOKWADI_ORACLE_TIMEOUT") {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_ORACLE_TIMEOUT_SECS,
        };

        Ok(Self {
            mode,
            anthropic,
            openai,
            timeout_seconds,
        })
    }

    pub fn with_mode(mut self, mode: SelectionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn provider(&self, kind: ProviderKind) -> &ProviderConfig {
        match kind {
            ProviderKind::Anthropic => &self.anthropic,
            ProviderKind::OpenAi => &self.openai,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

pub fn parse_timeout(raw: &str) -> Result<u64, ChokwadiError> {
    let timeout: u64 = raw
        .trim()
        .parse()
        .map_err(|_| ChokwadiError::Config(format!("Timeout '{}' is not a number", raw)))?;

    if (5..=300).contains(&timeout) {
        Ok(timeout)
    } else {
        Err(ChokwadiError::Config(
            "Timeout must be between 5 and 300 seconds".to_string(),
        ))
    }
}
