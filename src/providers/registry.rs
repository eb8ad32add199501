use crate::error::ChokwadiError;
use crate::providers::config::{ProviderKind, ProviderSettings, SelectionMode};
use std::sync::RwLock;

/// Providers whose credential is present, Anthropic first.
pub fn available_providers(settings: &ProviderSettings) -> Vec<ProviderKind> {
    ProviderKind::ALL
        .iter()
        .copied()
        .filter(|kind| settings.provider(*kind).has_credential())
        .collect()
}

/// Resolves the primary backend from the static snapshot.
///
/// In auto mode Anthropic wins over OpenAI. An explicitly requested provider without a
/// credential degrades to whichever provider is available, with a warning. No credential
/// at all is a configuration error and must not be retried.
pub fn active_provider(settings: &ProviderSettings) -> Result<ProviderKind, ChokwadiError> {
    let available = available_providers(settings);

    match settings.mode {
        SelectionMode::Auto => available
            .first()
            .copied()
            .ok_or_else(ChokwadiError::no_credentials),
        SelectionMode::Explicit(requested) => {
            if available.contains(&requested) {
                return Ok(requested);
            }

            match available.first() {
                Some(substitute) => {
                    tracing::warn!(
                        requested = %requested,
                        substitute = %substitute,
                        "Requested provider not configured, falling back"
                    );
                    Ok(*substitute)
                }
                None => Err(ChokwadiError::no_credentials()),
            }
        }
    }
}

/// The secondary backend, only in auto mode and only when a second credential exists.
pub fn fallback_provider(settings: &ProviderSettings) -> Option<ProviderKind> {
    if settings.mode != SelectionMode::Auto {
        return None;
    }

    let primary = active_provider(settings).ok()?;
    available_providers(settings)
        .into_iter()
        .find(|kind| *kind != primary)
}

/// Static provider configuration plus the one piece of mutable state: the runtime
/// override set by administrative commands. Share it behind an `Arc`.
#[derive(Debug)]
pub struct ProviderRegistry {
    settings: ProviderSettings,
    runtime_override: RwLock<Option<ProviderKind>>,
}

impl ProviderRegistry {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            settings,
            runtime_override: RwLock::new(None),
        }
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    pub fn available_providers(&self) -> Vec<ProviderKind> {
        available_providers(&self.settings)
    }

    pub fn active_provider(&self) -> Result<ProviderKind, ChokwadiError> {
        active_provider(&self.settings)
    }

    /// Always computed from the static snapshot; the override does not affect it.
    pub fn fallback_provider(&self) -> Option<ProviderKind> {
        fallback_provider(&self.settings)
    }

    pub fn runtime_override(&self) -> Option<ProviderKind> {
        match self.runtime_override.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn set_override(&self, kind: ProviderKind) {
        self.write_override(Some(kind));
        tracing::info!(provider = %kind, "Runtime provider override set");
    }

    pub fn clear_override(&self) {
        self.write_override(None);
        tracing::info!("Runtime provider override cleared");
    }

    /// Provider used for routing and status: the override when set, otherwise the
    /// statically resolved active provider.
    pub fn current_provider(&self) -> Result<ProviderKind, ChokwadiError> {
        match self.runtime_override() {
            Some(kind) => Ok(kind),
            None => self.active_provider(),
        }
    }

    fn write_override(&self, value: Option<ProviderKind>) {
        match self.runtime_override.write() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }
}
