use crate::localization;
use crate::providers::{ProviderKind, ProviderRegistry};

/// Operator commands that adjust provider routing at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCommand {
    Status,
    UseClaude,
    UseGpt,
    Auto,
}

impl AdminCommand {
    /// Recognises `!status`, `!claude`, `!gpt` and `!auto`, case-insensitively.
    pub fn parse(body: &str) -> Option<Self> {
        match body.trim().to_lowercase().as_str() {
            "!status" => Some(AdminCommand::Status),
            "!claude" => Some(AdminCommand::UseClaude),
            "!gpt" => Some(AdminCommand::UseGpt),
            "!auto" => Some(AdminCommand::Auto),
            _ => None,
        }
    }

    pub fn execute(&self, registry: &ProviderRegistry) -> String {
        match self {
            AdminCommand::Status => status_report(registry),
            AdminCommand::UseClaude => switch_to(registry, ProviderKind::Anthropic),
            AdminCommand::UseGpt => switch_to(registry, ProviderKind::OpenAi),
            AdminCommand::Auto => {
                registry.clear_override();
                localization::get("admin_switched_auto").to_string()
            }
        }
    }
}

fn switch_to(registry: &ProviderRegistry, kind: ProviderKind) -> String {
    registry.set_override(kind);
    format!("✅ Switched to *{}*", kind.display_name())
}

pub fn status_report(registry: &ProviderRegistry) -> String {
    let current = registry
        .current_provider()
        .map(|kind| kind.as_str())
        .unwrap_or("none");
    let override_name = registry
        .runtime_override()
        .map(|kind| kind.as_str())
        .unwrap_or("none");
    let available: Vec<&str> = registry
        .available_providers()
        .iter()
        .map(|kind| kind.as_str())
        .collect();

    format!(
        "{}\n\nConfig provider: {}\nRuntime override: {}\nActive provider: *{}*\nAvailable: {}",
        localization::get("admin_status_title"),
        registry.settings().mode.as_str(),
        override_name,
        current,
        available.join(", ")
    )
}
