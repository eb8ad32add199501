// Provider module - backend configuration and primary/fallback selection

pub mod config;
pub mod registry;

pub use config::{ProviderConfig, ProviderKind, ProviderSettings, SelectionMode};
pub use registry::{active_provider, available_providers, fallback_provider, ProviderRegistry};
