pub mod analyzer;
pub mod cli;
pub mod error;
pub mod intake;
pub mod localization;
pub mod models;
pub mod providers;
pub mod scanner;

pub use error::ChokwadiError;

// Re-export commonly used types
pub use models::{AnalysisRequest, ContentType, ImageMediaType, RiskLevel, ScanDetails, ScanFinding};

pub use analyzer::{ContentAnalyzer, OracleInvoker};
pub use intake::{InboundMessage, MessageDispatcher};
pub use providers::{ProviderRegistry, ProviderSettings};
pub use scanner::{format_scan, scan_url, DomainRegistry, UrlRiskScanner};

pub use cli::CliHandler;
