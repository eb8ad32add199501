pub mod analysis;
pub mod scan;

pub use analysis::{AnalysisRequest, ContentType, ImageMediaType, RiskLevel};
pub use scan::{ScanDetails, ScanFinding};
