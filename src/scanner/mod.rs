// Scanner module - deterministic URL risk heuristics and their text report

pub mod domains;
pub mod report;
pub mod url_scanner;

pub use domains::{DomainRegistry, DomainTables};
pub use report::ReportFormatter;
pub use url_scanner::{edit_distance, find_typosquat_target, UrlRiskScanner};

use crate::models::ScanFinding;

/// Scans a URL against the built-in Zimbabwean tables.
pub fn scan_url(url: &str) -> ScanFinding {
    UrlRiskScanner::default().scan(url)
}

pub fn format_scan(finding: &ScanFinding) -> String {
    ReportFormatter::format(finding)
}
