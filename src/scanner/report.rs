use crate::localization;
use crate::models::ScanFinding;

/// Renders a finding as plain text for inclusion in an analysis prompt.
pub struct ReportFormatter;

impl ReportFormatter {
    pub fn format(finding: &ScanFinding) -> String {
        let mut lines = vec![
            localization::get("report_scan_header").to_string(),
            format!(
                "{}: {} {}",
                localization::get("report_risk_level"),
                finding.risk_level.as_emoji(),
                finding.risk_level.as_str()
            ),
            localization::get("report_issues_found").to_string(),
        ];

        lines.extend(finding.issues.iter().map(|issue| format!("  - {}", issue)));

        if finding.details.is_known_domain {
            lines.push(format!("  {}", localization::get("report_known_domain")));
        }

        lines.join("\n")
    }
}
