use serde::{Deserialize, Serialize};
use crate::models::RiskLevel;

/// Result of one URL scan. Built fresh for every call and handed to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanFinding {
    pub url: String,
    pub risk_level: RiskLevel,
    pub issues: Vec<String>,
    pub details: ScanDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanDetails {
    pub domain: String,
    pub scheme: String,
    pub is_known_domain: bool,
}

impl ScanFinding {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            risk_level: RiskLevel::Low,
            issues: Vec::new(),
            details: ScanDetails::default(),
        }
    }

    /// Raises the risk level to `proposed` if that is higher. Never lowers it.
    pub fn escalate(&mut self, proposed: RiskLevel) {
        if proposed > self.risk_level {
            self.risk_level = proposed;
        }
    }

    pub fn add_issue(&mut self, issue: impl Into<String>, proposed: RiskLevel) {
        self.issues.push(issue.into());
        self.escalate(proposed);
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}
