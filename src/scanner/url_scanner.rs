use crate::error::ChokwadiError;
use crate::models::{RiskLevel, ScanDetails, ScanFinding};
use crate::scanner::domains::DomainRegistry;
use std::sync::Arc;
use url::{Host, Url};

pub const MAX_URL_LENGTH: usize = 200;
pub const MAX_TYPOSQUAT_DISTANCE: usize = 2;
pub const NO_RED_FLAGS: &str = "No obvious red flags detected - but always verify independently";

const CREDENTIAL_PATH_KEYWORDS: &[&str] = &[
    "login", "signin", "verify", "update", "secure", "account", "confirm",
];

/// The pieces of a URL the checks look at.
#[derive(Debug, Clone)]
pub struct UrlParts {
    pub raw: String,
    pub lower: String,
    pub scheme: String,
    pub domain: String,
    pub path: String,
    pub is_ipv4: bool,
}

/// A check either stays silent or proposes an issue and a level.
pub type Check = fn(&UrlParts, &DomainRegistry) -> Option<(String, RiskLevel)>;

/// Every check, in the order its issues are reported.
pub const CHECKS: [Check; 9] = [
    check_insecure_transport,
    check_suspicious_suffix,
    check_typosquat,
    check_scam_pattern,
    check_excess_length,
    check_credential_path,
    check_ip_literal,
    check_excess_subdomains,
    check_shortener,
];

impl UrlParts {
    pub fn parse(raw: &str) -> Result<Self, ChokwadiError> {
        let parsed = Url::parse(raw.trim())?;

        Ok(Self {
            raw: raw.to_string(),
            lower: raw.to_lowercase(),
            scheme: parsed.scheme().to_lowercase(),
            domain: match parsed.host() {
                Some(Host::Domain(host)) => display_host(host),
                _ => parsed.host_str().unwrap_or_default().to_lowercase(),
            },
            path: parsed.path().to_lowercase(),
            is_ipv4: matches!(parsed.host(), Some(Host::Ipv4(_))),
        })
    }

    /// Substring before the first dot of the domain.
    pub fn primary_label(&self) -> &str {
        self.domain.split('.').next().unwrap_or_default()
    }
}

/// Lowercase Unicode form of a domain host, without the root dot.
///
/// `Url` stores internationalised hosts as punycode; lookalike letters from other
/// scripts only line up with the real label once decoded.
fn display_host(host: &str) -> String {
    let host = host.strip_suffix('.').unwrap_or(host).to_lowercase();
    match idna::domain_to_unicode(&host) {
        (unicode, Ok(())) if !unicode.is_empty() => unicode,
        _ => host,
    }
}

/// Classic insertion/deletion/substitution distance between two labels.
pub fn edit_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Canonical domain the candidate appears to impersonate, if any.
///
/// Exact legitimate domains are never flagged. Legitimate-looking subdomains of a real
/// site are not exempt and can still trip the substring rule.
pub fn find_typosquat_target<'r>(domain: &str, registry: &'r DomainRegistry) -> Option<&'r str> {
    if registry.is_legitimate(domain) {
        return None;
    }

    let label = domain.split('.').next().unwrap_or_default();
    registry
        .typosquat_targets()
        .iter()
        .find(|(base, _)| {
            label != base.as_str()
                && (label.contains(base.as_str()) || edit_distance(label, base) <= MAX_TYPOSQUAT_DISTANCE)
        })
        .map(|(_, full)| full.as_str())
}

fn check_insecure_transport(parts: &UrlParts, _: &DomainRegistry) -> Option<(String, RiskLevel)> {
    (parts.scheme != "https").then(|| {
        (
            "No HTTPS encryption - data sent insecurely".to_string(),
            RiskLevel::Medium,
        )
    })
}

fn check_suspicious_suffix(parts: &UrlParts, registry: &DomainRegistry) -> Option<(String, RiskLevel)> {
    registry.suspicious_suffix(&parts.domain).map(|tld| {
        (
            format!("Suspicious domain extension ({}) commonly used in scams", tld),
            RiskLevel::High,
        )
    })
}

fn check_typosquat(parts: &UrlParts, registry: &DomainRegistry) -> Option<(String, RiskLevel)> {
    find_typosquat_target(&parts.domain, registry).map(|target| {
        (
            format!(
                "Possible impersonation of '{}' - domain looks similar but isn't the real site",
                target
            ),
            RiskLevel::Critical,
        )
    })
}

fn check_scam_pattern(parts: &UrlParts, registry: &DomainRegistry) -> Option<(String, RiskLevel)> {
    registry.matches_scam_pattern(&parts.lower).then(|| {
        (
            "URL matches known Zimbabwean scam/fraud patterns".to_string(),
            RiskLevel::High,
        )
    })
}

fn check_excess_length(parts: &UrlParts, _: &DomainRegistry) -> Option<(String, RiskLevel)> {
    (parts.raw.chars().count() > MAX_URL_LENGTH).then(|| {
        (
            "Unusually long URL - may be disguising destination".to_string(),
            RiskLevel::Medium,
        )
    })
}

fn check_credential_path(parts: &UrlParts, registry: &DomainRegistry) -> Option<(String, RiskLevel)> {
    if registry.is_legitimate(&parts.domain) {
        return None;
    }

    CREDENTIAL_PATH_KEYWORDS
        .iter()
        .find(|keyword| parts.path.contains(*keyword))
        .map(|keyword| {
            (
                format!(
                    "Contains '{}' in path on non-official domain - possible phishing",
                    keyword
                ),
                RiskLevel::High,
            )
        })
}

fn check_ip_literal(parts: &UrlParts, _: &DomainRegistry) -> Option<(String, RiskLevel)> {
    parts.is_ipv4.then(|| {
        (
            "Uses IP address instead of domain name - highly suspicious".to_string(),
            RiskLevel::Critical,
        )
    })
}

fn check_excess_subdomains(parts: &UrlParts, _: &DomainRegistry) -> Option<(String, RiskLevel)> {
    (parts.domain.matches('.').count() > 3).then(|| {
        (
            "Excessive subdomains - may be impersonating a legitimate site".to_string(),
            RiskLevel::Medium,
        )
    })
}

fn check_shortener(parts: &UrlParts, registry: &DomainRegistry) -> Option<(String, RiskLevel)> {
    registry.is_shortener(&parts.domain).then(|| {
        (
            "Uses URL shortener - destination is hidden".to_string(),
            RiskLevel::Medium,
        )
    })
}

/// Runs the heuristic battery against a URL. Never fails: a URL that cannot be
/// decomposed is reported as an issue at `Medium`.
#[derive(Debug, Clone)]
pub struct UrlRiskScanner {
    registry: Arc<DomainRegistry>,
}

impl UrlRiskScanner {
    pub fn new(registry: Arc<DomainRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &DomainRegistry {
        &self.registry
    }

    /// Issues and proposed levels from every check that fired, in declared order.
    pub fn evaluate(&self, url: &str) -> Result<Vec<(String, RiskLevel)>, ChokwadiError> {
        UrlParts::parse(url).map(|parts| self.run_checks(&parts))
    }

    fn run_checks(&self, parts: &UrlParts) -> Vec<(String, RiskLevel)> {
        CHECKS
            .iter()
            .filter_map(|check| check(parts, &self.registry))
            .collect()
    }

    pub fn scan(&self, url: &str) -> ScanFinding {
        let mut finding = ScanFinding::new(url);

        match UrlParts::parse(url) {
            Ok(parts) => {
                finding = self
                    .run_checks(&parts)
                    .into_iter()
                    .fold(finding, |mut acc, (issue, level)| {
                        acc.add_issue(issue, level);
                        acc
                    });

                if !finding.has_issues() {
                    finding.issues.push(NO_RED_FLAGS.to_string());
                }

                finding.details = ScanDetails {
                    is_known_domain: self.registry.is_legitimate(&parts.domain),
                    domain: parts.domain,
                    scheme: parts.scheme,
                };
            }
            Err(e) => {
                finding.add_issue(format!("Could not fully analyse URL: {}", e), RiskLevel::Medium);
            }
        }

        tracing::debug!(
            url = %finding.url,
            risk_level = finding.risk_level.as_str(),
            issues = finding.issues.len(),
            "URL scan complete"
        );

        finding
    }
}

impl Default for UrlRiskScanner {
    fn default() -> Self {
        Self::new(DomainRegistry::builtin())
    }
}
