use crate::error::ChokwadiError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

const LEGITIMATE_ZW_DOMAINS: &[&str] = &[
    "ecocash.co.zw", "innbucks.co.zw", "rbz.co.zw", "zimra.co.zw",
    "zse.co.zw", "herald.co.zw", "chronicle.co.zw", "newsday.co.zw",
    "techzim.co.zw", "zbc.co.zw", "parlzim.gov.zw", "zimgov.gov.zw",
    "mhte.gov.zw", "mohcc.gov.zw", "potraz.gov.zw", "zec.org.zw",
    "uz.ac.zw", "nust.ac.zw", "hit.ac.zw", "msu.ac.zw",
    "steward.co.zw", "cbz.co.zw", "stanbicbank.co.zw", "zetdc.co.zw",
    "econet.co.zw", "netone.co.zw", "telecel.co.zw",
];

const TYPOSQUAT_TARGETS: &[(&str, &str)] = &[
    ("ecocash", "ecocash.co.zw"),
    ("innbucks", "innbucks.co.zw"),
    ("econet", "econet.co.zw"),
    ("cbz", "cbz.co.zw"),
    ("steward", "steward.co.zw"),
    ("zimra", "zimra.co.zw"),
    ("rbz", "rbz.co.zw"),
];

const SUSPICIOUS_TLDS: &[&str] = &[
    ".xyz", ".top", ".club", ".work", ".click", ".link",
    ".buzz", ".gq", ".ml", ".cf", ".tk", ".ga",
];

const URL_SHORTENERS: &[&str] = &[
    "bit.ly", "tinyurl.com", "t.co", "goo.gl", "is.gd", "rb.gy", "shorturl.at",
];

/// Scam campaigns seen circulating in Zimbabwe, matched against the lowercased URL.
const SCAM_PATTERNS: &[&str] = &[
    r"ecocash.*free",
    r"innbucks.*bonus",
    r"zim.*lottery",
    r"dv[-_]?lottery.*apply",
    r"rbz.*zig.*exchange",
    r"free[-_]?airtime",
    r"zimra.*refund",
    r"zesa.*free.*tokens?",
    r"diaspora.*send.*money",
    r"forex.*guaranteed.*profit",
    r"crypto.*invest.*zim",
    r"whatsapp.*gold",
];

lazy_static::lazy_static! {
    static ref BUILTIN: Arc<DomainRegistry> = Arc::new(DomainRegistry::from_tables(DomainTables::builtin()));
}

/// Raw, serializable form of the registry, as loaded from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainTables {
    pub legitimate_domains: Vec<String>,
    /// `(base label, canonical domain)` pairs, checked in order.
    pub typosquat_targets: Vec<(String, String)>,
    pub suspicious_tlds: Vec<String>,
    pub url_shorteners: Vec<String>,
    pub scam_patterns: Vec<String>,
}

/// Read-only lookup tables used by the URL scanner.
#[derive(Debug, Clone)]
pub struct DomainRegistry {
    legitimate: HashSet<String>,
    typosquat_targets: Vec<(String, String)>,
    suspicious_tlds: Vec<String>,
    url_shorteners: Vec<String>,
    scam_patterns: Vec<Regex>,
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn lowered(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

impl DomainTables {
    pub fn builtin() -> Self {
        Self {
            legitimate_domains: owned(LEGITIMATE_ZW_DOMAINS),
            typosquat_targets: TYPOSQUAT_TARGETS
                .iter()
                .map(|(base, full)| (base.to_string(), full.to_string()))
                .collect(),
            suspicious_tlds: owned(SUSPICIOUS_TLDS),
            url_shorteners: owned(URL_SHORTENERS),
            scam_patterns: owned(SCAM_PATTERNS),
        }
    }
}

impl DomainRegistry {
    /// Shared handle to the built-in Zimbabwean tables.
    pub fn builtin() -> Arc<DomainRegistry> {
        Arc::clone(&*BUILTIN)
    }

    /// Invalid scam patterns are dropped with a warning rather than failing the load.
    pub fn from_tables(tables: DomainTables) -> Self {
        let scam_patterns = tables
            .scam_patterns
            .iter()
            .filter_map(|pattern| match Regex::new(pattern) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    tracing::warn!(pattern = %pattern, error = %e, "Skipping invalid scam pattern");
                    None
                }
            })
            .collect();

        Self {
            legitimate: lowered(tables.legitimate_domains).into_iter().collect(),
            typosquat_targets: tables
                .typosquat_targets
                .into_iter()
                .map(|(base, full)| (base.trim().to_lowercase(), full.trim().to_lowercase()))
                .filter(|(base, _)| !base.is_empty())
                .collect(),
            suspicious_tlds: lowered(tables.suspicious_tlds),
            url_shorteners: lowered(tables.url_shorteners),
            scam_patterns,
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ChokwadiError> {
        let raw = std::fs::read_to_string(path)?;
        let tables: DomainTables = serde_json::from_str(&raw)?;
        Ok(Self::from_tables(tables))
    }

    pub fn is_legitimate(&self, domain: &str) -> bool {
        self.legitimate.contains(domain)
    }

    pub fn typosquat_targets(&self) -> &[(String, String)] {
        &self.typosquat_targets
    }

    /// First low-trust suffix the domain ends with, if any.
    pub fn suspicious_suffix(&self, domain: &str) -> Option<&str> {
        self.suspicious_tlds
            .iter()
            .find(|tld| domain.ends_with(tld.as_str()))
            .map(String::as_str)
    }

    pub fn is_shortener(&self, domain: &str) -> bool {
        self.url_shorteners.iter().any(|shortener| {
            domain == shortener
                || domain
                    .strip_suffix(shortener.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }

    pub fn matches_scam_pattern(&self, url_lower: &str) -> bool {
        self.scam_patterns.iter().any(|regex| regex.is_match(url_lower))
    }

    pub fn scam_pattern_count(&self) -> usize {
        self.scam_patterns.len()
    }
}

impl Default for DomainRegistry {
    fn default() -> Self {
        Self::from_tables(DomainTables::builtin())
    }
}
