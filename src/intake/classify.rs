use regex::Regex;
use std::fmt;

lazy_static::lazy_static! {
    static ref URL_PATTERN: Regex = Regex::new(r#"https?://[^\s<>"{}|\\^`\[\]]+"#)
        .expect("URL pattern is valid");
}

/// How an inbound message is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundKind {
    Text,
    Voice,
    Image,
    Document,
    Link,
}

impl InboundKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InboundKind::Text => "text",
            InboundKind::Voice => "voice",
            InboundKind::Image => "image",
            InboundKind::Document => "document",
            InboundKind::Link => "link",
        }
    }
}

impl fmt::Display for InboundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `media_type` is the declared MIME of the first attachment, when there is one.
pub fn classify(body: &str, media_type: Option<&str>) -> InboundKind {
    if let Some(mime) = media_type {
        let mime = mime.to_lowercase();
        return if ["audio", "ogg", "voice"].iter().any(|m| mime.contains(m)) {
            InboundKind::Voice
        } else if ["image", "jpeg", "png", "webp"].iter().any(|m| mime.contains(m)) {
            InboundKind::Image
        } else if ["pdf", "document"].iter().any(|m| mime.contains(m)) {
            InboundKind::Document
        } else {
            InboundKind::Image
        };
    }

    if URL_PATTERN.is_match(body) {
        InboundKind::Link
    } else {
        InboundKind::Text
    }
}

pub fn extract_urls(text: &str) -> Vec<&str> {
    URL_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
}
