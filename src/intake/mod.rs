// Intake module - classifies inbound messages and routes them to the analyzer

pub mod admin;
pub mod classify;
pub mod dispatcher;
pub mod media;

pub use admin::AdminCommand;
pub use classify::{classify, extract_urls, InboundKind};
pub use dispatcher::{chunk_message, InboundMessage, MediaAttachment, MessageDispatcher};
pub use media::{
    MediaCredentials, MediaFetcher, MediaPayload, MediaSource, Transcriber, Transcription,
    WhisperTranscriber,
};

/// Transport-side settings read once at startup.
#[derive(Debug, Clone, Default)]
pub struct IntakeSettings {
    pub admin_sender: Option<String>,
    pub media_credentials: Option<MediaCredentials>,
}

impl IntakeSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            admin_sender: lookup("ADMIN_SENDER").filter(|s| !s.trim().is_empty()),
            media_credentials: MediaCredentials::from_lookup(&lookup),
        }
    }
}
