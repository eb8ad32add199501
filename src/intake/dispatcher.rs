use crate::analyzer::{ContentAnalyzer, PromptTemplate};
use crate::error::ChokwadiError;
use crate::intake::admin::AdminCommand;
use crate::intake::classify::{classify, extract_urls, InboundKind};
use crate::intake::media::{MediaSource, Transcriber};
use crate::localization;
use crate::models::{AnalysisRequest, ImageMediaType};
use crate::scanner::{ReportFormatter, UrlRiskScanner};
use std::sync::Arc;

pub const MAX_CHUNK_CHARS: usize = 1500;
pub const MIN_TEXT_CHARS: usize = 5;
pub const TRANSCRIPT_PREVIEW_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAttachment {
    /// Where the platform stores the bytes. May be empty when the platform omitted it.
    pub reference: String,
    pub mime_type: String,
}

/// One message as delivered by the messaging transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundMessage {
    pub sender: String,
    pub body: String,
    pub media: Option<MediaAttachment>,
}

impl InboundMessage {
    pub fn text(sender: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            body: body.into(),
            media: None,
        }
    }

    pub fn with_media(mut self, reference: impl Into<String>, mime_type: impl Into<String>) -> Self {
        self.media = Some(MediaAttachment {
            reference: reference.into(),
            mime_type: mime_type.into(),
        });
        self
    }
}

/// Routes an inbound message to the right analysis path and returns the replies to send.
pub struct MessageDispatcher {
    analyzer: Arc<ContentAnalyzer>,
    scanner: UrlRiskScanner,
    media: Arc<dyn MediaSource>,
    transcriber: Arc<dyn Transcriber>,
    admin_sender: Option<String>,
}

impl MessageDispatcher {
    pub fn new(
        analyzer: Arc<ContentAnalyzer>,
        media: Arc<dyn MediaSource>,
        transcriber: Arc<dyn Transcriber>,
    ) -> Self {
        Self {
            analyzer,
            scanner: UrlRiskScanner::default(),
            media,
            transcriber,
            admin_sender: None,
        }
    }

    pub fn with_scanner(mut self, scanner: UrlRiskScanner) -> Self {
        self.scanner = scanner;
        self
    }

    /// Blank senders are ignored so admin commands stay disabled.
    pub fn with_admin_sender(mut self, sender: Option<String>) -> Self {
        self.admin_sender = sender.filter(|s| !s.trim().is_empty());
        self
    }

    /// Always yields at least one non-empty reply, each at most `MAX_CHUNK_CHARS` long.
    pub async fn handle(&self, message: &InboundMessage) -> Vec<String> {
        let reply = self.respond(message).await;
        chunk_message(&reply, MAX_CHUNK_CHARS)
    }

    async fn respond(&self, message: &InboundMessage) -> String {
        let body = message.body.trim();

        if self.is_admin(&message.sender) && body.starts_with('!') {
            if let Some(command) = AdminCommand::parse(body) {
                tracing::info!(command = ?command, "Admin command received");
                return command.execute(self.analyzer.registry());
            }
        }

        if localization::is_greeting(body) {
            return localization::get_message("welcome").to_string();
        }

        let kind = classify(body, message.media.as_ref().map(|m| m.mime_type.as_str()));
        tracing::info!(kind = %kind, body_length = body.len(), "Processing inbound message");

        let result = match kind {
            InboundKind::Voice => Ok(self.handle_voice(message.media.as_ref()).await),
            InboundKind::Image => self.handle_image(message.media.as_ref()).await,
            InboundKind::Link => Ok(self.handle_link(body).await),
            // Attachments other than voice and images are judged by their caption only.
            InboundKind::Document | InboundKind::Text => Ok(self.handle_text(body).await),
        };

        result.unwrap_or_else(|e| {
            tracing::error!(error = %e, kind = %kind, "Failed to process message");
            localization::get_message("processing_error").to_string()
        })
    }

    fn is_admin(&self, sender: &str) -> bool {
        self.admin_sender.as_deref() == Some(sender)
    }

    async fn handle_text(&self, body: &str) -> String {
        if body.chars().count() < MIN_TEXT_CHARS {
            return localization::get_message("text_too_short").to_string();
        }
        self.analyzer.analyze(&AnalysisRequest::text(body)).await
    }

    async fn handle_voice(&self, media: Option<&MediaAttachment>) -> String {
        let transcript = match self.transcribe(media).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "Voice note could not be transcribed");
                return localization::get_message("voice_failed").to_string();
            }
        };

        let analysis = self.analyzer.analyze(&AnalysisRequest::voice(transcript.as_str())).await;
        let preview: String = transcript.chars().take(TRANSCRIPT_PREVIEW_CHARS).collect();
        format!("🎤 *Voice Note Transcription:*\n_{}_\n\n{}", preview, analysis)
    }

    async fn transcribe(&self, media: Option<&MediaAttachment>) -> Result<String, ChokwadiError> {
        let reference = media
            .map(|m| m.reference.as_str())
            .filter(|r| !r.is_empty())
            .ok_or_else(|| ChokwadiError::MediaDownload("voice note has no media reference".to_string()))?;

        let audio = self.media.fetch(reference).await?;
        let transcription = self.transcriber.transcribe(&audio).await?;
        Ok(transcription.text)
    }

    async fn handle_image(&self, media: Option<&MediaAttachment>) -> Result<String, ChokwadiError> {
        let Some(reference) = media.map(|m| m.reference.as_str()).filter(|r| !r.is_empty()) else {
            return Ok(localization::get_message("image_missing").to_string());
        };

        let payload = self.media.fetch(reference).await?;
        let media_type = ImageMediaType::from_mime(&payload.mime_type);
        Ok(self.analyzer.analyze_image(&payload.bytes, media_type).await)
    }

    async fn handle_link(&self, body: &str) -> String {
        let Some(url) = extract_urls(body).into_iter().next() else {
            return self.analyzer.analyze(&AnalysisRequest::text(body)).await;
        };

        let finding = self.scanner.scan(url);
        tracing::info!(url = %url, risk_level = %finding.risk_level, "Link scanned");

        let submission =
            PromptTemplate::build_link_submission(url, &ReportFormatter::format(&finding), body);
        self.analyzer.analyze(&AnalysisRequest::link(submission)).await
    }
}

/// Splits on character boundaries into pieces of at most `max_chars` characters.
pub fn chunk_message(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_chars {
        return vec![text.to_string()];
    }

    chars
        .chunks(max_chars)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
