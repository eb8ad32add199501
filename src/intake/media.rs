use crate::error::ChokwadiError;
use crate::providers::ProviderConfig;
use futures::future::BoxFuture;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

pub const MEDIA_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MEDIA_MIME: &str = "image/jpeg";
pub const TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Credentials for the messaging platform's media store.
#[derive(Clone, PartialEq, Eq)]
pub enum MediaCredentials {
    Basic { user: String, token: String },
    Bearer(String),
}

impl MediaCredentials {
    /// Basic credentials win when both pairs are present.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        match (present("MEDIA_AUTH_USER"), present("MEDIA_AUTH_TOKEN")) {
            (Some(user), Some(token)) => Some(MediaCredentials::Basic { user, token }),
            _ => present("MEDIA_BEARER_TOKEN").map(MediaCredentials::Bearer),
        }
    }
}

impl fmt::Debug for MediaCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaCredentials::Basic { user, .. } => {
                f.debug_struct("Basic").field("user", user).finish_non_exhaustive()
            }
            MediaCredentials::Bearer(_) => f.write_str("Bearer(..)"),
        }
    }
}

/// Downloaded attachment bytes and the MIME type the server declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Transcription {
    pub text: String,
    #[serde(default)]
    pub language: Option<String>,
}

pub trait MediaSource: Send + Sync {
    fn fetch<'a>(&'a self, reference: &'a str) -> BoxFuture<'a, Result<MediaPayload, ChokwadiError>>;
}

pub trait Transcriber: Send + Sync {
    fn transcribe<'a>(
        &'a self,
        audio: &'a MediaPayload,
    ) -> BoxFuture<'a, Result<Transcription, ChokwadiError>>;
}

/// Audio file extension the transcription endpoint uses to sniff the container.
pub fn audio_extension(mime: &str) -> &'static str {
    let mime = mime.to_lowercase();
    if mime.contains("mp4") || mime.contains("m4a") {
        "m4a"
    } else if mime.contains("mpeg") || mime.contains("mp3") {
        "mp3"
    } else if mime.contains("amr") {
        "amr"
    } else {
        "ogg"
    }
}

/// Plain HTTP download with redirects and the platform's credentials.
pub struct MediaFetcher {
    client: Client,
    credentials: Option<MediaCredentials>,
}

impl MediaFetcher {
    pub fn new(credentials: Option<MediaCredentials>) -> Result<Self, ChokwadiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(MEDIA_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, credentials })
    }

    async fn download(&self, reference: &str) -> Result<MediaPayload, ChokwadiError> {
        let mut request = self.client.get(reference);
        request = match &self.credentials {
            Some(MediaCredentials::Basic { user, token }) => request.basic_auth(user, Some(token)),
            Some(MediaCredentials::Bearer(token)) => request.bearer_auth(token),
            None => request,
        };

        let resp = request
            .send()
            .await
            .map_err(|e| ChokwadiError::MediaDownload(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ChokwadiError::MediaDownload(format!("HTTP {}", status)));
        }

        let mime_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_MEDIA_MIME)
            .to_string();

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ChokwadiError::MediaDownload(e.to_string()))?
            .to_vec();

        tracing::debug!(size_bytes = bytes.len(), mime_type = %mime_type, "Media downloaded");
        Ok(MediaPayload { bytes, mime_type })
    }
}

impl MediaSource for MediaFetcher {
    fn fetch<'a>(&'a self, reference: &'a str) -> BoxFuture<'a, Result<MediaPayload, ChokwadiError>> {
        Box::pin(self.download(reference))
    }
}

/// Speech-to-text through the OpenAI audio transcription endpoint.
pub struct WhisperTranscriber {
    config: ProviderConfig,
    client: Client,
}

impl WhisperTranscriber {
    pub fn new(config: ProviderConfig) -> Result<Self, ChokwadiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(MEDIA_TIMEOUT_SECS))
            .build()?;

        Ok(Self { config, client })
    }

    async fn send(&self, audio: &MediaPayload) -> Result<Transcription, ChokwadiError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| ChokwadiError::Transcription("OpenAI API key not configured".to_string()))?;

        let file = Part::bytes(audio.bytes.clone())
            .file_name(format!("voice_note.{}", audio_extension(&audio.mime_type)))
            .mime_str(&audio.mime_type)
            .map_err(|e| ChokwadiError::Transcription(e.to_string()))?;

        let form = Form::new()
            .text("model", TRANSCRIPTION_MODEL)
            .text("response_format", "verbose_json")
            .part("file", file);

        let resp = self
            .client
            .post(format!("{}/audio/transcriptions", self.config.base_url))
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ChokwadiError::Transcription(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ChokwadiError::Transcription(format!("HTTP {}", status)));
        }

        let transcription: Transcription = resp
            .json()
            .await
            .map_err(|e| ChokwadiError::Transcription(e.to_string()))?;

        if transcription.text.trim().is_empty() {
            return Err(ChokwadiError::Transcription("empty transcription".to_string()));
        }

        tracing::info!(
            language = transcription.language.as_deref().unwrap_or("unknown"),
            length = transcription.text.len(),
            "Voice note transcribed"
        );
        Ok(transcription)
    }
}

impl Transcriber for WhisperTranscriber {
    fn transcribe<'a>(
        &'a self,
        audio: &'a MediaPayload,
    ) -> BoxFuture<'a, Result<Transcription, ChokwadiError>> {
        Box::pin(self.send(audio))
    }
}
