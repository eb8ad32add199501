pub mod args;

pub use args::{Cli, Command};

use crate::analyzer::ContentAnalyzer;
use crate::error::ChokwadiError;
use crate::intake::{admin, InboundMessage, IntakeSettings, MediaFetcher, MessageDispatcher, WhisperTranscriber};
use crate::models::{AnalysisRequest, ContentType, ImageMediaType};
use crate::providers::{ProviderRegistry, ProviderSettings};
use crate::scanner::{DomainRegistry, ReportFormatter, UrlRiskScanner};
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

pub struct CliHandler {
    cli: Cli,
}

impl CliHandler {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    pub async fn run(&self) -> Result<i32, ChokwadiError> {
        match &self.cli.command {
            Command::Scan { url, json, domains } => self.run_scan(url, *json, domains.as_deref()),
            Command::Status => self.run_status(),
            Command::Analyze { kind, content } => self.run_analyze(kind, content).await,
            Command::Image { path, mime } => self.run_image(path, mime.as_deref()).await,
            Command::Message {
                from,
                media_url,
                media_type,
                body,
            } => {
                let mut message = InboundMessage::text(from.as_str(), body.join(" "));
                if let (Some(url), Some(mime)) = (media_url, media_type) {
                    message = message.with_media(url.as_str(), mime.as_str());
                }
                self.run_message(&message).await
            }
        }
    }

    fn settings(&self) -> Result<ProviderSettings, ChokwadiError> {
        let mut settings = ProviderSettings::from_env()?;
        if let Some(mode) = self.cli.selection_mode()? {
            settings = settings.with_mode(mode);
        }
        if let Some(timeout) = self.cli.timeout {
            settings = settings.with_timeout(timeout);
        }
        Ok(settings)
    }

    fn analyzer(&self) -> Result<ContentAnalyzer, ChokwadiError> {
        let registry = Arc::new(ProviderRegistry::new(self.settings()?));
        ContentAnalyzer::from_registry(registry)
    }

    fn run_scan(&self, url: &str, json: bool, domains: Option<&Path>) -> Result<i32, ChokwadiError> {
        let scanner = match domains {
            Some(path) => UrlRiskScanner::new(Arc::new(DomainRegistry::from_json_file(path)?)),
            None => UrlRiskScanner::default(),
        };

        let finding = scanner.scan(url);
        if json {
            println!("{}", serde_json::to_string_pretty(&finding)?);
        } else {
            println!("{}", ReportFormatter::format(&finding));
        }
        Ok(0)
    }

    fn run_status(&self) -> Result<i32, ChokwadiError> {
        let registry = ProviderRegistry::new(self.settings()?);
        println!("{}", admin::status_report(&registry));

        for kind in registry.available_providers() {
            println!("  {} model: {}", kind.display_name(), registry.settings().provider(kind).model);
        }
        Ok(0)
    }

    async fn run_analyze(&self, kind: &str, content: &[String]) -> Result<i32, ChokwadiError> {
        let content_type = ContentType::from_str(kind)
            .ok_or_else(|| ChokwadiError::InvalidArguments(format!("Unknown content kind '{}'", kind)))?;

        let content = if content.is_empty() {
            read_stdin()?
        } else {
            content.join(" ")
        };

        if content.trim().is_empty() {
            return Err(ChokwadiError::InvalidArguments(
                "No content given on the command line or stdin".to_string(),
            ));
        }

        let analyzer = self.analyzer()?;
        let verdict = analyzer
            .analyze(&AnalysisRequest::new(content.trim(), content_type))
            .await;
        println!("{}", verdict);
        Ok(0)
    }

    async fn run_image(&self, path: &Path, mime: Option<&str>) -> Result<i32, ChokwadiError> {
        let media_type = match mime {
            Some(mime) => ImageMediaType::from_mime(mime),
            None => ImageMediaType::from_extension(
                path.extension().and_then(|ext| ext.to_str()).unwrap_or_default(),
            ),
        };

        let image = tokio::fs::read(path).await?;
        tracing::debug!(path = %path.display(), size_bytes = image.len(), "Image loaded");

        let analyzer = self.analyzer()?;
        println!("{}", analyzer.analyze_image(&image, media_type).await);
        Ok(0)
    }

    async fn run_message(&self, message: &InboundMessage) -> Result<i32, ChokwadiError> {
        let settings = self.settings()?;
        let intake = IntakeSettings::from_env();

        let transcriber = WhisperTranscriber::new(settings.openai.clone())?;
        let analyzer = Arc::new(ContentAnalyzer::from_registry(Arc::new(ProviderRegistry::new(settings)))?);
        let dispatcher = MessageDispatcher::new(
            analyzer,
            Arc::new(MediaFetcher::new(intake.media_credentials)?),
            Arc::new(transcriber),
        )
        .with_admin_sender(intake.admin_sender);

        let replies = dispatcher.handle(message).await;
        let last = replies.len().saturating_sub(1);
        for (index, reply) in replies.iter().enumerate() {
            println!("{}", reply);
            if index < last {
                println!("---");
            }
        }
        Ok(0)
    }
}

fn read_stdin() -> Result<String, ChokwadiError> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}
