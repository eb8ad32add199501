use crate::error::ChokwadiError;
use crate::models::ContentType;
use crate::providers::config::parse_timeout;
use crate::providers::SelectionMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chokwadi")]
#[command(about = "Chokwadi AI - credibility and scam checks for Zimbabwean content")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// Provider selection: auto, anthropic (claude) or openai (gpt)
    #[arg(short = 'p', long, env = "AI_PROVIDER", global = true, value_parser = validate_provider)]
    pub provider: Option<String>,

    /// Maximum time for one oracle call in seconds (5-300)
    #[arg(short = 't', long, env = "CHOKWADI_ORACLE_TIMEOUT", global = true, value_parser = validate_timeout)]
    pub timeout: Option<u64>,

    /// Enable verbose logging to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Enable trace logging including oracle request details
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Analyse text content; reads stdin when no content is given
    Analyze {
        /// Content framing: text, voice, image or link
        #[arg(short = 'k', long, default_value = "text", value_parser = validate_kind)]
        kind: String,

        #[arg(trailing_var_arg = true)]
        content: Vec<String>,
    },

    /// Analyse an image file with a vision-capable model
    Image {
        path: PathBuf,

        /// MIME type; guessed from the file extension when omitted
        #[arg(long)]
        mime: Option<String>,
    },

    /// Run the URL risk scanner without calling any model
    Scan {
        url: String,

        /// Print the finding as JSON instead of the text report
        #[arg(long)]
        json: bool,

        /// JSON file replacing the built-in domain tables
        #[arg(long)]
        domains: Option<PathBuf>,
    },

    /// Handle one inbound message the way the messaging bot would
    Message {
        /// Sender identifier, compared with ADMIN_SENDER for admin commands
        #[arg(long, default_value = "cli")]
        from: String,

        #[arg(long, requires = "media_type")]
        media_url: Option<String>,

        #[arg(long, requires = "media_url")]
        media_type: Option<String>,

        #[arg(trailing_var_arg = true)]
        body: Vec<String>,
    },

    /// Show provider configuration and availability
    Status,
}

impl Cli {
    pub fn parse_args() -> Result<Self, ChokwadiError> {
        Self::try_parse().map_err(|e| ChokwadiError::InvalidArguments(e.to_string()))
    }

    pub fn selection_mode(&self) -> Result<Option<SelectionMode>, ChokwadiError> {
        self.provider.as_deref().map(SelectionMode::parse).transpose()
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose || self.debug
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Filter directive for this crate's logs.
    pub fn log_directive(&self) -> &'static str {
        if self.debug {
            "chokwadi=trace"
        } else if self.verbose {
            "chokwadi=debug"
        } else {
            "chokwadi=info"
        }
    }
}

fn validate_provider(s: &str) -> Result<String, String> {
    SelectionMode::parse(s)
        .map(|_| s.to_string())
        .map_err(|e| e.to_string())
}

fn validate_timeout(s: &str) -> Result<u64, String> {
    parse_timeout(s).map_err(|e| e.to_string())
}

fn validate_kind(s: &str) -> Result<String, String> {
    ContentType::from_str(s)
        .map(|_| s.to_string())
        .ok_or_else(|| format!("Unknown content kind '{}': use text, voice, image or link", s))
}
