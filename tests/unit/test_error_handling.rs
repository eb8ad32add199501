use chokwadi::analyzer::ContentAnalyzer;
use chokwadi::cli::Cli;
use chokwadi::error::ChokwadiError;
use chokwadi::providers::{ProviderRegistry, ProviderSettings, SelectionMode};
use chokwadi::scanner::DomainRegistry;
use std::io::Write;
use std::sync::Arc;

#[test]
fn analyzer_creation_fails_without_credentials() {
    let registry = Arc::new(ProviderRegistry::new(ProviderSettings::new(
        SelectionMode::Auto,
        None,
        None,
    )));

    let err = ContentAnalyzer::from_registry(registry).err().unwrap();
    assert!(matches!(err, ChokwadiError::Config(_)));
    assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
}

#[test]
fn exit_codes_follow_error_class() {
    assert_eq!(ChokwadiError::InvalidArguments("x".into()).exit_code(), 2);
    assert_eq!(ChokwadiError::no_credentials().exit_code(), 3);
    assert_eq!(ChokwadiError::provider_call("openai", "HTTP 500").exit_code(), 1);
    assert_eq!(ChokwadiError::MediaDownload("HTTP 404".into()).exit_code(), 1);
}

#[test]
fn provider_call_error_names_provider_and_reason() {
    let err = ChokwadiError::provider_call("anthropic", "timed out after 45s");
    assert_eq!(
        err.to_string(),
        "Provider anthropic call failed: timed out after 45s"
    );
}

#[test]
fn url_parse_errors_convert() {
    let err: ChokwadiError = url::Url::parse("nope").unwrap_err().into();
    assert!(matches!(err, ChokwadiError::UrlParse(_)));
}

#[test]
fn domain_file_errors_propagate() {
    let missing = DomainRegistry::from_json_file(std::path::Path::new("/nonexistent/domains.json"));
    assert!(matches!(missing, Err(ChokwadiError::IoError(_))));

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{ not json").unwrap();
    let malformed = DomainRegistry::from_json_file(file.path());
    assert!(matches!(malformed, Err(ChokwadiError::SerializationError(_))));
}

#[test]
fn bad_arguments_are_reported_as_invalid_arguments() {
    use clap::Parser;

    let err = Cli::try_parse_from(["chokwadi", "analyze", "--kind", "video"])
        .map_err(|e| ChokwadiError::InvalidArguments(e.to_string()))
        .unwrap_err();
    assert_eq!(err.exit_code(), 2);
}
