use chokwadi::error::ChokwadiError;
use chokwadi::intake::{
    MediaCredentials, MediaFetcher, MediaPayload, MediaSource, Transcriber, WhisperTranscriber,
};
use chokwadi::providers::{ProviderConfig, ProviderKind};
use mockito::{Matcher, Server};
use serde_json::json;

#[tokio::test]
async fn fetch_uses_basic_auth_and_reports_mime() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/media/ME123")
        .match_header("authorization", "Basic QUMxMjM6c2VjcmV0")
        .with_status(200)
        .with_header("content-type", "image/webp")
        .with_body(vec![1u8, 2, 3, 4])
        .create_async()
        .await;

    let fetcher = MediaFetcher::new(Some(MediaCredentials::Basic {
        user: "AC123".to_string(),
        token: "secret".to_string(),
    }))
    .unwrap();

    let payload = fetcher
        .fetch(&format!("{}/media/ME123", server.url()))
        .await
        .unwrap();

    assert_eq!(payload.bytes, vec![1, 2, 3, 4]);
    assert_eq!(payload.mime_type, "image/webp");
    mock.assert_async().await;
}

#[tokio::test]
async fn fetch_uses_bearer_token_and_follows_redirects() {
    let mut server = Server::new_async().await;
    let location = format!("{}/media/cdn", server.url());

    let _redirect = server
        .mock("GET", "/media/short")
        .with_status(302)
        .with_header("location", &location)
        .create_async()
        .await;

    let target = server
        .mock("GET", "/media/cdn")
        .match_header("authorization", "Bearer meta-token")
        .with_status(200)
        .with_body("jpeg bytes")
        .create_async()
        .await;

    let fetcher = MediaFetcher::new(Some(MediaCredentials::Bearer("meta-token".to_string()))).unwrap();
    let payload = fetcher
        .fetch(&format!("{}/media/short", server.url()))
        .await
        .unwrap();

    assert_eq!(payload.bytes, b"jpeg bytes".to_vec());
    target.assert_async().await;
}

#[tokio::test]
async fn fetch_failure_status_is_media_download_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/media/missing")
        .with_status(404)
        .create_async()
        .await;

    let fetcher = MediaFetcher::new(None).unwrap();
    let err = fetcher
        .fetch(&format!("{}/media/missing", server.url()))
        .await
        .unwrap_err();

    assert!(matches!(err, ChokwadiError::MediaDownload(ref reason) if reason.contains("404")));
}

fn transcriber(base_url: &str) -> WhisperTranscriber {
    let config = ProviderConfig::new(ProviderKind::OpenAi, Some("sk-oai-test".to_string()), "gpt-4o")
        .with_base_url(base_url);
    WhisperTranscriber::new(config).unwrap()
}

fn voice_note() -> MediaPayload {
    MediaPayload {
        bytes: b"OggS fake opus".to_vec(),
        mime_type: "audio/ogg".to_string(),
    }
}

#[tokio::test]
async fn transcription_posts_multipart_whisper_request() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/audio/transcriptions")
        .match_header("authorization", "Bearer sk-oai-test")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("whisper-1".to_string()),
            Matcher::Regex("verbose_json".to_string()),
            Matcher::Regex(r#"filename="voice_note\.ogg""#.to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "task": "transcribe",
                "language": "shona",
                "duration": 4.2,
                "text": "Makadii, EcoCash yavakupa mari"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let transcription = transcriber(&server.url())
        .transcribe(&voice_note())
        .await
        .unwrap();

    assert_eq!(transcription.text, "Makadii, EcoCash yavakupa mari");
    assert_eq!(transcription.language.as_deref(), Some("shona"));
    mock.assert_async().await;
}

#[tokio::test]
async fn empty_transcription_is_an_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/audio/transcriptions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "text": "   " }).to_string())
        .create_async()
        .await;

    let err = transcriber(&server.url())
        .transcribe(&voice_note())
        .await
        .unwrap_err();

    assert!(matches!(err, ChokwadiError::Transcription(_)));
}

#[tokio::test]
async fn transcription_http_error_is_reported() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/audio/transcriptions")
        .with_status(401)
        .create_async()
        .await;

    let err = transcriber(&server.url())
        .transcribe(&voice_note())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn transcription_without_key_makes_no_request() {
    let config = ProviderConfig::new(ProviderKind::OpenAi, None, "gpt-4o")
        .with_base_url("http://127.0.0.1:9");
    let err = WhisperTranscriber::new(config)
        .unwrap()
        .transcribe(&voice_note())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("API key not configured"));
}
