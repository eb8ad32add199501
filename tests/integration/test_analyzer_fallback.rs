use chokwadi::analyzer::{ContentAnalyzer, OracleBackend, OracleInvoker, OraclePayload};
use chokwadi::error::ChokwadiError;
use chokwadi::localization;
use chokwadi::models::{AnalysisRequest, ImageMediaType};
use chokwadi::providers::{ProviderKind, ProviderRegistry, ProviderSettings, SelectionMode};
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Copy)]
enum Behaviour {
    Reply(&'static str),
    Fail,
    Empty,
    Hang,
}

struct ScriptedBackend {
    kind: ProviderKind,
    behaviour: Behaviour,
    calls: AtomicUsize,
    prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedBackend {
    fn new(kind: ProviderKind, behaviour: Behaviour) -> Arc<Self> {
        Arc::new(Self {
            kind,
            behaviour,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OracleBackend for ScriptedBackend {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn model_name(&self) -> &str {
        "scripted"
    }

    fn complete<'a>(
        &'a self,
        system_prompt: &'a str,
        payload: OraclePayload<'a>,
    ) -> BoxFuture<'a, Result<String, ChokwadiError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let user = match payload {
            OraclePayload::Text(text) => text.to_string(),
            OraclePayload::Vision { media_type, .. } => format!("<image {}>", media_type.as_mime()),
        };
        self.prompts
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user));

        let behaviour = self.behaviour;
        let kind = self.kind;
        Box::pin(async move {
            match behaviour {
                Behaviour::Reply(text) => Ok(text.to_string()),
                Behaviour::Fail => Err(ChokwadiError::provider_call(kind.as_str(), "HTTP 500")),
                Behaviour::Empty => Ok(String::new()),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok("too late".to_string())
                }
            }
        })
    }
}

fn analyzer(
    mode: SelectionMode,
    anthropic: Option<Arc<ScriptedBackend>>,
    openai: Option<Arc<ScriptedBackend>>,
) -> ContentAnalyzer {
    let settings = ProviderSettings::new(
        mode,
        anthropic.as_ref().map(|_| "a".to_string()),
        openai.as_ref().map(|_| "o".to_string()),
    );

    let mut invoker = OracleInvoker::new(Duration::from_millis(200));
    for backend in [anthropic, openai].into_iter().flatten() {
        invoker = invoker.with_backend(backend);
    }

    ContentAnalyzer::new(Arc::new(ProviderRegistry::new(settings)), invoker).unwrap()
}

#[tokio::test]
async fn primary_success_makes_one_call() {
    let claude = ScriptedBackend::new(ProviderKind::Anthropic, Behaviour::Reply("VERDICT: CREDIBLE"));
    let gpt = ScriptedBackend::new(ProviderKind::OpenAi, Behaviour::Reply("unused"));
    let analyzer = analyzer(SelectionMode::Auto, Some(claude.clone()), Some(gpt.clone()));

    let verdict = analyzer.analyze(&AnalysisRequest::text("ZIMRA refunds are tax free")).await;

    assert_eq!(verdict, "VERDICT: CREDIBLE");
    assert_eq!(claude.calls(), 1);
    assert_eq!(gpt.calls(), 0);
}

#[tokio::test]
async fn primary_failure_triggers_exactly_one_fallback_call() {
    let claude = ScriptedBackend::new(ProviderKind::Anthropic, Behaviour::Fail);
    let gpt = ScriptedBackend::new(ProviderKind::OpenAi, Behaviour::Reply("from gpt"));
    let analyzer = analyzer(SelectionMode::Auto, Some(claude.clone()), Some(gpt.clone()));

    let verdict = analyzer.analyze(&AnalysisRequest::text("Free airtime for everyone")).await;

    assert_eq!(verdict, "from gpt");
    assert_eq!(claude.calls(), 1);
    assert_eq!(gpt.calls(), 1);
}

#[tokio::test]
async fn both_failing_returns_apology_after_two_calls() {
    let claude = ScriptedBackend::new(ProviderKind::Anthropic, Behaviour::Empty);
    let gpt = ScriptedBackend::new(ProviderKind::OpenAi, Behaviour::Fail);
    let analyzer = analyzer(SelectionMode::Auto, Some(claude.clone()), Some(gpt.clone()));

    let verdict = analyzer.analyze(&AnalysisRequest::text("Something suspicious")).await;

    assert_eq!(verdict, localization::apology());
    assert!(!verdict.contains("HTTP 500"));
    assert_eq!(claude.calls(), 1);
    assert_eq!(gpt.calls(), 1);
}

#[tokio::test]
async fn explicit_mode_never_falls_back() {
    let claude = ScriptedBackend::new(ProviderKind::Anthropic, Behaviour::Reply("unused"));
    let gpt = ScriptedBackend::new(ProviderKind::OpenAi, Behaviour::Fail);
    let analyzer = analyzer(
        SelectionMode::Explicit(ProviderKind::OpenAi),
        Some(claude.clone()),
        Some(gpt.clone()),
    );

    let verdict = analyzer.analyze(&AnalysisRequest::text("Something suspicious")).await;

    assert_eq!(verdict, localization::apology());
    assert_eq!(gpt.calls(), 1);
    assert_eq!(claude.calls(), 0);
}

#[tokio::test]
async fn single_provider_failure_is_terminal() {
    let gpt = ScriptedBackend::new(ProviderKind::OpenAi, Behaviour::Fail);
    let analyzer = analyzer(SelectionMode::Auto, None, Some(gpt.clone()));

    let verdict = analyzer.analyze(&AnalysisRequest::text("Something suspicious")).await;

    assert_eq!(verdict, localization::apology());
    assert_eq!(gpt.calls(), 1);
}

#[tokio::test]
async fn timeout_counts_as_failure_and_falls_back() {
    let claude = ScriptedBackend::new(ProviderKind::Anthropic, Behaviour::Hang);
    let gpt = ScriptedBackend::new(ProviderKind::OpenAi, Behaviour::Reply("gpt answered"));
    let analyzer = analyzer(SelectionMode::Auto, Some(claude.clone()), Some(gpt.clone()));

    let verdict = analyzer.analyze(&AnalysisRequest::text("Something suspicious")).await;

    assert_eq!(verdict, "gpt answered");
    assert_eq!(claude.calls(), 1);
}

#[tokio::test]
async fn override_onto_static_fallback_loses_failover() {
    let claude = ScriptedBackend::new(ProviderKind::Anthropic, Behaviour::Reply("unused"));
    let gpt = ScriptedBackend::new(ProviderKind::OpenAi, Behaviour::Fail);
    let analyzer = analyzer(SelectionMode::Auto, Some(claude.clone()), Some(gpt.clone()));
    analyzer.registry().set_override(ProviderKind::OpenAi);

    let verdict = analyzer.analyze(&AnalysisRequest::text("Something suspicious")).await;

    assert_eq!(verdict, localization::apology());
    assert_eq!(gpt.calls(), 1);
    assert_eq!(claude.calls(), 0);
}

#[tokio::test]
async fn override_onto_static_primary_keeps_failover() {
    let claude = ScriptedBackend::new(ProviderKind::Anthropic, Behaviour::Fail);
    let gpt = ScriptedBackend::new(ProviderKind::OpenAi, Behaviour::Reply("gpt answered"));
    let analyzer = analyzer(SelectionMode::Auto, Some(claude.clone()), Some(gpt.clone()));
    analyzer.registry().set_override(ProviderKind::Anthropic);

    let verdict = analyzer.analyze(&AnalysisRequest::text("Something suspicious")).await;

    assert_eq!(verdict, "gpt answered");
    assert_eq!(claude.calls(), 1);
    assert_eq!(gpt.calls(), 1);
}

#[tokio::test]
async fn override_routes_to_selected_provider() {
    let claude = ScriptedBackend::new(ProviderKind::Anthropic, Behaviour::Reply("claude"));
    let gpt = ScriptedBackend::new(ProviderKind::OpenAi, Behaviour::Reply("gpt"));
    let analyzer = analyzer(SelectionMode::Auto, Some(claude.clone()), Some(gpt.clone()));

    analyzer.registry().set_override(ProviderKind::OpenAi);
    assert_eq!(analyzer.analyze(&AnalysisRequest::text("first message")).await, "gpt");

    analyzer.registry().clear_override();
    assert_eq!(analyzer.analyze(&AnalysisRequest::text("second message")).await, "claude");
}

#[tokio::test]
async fn prompts_follow_content_type() {
    let claude = ScriptedBackend::new(ProviderKind::Anthropic, Behaviour::Reply("ok"));
    let analyzer = analyzer(SelectionMode::Auto, Some(claude.clone()), None);

    analyzer.analyze(&AnalysisRequest::voice("pay the fee now")).await;
    analyzer.analyze(&AnalysisRequest::link("http://ec0cash.co.zw")).await;
    analyzer.analyze_image(b"\x89PNG", ImageMediaType::Png).await;

    let prompts = claude.prompts.lock().unwrap();
    assert!(prompts[0].1.contains("MAY CONTAIN ERRORS"));
    assert!(prompts[0].1.ends_with("pay the fee now"));
    assert!(!prompts[0].0.contains("typosquatting"));
    assert!(prompts[1].0.contains("typosquatting"));
    assert!(prompts[1].1.contains("http://ec0cash.co.zw"));
    assert_eq!(prompts[2].1, "<image image/png>");
    assert!(!prompts[2].0.contains("typosquatting"));
}
