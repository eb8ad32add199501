// Analyzer module - handles oracle integration and analysis orchestration

pub mod llm_client;
pub mod orchestrator;
pub mod prompts;
pub mod wire;

pub use llm_client::{AnthropicBackend, OpenAiBackend, OracleBackend, OracleInvoker, OraclePayload};
pub use orchestrator::ContentAnalyzer;
pub use prompts::PromptTemplate;
