//! Turn long transcripts into LLM-written bullet notes.
//!
//! `transnote` cleans a caption-style transcript, optionally rewrites domain
//! jargon, and sends it to a chat-completion model in overlapping,
//! token-budgeted windows. The per-window notes can then be regrouped by
//! topic and summarized into key takeaways and action items, each as a
//! single further model call.
//!
//! The one invariant everything is built around: **no request may exceed the
//! model's context window**. Each stage measures its fixed wrapper text with
//! the run's [`Tokenizer`](context::Tokenizer), reserves room for the
//! response, and hands the remainder to the payload. The windowed stage
//! splits its payload to fit; the single-call stages fail with
//! [`NotesError::BudgetExhausted`] instead of sending an oversized request.
//!
//! # Getting started
//!
//! ```ignore
//! use transnote::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let api_key = std::env::var("OPENROUTER_KEY").unwrap();
//!     let client = OpenRouterClient::new(api_key)?;
//!     let tokenizer = Tokenizer::new()?;
//!
//!     let config = NotesConfig::default().with_overlap(50);
//!     let output = Pipeline::new(&client, &tokenizer, config)
//!         .run(&std::fs::read_to_string("standup.vtt").unwrap(), &RunOptions {
//!             jargon: None,
//!             topics: TopicMode::Auto,
//!             summarize: true,
//!         })
//!         .await?;
//!
//!     println!("{}", output.document);
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`context`] | Tokenizer adapter, budget calculator, windowing engine |
//! | [`api`] | [`ChatModel`](api::ChatModel) invocation seam, retry with backoff, usage and cost tracking |
//! | [`text`] | Transcript cleanup, jargon substitution, response post-processing |
//! | [`pipeline`] | [`NotesConfig`](pipeline::NotesConfig), stage prompts, the [`Pipeline`](pipeline::Pipeline) orchestrator |
//! | [`files`] | Input/output file glue and default output naming |

pub mod api;
pub mod context;
pub mod error;
pub mod files;
pub mod pipeline;
pub mod prelude;
pub mod text;

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

pub use error::{NotesError, Result};

// ── Constants ──────────────────────────────────────────────────────

pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Environment variable holding the API credential.
pub const API_KEY_VAR: &str = "OPENROUTER_KEY";

/// Default model for all calls. Its 4k-token window matches
/// [`DEFAULT_CONTEXT_SIZE`](context::DEFAULT_CONTEXT_SIZE).
pub const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";

/// Default per-request HTTP timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

// ── Request types ──────────────────────────────────────────────────

/// Chat completion request body.
#[derive(Serialize, Debug, Default)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    // Always serialized: a temperature of 0 is meaningful here.
    pub temperature: f32,
}

// ── Message types ──────────────────────────────────────────────────

/// Role of a message in the conversation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
        }
    }
}

/// A message in the conversation.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

// ── Response types ─────────────────────────────────────────────────

/// Raw API response (internal deserialization target).
#[derive(Deserialize, Debug)]
struct RawChatResponse {
    choices: Option<Vec<RawChoice>>,
    error: Option<ApiErrorResponse>,
    #[serde(default)]
    usage: Option<UsageInfo>,
}

#[derive(Deserialize, Debug)]
struct RawChoice {
    message: RawResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RawResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorResponse {
    message: String,
    #[serde(default)]
    code: Option<u16>,
}

/// Clean return type from [`OpenRouterClient::chat()`].
#[derive(Debug, Clone)]
pub struct ChatCompletion {
    pub content: Option<String>,
    pub usage: Option<UsageInfo>,
    pub finish_reason: Option<String>,
}

/// Token usage statistics.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageInfo {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

// ── Client ─────────────────────────────────────────────────────────

/// Async HTTP client for the OpenRouter chat completions API.
pub struct OpenRouterClient {
    pub(crate) client: reqwest::Client,
    pub(crate) api_key: String,
    pub(crate) url: String,
    pub(crate) referer: String,
    pub(crate) title: String,
}

impl OpenRouterClient {
    /// Create a new client with the given API key, default headers, and the
    /// default request timeout.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_key, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client whose requests give up after `timeout`.
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("transnote/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| NotesError::transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            url: OPENROUTER_URL.to_string(),
            referer: "https://github.com/transnote/transnote".to_string(),
            title: "transnote".to_string(),
        })
    }

    /// Read the credential from [`API_KEY_VAR`] and build a client.
    pub fn from_env(timeout: Duration) -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok(), timeout)
    }

    /// Build a client from whatever `lookup` returns for [`API_KEY_VAR`].
    /// An absent or blank value is [`NotesError::MissingCredential`].
    pub fn from_lookup(
        lookup: impl FnOnce(&str) -> Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or(NotesError::MissingCredential(API_KEY_VAR))?;
        Self::with_timeout(api_key, timeout)
    }

    /// Send a chat completion request.
    ///
    /// Non-2xx statuses and error bodies become [`NotesError::Invocation`]
    /// carrying the status and the service's message.
    pub async fn chat(&self, body: &ChatRequest) -> Result<ChatCompletion> {
        debug!(
            "LLM request: model={}, messages={}, max_tokens={}, temp={}",
            body.model,
            body.messages.len(),
            body.max_tokens,
            body.temperature,
        );
        trace!(
            "Request payload size: {} bytes",
            serde_json::to_string(body).map_or(0, |s| s.len())
        );

        let start = Instant::now();

        let resp = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(body)
            .send()
            .await
            .map_err(|e| NotesError::transport(format!("request failed: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| NotesError::transport(format!("failed to read response: {e}")))?;

        debug!(
            "LLM response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        if !status.is_success() {
            return Err(NotesError::Invocation {
                status: Some(status.as_u16()),
                message: api_error_message(&text),
            });
        }

        let parsed: RawChatResponse = serde_json::from_str(&text).map_err(|e| {
            NotesError::Invocation {
                status: Some(status.as_u16()),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        if let Some(err) = parsed.error {
            return Err(NotesError::Invocation {
                status: err.code,
                message: err.message,
            });
        }

        if let Some(ref usage) = parsed.usage {
            debug!(
                "Token usage: prompt={}, completion={}, total={}",
                usage.prompt_tokens.unwrap_or(0),
                usage.completion_tokens.unwrap_or(0),
                usage.total_tokens.unwrap_or(0),
            );
        }

        let choice = parsed.choices.and_then(|c| c.into_iter().next());
        Ok(match choice {
            Some(c) => ChatCompletion {
                content: c.message.content,
                usage: parsed.usage,
                finish_reason: c.finish_reason,
            },
            None => ChatCompletion {
                content: None,
                usage: parsed.usage,
                finish_reason: None,
            },
        })
    }
}

/// Pull the human-readable message out of an error body, falling back to the
/// raw body text.
fn api_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct Envelope {
        error: ApiErrorResponse,
    }
    serde_json::from_str::<Envelope>(body)
        .map(|env| env.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_constructors() {
        let sys = Message::system("hello");
        assert_eq!(sys.role, MessageRole::System);
        assert_eq!(sys.content, "hello");

        let user = Message::user("world");
        assert_eq!(user.role, MessageRole::User);
    }

    #[test]
    fn absent_credential_is_missing() {
        let err = OpenRouterClient::from_lookup(|_| None, DEFAULT_REQUEST_TIMEOUT)
            .err()
            .unwrap();
        assert!(matches!(err, NotesError::MissingCredential("OPENROUTER_KEY")));
        assert_eq!(err.to_string(), "OPENROUTER_KEY environment variable is not set");
    }

    #[test]
    fn blank_credential_is_missing() {
        let result = OpenRouterClient::from_lookup(|_| Some("  ".into()), DEFAULT_REQUEST_TIMEOUT);
        assert!(matches!(result, Err(NotesError::MissingCredential(API_KEY_VAR))));
    }

    #[test]
    fn credential_is_looked_up_by_name() {
        let client = OpenRouterClient::from_lookup(
            |var| (var == "OPENROUTER_KEY").then(|| "sk-test".to_string()),
            DEFAULT_REQUEST_TIMEOUT,
        )
        .unwrap();
        assert_eq!(client.api_key, "sk-test");
        assert_eq!(client.url, OPENROUTER_URL);
    }

    #[test]
    fn chat_request_serializes_zero_temperature() {
        let req = ChatRequest {
            model: "test-model".into(),
            messages: vec![Message::system("sys"), Message::user("hi")],
            max_tokens: 100,
            temperature: 0.0,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["temperature"], 0.0);
        assert_eq!(json["max_tokens"], 100);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
    }

    #[test]
    fn error_body_message_is_extracted() {
        let body = r#"{"error":{"message":"Rate limit exceeded","code":429}}"#;
        assert_eq!(api_error_message(body), "Rate limit exceeded");
    }

    #[test]
    fn unparseable_error_body_is_passed_through() {
        assert_eq!(api_error_message("  upstream down \n"), "upstream down");
    }

    #[test]
    fn response_with_usage_parses() {
        let body = r#"{
            "choices": [{"message": {"content": "- note"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
        }"#;
        let parsed: RawChatResponse = serde_json::from_str(body).unwrap();
        let choice = parsed.choices.unwrap().into_iter().next().unwrap();
        assert_eq!(choice.message.content.as_deref(), Some("- note"));
        assert_eq!(parsed.usage.unwrap().total_tokens, Some(15));
    }
}
