//! The model invocation seam.
//!
//! [`ChatModel`] is one round-trip to a chat-completion service: a fixed
//! system persona plus one wrapped user prompt in, one text payload out.
//! The pipeline only talks to this trait, so tests can substitute a scripted
//! model and other OpenAI-compatible services can slot in.

use std::future::Future;
use std::pin::Pin;

use crate::error::{NotesError, Result};
use crate::{ChatCompletion, ChatRequest, Message, OpenRouterClient, UsageInfo};

/// Boxed future returned by [`ChatModel::invoke`].
pub type CompletionFuture<'a> = Pin<Box<dyn Future<Output = Result<Completion>> + Send + 'a>>;

/// Everything one invocation sends.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    /// System-role persona text.
    pub system: String,
    /// The fully wrapped user-role prompt.
    pub prompt: String,
    /// Response token cap for this call.
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Text returned by one invocation, with the usage the service reported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    pub text: String,
    pub usage: Option<UsageInfo>,
    /// The service stopped at the response token cap.
    pub truncated: bool,
}

impl Completion {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Finish reason the service reports when it stops at `max_tokens`.
const FINISH_LENGTH: &str = "length";

impl TryFrom<ChatCompletion> for Completion {
    type Error = NotesError;

    fn try_from(chat: ChatCompletion) -> Result<Self> {
        let text = chat.content.ok_or(NotesError::EmptyResponse)?;
        Ok(Completion {
            text,
            usage: chat.usage,
            truncated: chat.finish_reason.as_deref() == Some(FINISH_LENGTH),
        })
    }
}

/// A chat-completion backend.
///
/// Implementations perform exactly one round-trip per call and report any
/// service failure as [`NotesError::Invocation`]; retrying is the caller's
/// decision.
///
/// # Example
///
/// ```ignore
/// struct Echo;
///
/// impl ChatModel for Echo {
///     fn invoke(&self, request: CompletionRequest) -> CompletionFuture<'_> {
///         Box::pin(async move { Ok(Completion::text(request.prompt)) })
///     }
/// }
/// ```
pub trait ChatModel: Send + Sync {
    fn invoke(&self, request: CompletionRequest) -> CompletionFuture<'_>;
}

impl ChatModel for OpenRouterClient {
    fn invoke(&self, request: CompletionRequest) -> CompletionFuture<'_> {
        Box::pin(async move {
            let body = ChatRequest {
                model: request.model,
                messages: vec![Message::system(request.system), Message::user(request.prompt)],
                max_tokens: request.max_tokens,
                temperature: request.temperature,
            };
            Completion::try_from(self.chat(&body).await?)
        })
    }
}
