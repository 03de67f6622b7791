//! API interaction layer: the model seam, retry, and usage accounting.
//!
//! - [`model`] — the [`ChatModel`] trait every stage invokes, implemented for
//!   [`OpenRouterClient`](crate::OpenRouterClient).
//! - [`retry`] — opt-in exponential backoff for 429/5xx/transport failures.
//!   Off by default: a run fails fast on the first service error.
//! - [`usage`] — per-model pricing and the cumulative [`UsageTracker`].

pub mod model;
pub mod retry;
pub mod usage;

// Re-export commonly used items at the module level.
pub use model::{ChatModel, Completion, CompletionFuture, CompletionRequest};
pub use retry::RetryConfig;
pub use usage::{ModelPricing, UsageTracker, pricing_for_model};
