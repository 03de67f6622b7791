//! Token accounting: the tokenizer, per-call budgets, and windowing.
//!
//! Every model call in a run must fit a fixed context window. These modules
//! provide the pieces the pipeline combines to guarantee that:
//!
//! 1. **[`tokenizer`]** — [`Tokenizer`] encodes and decodes text with one
//!    fixed BPE vocabulary, so all counts in a run agree.
//!
//! 2. **[`budget`]** — [`compute_budget`] and [`StageBudget`] subtract the
//!    reserved response and the fixed wrapper overhead from the context size
//!    and refuse to hand out a budget below one token.
//!
//! 3. **[`window`]** — [`windows`] slices a long token sequence into lazy,
//!    overlapping windows sized by the budget.

pub mod budget;
pub mod tokenizer;
pub mod window;

// Re-export commonly used items at the module level.
pub use budget::{CHAT_FRAMING_TOKENS, DEFAULT_CONTEXT_SIZE, StageBudget, compute_budget};
pub use tokenizer::{MAX_EDGE_TOKENS, Token, Tokenizer};
pub use window::{DEFAULT_OVERLAP, Window, Windows, windows};
