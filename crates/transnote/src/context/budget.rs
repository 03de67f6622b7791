//! Token budgets: how many content tokens fit in one model call.
//!
//! Every call shares a fixed context window between three consumers: the
//! fixed wrapper text (system persona, stage instruction, delimiters, chat
//! framing), the payload, and the tokens reserved for the response. The
//! windowed section stage reserves a configured response cap and asks how
//! much payload fits; the single-call stages know their payload and ask how
//! much room is left for the response. Both are the same subtraction.

use crate::error::{NotesError, Result};

/// Context window of the default model, in tokens.
pub const DEFAULT_CONTEXT_SIZE: usize = 4000;

/// Tokens the chat format adds around a request with one system and one user
/// message: role and separator markers for each message plus reply priming.
pub const CHAT_FRAMING_TOKENS: usize = 11;

/// Content tokens left in a call after reserving response and overhead tokens.
///
/// Returns [`NotesError::BudgetExhausted`] when nothing is left; a budget is
/// always at least one token.
pub fn compute_budget(
    stage: &'static str,
    context_size: usize,
    reserved_response_tokens: usize,
    fixed_overhead_tokens: usize,
) -> Result<usize> {
    context_size
        .checked_sub(reserved_response_tokens)
        .and_then(|rest| rest.checked_sub(fixed_overhead_tokens))
        .filter(|&budget| budget >= 1)
        .ok_or(NotesError::BudgetExhausted {
            stage,
            context_size,
            reserved: reserved_response_tokens,
            overhead: fixed_overhead_tokens,
        })
}

/// Budget bookkeeping for one pipeline stage.
///
/// Built once per stage from the wrapper text token counts, then queried for
/// either the payload budget (given a response reserve) or the response
/// budget (given a payload).
///
/// ```
/// use transnote::context::StageBudget;
///
/// let budget = StageBudget::new("section", 4000).with_overhead(120);
/// assert_eq!(budget.payload_budget(1000).unwrap(), 4000 - 1000 - 120);
/// ```
#[derive(Debug, Clone)]
pub struct StageBudget {
    stage: &'static str,
    context_size: usize,
    overhead: usize,
}

impl StageBudget {
    pub fn new(stage: &'static str, context_size: usize) -> Self {
        Self {
            stage,
            context_size,
            overhead: 0,
        }
    }

    /// Set the fixed overhead tokens (wrapper text plus chat framing).
    pub fn with_overhead(mut self, tokens: usize) -> Self {
        self.overhead = tokens;
        self
    }

    pub fn stage(&self) -> &'static str {
        self.stage
    }

    pub fn context_size(&self) -> usize {
        self.context_size
    }

    pub fn overhead(&self) -> usize {
        self.overhead
    }

    /// Payload tokens per call when `response_tokens` are reserved.
    pub fn payload_budget(&self, response_tokens: usize) -> Result<usize> {
        compute_budget(self.stage, self.context_size, response_tokens, self.overhead)
    }

    /// Response tokens left when the whole `payload_tokens` goes in one call.
    pub fn response_budget(&self, payload_tokens: usize) -> Result<usize> {
        compute_budget(self.stage, self.context_size, payload_tokens, self.overhead)
    }

    /// Check that a fully rendered request fits: `prompt_tokens` is the
    /// encoded length of everything sent (persona, wrapper, payload).
    pub fn ensure_fits(&self, prompt_tokens: usize, response_tokens: usize) -> Result<()> {
        match prompt_tokens
            .checked_add(response_tokens)
            .and_then(|used| used.checked_add(CHAT_FRAMING_TOKENS))
        {
            Some(total) if total <= self.context_size => Ok(()),
            _ => Err(NotesError::BudgetExhausted {
                stage: self.stage,
                context_size: self.context_size,
                reserved: response_tokens,
                overhead: prompt_tokens + CHAT_FRAMING_TOKENS,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_is_plain_subtraction() {
        assert_eq!(compute_budget("section", 4000, 1000, 200).unwrap(), 2800);
    }

    #[test]
    fn budget_of_one_is_allowed() {
        assert_eq!(compute_budget("section", 100, 60, 39).unwrap(), 1);
    }

    #[test]
    fn zero_budget_is_exhausted() {
        let err = compute_budget("section", 100, 60, 40).unwrap_err();
        assert!(matches!(err, NotesError::BudgetExhausted { stage: "section", .. }));
    }

    #[test]
    fn overflowing_reserve_is_exhausted() {
        assert!(compute_budget("summary", 4000, 5000, 10).is_err());
        assert!(compute_budget("summary", 4000, 10, 5000).is_err());
    }

    #[test]
    fn positive_whenever_context_exceeds_reserve_plus_overhead() {
        for context in [10usize, 500, 4000, 8192] {
            for reserved in [0usize, 1, 7, 1000] {
                for overhead in [0usize, 3, 250] {
                    let result = compute_budget("section", context, reserved, overhead);
                    if context > reserved + overhead {
                        assert!(result.unwrap() >= 1);
                    } else {
                        assert!(result.is_err());
                    }
                }
            }
        }
    }

    #[test]
    fn stage_budget_payload_and_response_are_symmetric() {
        let budget = StageBudget::new("topic-sort", 4000).with_overhead(150);
        assert_eq!(budget.payload_budget(1000).unwrap(), 2850);
        assert_eq!(budget.response_budget(2850).unwrap(), 1000);
    }

    #[test]
    fn stage_budget_reports_its_stage() {
        let err = StageBudget::new("summary", 100)
            .with_overhead(90)
            .response_budget(20)
            .unwrap_err();
        match err {
            NotesError::BudgetExhausted { stage, reserved, overhead, .. } => {
                assert_eq!(stage, "summary");
                assert_eq!(reserved, 20);
                assert_eq!(overhead, 90);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ensure_fits_counts_chat_framing() {
        let budget = StageBudget::new("section", 1000);
        assert!(budget.ensure_fits(1000 - 100 - CHAT_FRAMING_TOKENS, 100).is_ok());
        assert!(budget.ensure_fits(1000 - 100 - CHAT_FRAMING_TOKENS + 1, 100).is_err());
    }
}
