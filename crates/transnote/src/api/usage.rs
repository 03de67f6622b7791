//! Token usage and cost accounting across a run.
//!
//! Every completion reports the prompt and completion tokens the service
//! billed. [`UsageTracker`] sums them per run and prices them with a rough
//! per-model table so the run can log what it spent.

use crate::UsageInfo;

/// Per-model pricing for cost estimation (USD per 1M tokens).
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPricing {
    /// Price per 1M input tokens.
    pub input_per_million: f64,
    /// Price per 1M output tokens.
    pub output_per_million: f64,
}

impl ModelPricing {
    /// Estimate cost for given token counts.
    pub fn estimate_cost(&self, prompt_tokens: u32, completion_tokens: u32) -> f64 {
        (prompt_tokens as f64 / 1_000_000.0) * self.input_per_million
            + (completion_tokens as f64 / 1_000_000.0) * self.output_per_million
    }
}

impl Default for ModelPricing {
    fn default() -> Self {
        Self {
            input_per_million: 0.50,
            output_per_million: 1.50,
        }
    }
}

/// Lookup approximate pricing for a model by name.
///
/// Matches on the segment after the last `/`, so `openai/gpt-4o-mini` and
/// `gpt-4o-mini` price the same.
pub fn pricing_for_model(model: &str) -> ModelPricing {
    let name = model.rsplit('/').next().unwrap_or(model).to_lowercase();

    // Approximate list prices. Good enough to spot an expensive run.
    if name.contains("gpt-3.5") {
        ModelPricing {
            input_per_million: 0.50,
            output_per_million: 1.50,
        }
    } else if name.contains("4o-mini") {
        ModelPricing {
            input_per_million: 0.15,
            output_per_million: 0.60,
        }
    } else if name.contains("gpt-4o") {
        ModelPricing {
            input_per_million: 2.50,
            output_per_million: 10.0,
        }
    } else if name.contains("gpt-4") {
        ModelPricing {
            input_per_million: 30.0,
            output_per_million: 60.0,
        }
    } else if name.contains("haiku") {
        ModelPricing {
            input_per_million: 0.25,
            output_per_million: 1.25,
        }
    } else if name.contains("sonnet") {
        ModelPricing {
            input_per_million: 3.0,
            output_per_million: 15.0,
        }
    } else {
        ModelPricing::default()
    }
}

/// Cumulative usage for one run.
#[derive(Debug, Default, Clone)]
pub struct UsageTracker {
    pub calls: u32,
    pub total_prompt_tokens: u64,
    pub total_completion_tokens: u64,
    pub estimated_cost_usd: f64,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one call. Missing usage still counts the call.
    pub fn record(&mut self, usage: Option<&UsageInfo>, pricing: &ModelPricing) {
        self.calls += 1;
        let Some(usage) = usage else {
            return;
        };
        let prompt = usage.prompt_tokens.unwrap_or(0);
        let completion = usage.completion_tokens.unwrap_or(0);
        self.total_prompt_tokens += u64::from(prompt);
        self.total_completion_tokens += u64::from(completion);
        self.estimated_cost_usd += pricing.estimate_cost(prompt, completion);
    }

    /// Total tokens consumed.
    pub fn total_tokens(&self) -> u64 {
        self.total_prompt_tokens + self.total_completion_tokens
    }

    /// Format as a short summary string.
    pub fn summary(&self) -> String {
        format!(
            "{} call(s), tokens: {} prompt + {} completion = {} total, est. cost: ${:.4}",
            self.calls,
            self.total_prompt_tokens,
            self.total_completion_tokens,
            self.total_tokens(),
            self.estimated_cost_usd,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(prompt: u32, completion: u32) -> UsageInfo {
        UsageInfo {
            prompt_tokens: Some(prompt),
            completion_tokens: Some(completion),
            total_tokens: Some(prompt + completion),
        }
    }

    #[test]
    fn cost_estimation() {
        let pricing = ModelPricing {
            input_per_million: 3.0,
            output_per_million: 15.0,
        };
        let cost = pricing.estimate_cost(1_000_000, 100_000);
        assert!((cost - 4.5).abs() < 0.01);
    }

    #[test]
    fn tracker_accumulates() {
        let mut tracker = UsageTracker::new();
        let pricing = ModelPricing::default();
        tracker.record(Some(&usage(1000, 500)), &pricing);
        tracker.record(Some(&usage(2000, 1000)), &pricing);
        assert_eq!(tracker.calls, 2);
        assert_eq!(tracker.total_prompt_tokens, 3000);
        assert_eq!(tracker.total_completion_tokens, 1500);
        assert_eq!(tracker.total_tokens(), 4500);
        assert!(tracker.estimated_cost_usd > 0.0);
    }

    #[test]
    fn missing_usage_counts_the_call_only() {
        let mut tracker = UsageTracker::new();
        tracker.record(None, &ModelPricing::default());
        assert_eq!(tracker.calls, 1);
        assert_eq!(tracker.total_tokens(), 0);
    }

    #[test]
    fn pricing_lookup_known_models() {
        let mini = pricing_for_model("openai/gpt-4o-mini");
        let full = pricing_for_model("openai/gpt-4o");
        assert!(mini.input_per_million < full.input_per_million);
        assert_eq!(pricing_for_model("gpt-3.5-turbo"), pricing_for_model("openai/gpt-3.5-turbo"));
        assert!(pricing_for_model("some-unknown-model").input_per_million > 0.0);
    }

    #[test]
    fn summary_format() {
        let mut tracker = UsageTracker::new();
        tracker.record(Some(&usage(1000, 500)), &ModelPricing::default());
        let summary = tracker.summary();
        assert!(summary.starts_with("1 call(s)"));
        assert!(summary.contains("tokens:"));
        assert!(summary.contains("cost:"));
    }
}
