//! Token-based cost estimation per provider pricing table

use shared::TokenUsage;

/// USD pricing per 1000 tokens
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pricing {
    /// Separate prompt and completion rates
    Split { prompt_per_1k: f64, completion_per_1k: f64 },
    /// One rate for all tokens
    Blended { per_1k: f64 },
}

/// GPT-4 list pricing
pub const PRIMARY_PRICING: Pricing = Pricing::Split {
    prompt_per_1k: 0.03,
    completion_per_1k: 0.06,
};

/// GPT-3.5 Turbo list pricing
pub const FALLBACK_PRICING: Pricing = Pricing::Blended { per_1k: 0.002 };

impl Pricing {
    pub fn cost(&self, usage: &TokenUsage) -> f64 {
        match *self {
            Pricing::Split {
                prompt_per_1k,
                completion_per_1k,
            } => {
                (usage.prompt_tokens as f64 / 1000.0) * prompt_per_1k
                    + (usage.completion_tokens as f64 / 1000.0) * completion_per_1k
            }
            Pricing::Blended { per_1k } => (usage.total() as f64 / 1000.0) * per_1k,
        }
    }
}
