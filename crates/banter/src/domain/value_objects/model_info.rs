//! Model catalog types exposed by the completion provider

use serde::{Deserialize, Serialize};

/// Per-token pricing in USD
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    pub prompt: f64,
    pub completion: f64,
}

/// A model offered by the completion provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Provider model id, e.g. `openai/gpt-4o-mini`
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub pricing: ModelPricing,
    pub context_length: Option<u64>,
    pub architecture: Option<serde_json::Value>,
}

/// Account balance at the completion provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    pub total_credits: f64,
    pub total_usage: f64,
}

impl Credits {
    pub fn remaining(&self) -> f64 {
        self.total_credits - self.total_usage
    }
}
