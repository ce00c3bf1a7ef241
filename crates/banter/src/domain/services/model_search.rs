//! Model catalog filtering

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ModelInfo;

/// Filters applied to the provider's model list; `None` matches everything
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSearch {
    /// Case-insensitive substring of the model name
    pub name: Option<String>,
    /// Upper bound on the completion price per token
    pub max_price: Option<f64>,
    pub min_context_length: Option<u64>,
}

impl ModelSearch {
    pub fn matches(&self, model: &ModelInfo) -> bool {
        let name_match = match self.name.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => model
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        };

        let price_match = self
            .max_price
            .map_or(true, |max| model.pricing.completion <= max);

        let context_match = self.min_context_length.map_or(true, |min| {
            model.context_length.is_some_and(|len| len >= min)
        });

        name_match && price_match && context_match
    }

    pub fn apply(&self, models: Vec<ModelInfo>) -> Vec<ModelInfo> {
        models.into_iter().filter(|m| self.matches(m)).collect()
    }
}
