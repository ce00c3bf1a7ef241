//! Catalog Application Service (Use Case)
//!
//! Model search and account credits at the completion provider.

use std::sync::Arc;

use banter::{CompletionProvider, Credits, DomainError, ModelInfo, ModelSearch};

pub struct CatalogService<L: CompletionProvider> {
    llm: Arc<L>,
}

impl<L: CompletionProvider> CatalogService<L> {
    pub fn new(llm: Arc<L>) -> Self {
        Self { llm }
    }

    pub async fn credits(&self) -> Result<Credits, DomainError> {
        self.llm.credits().await
    }

    pub async fn search_models(&self, search: &ModelSearch) -> Result<Vec<ModelInfo>, DomainError> {
        let models = self.llm.list_models().await?;
        let total = models.len();
        let found = search.apply(models);
        tracing::debug!(
            provider = self.llm.provider_name(),
            total,
            matched = found.len(),
            "Model search"
        );
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::FakeCompletion;
    use banter::ModelPricing;

    fn model(name: &str, completion: f64) -> ModelInfo {
        ModelInfo {
            id: name.to_string(),
            name: name.to_string(),
            description: None,
            pricing: ModelPricing {
                prompt: 0.0,
                completion,
            },
            context_length: Some(32_000),
            architecture: None,
        }
    }

    #[tokio::test]
    async fn test_search_applies_filters() {
        let svc = CatalogService::new(Arc::new(FakeCompletion {
            models: vec![model("Free Tier", 0.0), model("Premium", 0.00003)],
            ..Default::default()
        }));

        let free = svc
            .search_models(&ModelSearch {
                max_price: Some(0.0),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(free.len(), 1);
        assert_eq!(free[0].name, "Free Tier");
    }

    #[tokio::test]
    async fn test_provider_errors_propagate() {
        let svc = CatalogService::new(Arc::new(FakeCompletion::default()));
        assert!(matches!(svc.credits().await, Err(DomainError::ExternalService(_))));
        assert!(matches!(
            svc.search_models(&ModelSearch::default()).await,
            Err(DomainError::ExternalService(_))
        ));
    }

    #[tokio::test]
    async fn test_credits_passed_through() {
        let svc = CatalogService::new(Arc::new(FakeCompletion {
            credits: Some(Credits {
                total_credits: 20.0,
                total_usage: 4.25,
            }),
            ..Default::default()
        }));
        assert_eq!(svc.credits().await.unwrap().remaining(), 15.75);
    }
}
