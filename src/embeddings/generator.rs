//! Embedding service: the process-wide model handle

use async_trait::async_trait;
use tracing::debug;
use tracing::info;

use super::client::EmbeddingClient;
use super::Embedder;
use super::EmbeddingConfig;
use crate::config::ProviderKind;
use crate::errors::FaqRagError;
use crate::errors::Result;

/// Sent once at startup to prove the model answers with the right dimension
const PROBE_TEXT: &str = "health check";

/// Embedding model handle with an explicit init / shutdown lifecycle.
///
/// Construct once per process with [`EmbeddingService::init`] and pass it by
/// reference or `Arc` to the ingestion pipeline and the query service.
pub struct EmbeddingService {
    client: EmbeddingClient,
    config: EmbeddingConfig,
}

impl EmbeddingService {
    /// Build the client and verify the model is reachable.
    ///
    /// Failure here is fatal: callers should abort rather than retry.
    pub async fn init(config: &crate::config::AppConfig) -> Result<Self> {
        let service = Self::from_config(EmbeddingConfig::from_app_config(config))?;
        service.probe().await?;
        info!(
            "Embedding model ready: {:?}/{} ({} dimensions)",
            service.provider(),
            service.model(),
            service.dimension()
        );
        Ok(service)
    }

    /// Create from custom config without probing the model
    pub fn from_config(config: EmbeddingConfig) -> Result<Self> {
        let client = EmbeddingClient::new(
            config.provider,
            config.model.clone(),
            config.endpoint.clone(),
            config.api_key.clone(),
            config.timeout,
        )?;

        Ok(Self { client, config })
    }

    /// Embed a fixed text and check the returned dimension
    pub async fn probe(&self) -> Result<()> {
        self.generate(PROBE_TEXT).await.map(|_| ()).map_err(|e| {
            FaqRagError::EmbeddingError(format!(
                "model '{}' at {} is unavailable: {e}",
                self.config.model, self.config.endpoint
            ))
        })
    }

    /// Generate embedding for a single text
    pub async fn generate(&self, text: &str) -> Result<Vec<f32>> {
        let processed = crate::embeddings::preprocess_text_for_embedding(text)?;
        let embedding = self.client.generate(&processed).await?;

        if embedding.len() != self.config.dimension {
            return Err(FaqRagError::EmbeddingError(format!(
                "model '{}' returned {} dimensions, expected {}",
                self.config.model,
                embedding.len(),
                self.config.dimension
            )));
        }
        if embedding.iter().any(|v| !v.is_finite()) {
            return Err(FaqRagError::EmbeddingError(
                "model returned a non-finite value".to_string(),
            ));
        }

        debug!("Embedded {} chars", processed.len());
        Ok(embedding)
    }

    /// Release the model handle
    pub fn shutdown(self) {
        info!("Embedding service for model '{}' shut down", self.config.model);
    }

    /// Get the embedding dimension
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.config.dimension
    }

    /// Get the model name
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Get the provider
    #[must_use]
    pub const fn provider(&self) -> ProviderKind {
        self.config.provider
    }
}

#[async_trait]
impl Embedder for EmbeddingService {
    fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.generate(text).await
    }
}
