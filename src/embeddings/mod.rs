//! Embeddings generation module
//!
//! This module turns text into fixed-dimension vectors through one of:
//! - Ollama (local server, `all-minilm` by default)
//! - OpenAI-compatible `/embeddings` endpoints
//! - fastembed's in-process all-MiniLM-L6-v2 (feature `local-embeddings`)
//!
//! # Examples
//!
//! ```rust,no_run
//! use faqrag::config::AppConfig;
//! use faqrag::embeddings::Embedder;
//! use faqrag::embeddings::EmbeddingService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = EmbeddingService::init(&config).await?;
//!
//!     let embedding = service.embed("How do I apply?").await?;
//!     println!("Generated embedding with {} dimensions", embedding.len());
//!
//!     service.shutdown();
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod generator;
#[cfg(feature = "local-embeddings")]
mod local;
pub mod text_preprocessing;

use std::time::Duration;

use async_trait::async_trait;
pub use client::EmbeddingClient;
pub use generator::EmbeddingService;
pub use text_preprocessing::preprocess_text_for_embedding;

use crate::config::ProviderKind;
use crate::errors::Result;

/// Output dimension of all-MiniLM-L6-v2
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Text to vector function with a fixed output dimension.
///
/// Implementations must be deterministic for a fixed model and reject
/// empty input with `EmbeddingError`.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Length of every vector `embed` returns
    fn dimension(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Configuration for embedding generation
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub provider: ProviderKind,
    pub model: String,
    pub dimension: usize,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl EmbeddingConfig {
    pub fn from_app_config(config: &crate::config::AppConfig) -> Self {
        let embeddings = &config.embeddings;
        Self {
            provider: embeddings.provider,
            model: embeddings.model.clone(),
            dimension: embeddings.dimension,
            endpoint: embeddings.endpoint.clone(),
            api_key: embeddings.api_key.clone().filter(|key| !key.is_empty()),
            timeout: Duration::from_secs(embeddings.timeout_secs),
        }
    }
}
