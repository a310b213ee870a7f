//! Embedding API clients for various providers

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::config::ProviderKind;
use crate::errors::FaqRagError;
use crate::errors::Result;

/// Client for generating embeddings from various providers
pub struct EmbeddingClient {
    provider: ProviderKind,
    model: String,
    endpoint: String,
    api_key: Option<String>,
    client: Client,
    #[cfg(feature = "local-embeddings")]
    local: Option<super::local::LocalEmbedder>,
}

impl EmbeddingClient {
    /// Create a new embedding client
    ///
    /// # Errors
    /// - HTTP client build errors
    /// - `local` provider without the `local-embeddings` feature, or a model
    ///   that fails to load
    pub fn new(
        provider: ProviderKind,
        model: String,
        endpoint: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| FaqRagError::EmbeddingError(format!("HTTP client: {e}")))?;

        #[cfg(feature = "local-embeddings")]
        let local = if provider == ProviderKind::Local {
            Some(super::local::LocalEmbedder::load()?)
        } else {
            None
        };

        if cfg!(not(feature = "local-embeddings")) && provider == ProviderKind::Local {
            return Err(FaqRagError::ConfigError(
                "embeddings.provider = \"local\" requires building with --features local-embeddings"
                    .to_string(),
            ));
        }

        Ok(Self {
            provider,
            model,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            client,
            #[cfg(feature = "local-embeddings")]
            local,
        })
    }

    /// Generate embedding for a single text
    ///
    /// # Errors
    /// - API request failures (network errors, timeouts, authentication failures)
    /// - Invalid API responses (malformed JSON, missing embedding)
    pub async fn generate(&self, text: &str) -> Result<Vec<f32>> {
        match self.provider {
            ProviderKind::OpenAI => self.generate_openai(text).await,
            ProviderKind::Ollama => self.generate_ollama(text).await,
            ProviderKind::Local => self.generate_local(text).await,
        }
    }

    #[cfg(feature = "local-embeddings")]
    async fn generate_local(&self, text: &str) -> Result<Vec<f32>> {
        let local = self.local.as_ref().ok_or_else(|| {
            FaqRagError::EmbeddingError("Local embedding model not loaded".to_string())
        })?;
        local.generate(text).await
    }

    #[cfg(not(feature = "local-embeddings"))]
    async fn generate_local(&self, _text: &str) -> Result<Vec<f32>> {
        Err(FaqRagError::EmbeddingError(
            "Local embedding model not compiled in".to_string(),
        ))
    }

    /// Generate embedding using `OpenAI` API
    async fn generate_openai(&self, text: &str) -> Result<Vec<f32>> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| FaqRagError::ConfigError("OpenAI API key not provided".to_string()))?;

        #[derive(Serialize)]
        struct OpenAIRequest<'a> {
            input: &'a str,
            model: &'a str,
        }

        #[derive(Deserialize)]
        struct OpenAIResponse {
            data: Vec<EmbeddingData>,
        }

        #[derive(Deserialize)]
        struct EmbeddingData {
            embedding: Vec<f32>,
        }

        let url = format!("{}/embeddings", self.endpoint);
        debug!("Calling OpenAI embeddings API: {}", url);

        let request = OpenAIRequest {
            input: text,
            model: &self.model,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| FaqRagError::EmbeddingError(format!("OpenAI request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FaqRagError::EmbeddingError(format!(
                "OpenAI API error ({status}): {error_text}"
            )));
        }

        let result: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| FaqRagError::EmbeddingError(format!("Failed to parse response: {e}")))?;

        result
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| FaqRagError::EmbeddingError("No embedding in response".to_string()))
    }

    /// Generate embedding using Ollama API
    async fn generate_ollama(&self, text: &str) -> Result<Vec<f32>> {
        #[derive(Serialize)]
        struct OllamaRequest<'a> {
            model: &'a str,
            prompt: &'a str,
        }

        #[derive(Deserialize)]
        struct OllamaResponse {
            embedding: Vec<f32>,
        }

        let url = format!("{}/api/embeddings", self.endpoint);
        debug!("Calling Ollama embeddings API: {}", url);

        let request = OllamaRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| FaqRagError::EmbeddingError(format!("Ollama request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FaqRagError::EmbeddingError(format!(
                "Ollama API error ({status}): {error_text}"
            )));
        }

        let result: OllamaResponse = response
            .json()
            .await
            .map_err(|e| FaqRagError::EmbeddingError(format!("Failed to parse response: {e}")))?;

        Ok(result.embedding)
    }
}
