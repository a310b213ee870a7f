//! In-process all-MiniLM-L6-v2 embeddings through fastembed (ONNX runtime).
//!
//! Only compiled with the `local-embeddings` feature. The model files are
//! fetched into the fastembed cache on first load.

use std::sync::Arc;
use std::sync::Mutex;

use fastembed::EmbeddingModel;
use fastembed::InitOptions;
use fastembed::TextEmbedding;
use tracing::info;

use crate::errors::FaqRagError;
use crate::errors::Result;

pub struct LocalEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
}

impl LocalEmbedder {
    /// Load the model; fails when it is neither cached nor downloadable
    pub fn load() -> Result<Self> {
        info!("Loading local embedding model all-MiniLM-L6-v2");
        let model = TextEmbedding::try_new(
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false),
        )
        .map_err(|e| FaqRagError::EmbeddingError(format!("Failed to load local model: {e}")))?;

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }

    /// Inference is CPU bound, so it runs on the blocking pool
    pub async fn generate(&self, text: &str) -> Result<Vec<f32>> {
        let model = Arc::clone(&self.model);
        let text = text.to_string();

        let embeddings = tokio::task::spawn_blocking(move || {
            let model = model
                .lock()
                .map_err(|_| FaqRagError::EmbeddingError("local model lock poisoned".to_string()))?;
            model
                .embed(vec![text], None)
                .map_err(|e| FaqRagError::EmbeddingError(format!("Local inference failed: {e}")))
        })
        .await
        .map_err(|e| FaqRagError::EmbeddingError(format!("Embedding task failed: {e}")))??;

        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| FaqRagError::EmbeddingError("No embedding returned".to_string()))
    }
}
