
use std::collections::HashSet;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use sha2::Digest;
use sha2::Sha256;

use crate::database::FaqStore;
use crate::database::MemoryStore;
use crate::embeddings::Embedder;
use crate::models::EligibleFaq;
use crate::models::FaqMatch;
use crate::models::FaqRecord;
use crate::FaqRagError;
use crate::Result;

/// Deterministic embedder: the vector is a pure function of the text
pub struct HashEmbedder {
    dimension: usize,
    calls: AtomicUsize,
    /// Questions that make `embed` fail
    fail_on: HashSet<String>,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            calls: AtomicUsize::new(0),
            fail_on: HashSet::new(),
        }
    }

    pub fn failing_on(mut self, question: &str) -> Self {
        self.fail_on.insert(question.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn vector_for(text: &str, dimension: usize) -> Vec<f32> {
        let mut out = Vec::with_capacity(dimension);
        let mut block = 0u32;
        while out.len() < dimension {
            let digest = Sha256::new()
                .chain_update(text.trim().as_bytes())
                .chain_update(block.to_le_bytes())
                .finalize();
            out.extend(
                digest
                    .iter()
                    .map(|b| f32::from(*b) / 255.0 - 0.5)
                    .take(dimension - out.len()),
            );
            block += 1;
        }
        out
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text.trim().is_empty() {
            return Err(FaqRagError::EmbeddingError(
                "Empty text provided".to_string(),
            ));
        }
        if self.fail_on.contains(text.trim()) {
            return Err(FaqRagError::EmbeddingError(format!(
                "model refused {text:?}"
            )));
        }
        Ok(Self::vector_for(text, self.dimension))
    }
}

/// Wraps a `MemoryStore`, counting calls and optionally failing them
pub struct RecordingStore {
    inner: MemoryStore,
    calls: AtomicUsize,
    fail: bool,
}

impl RecordingStore {
    pub fn new(dimension: usize) -> Self {
        Self {
            inner: MemoryStore::with_dimension(dimension),
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    pub fn failing(dimension: usize) -> Self {
        Self {
            fail: true,
            ..Self::new(dimension)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn rows(&self) -> Vec<EligibleFaq> {
        self.inner.rows().unwrap()
    }

    fn enter(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(FaqRagError::StorageError(
                "connection reset by peer".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl FaqStore for RecordingStore {
    async fn put_batch(&self, records: &[EligibleFaq]) -> Result<u64> {
        self.enter()?;
        self.inner.put_batch(records).await
    }

    async fn find_nearest(&self, query: &[f32]) -> Result<Option<FaqMatch>> {
        self.enter()?;
        self.inner.find_nearest(query).await
    }

    async fn count(&self) -> Result<i64> {
        self.enter()?;
        self.inner.count().await
    }

    async fn existing_hashes(&self, hashes: &[String]) -> Result<HashSet<String>> {
        self.enter()?;
        self.inner.existing_hashes(hashes).await
    }
}

/// Raw record with real content and no embedding
pub fn raw_record(question: &str, answer: &str, url: Option<&str>) -> FaqRecord {
    FaqRecord {
        question: question.to_string(),
        answer: answer.to_string(),
        tags: Vec::new(),
        url: url.map(str::to_string),
        suggestions: Vec::new(),
        embedding: None,
    }
}
