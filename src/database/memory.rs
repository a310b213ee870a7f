//! In-process record store.
//!
//! Same contract as the PostgreSQL store with cosine distance computed
//! locally. Backs `ingest --dry-run` and the test suite.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::MutexGuard;

use async_trait::async_trait;

use super::FaqStore;
use crate::models::EligibleFaq;
use crate::models::FaqMatch;
use crate::FaqRagError;
use crate::Result;

#[derive(Debug, Default)]
pub struct MemoryStore {
    dimension: Option<usize>,
    rows: Mutex<Vec<EligibleFaq>>,
}

impl MemoryStore {
    /// Store that accepts embeddings of any dimension
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects vectors whose length differs from `dimension`
    #[must_use]
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension: Some(dimension),
            rows: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the stored rows in insertion order
    pub fn rows(&self) -> Result<Vec<EligibleFaq>> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<EligibleFaq>>> {
        self.rows
            .lock()
            .map_err(|_| FaqRagError::StorageError("memory store lock poisoned".to_string()))
    }

    fn check_dimension(&self, len: usize, what: &str) -> Result<()> {
        match self.dimension {
            Some(expected) if expected != len => Err(FaqRagError::StorageError(format!(
                "{what} has dimension {len}, store expects {expected}"
            ))),
            _ => Ok(()),
        }
    }
}

/// Cosine distance in `[0, 2]`, matching pgvector's `<=>`.
///
/// Zero vectors have no direction; they sort after every real match.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return f64::INFINITY;
    }
    1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[async_trait]
impl FaqStore for MemoryStore {
    async fn put_batch(&self, records: &[EligibleFaq]) -> Result<u64> {
        // Validate the whole batch before touching the rows
        for faq in records {
            self.check_dimension(faq.embedding().len(), "record embedding")?;
        }
        let mut rows = self.lock()?;
        rows.extend_from_slice(records);
        Ok(records.len() as u64)
    }

    async fn find_nearest(&self, query: &[f32]) -> Result<Option<FaqMatch>> {
        self.check_dimension(query.len(), "query vector")?;
        let rows = self.lock()?;

        let best = rows
            .iter()
            .map(|faq| (cosine_distance(faq.embedding(), query), faq))
            .min_by(|(a, _), (b, _)| a.total_cmp(b));

        Ok(best.map(|(distance, faq)| FaqMatch {
            record: faq.clone().into_record(),
            distance,
        }))
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.lock()?.len() as i64)
    }

    async fn existing_hashes(&self, hashes: &[String]) -> Result<HashSet<String>> {
        let rows = self.lock()?;
        let wanted: HashSet<&str> = hashes.iter().map(String::as_str).collect();
        Ok(rows
            .iter()
            .filter(|faq| wanted.contains(faq.content_hash()))
            .map(|faq| faq.content_hash().to_string())
            .collect())
    }
}
