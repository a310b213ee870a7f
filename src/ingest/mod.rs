//! Batch ingestion: embed raw records, validate them, load the eligible ones
//!
//! ```text
//! raw JSON ──► embed_records ──► Validator::check ──► FaqStore::put_batch
//!                 (per-record        (per-record          (one atomic
//!                  failures)          skip reasons)        batch)
//! ```

mod file;
mod pipeline;
mod validate;

use std::fmt;

pub use file::read_records;
pub use file::write_records;
pub use pipeline::embed_records;
pub use pipeline::EmbedStats;
pub use pipeline::IngestPipeline;
use serde::Serialize;
pub use validate::Validator;

/// Why a record was left out of the batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// Question or answer empty or still a scraper placeholder
    MissingEssentialData,
    /// Embedding absent (never computed, or the embed call failed)
    MissingEmbedding,
    InvalidDimension { expected: usize, actual: usize },
    /// A link that is not absolute even after resolving against the base url
    InvalidUrl { url: String },
    /// Content hash already stored or seen earlier in the batch (dedup only)
    Duplicate,
}

impl SkipReason {
    /// Stable, human readable label
    pub const fn label(&self) -> &'static str {
        match self {
            Self::MissingEssentialData => "missing essential data",
            Self::MissingEmbedding => "missing embedding",
            Self::InvalidDimension { .. } => "invalid dimension",
            Self::InvalidUrl { .. } => "invalid url",
            Self::Duplicate => "duplicate",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimension { expected, actual } => {
                write!(f, "{} (expected {expected}, got {actual})", self.label())
            }
            Self::InvalidUrl { url } => write!(f, "{} ({url})", self.label()),
            _ => f.write_str(self.label()),
        }
    }
}

/// Skip counts broken down by reason
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkipCounts {
    pub missing_essential_data: usize,
    pub missing_embedding: usize,
    pub invalid_dimension: usize,
    pub invalid_url: usize,
    pub duplicate: usize,
}

impl SkipCounts {
    pub fn record(&mut self, reason: &SkipReason) {
        match reason {
            SkipReason::MissingEssentialData => self.missing_essential_data += 1,
            SkipReason::MissingEmbedding => self.missing_embedding += 1,
            SkipReason::InvalidDimension { .. } => self.invalid_dimension += 1,
            SkipReason::InvalidUrl { .. } => self.invalid_url += 1,
            SkipReason::Duplicate => self.duplicate += 1,
        }
    }

    pub const fn total(&self) -> usize {
        self.missing_essential_data
            + self.missing_embedding
            + self.invalid_dimension
            + self.invalid_url
            + self.duplicate
    }

    /// Non-zero counts as `(label, count)` pairs
    pub fn breakdown(&self) -> Vec<(&'static str, usize)> {
        [
            ("missing essential data", self.missing_essential_data),
            ("missing embedding", self.missing_embedding),
            ("invalid dimension", self.invalid_dimension),
            ("invalid url", self.invalid_url),
            ("duplicate", self.duplicate),
        ]
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .collect()
    }
}

/// A record that did not make it into the batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    /// Position in the input
    pub index: usize,
    pub question: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Outcome of one ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Records read from the input
    pub total: usize,
    pub inserted: u64,
    pub embedding: EmbedStats,
    pub skipped: SkipCounts,
    pub skipped_records: Vec<SkippedRecord>,
}

impl IngestReport {
    pub const fn skipped_total(&self) -> usize {
        self.skipped.total()
    }
}
