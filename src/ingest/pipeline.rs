//! Embed, validate and load a batch of FAQ records

use std::sync::Arc;

use futures::stream;
use futures::StreamExt;
use serde::Serialize;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::IngestReport;
use super::SkipReason;
use super::SkippedRecord;
use super::Validator;
use crate::database::FaqStore;
use crate::embeddings::Embedder;
use crate::errors::Result;
use crate::models::EligibleFaq;
use crate::models::FaqRecord;

/// Counters for the embedding step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EmbedStats {
    /// Fresh embeddings computed
    pub embedded: usize,
    /// Records that already carried a vector of the right dimension
    pub reused: usize,
    /// Embed calls that failed; those records have no embedding now
    pub failed: usize,
    /// Placeholder or empty questions, never sent to the model
    pub skipped: usize,
}

enum EmbedOutcome {
    Embedded,
    Reused,
    Failed,
    Skipped,
}

/// Fill in missing embeddings, keeping input order.
///
/// At most `concurrency` embed calls are in flight. A failed call clears the
/// record's embedding and the batch carries on.
pub async fn embed_records(
    embedder: &dyn Embedder,
    records: Vec<FaqRecord>,
    concurrency: usize,
) -> (Vec<FaqRecord>, EmbedStats) {
    let dimension = embedder.dimension();
    let total = records.len();
    info!("Embedding {} records (concurrency {})", total, concurrency);

    let results: Vec<(FaqRecord, EmbedOutcome)> = stream::iter(records)
        .map(|mut record| async move {
            if !record.has_embeddable_question() {
                return (record, EmbedOutcome::Skipped);
            }
            if record
                .embedding
                .as_ref()
                .is_some_and(|e| e.len() == dimension)
            {
                return (record, EmbedOutcome::Reused);
            }

            match embedder.embed(&record.question).await {
                Ok(embedding) => {
                    record.embedding = Some(embedding);
                    (record, EmbedOutcome::Embedded)
                }
                Err(e) => {
                    warn!("Failed to embed question {:?}: {}", record.question, e);
                    record.embedding = None;
                    (record, EmbedOutcome::Failed)
                }
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut stats = EmbedStats::default();
    let records = results
        .into_iter()
        .map(|(record, outcome)| {
            match outcome {
                EmbedOutcome::Embedded => stats.embedded += 1,
                EmbedOutcome::Reused => stats.reused += 1,
                EmbedOutcome::Failed => stats.failed += 1,
                EmbedOutcome::Skipped => stats.skipped += 1,
            }
            record
        })
        .collect();

    if stats.failed > 0 {
        warn!("{} of {} records failed to embed", stats.failed, total);
    }
    info!(
        "Embedding complete: {} embedded, {} reused, {} failed, {} skipped",
        stats.embedded, stats.reused, stats.failed, stats.skipped
    );

    (records, stats)
}

/// One-shot batch job: embed, validate, then load in a single transaction
pub struct IngestPipeline {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn FaqStore>,
    validator: Validator,
    concurrency: usize,
    dedup: bool,
}

impl IngestPipeline {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn FaqStore>, validator: Validator) -> Self {
        Self {
            embedder,
            store,
            validator,
            concurrency: 1,
            dedup: false,
        }
    }

    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Skip records whose content hash is already stored or repeated
    #[must_use]
    pub const fn with_dedup(mut self, dedup: bool) -> Self {
        self.dedup = dedup;
        self
    }

    /// Run the whole job.
    ///
    /// Per-record problems end up in the report. A store failure aborts the
    /// run with nothing inserted.
    pub async fn run(&self, records: Vec<FaqRecord>) -> Result<IngestReport> {
        let mut report = IngestReport {
            total: records.len(),
            ..IngestReport::default()
        };

        let (records, embed_stats) =
            embed_records(self.embedder.as_ref(), records, self.concurrency).await;
        report.embedding = embed_stats;

        let mut eligible: Vec<(usize, EligibleFaq)> = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let question = record.question.clone();
            match self.validator.check(record) {
                Ok(faq) => eligible.push((index, faq)),
                Err(reason) => Self::skip(&mut report, index, question, reason),
            }
        }

        if self.dedup {
            eligible = self.drop_duplicates(eligible, &mut report).await?;
        }

        let batch: Vec<EligibleFaq> = eligible.into_iter().map(|(_, faq)| faq).collect();
        report.skipped_records.sort_by_key(|skipped| skipped.index);

        if batch.is_empty() {
            info!("No eligible records to insert");
        } else {
            report.inserted = self.store.put_batch(&batch).await?;
        }

        info!(
            "Ingestion complete: {} read, {} inserted, {} skipped",
            report.total,
            report.inserted,
            report.skipped_total()
        );
        Ok(report)
    }

    async fn drop_duplicates(
        &self,
        eligible: Vec<(usize, EligibleFaq)>,
        report: &mut IngestReport,
    ) -> Result<Vec<(usize, EligibleFaq)>> {
        let hashes: Vec<String> = eligible
            .iter()
            .map(|(_, faq)| faq.content_hash().to_string())
            .collect();
        let mut seen = self.store.existing_hashes(&hashes).await?;
        debug!("{} of {} hashes already stored", seen.len(), hashes.len());

        let mut kept = Vec::with_capacity(eligible.len());
        for (index, faq) in eligible {
            if seen.insert(faq.content_hash().to_string()) {
                kept.push((index, faq));
            } else {
                Self::skip(report, index, faq.question().to_string(), SkipReason::Duplicate);
            }
        }
        Ok(kept)
    }

    fn skip(report: &mut IngestReport, index: usize, question: String, reason: SkipReason) {
        debug!("Skipping record {} ({:?}): {}", index, question, reason);
        report.skipped.record(&reason);
        report.skipped_records.push(SkippedRecord {
            index,
            question,
            reason,
        });
    }
}
