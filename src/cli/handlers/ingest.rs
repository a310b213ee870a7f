//! Embedding and ingestion handlers

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::output::print_info;
use crate::cli::output::print_ingest_report;
use crate::cli::output::print_success;
use crate::cli::output::print_warning;
use crate::database::Database;
use crate::database::FaqStore;
use crate::database::MemoryStore;
use crate::database::FAQ_TABLE;
use crate::embeddings::EmbeddingService;
use crate::ingest::embed_records;
use crate::ingest::read_records;
use crate::ingest::write_records;
use crate::ingest::IngestPipeline;
use crate::ingest::Validator;
use crate::AppConfig;
use crate::FaqRagError;
use crate::Result;

/// `faqs.json` -> `faqs.embedded.json`
fn default_embedded_path(input: &Path) -> PathBuf {
    input.with_extension("embedded.json")
}

/// Handle the embed command: fill in question embeddings and write them out
pub async fn handle_embed_command(
    config: &AppConfig,
    input: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let records = read_records(input)?;
    print_info(&format!("📄 Loaded {} records from {}", records.len(), input.display()));

    let service = EmbeddingService::init(config).await?;
    let (records, stats) = embed_records(&service, records, config.ingest.concurrency).await;

    let output = output.map_or_else(|| default_embedded_path(input), Path::to_path_buf);
    write_records(&output, &records)?;

    print_success(&format!(
        "Embedded {} records ({} reused, {} placeholders) -> {}",
        stats.embedded,
        stats.reused,
        stats.skipped,
        output.display()
    ));
    if stats.failed > 0 {
        print_warning(&format!(
            "{} records failed to embed and were written without an embedding",
            stats.failed
        ));
    }

    service.shutdown();
    Ok(())
}

/// Handle the ingest command
pub async fn handle_ingest_command(
    config: &AppConfig,
    input: &Path,
    dedup: bool,
    dry_run: bool,
) -> Result<()> {
    let records = read_records(input)?;
    print_info(&format!("📄 Loaded {} records from {}", records.len(), input.display()));

    let validator = Validator::from_config(config)?;
    let embedder = Arc::new(EmbeddingService::init(config).await?);

    let database = if dry_run {
        print_info("🧪 Dry run: records go to an in-memory store");
        None
    } else {
        let database = Database::from_config(config).await?;
        if !database.is_schema_initialized().await? {
            return Err(FaqRagError::StorageError(format!(
                "table '{FAQ_TABLE}' does not exist; run `faqrag init` first"
            )));
        }
        Some(database)
    };
    let store: Arc<dyn FaqStore> = match &database {
        Some(database) => Arc::new(database.clone()),
        None => Arc::new(MemoryStore::with_dimension(config.embedding_dimension())),
    };

    let pipeline = IngestPipeline::new(embedder.clone(), store, validator)
        .with_concurrency(config.ingest.concurrency)
        .with_dedup(dedup || config.ingest.dedup);
    let report = pipeline.run(records).await?;
    drop(pipeline);

    print_ingest_report(&report);
    if dry_run {
        print_info("Nothing was written to PostgreSQL");
    }

    if let Some(database) = database {
        database.close().await;
    }
    if let Ok(service) = Arc::try_unwrap(embedder) {
        service.shutdown();
    }
    Ok(())
}
