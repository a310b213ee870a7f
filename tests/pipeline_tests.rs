//! End-to-end ingestion and query through the public API, no services needed

use std::sync::Arc;

use async_trait::async_trait;
use faqrag::database::FaqStore;
use faqrag::database::MemoryStore;
use faqrag::embeddings::Embedder;
use faqrag::ingest::read_records;
use faqrag::ingest::IngestPipeline;
use faqrag::ingest::Validator;
use faqrag::models::FaqRecord;
use faqrag::query::QueryOutcome;
use faqrag::query::QueryService;
use faqrag::FaqRagError;
use faqrag::Result;

const DIM: usize = 384;

/// Bag-of-characters embedder: deterministic and similarity-preserving
struct CharEmbedder;

#[async_trait]
impl Embedder for CharEmbedder {
    fn dimension(&self) -> usize {
        DIM
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(FaqRagError::EmbeddingError("Empty text provided".to_string()));
        }
        let mut vector = vec![0.0; DIM];
        for c in text.to_lowercase().chars() {
            vector[c as usize % DIM] += 1.0;
        }
        Ok(vector)
    }
}

fn record(question: &str, answer: &str, url: &str) -> FaqRecord {
    FaqRecord {
        question: question.to_string(),
        answer: answer.to_string(),
        tags: Vec::new(),
        url: Some(url.to_string()),
        suggestions: Vec::new(),
        embedding: None,
    }
}

#[tokio::test]
async fn test_ingest_then_ask() -> Result<()> {
    let embedder: Arc<dyn Embedder> = Arc::new(CharEmbedder);
    let store = Arc::new(MemoryStore::with_dimension(DIM));

    let report = IngestPipeline::new(embedder.clone(), store.clone(), Validator::new(DIM))
        .run(vec![record("What is X?", "X is Y.", "https://e.co/1")])
        .await?;
    assert_eq!(report.inserted, 1);
    assert_eq!(store.count().await?, 1);

    let mut service = QueryService::new(embedder, store);
    match service.handle("What is X?").await {
        QueryOutcome::Found(found) => {
            assert_eq!(found.record.answer, "X is Y.");
            assert!(found.distance.abs() < 1e-6);
        }
        other => panic!("expected a match, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_nearest_of_several() -> Result<()> {
    let embedder: Arc<dyn Embedder> = Arc::new(CharEmbedder);
    let store = Arc::new(MemoryStore::with_dimension(DIM));

    IngestPipeline::new(embedder.clone(), store.clone(), Validator::new(DIM))
        .run(vec![
            record("How do I pay the fees?", "Through the portal.", "https://e.co/fees"),
            record("When are exams held?", "Twice a term.", "https://e.co/exams"),
            record("Who do I contact for help?", "The support desk.", "https://e.co/help"),
        ])
        .await?;

    let mut service = QueryService::new(embedder, store);
    let QueryOutcome::Found(found) = service.handle("when are the exams held").await else {
        panic!("expected a match");
    };
    assert_eq!(found.record.url.as_deref(), Some("https://e.co/exams"));
    Ok(())
}

#[tokio::test]
async fn test_scraper_file_to_store() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("faqs.json");
    std::fs::write(
        &path,
        r#"[
            {"question": "What is X?", "answer": "X is Y.", "tags": ["general"],
             "full_url": "https://e.co/1",
             "suggestions": [{"text": "What is Z?", "url": "https://e.co/2"}]},
            {"question": "N/A", "answer": "YET TO SCRAPE", "full_url": "https://e.co/3"},
            {"question": "What is W?", "answer": "", "full_url": "https://e.co/4"}
        ]"#,
    )?;

    let embedder: Arc<dyn Embedder> = Arc::new(CharEmbedder);
    let store = Arc::new(MemoryStore::with_dimension(DIM));
    let report = IngestPipeline::new(embedder, store.clone(), Validator::new(DIM))
        .run(read_records(&path)?)
        .await?;

    assert_eq!(report.total, 3);
    assert_eq!(report.inserted, 1);
    assert_eq!(report.skipped.missing_essential_data, 2);

    let rows = store.rows()?;
    assert_eq!(rows[0].tags(), ["general".to_string()]);
    assert_eq!(rows[0].suggestions()[0].text, "What is Z?");
    Ok(())
}
