//! Record store tests against a real PostgreSQL with pgvector.
//!
//! These drop and recreate the `faqs` table, so point them at a scratch
//! database: `FAQRAG_TEST_CONFIG=test.toml cargo test -- --ignored`

use std::sync::Arc;

use faqrag::database::Database;
use faqrag::database::FaqStore;
use faqrag::ingest::IngestPipeline;
use faqrag::ingest::Validator;
use faqrag::models::EligibleFaq;
use faqrag::models::FaqRecord;
use faqrag::AppConfig;
use faqrag::FaqRagError;
use faqrag::Result;
use tokio::sync::Mutex;

/// Every test rebuilds the same table
static DB_LOCK: Mutex<()> = Mutex::const_new(());

async fn setup_test_db() -> Result<Database> {
    let config = match std::env::var("FAQRAG_TEST_CONFIG") {
        Ok(path) => AppConfig::from_file(path)?,
        Err(_) => AppConfig::load()?,
    };
    let db = Database::from_config(&config).await?;

    db.drop_schema().await?;
    db.init_schema().await?;
    Ok(db)
}

fn unit_vector(dimension: usize, hot: usize) -> Vec<f32> {
    let mut v = vec![0.0; dimension];
    v[hot % dimension] = 1.0;
    v
}

fn eligible(db: &Database, question: &str, answer: &str, hot: usize) -> EligibleFaq {
    let record = FaqRecord {
        question: question.to_string(),
        answer: answer.to_string(),
        tags: vec!["general".to_string()],
        url: Some(format!("https://e.co/{hot}")),
        suggestions: Vec::new(),
        embedding: Some(unit_vector(db.dimension(), hot)),
    };
    Validator::new(db.dimension()).check(record).unwrap()
}

#[tokio::test]
#[ignore = "Requires database access"]
async fn test_empty_store_has_no_match() -> Result<()> {
    let _lock = DB_LOCK.lock().await;
    let db = setup_test_db().await?;

    let nearest = db.find_nearest(&unit_vector(db.dimension(), 0)).await?;
    assert!(nearest.is_none());
    assert_eq!(db.count().await?, 0);

    db.close().await;
    Ok(())
}

#[tokio::test]
#[ignore = "Requires database access"]
async fn test_put_batch_then_find_nearest() -> Result<()> {
    let _lock = DB_LOCK.lock().await;
    let db = setup_test_db().await?;

    let batch = vec![
        eligible(&db, "What is X?", "X is Y.", 1),
        eligible(&db, "What is W?", "W is V.", 2),
    ];
    assert_eq!(db.put_batch(&batch).await?, 2);

    let found = db
        .find_nearest(batch[1].embedding())
        .await?
        .expect("a stored record");
    assert_eq!(found.record.question, "What is W?");
    assert_eq!(found.record.answer, "W is V.");
    assert_eq!(found.record.tags, vec!["general".to_string()]);
    assert_eq!(found.record.url.as_deref(), Some("https://e.co/2"));
    assert!(found.distance.abs() < 1e-6);

    db.close().await;
    Ok(())
}

#[tokio::test]
#[ignore = "Requires database access"]
async fn test_bad_dimension_inserts_nothing() -> Result<()> {
    let _lock = DB_LOCK.lock().await;
    let db = setup_test_db().await?;

    let good = eligible(&db, "What is X?", "X is Y.", 1);
    let bad = Validator::new(3)
        .check(FaqRecord {
            question: "Short?".to_string(),
            answer: "Yes.".to_string(),
            tags: Vec::new(),
            url: None,
            suggestions: Vec::new(),
            embedding: Some(vec![1.0, 0.0, 0.0]),
        })
        .unwrap();

    let err = db.put_batch(&[good, bad]).await.unwrap_err();
    assert!(matches!(err, FaqRagError::StorageError(_)));
    assert_eq!(db.count().await?, 0);

    db.close().await;
    Ok(())
}

#[tokio::test]
#[ignore = "Requires database access"]
async fn test_rerun_duplicates_and_dedup_hashes() -> Result<()> {
    let _lock = DB_LOCK.lock().await;
    let db = setup_test_db().await?;

    let batch = vec![eligible(&db, "What is X?", "X is Y.", 1)];
    db.put_batch(&batch).await?;
    db.put_batch(&batch).await?;
    assert_eq!(db.count().await?, 2);

    let hashes = vec![
        batch[0].content_hash().to_string(),
        "not-a-stored-hash".to_string(),
    ];
    let stored = db.existing_hashes(&hashes).await?;
    assert_eq!(stored.len(), 1);
    assert!(stored.contains(batch[0].content_hash()));

    db.close().await;
    Ok(())
}

#[tokio::test]
#[ignore = "Requires database access"]
async fn test_pipeline_against_postgres() -> Result<()> {
    let _lock = DB_LOCK.lock().await;
    let db = setup_test_db().await?;
    let store = Arc::new(db.clone());

    // Records already carry vectors, so the embedder is never called
    struct NoEmbedder(usize);

    #[async_trait::async_trait]
    impl faqrag::embeddings::Embedder for NoEmbedder {
        fn dimension(&self) -> usize {
            self.0
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(FaqRagError::EmbeddingError("offline".to_string()))
        }
    }

    let records = vec![
        eligible(&db, "What is X?", "X is Y.", 1).into_record(),
        FaqRecord {
            answer: String::new(),
            ..eligible(&db, "What is W?", "W is V.", 2).into_record()
        },
    ];
    let report = IngestPipeline::new(
        Arc::new(NoEmbedder(db.dimension())),
        store,
        Validator::new(db.dimension()),
    )
    .with_dedup(true)
    .run(records)
    .await?;

    assert_eq!(report.inserted, 1);
    assert_eq!(report.skipped.missing_essential_data, 1);
    assert_eq!(db.count().await?, 1);

    db.close().await;
    Ok(())
}
