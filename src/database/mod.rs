use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::models::EligibleFaq;
use crate::models::FaqMatch;
use crate::FaqRagError;
use crate::Result;

mod faqs;
mod memory;
mod schema;

pub use memory::MemoryStore;

/// Table holding the FAQ records
pub const FAQ_TABLE: &str = "faqs";

/// Persistence contract for FAQ records.
///
/// Implementations insert batches atomically and answer nearest-neighbor
/// queries by cosine distance.
#[async_trait]
pub trait FaqStore: Send + Sync {
    /// Insert every record or none of them. Returns the number inserted.
    async fn put_batch(&self, records: &[EligibleFaq]) -> Result<u64>;

    /// Record closest to `query` by cosine distance, `None` when empty.
    async fn find_nearest(&self, query: &[f32]) -> Result<Option<FaqMatch>>;

    /// Number of stored records
    async fn count(&self) -> Result<i64>;

    /// The subset of `hashes` already present in the store
    async fn existing_hashes(&self, hashes: &[String]) -> Result<HashSet<String>>;
}

/// Database connection pool wrapper
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
    dimension: usize,
    statement_timeout: Duration,
}

impl Database {
    #[must_use]
    pub const fn new(pool: PgPool, dimension: usize, statement_timeout: Duration) -> Self {
        Self {
            pool,
            dimension,
            statement_timeout,
        }
    }

    /// Create a new database instance from configuration
    pub async fn from_config(config: &crate::config::AppConfig) -> Result<Self> {
        let db = &config.database;
        let connect_options = PgConnectOptions::new()
            .host(&db.host)
            .port(db.port)
            .database(&db.name)
            .username(&db.user)
            .password(&db.password);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections())
            .min_connections(config.min_connections())
            .acquire_timeout(config.connection_timeout())
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                FaqRagError::StorageError(format!(
                    "cannot connect to {}:{}/{}: {e}",
                    db.host, db.port, db.name
                ))
            })?;

        tracing::info!(
            "Database pool configured: {}:{}/{} max_connections={}, min_connections={}",
            db.host,
            db.port,
            db.name,
            config.max_connections(),
            config.min_connections()
        );

        Ok(Self::new(
            pool,
            config.embedding_dimension(),
            config.statement_timeout(),
        ))
    }

    /// Embedding dimension of the `faqs.embedding` column
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("Database pool closed");
    }

    /// Run a store operation under the configured timeout.
    ///
    /// Dropping the timed-out future releases its connection, and an open
    /// transaction inside it is rolled back by `Transaction`'s drop.
    async fn bounded<T, F>(&self, operation: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send,
    {
        match tokio::time::timeout(self.statement_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(FaqRagError::StorageError(format!(
                "{operation} timed out after {:?}",
                self.statement_timeout
            ))),
        }
    }
}

#[async_trait]
impl FaqStore for Database {
    async fn put_batch(&self, records: &[EligibleFaq]) -> Result<u64> {
        self.bounded("put_batch", self.insert_faqs(records)).await
    }

    async fn find_nearest(&self, query: &[f32]) -> Result<Option<FaqMatch>> {
        self.bounded("find_nearest", self.nearest_faq(query)).await
    }

    async fn count(&self) -> Result<i64> {
        self.bounded("count", self.count_faqs()).await
    }

    async fn existing_hashes(&self, hashes: &[String]) -> Result<HashSet<String>> {
        self.bounded("existing_hashes", self.stored_hashes(hashes))
            .await
    }
}
