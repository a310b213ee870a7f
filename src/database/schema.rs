use super::Database;
use super::FAQ_TABLE;
use crate::config::PerformanceConfig;
use crate::Result;

impl Database {
    /// Check if the `faqs` table exists
    pub async fn is_schema_initialized(&self) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS (
                SELECT FROM information_schema.tables
                WHERE table_schema = current_schema()
                AND table_name = $1
            )
            ",
        )
        .bind(FAQ_TABLE)
        .fetch_one(&self.pool)
        .await?;

        if !exists {
            tracing::debug!("Missing required table: {}", FAQ_TABLE);
        }
        Ok(exists)
    }

    /// Initialize database schema.
    ///
    /// Safe to run repeatedly: every statement is `IF NOT EXISTS`.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&self.pool)
            .await?;

        // The dimension is a type modifier, so it cannot be a bind parameter
        let create_table = format!(
            r"
            CREATE TABLE IF NOT EXISTS {FAQ_TABLE} (
                id BIGSERIAL PRIMARY KEY,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                tags TEXT[] NOT NULL DEFAULT '{{}}',
                url TEXT,
                suggestions JSONB NOT NULL DEFAULT '[]'::jsonb,
                embedding VECTOR({dim}) NOT NULL,
                content_hash TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            ",
            dim = self.dimension
        );
        sqlx::query(&create_table).execute(&self.pool).await?;

        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS idx_{FAQ_TABLE}_content_hash ON {FAQ_TABLE} (content_hash)"
        ))
        .execute(&self.pool)
        .await?;

        tracing::info!(
            "Schema ready: table {} with VECTOR({})",
            FAQ_TABLE,
            self.dimension
        );
        Ok(())
    }

    /// Create the HNSW cosine index used by `find_nearest`
    pub async fn create_vector_index(&self, performance: &PerformanceConfig) -> Result<()> {
        let sql = format!(
            "CREATE INDEX IF NOT EXISTS idx_{FAQ_TABLE}_embedding_hnsw ON {FAQ_TABLE} \
             USING hnsw (embedding vector_cosine_ops) WITH (m = {}, ef_construction = {})",
            performance.hnsw_m, performance.hnsw_ef_construction
        );
        sqlx::query(&sql).execute(&self.pool).await?;

        tracing::info!(
            "Vector index ready (hnsw, m={}, ef_construction={})",
            performance.hnsw_m,
            performance.hnsw_ef_construction
        );
        Ok(())
    }

    /// Drop the table; used by tests to start from a clean slate
    pub async fn drop_schema(&self) -> Result<()> {
        sqlx::query(&format!("DROP TABLE IF EXISTS {FAQ_TABLE}"))
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
