use std::collections::HashSet;

use pgvector::Vector;
use sqlx::types::Json;
use sqlx::Postgres;
use sqlx::QueryBuilder;
use sqlx::Transaction;

use super::Database;
use super::FAQ_TABLE;
use crate::models::EligibleFaq;
use crate::models::FaqMatch;
use crate::models::FaqRecord;
use crate::models::Suggestion;
use crate::FaqRagError;
use crate::Result;

/// PostgreSQL accepts at most 65535 bind parameters per statement
const MAX_BIND_PARAMS: usize = 65_535;

/// question, answer, tags, url, suggestions, embedding, content_hash
const COLUMNS_PER_ROW: usize = 7;

const INSERT_CHUNK_ROWS: usize = MAX_BIND_PARAMS / COLUMNS_PER_ROW;

#[derive(sqlx::FromRow)]
struct FaqRow {
    question: String,
    answer: String,
    tags: Vec<String>,
    url: Option<String>,
    suggestions: Json<Vec<Suggestion>>,
    embedding: Vector,
    distance: f64,
}

impl FaqRow {
    fn into_match(self) -> FaqMatch {
        FaqMatch {
            record: FaqRecord {
                question: self.question,
                answer: self.answer,
                tags: self.tags,
                url: self.url,
                suggestions: self.suggestions.0,
                embedding: Some(self.embedding.to_vec()),
            },
            distance: self.distance,
        }
    }
}

impl Database {
    fn check_dimension(&self, len: usize, what: &str) -> Result<()> {
        if len == self.dimension {
            Ok(())
        } else {
            Err(FaqRagError::StorageError(format!(
                "{what} has dimension {len}, column expects {}",
                self.dimension
            )))
        }
    }

    /// Insert all records in one transaction.
    ///
    /// Rows are sent as multi-row inserts sized under the bind parameter
    /// limit, all inside the same transaction, so a failure in any chunk
    /// leaves the table as it was.
    pub(super) async fn insert_faqs(&self, records: &[EligibleFaq]) -> Result<u64> {
        if records.is_empty() {
            return Ok(0);
        }
        for faq in records {
            self.check_dimension(faq.embedding().len(), "record embedding")?;
        }

        let mut tx = self.pool.begin().await?;
        match Self::insert_chunks(&mut tx, records).await {
            Ok(inserted) => {
                tx.commit().await?;
                tracing::debug!("Committed {} FAQ rows", inserted);
                Ok(inserted)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!("Rollback after failed insert also failed: {}", rollback_err);
                }
                tracing::warn!("Batch insert rolled back: {}", e);
                Err(e)
            }
        }
    }

    async fn insert_chunks(
        tx: &mut Transaction<'_, Postgres>,
        records: &[EligibleFaq],
    ) -> Result<u64> {
        let mut inserted = 0;

        for chunk in records.chunks(INSERT_CHUNK_ROWS) {
            let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
                "INSERT INTO {FAQ_TABLE} \
                 (question, answer, tags, url, suggestions, embedding, content_hash) "
            ));

            query_builder.push_values(chunk, |mut b, faq| {
                b.push_bind(faq.question().to_string())
                    .push_bind(faq.answer().to_string())
                    .push_bind(faq.tags().to_vec())
                    .push_bind(faq.url().map(str::to_string))
                    .push_bind(Json(faq.suggestions().to_vec()))
                    .push_bind(Vector::from(faq.embedding().to_vec()))
                    .push_bind(faq.content_hash().to_string());
            });

            let result = query_builder.build().execute(&mut **tx).await?;
            inserted += result.rows_affected();
        }

        Ok(inserted)
    }

    /// Cosine nearest neighbor through pgvector's `<=>` operator
    pub(super) async fn nearest_faq(&self, query: &[f32]) -> Result<Option<FaqMatch>> {
        self.check_dimension(query.len(), "query vector")?;

        let sql = format!(
            r"
            SELECT question, answer, tags, url, suggestions, embedding,
                   (embedding <=> $1) AS distance
            FROM {FAQ_TABLE}
            ORDER BY embedding <=> $1
            LIMIT 1
            "
        );

        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query_as::<_, FaqRow>(&sql)
            .bind(Vector::from(query.to_vec()))
            .fetch_optional(&mut *conn)
            .await?;

        Ok(row.map(FaqRow::into_match))
    }

    pub(super) async fn count_faqs(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {FAQ_TABLE}"))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub(super) async fn stored_hashes(&self, hashes: &[String]) -> Result<HashSet<String>> {
        if hashes.is_empty() {
            return Ok(HashSet::new());
        }

        let found = sqlx::query_scalar::<_, String>(&format!(
            "SELECT DISTINCT content_hash FROM {FAQ_TABLE} WHERE content_hash = ANY($1)"
        ))
        .bind(hashes)
        .fetch_all(&self.pool)
        .await?;

        Ok(found.into_iter().collect())
    }
}
