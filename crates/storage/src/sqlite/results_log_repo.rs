use chrono::Utc;
use log::debug;
use quiz_core::model::QuizResult;

use super::SqliteRepository;
use crate::repository::{ResultsLogRepository, StorageError};
use crate::results_codec::{RESULTS_KEY, decode_results, encode_results};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl ResultsLogRepository for SqliteRepository {
    async fn append(&self, result: &QuizResult) -> Result<(), StorageError> {
        // Read-modify-write inside one transaction so the replace is atomic.
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let raw: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(RESULTS_KEY)
            .fetch_optional(&mut *tx)
            .await
            .map_err(conn)?;

        let mut all = decode_results(raw.as_deref());
        all.push(result.clone());
        let encoded = encode_results(&all)?;

        sqlx::query(
            r"
                INSERT INTO kv_store (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
            ",
        )
        .bind(RESULTS_KEY)
        .bind(encoded)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        tx.commit().await.map_err(conn)?;
        debug!("results log now holds {} entries", all.len());
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<QuizResult>, StorageError> {
        let raw: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(RESULTS_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;
        Ok(decode_results(raw.as_deref()))
    }

    async fn clear(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(RESULTS_KEY)
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }
}
