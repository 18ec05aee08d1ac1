//! # Session State Repository
//!
//! Key-value operations over the `session_state` table.
//!
//! Three independent keys are in use (cart, voucher, referral), each
//! holding one JSON payload. The repository is deliberately untyped -
//! payloads are opaque strings here; the [`crate::codec::SessionCodec`]
//! owns serialization and the fail-soft rules.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StoreResult;

/// Repository for session state key-value operations.
#[derive(Debug, Clone)]
pub struct SessionStateRepository {
    pool: SqlitePool,
}

impl SessionStateRepository {
    /// Creates a new SessionStateRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SessionStateRepository { pool }
    }

    /// Gets the payload stored under a key, if any.
    pub async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let payload: Option<String> =
            sqlx::query_scalar("SELECT payload FROM session_state WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(payload)
    }

    /// Stores a payload under a key, replacing any previous value.
    pub async fn put(&self, key: &str, payload: &str) -> StoreResult<()> {
        debug!(key = %key, bytes = payload.len(), "Writing session state");

        sqlx::query(
            r#"
            INSERT INTO session_state (key, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(payload)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes the payload stored under a key.
    ///
    /// Deleting a key that does not exist is a no-op.
    pub async fn delete(&self, key: &str) -> StoreResult<()> {
        debug!(key = %key, "Deleting session state");

        sqlx::query("DELETE FROM session_state WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Storage, StorageConfig};

    async fn test_repo() -> SessionStateRepository {
        let storage = Storage::new(StorageConfig::in_memory()).await.unwrap();
        storage.session_state()
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let repo = test_repo().await;
        assert_eq!(repo.get("cart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let repo = test_repo().await;

        repo.put("cart", r#"{"items":[]}"#).await.unwrap();
        assert_eq!(
            repo.get("cart").await.unwrap().as_deref(),
            Some(r#"{"items":[]}"#)
        );
    }

    #[tokio::test]
    async fn test_put_replaces() {
        let repo = test_repo().await;

        repo.put("voucher_code", "first").await.unwrap();
        repo.put("voucher_code", "second").await.unwrap();
        assert_eq!(
            repo.get("voucher_code").await.unwrap().as_deref(),
            Some("second")
        );
    }

    #[tokio::test]
    async fn test_delete_and_delete_missing() {
        let repo = test_repo().await;

        repo.put("referral_code", "payload").await.unwrap();
        repo.delete("referral_code").await.unwrap();
        assert_eq!(repo.get("referral_code").await.unwrap(), None);

        // Deleting again is a no-op, not an error
        repo.delete("referral_code").await.unwrap();
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let repo = test_repo().await;

        repo.put("cart", "c").await.unwrap();
        repo.put("voucher_code", "v").await.unwrap();
        repo.delete("cart").await.unwrap();

        assert_eq!(repo.get("cart").await.unwrap(), None);
        assert_eq!(repo.get("voucher_code").await.unwrap().as_deref(), Some("v"));
    }
}
