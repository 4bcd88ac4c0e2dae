use async_trait::async_trait;
use futures_util::StreamExt;
use sqlx::MySqlPool;

use super::{KeyValueStore, StoreError};

/// `kv_store` table backend. The table is created by [`crate::db::init_db`].
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyValueStore for MySqlStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT store_value FROM kv_store WHERE store_key = ?",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (store_key, store_value)
            VALUES (?, ?)
            ON DUPLICATE KEY UPDATE store_value = VALUES(store_value)
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM kv_store WHERE store_key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<(String, String)>, StoreError> {
        let mut stream = sqlx::query_as::<_, (String, String)>(
            "SELECT store_key, store_value FROM kv_store ORDER BY store_key",
        )
        .fetch(&self.pool);

        let mut entries = Vec::new();
        while let Some(row) = stream.next().await {
            entries.push(row?);
        }

        Ok(entries)
    }
}
