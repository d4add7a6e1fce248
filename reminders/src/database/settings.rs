//! Key/value rows of `system_config`.

use anyhow::Result;
use chrono::Utc;
use sqlx::Row;
use tracing::debug;

use super::Database;

impl Database {
    pub async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT config_value FROM system_config WHERE config_key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row.try_get("config_value")?)),
            None => Ok(None),
        }
    }

    pub async fn upsert_setting(&self, key: &str, value: &str) -> Result<()> {
        debug!("Upserting setting {}", key);

        sqlx::query(
            r#"
            INSERT INTO system_config (config_key, config_value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(config_key) DO UPDATE SET
                config_value = excluded.config_value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
