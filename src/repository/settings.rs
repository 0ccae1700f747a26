use crate::error::{Result, SubhubError};
use crate::models::{keys, ConverterOverrides};
use sqlx::PgPool;
use tracing::debug;

/// Repository for settings database operations
#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a specific setting by key, if present
    pub async fn get<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let value = sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT value FROM settings WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        let Some(value) = value else {
            debug!(key = key, "Setting not present");
            return Ok(None);
        };

        let parsed = serde_json::from_value(value).map_err(|e| {
            SubhubError::Internal(format!("Failed to parse setting '{}': {}", key, e))
        })?;

        Ok(Some(parsed))
    }

    /// Get conversion service overrides (empty when unset)
    pub async fn get_converter(&self) -> Result<ConverterOverrides> {
        Ok(self.get(keys::CONVERTER).await?.unwrap_or_default())
    }
}
