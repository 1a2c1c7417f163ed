//! Employee persistence on top of the key-value table.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::Employee;

/// Reads and writes the whole employee list as JSON text under one key.
#[derive(Clone)]
pub struct EmployeeStorage {
    pool: SqlitePool,
    key: String,
}

impl EmployeeStorage {
    pub fn new(pool: SqlitePool, key: impl Into<String>) -> Self {
        Self {
            pool,
            key: key.into(),
        }
    }

    /// Load the stored list.
    ///
    /// A missing or empty value yields an empty list. Content that does not
    /// decode as an employee list is an error.
    pub async fn load(&self) -> Result<Vec<Employee>, AppError> {
        let Some(raw) = self.get_raw().await? else {
            return Ok(Vec::new());
        };

        if raw.is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&raw).map_err(|e| {
            tracing::error!(key = %self.key, "Stored employee list is corrupt: {}", e);
            AppError::PersistenceParse(format!(
                "Stored value under '{}' is not an employee list: {}",
                self.key, e
            ))
        })
    }

    /// Serialize `list` and overwrite the stored value.
    pub async fn save(&self, list: &[Employee]) -> Result<(), AppError> {
        let raw = serde_json::to_string(list)
            .map_err(|e| AppError::Internal(format!("Failed to serialize employees: {}", e)))?;
        self.put_raw(&raw).await?;
        tracing::debug!(key = %self.key, count = list.len(), "Saved employee list");
        Ok(())
    }

    /// Raw stored text, if any.
    pub async fn get_raw(&self) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT value FROM kv WHERE key = ?")
            .bind(&self.key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row.get("value")))
    }

    /// Overwrite the stored text.
    pub async fn put_raw(&self, raw: &str) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO kv (key, value, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(&self.key)
        .bind(raw)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
