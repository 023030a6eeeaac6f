use crate::model::{DynamicPricingConfig, StorageError};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

/// Holds the last validated dynamic pricing config per business. Writes are
/// last-writer-wins; configs are disabled, never deleted.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens the database and runs migrations.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS pricing_configs (
                business_id INTEGER PRIMARY KEY,
                config TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )?;

        Ok(Self { conn })
    }

    /// Saves (inserts or replaces) a validated config for a business.
    /// Callers must run the candidate through `ConfigValidator` first.
    pub fn save_config(
        &self,
        business_id: i64,
        config: &DynamicPricingConfig,
    ) -> Result<(), StorageError> {
        let payload = serde_json::to_string(config)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO pricing_configs (business_id, config, updated_at)
             VALUES (?1, ?2, ?3)",
            params![business_id, payload, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn get_config(
        &self,
        business_id: i64,
    ) -> Result<Option<DynamicPricingConfig>, StorageError> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT config FROM pricing_configs WHERE business_id = ?1",
                params![business_id],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Turns dynamic pricing off for a business while keeping the rest of
    /// its config intact.
    pub fn disable_config(&self, business_id: i64) -> Result<DynamicPricingConfig, StorageError> {
        let mut config = self
            .get_config(business_id)?
            .ok_or(StorageError::NotFound)?;
        config.enabled = false;
        config.auto_adjust = false;
        self.save_config(business_id, &config)?;
        Ok(config)
    }
}
