// File: reminders/src/config/store.rs
//! Database-backed store for the automation configuration.
//!
//! The configuration lives as one JSON document in `system_config` under a
//! fixed key. Loading never fails: missing or unreadable storage degrades to
//! the built-in defaults. Saving merges a partial update over the current
//! in-memory value and persists the full result.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::config::{AutomationConfig, AutomationConfigUpdate};
use crate::constants::storage;
use crate::database::Database;
use crate::errors::ConfigError;

pub struct ConfigStore {
    db: Arc<Database>,
    current: RwLock<AutomationConfig>,
}

impl ConfigStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            current: RwLock::new(AutomationConfig::default()),
        }
    }

    /// In-memory configuration as of the last successful load or save
    pub async fn current(&self) -> AutomationConfig {
        self.current.read().await.clone()
    }

    /// Defaults merged with the persisted override. Storage problems are
    /// logged and answered with the defaults.
    #[instrument(skip(self))]
    pub async fn load(&self) -> AutomationConfig {
        match self.read_persisted().await {
            Ok(Some(update)) => {
                let config = AutomationConfig::default().merged(&update);
                *self.current.write().await = config.clone();
                debug!("Loaded automation config: {:?}", config);
                config
            }
            Ok(None) => {
                info!("No stored automation config, using defaults");
                let config = AutomationConfig::default();
                *self.current.write().await = config.clone();
                config
            }
            Err(e) => {
                info!("{} - using default automation config", e);
                AutomationConfig::default()
            }
        }
    }

    /// Merge `update` over the current value, validate, persist, then publish
    /// the merged value in memory
    #[instrument(skip(self))]
    pub async fn save(&self, update: &AutomationConfigUpdate) -> Result<AutomationConfig, ConfigError> {
        let mut current = self.current.write().await;
        let merged = current.merged(update);
        merged.validate()?;

        let value = serde_json::to_string(&merged).map_err(|e| ConfigError::PersistFailed {
            reason: e.to_string(),
        })?;

        self.db
            .upsert_setting(storage::CONFIG_KEY, &value)
            .await
            .map_err(|e| ConfigError::PersistFailed {
                reason: e.to_string(),
            })?;

        *current = merged.clone();
        info!(
            "Automation config saved: enabled={}, schedule='{}', days_in_advance={}",
            merged.enabled, merged.schedule, merged.days_in_advance
        );
        Ok(merged)
    }

    async fn read_persisted(&self) -> Result<Option<AutomationConfigUpdate>, ConfigError> {
        let raw = self
            .db
            .get_setting(storage::CONFIG_KEY)
            .await
            .map_err(|e| ConfigError::Unavailable {
                reason: e.to_string(),
            })?;

        raw.map(|value| {
            serde_json::from_str::<AutomationConfigUpdate>(&value).map_err(|e| {
                ConfigError::Unavailable {
                    reason: format!("stored value is not valid JSON: {}", e),
                }
            })
        })
        .transpose()
    }
}
