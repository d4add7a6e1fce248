// File: reminders/src/config/mod.rs
pub mod manager;
pub mod store;

use serde::{Deserialize, Serialize};

use crate::constants::{defaults, schedule};
use crate::errors::ConfigError;
use crate::scheduler::CronSchedule;

pub use manager::SettingsManager;
pub use store::ConfigStore;

/// Process settings read from `config/main.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    // Empty means every delivery fails until an endpoint is configured
    #[serde(default)]
    pub delivery_webhook_url: String,
    #[serde(default = "default_delivery_timeout")]
    pub delivery_timeout_seconds: u64,
    #[serde(default = "default_reminder_delay")]
    pub reminder_delay_millis: u64,
}

fn default_host() -> String {
    defaults::HOST.to_string()
}

fn default_port() -> u16 {
    defaults::PORT
}

fn default_database_path() -> String {
    defaults::DATABASE_PATH.to_string()
}

fn default_delivery_timeout() -> u64 {
    defaults::DELIVERY_TIMEOUT_SECONDS
}

fn default_reminder_delay() -> u64 {
    crate::constants::reminders::INTER_ITEM_DELAY.as_millis() as u64
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_path: default_database_path(),
            delivery_webhook_url: String::new(),
            delivery_timeout_seconds: default_delivery_timeout(),
            reminder_delay_millis: default_reminder_delay(),
        }
    }
}

/// Runtime configuration of the reminder automation, persisted as one JSON
/// document under a fixed key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationConfig {
    pub enabled: bool,
    pub schedule: String,
    pub days_in_advance: u32,
    pub template_type: String,
    // Reserved: persisted and returned, never consulted by the send path
    pub max_retries: u32,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::ENABLED,
            schedule: schedule::DEFAULT_CRON.to_string(),
            days_in_advance: defaults::DAYS_IN_ADVANCE,
            template_type: defaults::TEMPLATE_TYPE.to_string(),
            max_retries: defaults::MAX_RETRIES,
        }
    }
}

/// Partial configuration; `None` fields keep their previous value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationConfigUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_in_advance: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
}

impl AutomationConfig {
    /// Shallow merge: fields present in `update` win, the rest are kept
    pub fn merged(&self, update: &AutomationConfigUpdate) -> Self {
        Self {
            enabled: update.enabled.unwrap_or(self.enabled),
            schedule: update
                .schedule
                .clone()
                .unwrap_or_else(|| self.schedule.clone()),
            days_in_advance: update.days_in_advance.unwrap_or(self.days_in_advance),
            template_type: update
                .template_type
                .clone()
                .unwrap_or_else(|| self.template_type.clone()),
            max_retries: update.max_retries.unwrap_or(self.max_retries),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        CronSchedule::parse(&self.schedule)?;

        if self.days_in_advance > defaults::MAX_DAYS_IN_ADVANCE {
            return Err(ConfigError::InvalidValue {
                field: "daysInAdvance".to_string(),
                reason: format!("must be at most {}", defaults::MAX_DAYS_IN_ADVANCE),
            });
        }

        if self.template_type.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "templateType".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }
}
