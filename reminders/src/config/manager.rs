// File: reminders/src/config/manager.rs
use super::Settings;
use anyhow::{anyhow, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::{info, warn};

pub struct SettingsManager {
    current_settings: Arc<Settings>,
}

impl SettingsManager {
    pub async fn new(config_dir: &str) -> Result<Self> {
        let settings = Self::load_settings(config_dir).await?;
        Ok(Self {
            current_settings: Arc::new(settings),
        })
    }

    pub fn get_current_settings(&self) -> Arc<Settings> {
        self.current_settings.clone()
    }

    async fn load_settings(config_dir: &str) -> Result<Settings> {
        let main_config_path = format!("{}/main.toml", config_dir);

        if !Path::new(&main_config_path).exists() {
            warn!(
                "No settings file at {}, using built-in defaults",
                main_config_path
            );
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&main_config_path)
            .await
            .map_err(|e| anyhow!("Failed to read settings {}: {}", main_config_path, e))?;

        let settings: Settings = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse settings {}: {}", main_config_path, e))?;

        if settings.delivery_webhook_url.is_empty() {
            warn!("No delivery_webhook_url configured - reminders cannot be delivered");
        }

        info!(
            "Loaded settings from {}: bind {}:{}, database {}",
            main_config_path, settings.host, settings.port, settings.database_path
        );

        Ok(settings)
    }
}
