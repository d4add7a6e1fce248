// File: reminders/src/main.rs
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use reminders::config::{ConfigStore, SettingsManager};
use reminders::constants::schedule::TIMEZONE;
use reminders::database::Database;
use reminders::scheduler::{CronTriggerBackend, ReminderScheduler};
use reminders::services::{AuditLog, AutomationService, ReminderJob, WebhookNotificationSender};
use reminders::web::{start_web_server, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with reduced verbosity
    let env_filter = EnvFilter::from_default_env()
        .add_directive("reminders=info".parse()?)
        .add_directive("tower_http=warn".parse()?)
        .add_directive("tokio_cron_scheduler=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?)
        .add_directive("sqlx=warn".parse()?);

    fmt().with_env_filter(env_filter).init();

    info!("Starting appointment reminder service");

    // Load configuration
    let settings_manager = SettingsManager::new("config").await?;
    let settings = settings_manager.get_current_settings();

    // Initialize database
    let database = Arc::new(Database::new(&settings.database_path).await?);

    let sender = Arc::new(WebhookNotificationSender::new(
        settings.delivery_webhook_url.clone(),
        Duration::from_secs(settings.delivery_timeout_seconds),
    )?);
    if sender.is_configured() {
        info!("Reminder delivery endpoint: {}", settings.delivery_webhook_url);
    } else {
        warn!("No delivery_webhook_url configured, reminders will fail until one is set");
    }

    let config_store = Arc::new(ConfigStore::new(database.clone()));
    let audit_log = Arc::new(AuditLog::new(database.clone()));
    let job = Arc::new(
        ReminderJob::new(database.clone(), sender, audit_log.clone())
            .with_item_delay(Duration::from_millis(settings.reminder_delay_millis)),
    );

    let backend = Arc::new(CronTriggerBackend::new().await?);
    let automation = Arc::new(AutomationService::new(
        config_store,
        audit_log,
        job,
        ReminderScheduler::new(backend),
    ));

    // A bad stored schedule leaves the scheduler stopped; the API can fix it
    match automation.start().await {
        Ok(true) => info!("Reminder scheduler active ({})", TIMEZONE.name()),
        Ok(false) => info!("Reminder scheduler idle"),
        Err(e) => error!("Failed to start reminder scheduler: {}", e),
    }

    info!(
        "Starting web server on {}:{}",
        settings.host, settings.port
    );
    start_web_server(settings, AppState::new(automation)).await
}
