// File: reminders/src/services/automation_service.rs
//! Owner of the reminder automation's runtime state.
//!
//! One instance is built at startup and shared by `Arc` with the control API.
//! It owns the config store, the audit log, the job and the scheduler, and is
//! the only place that starts, stops or reconfigures the recurring trigger.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::config::{AutomationConfig, AutomationConfigUpdate, ConfigStore};
use crate::constants::schedule::TIMEZONE;
use crate::database::NotificationRecord;
use crate::errors::AutomationResult;
use crate::scheduler::{CronSchedule, ReminderScheduler, TriggerTask};
use crate::services::audit_log::{AuditLog, TrailingStats};
use crate::services::reminder_job::{ReminderJob, RunOutcome, RunTrigger};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationStats {
    pub config: AutomationConfig,
    pub is_active: bool,
    pub is_running: bool,
    pub timezone: String,
    pub next_run: Option<DateTime<FixedOffset>>,
    pub trailing_stats: TrailingStats,
}

pub struct AutomationService {
    config_store: Arc<ConfigStore>,
    audit_log: Arc<AuditLog>,
    job: Arc<ReminderJob>,
    scheduler: ReminderScheduler,
    // Serializes start/stop/update so two triggers can never be registered
    lifecycle: Mutex<()>,
}

impl AutomationService {
    pub fn new(
        config_store: Arc<ConfigStore>,
        audit_log: Arc<AuditLog>,
        job: Arc<ReminderJob>,
        scheduler: ReminderScheduler,
    ) -> Self {
        Self {
            config_store,
            audit_log,
            job,
            scheduler,
            lifecycle: Mutex::new(()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.scheduler.is_active()
    }

    /// Load the stored config and register the trigger if enabled.
    /// Returns whether the scheduler ended up active.
    pub async fn start(&self) -> AutomationResult<bool> {
        let _lifecycle = self.lifecycle.lock().await;
        self.start_locked().await
    }

    pub async fn stop(&self) {
        let _lifecycle = self.lifecycle.lock().await;
        self.scheduler.stop().await;
    }

    pub async fn get_config(&self) -> AutomationConfig {
        self.config_store.current().await
    }

    /// Persist a partial update, then restart the scheduler so it applies
    #[instrument(skip(self))]
    pub async fn update_config(
        &self,
        update: &AutomationConfigUpdate,
    ) -> AutomationResult<AutomationConfig> {
        let _lifecycle = self.lifecycle.lock().await;

        let config = self.config_store.save(update).await?;
        self.scheduler.stop().await;
        self.start_locked().await?;
        Ok(config)
    }

    pub async fn get_stats(&self) -> AutomationResult<AutomationStats> {
        let config = self.config_store.current().await;
        let now = Utc::now();

        let next_run = CronSchedule::parse(&config.schedule)
            .ok()
            .and_then(|schedule| schedule.next_run_after(&now.with_timezone(&TIMEZONE)))
            .map(|next| next.fixed_offset());

        let trailing_stats = self.audit_log.trailing_stats(now).await?;

        Ok(AutomationStats {
            config,
            is_active: self.scheduler.is_active(),
            is_running: self.job.is_running(),
            timezone: TIMEZONE.name().to_string(),
            next_run,
            trailing_stats,
        })
    }

    /// Run the job now and wait for it. Honors `enabled=false` like a
    /// scheduled firing and fails if a run is already in flight.
    pub async fn run_manual(&self) -> AutomationResult<RunOutcome> {
        let config = self.config_store.current().await;
        info!("Manual reminder run requested");
        Ok(self.job.run_exclusive(&config, RunTrigger::Manual).await?)
    }

    pub async fn history(&self, limit: i64) -> AutomationResult<Vec<NotificationRecord>> {
        Ok(self.audit_log.history(limit).await?)
    }

    async fn start_locked(&self) -> AutomationResult<bool> {
        let config = self.config_store.load().await;

        if !config.enabled {
            info!("Appointment reminders disabled, scheduler not started");
            return Ok(false);
        }

        let schedule = CronSchedule::parse(&config.schedule)?;
        self.scheduler
            .start(&schedule, self.scheduled_task())
            .await?;
        Ok(true)
    }

    fn scheduled_task(&self) -> TriggerTask {
        let job = self.job.clone();
        let config_store = self.config_store.clone();

        Arc::new(move || {
            let job = job.clone();
            let config_store = config_store.clone();

            Box::pin(async move {
                let config = config_store.current().await;
                match job.run_exclusive(&config, RunTrigger::Scheduled).await {
                    Ok(RunOutcome::Completed(summary)) => info!(
                        "Scheduled reminder run done: {} sent, {} errors",
                        summary.success_count, summary.error_count
                    ),
                    Ok(RunOutcome::Failed { error, .. }) => {
                        warn!("Scheduled reminder run failed: {}", error)
                    }
                    Ok(RunOutcome::Disabled) => {}
                    Err(e) => warn!("Skipping scheduled reminder run: {}", e),
                }
            })
        })
    }
}
