// File: reminders/src/scheduler/trigger.rs
use async_trait::async_trait;
use chrono_tz::Tz;
use futures::future::BoxFuture;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, info};
use uuid::Uuid;

use super::CronSchedule;
use crate::errors::SchedulerError;

/// Work executed on every firing of a trigger
pub type TriggerTask = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Registers and cancels recurring triggers
#[async_trait]
pub trait TriggerBackend: Send + Sync {
    async fn register(
        &self,
        schedule: &CronSchedule,
        timezone: Tz,
        task: TriggerTask,
    ) -> Result<Uuid, SchedulerError>;

    async fn cancel(&self, trigger_id: Uuid) -> Result<(), SchedulerError>;
}

/// [`TriggerBackend`] over tokio-cron-scheduler (6-field, seconds first)
pub struct CronTriggerBackend {
    scheduler: JobScheduler,
}

impl CronTriggerBackend {
    pub async fn new() -> Result<Self, SchedulerError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| SchedulerError::InitFailed {
                reason: e.to_string(),
            })?;

        scheduler
            .start()
            .await
            .map_err(|e| SchedulerError::InitFailed {
                reason: e.to_string(),
            })?;

        info!("Cron trigger backend started");
        Ok(Self { scheduler })
    }
}

#[async_trait]
impl TriggerBackend for CronTriggerBackend {
    async fn register(
        &self,
        schedule: &CronSchedule,
        timezone: Tz,
        task: TriggerTask,
    ) -> Result<Uuid, SchedulerError> {
        let expression = schedule.to_six_field();

        let job = Job::new_async_tz(expression.as_str(), timezone, move |_uuid, _scheduler| {
            task()
        })
        .map_err(|e| SchedulerError::RegisterFailed {
            schedule: schedule.to_string(),
            reason: e.to_string(),
        })?;

        let trigger_id = self
            .scheduler
            .add(job)
            .await
            .map_err(|e| SchedulerError::RegisterFailed {
                schedule: schedule.to_string(),
                reason: e.to_string(),
            })?;

        debug!("Registered trigger {} for '{}' ({})", trigger_id, expression, timezone);
        Ok(trigger_id)
    }

    async fn cancel(&self, trigger_id: Uuid) -> Result<(), SchedulerError> {
        self.scheduler
            .remove(&trigger_id)
            .await
            .map_err(|e| SchedulerError::CancelFailed {
                trigger_id: trigger_id.to_string(),
                reason: e.to_string(),
            })
    }
}
