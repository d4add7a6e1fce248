//! Trigger backend that records registrations and fires them on demand

use async_trait::async_trait;
use chrono_tz::Tz;
use std::sync::Mutex;
use uuid::Uuid;

use reminders::errors::SchedulerError;
use reminders::scheduler::{CronSchedule, TriggerBackend, TriggerTask};

pub struct RegisteredTrigger {
    pub id: Uuid,
    pub expression: String,
    pub timezone: Tz,
    pub task: TriggerTask,
}

#[derive(Default)]
pub struct RecordingTriggerBackend {
    live: Mutex<Vec<RegisteredTrigger>>,
    cancelled: Mutex<Vec<Uuid>>,
}

impl RecordingTriggerBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.lock().unwrap().len()
    }

    pub fn cancelled_count(&self) -> usize {
        self.cancelled.lock().unwrap().len()
    }

    /// Six-field expressions of the live triggers
    pub fn live_expressions(&self) -> Vec<String> {
        self.live
            .lock()
            .unwrap()
            .iter()
            .map(|trigger| trigger.expression.clone())
            .collect()
    }

    pub fn live_timezones(&self) -> Vec<Tz> {
        self.live
            .lock()
            .unwrap()
            .iter()
            .map(|trigger| trigger.timezone)
            .collect()
    }

    /// Run every live trigger once, as if its time had come
    pub async fn fire_all(&self) {
        let tasks: Vec<TriggerTask> = self
            .live
            .lock()
            .unwrap()
            .iter()
            .map(|trigger| trigger.task.clone())
            .collect();

        for task in tasks {
            task().await;
        }
    }
}

#[async_trait]
impl TriggerBackend for RecordingTriggerBackend {
    async fn register(
        &self,
        schedule: &CronSchedule,
        timezone: Tz,
        task: TriggerTask,
    ) -> Result<Uuid, SchedulerError> {
        let id = Uuid::new_v4();
        self.live.lock().unwrap().push(RegisteredTrigger {
            id,
            expression: schedule.to_six_field(),
            timezone,
            task,
        });
        Ok(id)
    }

    async fn cancel(&self, trigger_id: Uuid) -> Result<(), SchedulerError> {
        self.live.lock().unwrap().retain(|trigger| trigger.id != trigger_id);
        self.cancelled.lock().unwrap().push(trigger_id);
        Ok(())
    }
}
