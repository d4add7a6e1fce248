//! Recurring trigger for the appointment-reminder job
//!
//! # Features
//!
//! - **5-field cron schedules**: stored as `minute hour day month dow`,
//!   converted to the seconds-first form the backend expects
//! - **Fixed timezone**: every schedule fires in [`crate::constants::schedule::TIMEZONE`]
//! - **Single trigger**: `start` replaces any trigger already registered
//! - **Idempotent stop**: stopping an idle scheduler is a no-op
//!
//! Stopping only cancels future firings; a run already in progress finishes.

pub mod cron;
pub mod trigger;

pub use cron::CronSchedule;
pub use trigger::{CronTriggerBackend, TriggerBackend, TriggerTask};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::constants::schedule::TIMEZONE;
use crate::errors::SchedulerError;

pub struct ReminderScheduler {
    backend: Arc<dyn TriggerBackend>,
    registered: Mutex<Vec<Uuid>>,
    active: AtomicBool,
}

impl ReminderScheduler {
    pub fn new(backend: Arc<dyn TriggerBackend>) -> Self {
        Self {
            backend,
            registered: Mutex::new(Vec::new()),
            active: AtomicBool::new(false),
        }
    }

    /// Whether a live trigger is currently registered
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Register the one recurring trigger, replacing any existing one
    #[instrument(skip(self, task), fields(schedule = %schedule))]
    pub async fn start(&self, schedule: &CronSchedule, task: TriggerTask) -> Result<(), SchedulerError> {
        let mut registered = self.registered.lock().await;
        self.cancel_registered(&mut registered).await;

        let trigger_id = self.backend.register(schedule, TIMEZONE, task).await?;
        registered.push(trigger_id);
        self.active.store(true, Ordering::SeqCst);

        info!(
            "Reminder trigger {} scheduled at '{}' ({})",
            trigger_id,
            schedule,
            TIMEZONE.name()
        );
        Ok(())
    }

    /// Cancel every registered trigger. Returns how many were registered.
    pub async fn stop(&self) -> usize {
        let mut registered = self.registered.lock().await;
        let count = self.cancel_registered(&mut registered).await;
        if count > 0 {
            info!("Reminder scheduler stopped ({} trigger(s) cancelled)", count);
        }
        count
    }

    async fn cancel_registered(&self, registered: &mut Vec<Uuid>) -> usize {
        let count = registered.len();
        for trigger_id in registered.drain(..) {
            if let Err(e) = self.backend.cancel(trigger_id).await {
                error!("{}", e);
            }
        }
        self.active.store(false, Ordering::SeqCst);
        count
    }
}
