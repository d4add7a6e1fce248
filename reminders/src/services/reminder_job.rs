// File: reminders/src/services/reminder_job.rs
//! The appointment-reminder run.
//!
//! One run selects the pending appointments dated `today + daysInAdvance`,
//! skips the ones already reminded within the dedup lookback, sends the rest
//! one at a time with a pause in between, and records one execution stat.
//! Failures are contained: one candidate never ends the loop, audit writes
//! never block delivery, and a failed candidate query only ends this run.
//!
//! Runs are single-flight. [`ReminderJob::run_exclusive`] refuses to start
//! while another run holds the guard, so a manual run cannot overlap a
//! scheduled one and double-send past the dedup check.

use chrono::{Days, NaiveDate, Utc};
use futures::FutureExt;
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

use crate::config::AutomationConfig;
use crate::constants::{reminders, schedule};
use crate::database::ReminderCandidate;
use crate::errors::RunError;
use crate::services::appointment_source::{is_deliverable_email, AppointmentSource};
use crate::services::audit_log::AuditLog;
use crate::services::notification_sender::{NotificationSender, ReminderContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunTrigger {
    Scheduled,
    Manual,
}

impl RunTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunTrigger::Scheduled => "scheduled",
            RunTrigger::Manual => "manual",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub target_date: NaiveDate,
    pub success_count: i64,
    pub error_count: i64,
    pub skipped_count: i64,
    pub total_processed: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RunOutcome {
    /// `enabled=false`: nothing selected, nothing recorded
    Disabled,
    Completed(RunSummary),
    /// The run could not select candidates; a failed execution stat was
    /// recorded. `target_date` is today when the target itself overflowed.
    Failed {
        #[serde(rename = "targetDate")]
        target_date: NaiveDate,
        error: String,
    },
}

enum CandidateOutcome {
    Sent,
    AlreadySent,
}

/// Marks a run as in flight for as long as it lives, panics included
struct RunningFlag<'a>(&'a AtomicBool);

impl<'a> RunningFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for RunningFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Current calendar date in the clinic's timezone
pub fn clinic_today() -> NaiveDate {
    Utc::now().with_timezone(&schedule::TIMEZONE).date_naive()
}

pub struct ReminderJob {
    appointments: Arc<dyn AppointmentSource>,
    sender: Arc<dyn NotificationSender>,
    audit_log: Arc<AuditLog>,
    item_delay: Duration,
    run_guard: Mutex<()>,
    // Set by the guard holder; read by `is_running` without touching the guard
    running: AtomicBool,
}

impl ReminderJob {
    pub fn new(
        appointments: Arc<dyn AppointmentSource>,
        sender: Arc<dyn NotificationSender>,
        audit_log: Arc<AuditLog>,
    ) -> Self {
        Self {
            appointments,
            sender,
            audit_log,
            item_delay: reminders::INTER_ITEM_DELAY,
            run_guard: Mutex::new(()),
            running: AtomicBool::new(false),
        }
    }

    pub fn with_item_delay(mut self, item_delay: Duration) -> Self {
        self.item_delay = item_delay;
        self
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Run once for today's clinic date unless another run is in flight
    pub async fn run_exclusive(
        &self,
        config: &AutomationConfig,
        trigger: RunTrigger,
    ) -> Result<RunOutcome, RunError> {
        let _guard = self.run_guard.try_lock().map_err(|_| RunError::InProgress)?;
        let _running = RunningFlag::raise(&self.running);
        Ok(self.execute(config, trigger, clinic_today()).await)
    }

    /// One run relative to `today`. Callers outside tests go through
    /// [`ReminderJob::run_exclusive`].
    #[instrument(skip(self, config, trigger), fields(trigger = trigger.as_str()))]
    pub async fn execute(
        &self,
        config: &AutomationConfig,
        trigger: RunTrigger,
        today: NaiveDate,
    ) -> RunOutcome {
        if !config.enabled {
            info!("Appointment reminders are disabled, skipping run");
            return RunOutcome::Disabled;
        }

        let target_date = match today.checked_add_days(Days::new(u64::from(config.days_in_advance))) {
            Some(target_date) => target_date,
            None => {
                let e = RunError::TargetDateOutOfRange {
                    days_in_advance: config.days_in_advance,
                };
                error!("Reminder run aborted: {}", e);
                self.record_failed_run(trigger, &e).await;
                return RunOutcome::Failed {
                    target_date: today,
                    error: e.to_string(),
                };
            }
        };
        info!("Starting reminder run for appointments on {}", target_date);

        let candidates = match self.select_candidates(target_date).await {
            Ok(candidates) => candidates,
            Err(e) => {
                error!("Reminder run aborted: {}", e);
                self.record_failed_run(trigger, &e).await;
                return RunOutcome::Failed {
                    target_date,
                    error: e.to_string(),
                };
            }
        };

        let mut summary = RunSummary {
            target_date,
            success_count: 0,
            error_count: 0,
            skipped_count: 0,
            total_processed: candidates.len() as i64,
        };

        for (index, candidate) in candidates.iter().enumerate() {
            if index > 0 && !self.item_delay.is_zero() {
                tokio::time::sleep(self.item_delay).await;
            }

            let processed = AssertUnwindSafe(self.process_candidate(candidate, config))
                .catch_unwind()
                .await;

            match processed {
                Ok(Ok(CandidateOutcome::Sent)) => summary.success_count += 1,
                Ok(Ok(CandidateOutcome::AlreadySent)) => summary.skipped_count += 1,
                Ok(Err(e)) => {
                    summary.error_count += 1;
                    warn!("{}", e);
                }
                Err(_) => {
                    summary.error_count += 1;
                    error!(
                        "Unexpected panic while processing appointment {}",
                        candidate.id
                    );
                }
            }
        }

        info!(
            "Reminder run finished for {}: {} sent, {} errors, {} skipped, {} processed",
            target_date,
            summary.success_count,
            summary.error_count,
            summary.skipped_count,
            summary.total_processed
        );

        self.record_completed_run(trigger, config, &summary).await;
        RunOutcome::Completed(summary)
    }

    async fn select_candidates(
        &self,
        target_date: NaiveDate,
    ) -> Result<Vec<ReminderCandidate>, RunError> {
        let appointments = self
            .appointments
            .pending_on(target_date)
            .await
            .map_err(|e| RunError::CandidateQueryFailed {
                reason: e.to_string(),
            })?;

        let total = appointments.len();
        let candidates: Vec<ReminderCandidate> = appointments
            .into_iter()
            .filter(|appointment| is_deliverable_email(&appointment.patient_email))
            .collect();

        if candidates.len() < total {
            info!(
                "Ignoring {} appointments without a deliverable email",
                total - candidates.len()
            );
        }
        Ok(candidates)
    }

    async fn process_candidate(
        &self,
        candidate: &ReminderCandidate,
        config: &AutomationConfig,
    ) -> Result<CandidateOutcome, RunError> {
        if self
            .audit_log
            .was_sent_recently(&candidate.id, Utc::now())
            .await?
        {
            info!(
                "Reminder already sent for appointment {} in the last {}h, skipping",
                candidate.id,
                reminders::DEDUP_LOOKBACK_HOURS
            );
            return Ok(CandidateOutcome::AlreadySent);
        }

        let context = ReminderContext::from_candidate(candidate, &config.template_type);
        let outcome = self
            .sender
            .send(&context)
            .await
            .map_err(|e| RunError::SendFailed {
                appointment_id: candidate.id.clone(),
                reason: format!("unexpected error: {}", e),
            })?;

        if !outcome.success {
            return Err(RunError::SendFailed {
                appointment_id: candidate.id.clone(),
                reason: outcome
                    .error
                    .unwrap_or_else(|| "unknown delivery error".to_string()),
            });
        }

        info!(
            "Reminder sent for appointment {} to {}",
            candidate.id, context.patient.email
        );

        if let Err(e) = self
            .audit_log
            .record_sent(candidate, config, outcome.message_id.as_deref())
            .await
        {
            error!("{}", e);
        }

        Ok(CandidateOutcome::Sent)
    }

    async fn record_completed_run(
        &self,
        trigger: RunTrigger,
        config: &AutomationConfig,
        summary: &RunSummary,
    ) {
        let mut stat = AuditLog::new_execution_stat(trigger.as_str());
        stat.success_count = summary.success_count;
        stat.error_count = summary.error_count;
        stat.skipped_count = summary.skipped_count;
        stat.total_processed = summary.total_processed;
        stat.config_used = serde_json::to_value(config).ok();

        if let Err(e) = self.audit_log.record_execution(&stat).await {
            error!("{}", e);
        }
    }

    async fn record_failed_run(&self, trigger: RunTrigger, failure: &RunError) {
        let mut stat = AuditLog::new_execution_stat(trigger.as_str());
        stat.error_message = Some(failure.to_string());

        if let Err(e) = self.audit_log.record_execution(&stat).await {
            error!("{}", e);
        }
    }
}
