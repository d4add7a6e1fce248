// File: reminders/src/services/audit_log.rs
//! Append-only outcome log for the reminder automation.
//!
//! Notification records double as the dedup oracle; execution stats feed
//! the trailing-window report.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::AutomationConfig;
use crate::constants::{reminders, stats, storage};
use crate::database::{
    Database, DeliveryStatus, ExecutionStat, ExecutionTotals, NotificationMetadata,
    NotificationRecord, ReminderCandidate,
};
use crate::errors::RunError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailingStats {
    pub window_days: i64,
    #[serde(flatten)]
    pub totals: ExecutionTotals,
    pub recent_executions: Vec<ExecutionStat>,
}

pub struct AuditLog {
    db: Arc<Database>,
}

impl AuditLog {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Whether a reminder for the appointment went out within the dedup lookback
    pub async fn was_sent_recently(
        &self,
        appointment_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, RunError> {
        let since = now - Duration::hours(reminders::DEDUP_LOOKBACK_HOURS);
        self.db
            .has_sent_notification_since(appointment_id, reminders::CHANNEL, since)
            .await
            .map_err(|e| RunError::DedupCheckFailed {
                appointment_id: appointment_id.to_string(),
                reason: e.to_string(),
            })
    }

    pub async fn record_sent(
        &self,
        candidate: &ReminderCandidate,
        config: &AutomationConfig,
        message_id: Option<&str>,
    ) -> Result<NotificationRecord, RunError> {
        let record = NotificationRecord {
            id: Uuid::new_v4().to_string(),
            clinic_id: candidate.clinic_id.clone(),
            patient_id: candidate.patient_id.clone(),
            appointment_id: candidate.id.clone(),
            sender_id: reminders::SENDER_SYSTEM.to_string(),
            sender_type: reminders::SENDER_SYSTEM.to_string(),
            message_type: reminders::CHANNEL.to_string(),
            content: format!(
                "template={}; messageId={}",
                config.template_type,
                message_id.unwrap_or("-")
            ),
            status: DeliveryStatus::Sent,
            message_date: Utc::now(),
            metadata: NotificationMetadata {
                appointment_id: candidate.id.clone(),
                doctor_id: candidate.doctor_id.clone(),
                automated: true,
                days_in_advance: config.days_in_advance,
            },
        };

        self.db
            .insert_notification_record(&record)
            .await
            .map_err(|e| RunError::AuditWriteFailed {
                record: format!("notification record for {}", candidate.id),
                reason: e.to_string(),
            })?;
        Ok(record)
    }

    pub async fn record_execution(&self, stat: &ExecutionStat) -> Result<(), RunError> {
        self.db
            .insert_execution_stat(stat)
            .await
            .map_err(|e| RunError::AuditWriteFailed {
                record: format!("execution stat {}", stat.id),
                reason: e.to_string(),
            })
    }

    pub fn new_execution_stat(trigger: &str) -> ExecutionStat {
        ExecutionStat {
            id: Uuid::new_v4().to_string(),
            automation_type: storage::AUTOMATION_TYPE.to_string(),
            execution_date: Utc::now(),
            trigger: trigger.to_string(),
            success_count: 0,
            error_count: 0,
            skipped_count: 0,
            total_processed: 0,
            config_used: None,
            error_message: None,
        }
    }

    pub async fn trailing_stats(&self, now: DateTime<Utc>) -> Result<TrailingStats> {
        let since = now - Duration::days(stats::TRAILING_DAYS);
        let totals = self
            .db
            .get_execution_totals_since(storage::AUTOMATION_TYPE, since)
            .await?;
        let recent_executions = self
            .db
            .get_recent_execution_stats(storage::AUTOMATION_TYPE, stats::RECENT_EXECUTIONS)
            .await?;

        Ok(TrailingStats {
            window_days: stats::TRAILING_DAYS,
            totals,
            recent_executions,
        })
    }

    pub async fn history(&self, limit: i64) -> Result<Vec<NotificationRecord>> {
        let limit = limit.clamp(1, stats::MAX_HISTORY_LIMIT);
        self.db
            .get_recent_notification_records(reminders::CHANNEL, limit)
            .await
    }
}
