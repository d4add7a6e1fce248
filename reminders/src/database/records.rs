//! Database record types (entities).
//!
//! This module contains all the record structs used by the database layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// CRM read model (owned by the clinic CRM, never written here)
// ============================================================================

/// An appointment due for a reminder, joined with the people it concerns.
/// Missing patient/doctor/clinic rows leave the names empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderCandidate {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub clinic_id: String,
    pub date: String,
    pub time: String,
    pub status: String,
    pub patient_email: String,
    pub patient_name: String,
    pub doctor_name: String,
    pub clinic_name: String,
    pub clinic_address: String,
    pub clinic_phone: String,
}

// ============================================================================
// Audit entities
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    // Never written by the reminder job; the CRM's own messaging writes
    // failed rows to the same table and history has to read them back
    Failed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Sent => "sent",
            DeliveryStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sent" => Some(DeliveryStatus::Sent),
            "failed" => Some(DeliveryStatus::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationMetadata {
    pub appointment_id: String,
    pub doctor_id: String,
    pub automated: bool,
    pub days_in_advance: u32,
}

/// One reminder outcome. Also the dedup source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    pub id: String,
    pub clinic_id: String,
    pub patient_id: String,
    pub appointment_id: String,
    pub sender_id: String,
    pub sender_type: String,
    pub message_type: String,
    pub content: String,
    pub status: DeliveryStatus,
    pub message_date: DateTime<Utc>,
    pub metadata: NotificationMetadata,
}

/// Aggregate outcome of one job run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStat {
    pub id: String,
    pub automation_type: String,
    pub execution_date: DateTime<Utc>,
    pub trigger: String,
    pub success_count: i64,
    pub error_count: i64,
    pub skipped_count: i64,
    pub total_processed: i64,
    pub config_used: Option<serde_json::Value>,
    pub error_message: Option<String>,
}

/// Sums over a window of execution stats
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionTotals {
    pub executions: i64,
    pub total_sent: i64,
    pub total_errors: i64,
    pub total_processed: i64,
    pub last_execution: Option<DateTime<Utc>>,
}
