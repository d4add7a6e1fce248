// File: reminders/src/services/mod.rs

pub mod appointment_source;
pub mod audit_log;
pub mod automation_service;
pub mod notification_sender;
pub mod reminder_job;

pub use appointment_source::AppointmentSource;
pub use audit_log::AuditLog;
pub use automation_service::{AutomationService, AutomationStats};
pub use notification_sender::{
    NotificationSender, ReminderContext, SendOutcome, WebhookNotificationSender,
};
pub use reminder_job::{ReminderJob, RunOutcome, RunSummary, RunTrigger};
