pub mod config;
pub mod constants;
pub mod database;
pub mod errors;
pub mod scheduler;
pub mod services;
pub mod web;

// Re-export commonly used types
pub use config::{AutomationConfig, AutomationConfigUpdate, ConfigStore, Settings, SettingsManager};
pub use database::Database;
pub use errors::{AutomationError, AutomationResult};
pub use scheduler::{CronSchedule, CronTriggerBackend, ReminderScheduler, TriggerBackend};
pub use services::{
    AuditLog, AutomationService, NotificationSender, ReminderJob, WebhookNotificationSender,
};
