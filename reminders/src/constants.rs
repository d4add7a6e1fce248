//! Central repository for reminder-engine constants
//!
//! Organized by concern so the timing, naming and default values used by the
//! scheduler, the job and the persistence layer have a single source of truth.

use std::time::Duration;

/// Scheduling constants
pub mod schedule {
    use chrono_tz::Tz;

    /// Deployment-wide timezone every schedule and "today" is evaluated in
    pub const TIMEZONE: Tz = chrono_tz::America::Mexico_City;

    /// Default schedule: daily at 08:00
    pub const DEFAULT_CRON: &str = "0 8 * * *";
}

/// Reminder job constants
pub mod reminders {
    use super::Duration;

    /// Pause between two candidates so the delivery channel is not flooded
    pub const INTER_ITEM_DELAY: Duration = Duration::from_secs(1);

    /// Window in which an already-sent reminder suppresses another send
    pub const DEDUP_LOOKBACK_HOURS: i64 = 24;

    /// Message type stored on every reminder record
    pub const CHANNEL: &str = "Recordatorio";

    /// Sender type and id recorded for automated messages
    pub const SENDER_SYSTEM: &str = "system";

    /// Only appointments in this status are reminded
    pub const PENDING_STATUS: &str = "pending";

    /// Addresses the front desk types in when a patient has no email
    pub const PLACEHOLDER_EMAILS: &[&str] = &[
        "noemail@noemail.com",
        "sin-email@clinica.com",
        "sincorreo@clinica.com",
        "no-email@clinic.local",
        "correo@correo.com",
        "n/a",
        "none",
    ];
}

/// Persistence keys and names
pub mod storage {
    /// Key of the single automation config row in `system_config`
    pub const CONFIG_KEY: &str = "appointment_reminders";

    /// `automation_type` written on every execution stat
    pub const AUTOMATION_TYPE: &str = "appointment_reminders";
}

/// Statistics window and limits
pub mod stats {
    /// Days of execution history aggregated by `get_stats`
    pub const TRAILING_DAYS: i64 = 30;

    /// Most recent executions listed in the stats payload
    pub const RECENT_EXECUTIONS: i64 = 10;

    /// Default and maximum page size for the history endpoint
    pub const DEFAULT_HISTORY_LIMIT: i64 = 50;
    pub const MAX_HISTORY_LIMIT: i64 = 500;
}

/// Default configuration values
pub mod defaults {
    /// Default automation toggle
    pub const ENABLED: bool = true;

    /// Days between the reminder and the appointment
    pub const DAYS_IN_ADVANCE: u32 = 1;

    /// Upper bound accepted for `daysInAdvance` (about ten years)
    pub const MAX_DAYS_IN_ADVANCE: u32 = 3650;

    /// Template handed to the delivery service
    pub const TEMPLATE_TYPE: &str = "appointment_reminder";

    /// Stored with the config; not consulted by the send path
    pub const MAX_RETRIES: u32 = 3;

    /// Delivery webhook request timeout in seconds
    pub const DELIVERY_TIMEOUT_SECONDS: u64 = 10;

    /// Default bind address of the control API
    pub const HOST: &str = "0.0.0.0";
    pub const PORT: u16 = 8096;

    /// Default SQLite location
    pub const DATABASE_PATH: &str = "data/clinic.db";
}
