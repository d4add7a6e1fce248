//! Custom error types for the reminder engine
//!
//! Provides structured error handling with context for the failure classes the
//! automation distinguishes: configuration, job execution and scheduling.

use std::fmt;

/// Main error type for the reminder automation
#[derive(Debug)]
pub enum AutomationError {
    /// Configuration loading, validation and persistence errors
    Config(ConfigError),

    /// Reminder run errors
    Run(RunError),

    /// Trigger registration and cancellation errors
    Scheduler(SchedulerError),

    /// Other errors with context
    Other(String),
}

/// Configuration error variants
#[derive(Debug)]
pub enum ConfigError {
    /// Stored configuration could not be read; callers fall back to defaults
    Unavailable { reason: String },

    /// Writing the configuration record failed
    PersistFailed { reason: String },

    /// A field failed validation
    InvalidValue { field: String, reason: String },
}

/// Reminder run error variants
#[derive(Debug)]
pub enum RunError {
    /// Another run holds the single-flight guard
    InProgress,

    /// Selecting candidate appointments failed; the run is aborted
    CandidateQueryFailed { reason: String },

    /// `today + daysInAdvance` is not a representable date
    TargetDateOutOfRange { days_in_advance: u32 },

    /// The dedup lookup failed for one appointment
    DedupCheckFailed {
        appointment_id: String,
        reason: String,
    },

    /// Delivery failed for one appointment
    SendFailed {
        appointment_id: String,
        reason: String,
    },

    /// Writing a notification record or execution stat failed
    AuditWriteFailed { record: String, reason: String },
}

/// Scheduler error variants
#[derive(Debug)]
pub enum SchedulerError {
    /// Backend could not be created or started
    InitFailed { reason: String },

    /// A trigger could not be registered for the schedule
    RegisterFailed { schedule: String, reason: String },

    /// A registered trigger could not be removed
    CancelFailed { trigger_id: String, reason: String },
}

impl AutomationError {
    /// Whether the caller sent something that will never succeed as-is
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            AutomationError::Config(ConfigError::InvalidValue { .. })
                | AutomationError::Scheduler(SchedulerError::RegisterFailed { .. })
        )
    }

    /// Whether the failure is a busy guard that clears once the current run ends
    pub fn is_conflict(&self) -> bool {
        matches!(self, AutomationError::Run(RunError::InProgress))
    }
}

impl fmt::Display for AutomationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutomationError::Config(e) => write!(f, "Configuration error: {}", e),
            AutomationError::Run(e) => write!(f, "Reminder run error: {}", e),
            AutomationError::Scheduler(e) => write!(f, "Scheduler error: {}", e),
            AutomationError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Unavailable { reason } => {
                write!(f, "Stored configuration unavailable: {}", reason)
            }
            ConfigError::PersistFailed { reason } => {
                write!(f, "Failed to persist configuration: {}", reason)
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::InProgress => write!(f, "A reminder run is already in progress"),
            RunError::CandidateQueryFailed { reason } => {
                write!(f, "Failed to select reminder candidates: {}", reason)
            }
            RunError::TargetDateOutOfRange { days_in_advance } => {
                write!(
                    f,
                    "Target date is out of range for daysInAdvance={}",
                    days_in_advance
                )
            }
            RunError::DedupCheckFailed {
                appointment_id,
                reason,
            } => {
                write!(
                    f,
                    "Dedup check for appointment '{}' failed: {}",
                    appointment_id, reason
                )
            }
            RunError::SendFailed {
                appointment_id,
                reason,
            } => {
                write!(
                    f,
                    "Reminder for appointment '{}' failed: {}",
                    appointment_id, reason
                )
            }
            RunError::AuditWriteFailed { record, reason } => {
                write!(f, "Failed to write {}: {}", record, reason)
            }
        }
    }
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerError::InitFailed { reason } => {
                write!(f, "Failed to initialize scheduler: {}", reason)
            }
            SchedulerError::RegisterFailed { schedule, reason } => {
                write!(f, "Failed to schedule '{}': {}", schedule, reason)
            }
            SchedulerError::CancelFailed { trigger_id, reason } => {
                write!(f, "Failed to cancel trigger {}: {}", trigger_id, reason)
            }
        }
    }
}

impl std::error::Error for AutomationError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for RunError {}
impl std::error::Error for SchedulerError {}

impl From<anyhow::Error> for AutomationError {
    fn from(err: anyhow::Error) -> Self {
        AutomationError::Other(err.to_string())
    }
}

impl From<ConfigError> for AutomationError {
    fn from(err: ConfigError) -> Self {
        AutomationError::Config(err)
    }
}

impl From<RunError> for AutomationError {
    fn from(err: RunError) -> Self {
        AutomationError::Run(err)
    }
}

impl From<SchedulerError> for AutomationError {
    fn from(err: SchedulerError) -> Self {
        AutomationError::Scheduler(err)
    }
}

pub type AutomationResult<T> = Result<T, AutomationError>;
