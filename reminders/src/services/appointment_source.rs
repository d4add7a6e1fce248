// File: reminders/src/services/appointment_source.rs
//! Read access to the CRM's appointments.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::constants::reminders::{PENDING_STATUS, PLACEHOLDER_EMAILS};
use crate::database::{Database, ReminderCandidate};

/// Source of pending appointments on a given calendar date
#[async_trait]
pub trait AppointmentSource: Send + Sync {
    async fn pending_on(&self, date: NaiveDate) -> Result<Vec<ReminderCandidate>>;
}

#[async_trait]
impl AppointmentSource for Database {
    async fn pending_on(&self, date: NaiveDate) -> Result<Vec<ReminderCandidate>> {
        self.get_appointments_with_email_on(date, PENDING_STATUS).await
    }
}

/// An address we can actually deliver to: non-blank, has an `@`, and is not
/// one of the placeholders typed in for patients without email
pub fn is_deliverable_email(email: &str) -> bool {
    let normalized = email.trim().to_lowercase();
    if normalized.is_empty() || !normalized.contains('@') {
        return false;
    }
    !PLACEHOLDER_EMAILS.contains(&normalized.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_addresses_are_deliverable() {
        assert!(is_deliverable_email("x@y.com"));
        assert!(is_deliverable_email("  Maria.Lopez@Example.org "));
    }

    #[test]
    fn test_placeholders_and_blanks_are_filtered() {
        assert!(!is_deliverable_email(""));
        assert!(!is_deliverable_email("   "));
        assert!(!is_deliverable_email("N/A"));
        assert!(!is_deliverable_email("NoEmail@NoEmail.com"));
        assert!(!is_deliverable_email(" sin-email@clinica.com"));
        assert!(!is_deliverable_email("patient-without-at-sign"));
    }
}
