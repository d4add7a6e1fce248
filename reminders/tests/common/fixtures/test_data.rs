//! Common test data constants

use chrono::NaiveDate;

pub mod clinics {
    pub const CLINIC_1: &str = "clinic-centro";
    pub const CLINIC_1_NAME: &str = "Clínica Centro";
}

pub mod doctors {
    pub const DOCTOR_1: &str = "doctor-ramirez";
    pub const DOCTOR_1_NAME: &str = "Dra. Ramírez";
}

pub mod patients {
    pub const PATIENT_1: &str = "patient-ana";
    pub const PATIENT_2: &str = "patient-luis";
    pub const PATIENT_3: &str = "patient-sofia";
}

pub mod emails {
    pub const ANA: &str = "ana@example.com";
    pub const LUIS: &str = "luis@example.com";
    pub const SOFIA: &str = "sofia@example.com";
    pub const PLACEHOLDER: &str = "sin-email@clinica.com";
}

/// Fixed "today" used by tests that call `ReminderJob::execute` directly
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

pub fn tomorrow() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 11).unwrap()
}
