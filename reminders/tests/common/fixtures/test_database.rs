//! Test database utilities for in-memory SQLite testing

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;

use reminders::database::Database;

use super::test_data::{clinics, doctors};

/// In-memory database with the full schema plus one clinic and doctor
pub struct TestDatabase {
    pub db: Arc<Database>,
}

impl TestDatabase {
    pub async fn new() -> Result<Self> {
        // One connection: every in-memory connection is a separate database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let db = Arc::new(Database::from_pool(pool).await?);
        let test_db = Self { db };

        sqlx::query("INSERT INTO clinics (id, name, address, phone) VALUES (?, ?, ?, ?)")
            .bind(clinics::CLINIC_1)
            .bind(clinics::CLINIC_1_NAME)
            .bind("Av. Juárez 10, CDMX")
            .bind("+52 55 1234 5678")
            .execute(test_db.db.pool())
            .await?;

        sqlx::query("INSERT INTO doctors (id, name) VALUES (?, ?)")
            .bind(doctors::DOCTOR_1)
            .bind(doctors::DOCTOR_1_NAME)
            .execute(test_db.db.pool())
            .await?;

        Ok(test_db)
    }

    pub async fn add_patient(&self, id: &str, name: &str, email: &str) -> Result<()> {
        sqlx::query("INSERT INTO patients (id, name, email) VALUES (?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(email)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    /// Insert an appointment with the shared clinic and doctor
    pub async fn add_appointment(
        &self,
        id: &str,
        patient_id: &str,
        date: NaiveDate,
        time: &str,
        status: &str,
        patient_email: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO appointments
                (id, patient_id, doctor_id, clinic_id, appointment_date, appointment_time, status, patient_email)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(patient_id)
        .bind(doctors::DOCTOR_1)
        .bind(clinics::CLINIC_1)
        .bind(date.format("%Y-%m-%d").to_string())
        .bind(time)
        .bind(status)
        .bind(patient_email)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Pending appointment with an email, the common case
    pub async fn add_pending(
        &self,
        id: &str,
        patient_id: &str,
        date: NaiveDate,
        email: &str,
    ) -> Result<()> {
        self.add_appointment(id, patient_id, date, "10:30", "pending", Some(email))
            .await
    }

    /// Reminder row as another writer would leave it, bypassing the audit log
    pub async fn add_notification(
        &self,
        appointment_id: &str,
        patient_id: &str,
        status: &str,
        message_date: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notification_records (
                id, clinic_id, patient_id, appointment_id, sender_id, sender_type,
                message_type, content, status, message_date, metadata
            ) VALUES (?, ?, ?, ?, 'system', 'system', 'Recordatorio', 'seeded', ?, ?, ?)
            "#,
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(clinics::CLINIC_1)
        .bind(patient_id)
        .bind(appointment_id)
        .bind(status)
        .bind(message_date)
        .bind(format!(
            r#"{{"appointmentId":"{}","doctorId":"{}","automated":true,"daysInAdvance":1}}"#,
            appointment_id,
            doctors::DOCTOR_1
        ))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn count(&self, table: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(self.db.pool())
            .await?;
        Ok(count)
    }

    pub async fn drop_table(&self, table: &str) -> Result<()> {
        sqlx::query(&format!("DROP TABLE {}", table))
            .execute(self.db.pool())
            .await?;
        Ok(())
    }
}
