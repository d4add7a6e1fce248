//! Read-only queries over the CRM appointment tables.

use anyhow::Result;
use chrono::NaiveDate;
use sqlx::Row;
use tracing::debug;

use super::records::ReminderCandidate;
use super::Database;

impl Database {
    /// Appointments on `date` in `status` that carry a non-blank patient email,
    /// in table order
    pub async fn get_appointments_with_email_on(
        &self,
        date: NaiveDate,
        status: &str,
    ) -> Result<Vec<ReminderCandidate>> {
        let date = date.format("%Y-%m-%d").to_string();
        debug!("Querying {} appointments on {}", status, date);

        let rows = sqlx::query(
            r#"
            SELECT a.id, a.patient_id, a.doctor_id, a.clinic_id,
                   a.appointment_date, a.appointment_time, a.status, a.patient_email,
                   COALESCE(p.name, '') AS patient_name,
                   COALESCE(d.name, '') AS doctor_name,
                   COALESCE(c.name, '') AS clinic_name,
                   COALESCE(c.address, '') AS clinic_address,
                   COALESCE(c.phone, '') AS clinic_phone
            FROM appointments a
            LEFT JOIN patients p ON p.id = a.patient_id
            LEFT JOIN doctors d ON d.id = a.doctor_id
            LEFT JOIN clinics c ON c.id = a.clinic_id
            WHERE a.appointment_date = ?
              AND a.status = ?
              AND a.patient_email IS NOT NULL
              AND TRIM(a.patient_email) <> ''
            ORDER BY a.rowid
            "#,
        )
        .bind(&date)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        let mut candidates = Vec::with_capacity(rows.len());
        for row in rows {
            candidates.push(ReminderCandidate {
                id: row.try_get("id")?,
                patient_id: row.try_get("patient_id")?,
                doctor_id: row.try_get("doctor_id")?,
                clinic_id: row.try_get("clinic_id")?,
                date: row.try_get("appointment_date")?,
                time: row.try_get("appointment_time")?,
                status: row.try_get("status")?,
                patient_email: row.try_get("patient_email")?,
                patient_name: row.try_get("patient_name")?,
                doctor_name: row.try_get("doctor_name")?,
                clinic_name: row.try_get("clinic_name")?,
                clinic_address: row.try_get("clinic_address")?,
                clinic_phone: row.try_get("clinic_phone")?,
            });
        }

        debug!("Found {} appointments on {}", candidates.len(), date);
        Ok(candidates)
    }
}
