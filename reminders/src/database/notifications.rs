//! Reminder outcome log.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

use super::records::{DeliveryStatus, NotificationMetadata, NotificationRecord};
use super::Database;

impl Database {
    pub async fn insert_notification_record(&self, record: &NotificationRecord) -> Result<()> {
        debug!(
            "Storing {} notification record for appointment {}",
            record.status.as_str(),
            record.appointment_id
        );

        let metadata = serde_json::to_string(&record.metadata)?;

        sqlx::query(
            r#"
            INSERT INTO notification_records (
                id, clinic_id, patient_id, appointment_id, sender_id, sender_type,
                message_type, content, status, message_date, metadata
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.clinic_id)
        .bind(&record.patient_id)
        .bind(&record.appointment_id)
        .bind(&record.sender_id)
        .bind(&record.sender_type)
        .bind(&record.message_type)
        .bind(&record.content)
        .bind(record.status.as_str())
        .bind(record.message_date)
        .bind(metadata)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Whether a `sent` record of `message_type` exists for the appointment
    /// at or after `since`
    pub async fn has_sent_notification_since(
        &self,
        appointment_id: &str,
        message_type: &str,
        since: DateTime<Utc>,
    ) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS sent_count
            FROM notification_records
            WHERE appointment_id = ?
              AND message_type = ?
              AND status = 'sent'
              AND message_date >= ?
            "#,
        )
        .bind(appointment_id)
        .bind(message_type)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        let count: i64 = row.try_get("sent_count")?;
        Ok(count > 0)
    }

    pub async fn get_recent_notification_records(
        &self,
        message_type: &str,
        limit: i64,
    ) -> Result<Vec<NotificationRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, clinic_id, patient_id, appointment_id, sender_id, sender_type,
                   message_type, content, status, message_date, metadata
            FROM notification_records
            WHERE message_type = ?
            ORDER BY message_date DESC
            LIMIT ?
            "#,
        )
        .bind(message_type)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_notification_record).collect()
    }

    fn row_to_notification_record(row: &SqliteRow) -> Result<NotificationRecord> {
        let status: String = row.try_get("status")?;
        let metadata: String = row.try_get("metadata")?;

        Ok(NotificationRecord {
            id: row.try_get("id")?,
            clinic_id: row.try_get("clinic_id")?,
            patient_id: row.try_get("patient_id")?,
            appointment_id: row.try_get("appointment_id")?,
            sender_id: row.try_get("sender_id")?,
            sender_type: row.try_get("sender_type")?,
            message_type: row.try_get("message_type")?,
            content: row.try_get("content")?,
            status: DeliveryStatus::parse(&status)
                .ok_or_else(|| anyhow!("Unknown delivery status '{}'", status))?,
            message_date: row.try_get("message_date")?,
            metadata: serde_json::from_str::<NotificationMetadata>(&metadata)?,
        })
    }
}
