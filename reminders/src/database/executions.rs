//! Execution statistics for automation runs.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::Row;
use tracing::debug;

use super::records::{ExecutionStat, ExecutionTotals};
use super::Database;

impl Database {
    pub async fn insert_execution_stat(&self, stat: &ExecutionStat) -> Result<()> {
        debug!(
            "Storing execution stat {} ({} sent, {} errors, {} processed)",
            stat.id, stat.success_count, stat.error_count, stat.total_processed
        );

        let config_used = stat
            .config_used
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        sqlx::query(
            r#"
            INSERT INTO automation_executions (
                id, automation_type, execution_date, trigger_source, success_count,
                error_count, skipped_count, total_processed, config_used, error_message
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&stat.id)
        .bind(&stat.automation_type)
        .bind(stat.execution_date)
        .bind(&stat.trigger)
        .bind(stat.success_count)
        .bind(stat.error_count)
        .bind(stat.skipped_count)
        .bind(stat.total_processed)
        .bind(config_used)
        .bind(&stat.error_message)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_execution_totals_since(
        &self,
        automation_type: &str,
        since: DateTime<Utc>,
    ) -> Result<ExecutionTotals> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS executions,
                   COALESCE(SUM(success_count), 0) AS total_sent,
                   COALESCE(SUM(error_count), 0) AS total_errors,
                   COALESCE(SUM(total_processed), 0) AS total_processed,
                   MAX(execution_date) AS last_execution
            FROM automation_executions
            WHERE automation_type = ? AND execution_date >= ?
            "#,
        )
        .bind(automation_type)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(ExecutionTotals {
            executions: row.try_get("executions")?,
            total_sent: row.try_get("total_sent")?,
            total_errors: row.try_get("total_errors")?,
            total_processed: row.try_get("total_processed")?,
            last_execution: row.try_get("last_execution")?,
        })
    }

    pub async fn get_recent_execution_stats(
        &self,
        automation_type: &str,
        limit: i64,
    ) -> Result<Vec<ExecutionStat>> {
        let rows = sqlx::query(
            r#"
            SELECT id, automation_type, execution_date, trigger_source, success_count,
                   error_count, skipped_count, total_processed, config_used, error_message
            FROM automation_executions
            WHERE automation_type = ?
            ORDER BY execution_date DESC
            LIMIT ?
            "#,
        )
        .bind(automation_type)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut stats = Vec::with_capacity(rows.len());
        for row in rows {
            let config_used: Option<String> = row.try_get("config_used")?;
            stats.push(ExecutionStat {
                id: row.try_get("id")?,
                automation_type: row.try_get("automation_type")?,
                execution_date: row.try_get("execution_date")?,
                trigger: row.try_get("trigger_source")?,
                success_count: row.try_get("success_count")?,
                error_count: row.try_get("error_count")?,
                skipped_count: row.try_get("skipped_count")?,
                total_processed: row.try_get("total_processed")?,
                config_used: config_used
                    .map(|value| serde_json::from_str(&value))
                    .transpose()?,
                error_message: row.try_get("error_message")?,
            });
        }
        Ok(stats)
    }
}
