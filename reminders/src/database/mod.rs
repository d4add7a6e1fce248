//! Database layer for the reminder engine.
//!
//! This module provides SQLite persistence for:
//! - The automation configuration record (`system_config`)
//! - Reminder outcomes (`notification_records`), also used for dedup
//! - Per-run execution statistics (`automation_executions`)
//! - Read access to the CRM appointment tables
//!
//! The module is organized into submodules:
//! - `records` - All record types (entities)
//! - `settings` - Key/value configuration rows
//! - `notifications` - Reminder outcome log
//! - `executions` - Execution statistics
//! - `appointments` - Candidate selection over CRM tables
//!
//! Schema is created once in [`Database::new`]; runtime queries assume it.

mod appointments;
mod executions;
mod notifications;
mod records;
mod settings;

pub use records::*;

use anyhow::Result;
use sqlx::{Pool, Sqlite, SqlitePool};
use std::path::Path;
use tracing::{error, info};

const SCHEMA: &[(&str, &str)] = &[
    (
        "system_config",
        r#"
        CREATE TABLE IF NOT EXISTS system_config (
            config_key TEXT PRIMARY KEY,
            config_value TEXT NOT NULL,
            updated_at DATETIME NOT NULL
        )
        "#,
    ),
    (
        "notification_records",
        r#"
        CREATE TABLE IF NOT EXISTS notification_records (
            id TEXT PRIMARY KEY,
            clinic_id TEXT NOT NULL,
            patient_id TEXT NOT NULL,
            appointment_id TEXT NOT NULL,
            sender_id TEXT NOT NULL,
            sender_type TEXT NOT NULL,
            message_type TEXT NOT NULL,
            content TEXT NOT NULL,
            status TEXT NOT NULL,
            message_date DATETIME NOT NULL,
            metadata TEXT NOT NULL
        )
        "#,
    ),
    (
        "idx_notification_dedup",
        "CREATE INDEX IF NOT EXISTS idx_notification_dedup ON notification_records(appointment_id, message_type, message_date DESC)",
    ),
    (
        "automation_executions",
        r#"
        CREATE TABLE IF NOT EXISTS automation_executions (
            id TEXT PRIMARY KEY,
            automation_type TEXT NOT NULL,
            execution_date DATETIME NOT NULL,
            trigger_source TEXT NOT NULL,
            success_count INTEGER NOT NULL DEFAULT 0,
            error_count INTEGER NOT NULL DEFAULT 0,
            skipped_count INTEGER NOT NULL DEFAULT 0,
            total_processed INTEGER NOT NULL DEFAULT 0,
            config_used TEXT,
            error_message TEXT
        )
        "#,
    ),
    (
        "idx_executions_type_date",
        "CREATE INDEX IF NOT EXISTS idx_executions_type_date ON automation_executions(automation_type, execution_date DESC)",
    ),
    // CRM tables; created here only so a standalone deployment has them
    (
        "clinics",
        r#"
        CREATE TABLE IF NOT EXISTS clinics (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            address TEXT,
            phone TEXT
        )
        "#,
    ),
    (
        "patients",
        r#"
        CREATE TABLE IF NOT EXISTS patients (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT
        )
        "#,
    ),
    (
        "doctors",
        r#"
        CREATE TABLE IF NOT EXISTS doctors (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL
        )
        "#,
    ),
    (
        "appointments",
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id TEXT PRIMARY KEY,
            patient_id TEXT NOT NULL,
            doctor_id TEXT NOT NULL,
            clinic_id TEXT NOT NULL,
            appointment_date TEXT NOT NULL,
            appointment_time TEXT NOT NULL,
            status TEXT NOT NULL,
            patient_email TEXT
        )
        "#,
    ),
    (
        "idx_appointments_date_status",
        "CREATE INDEX IF NOT EXISTS idx_appointments_date_status ON appointments(appointment_date, status)",
    ),
];

pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Expose pool for integration test queries
    #[allow(dead_code)]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn new(database_path: &str) -> Result<Self> {
        info!("Database path: {}", database_path);

        if let Some(parent) = Path::new(database_path).parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                error!("Failed to create parent directory {:?}: {}", parent, e);
                return Err(e.into());
            }
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path);
        let pool = match SqlitePool::connect(&database_url).await {
            Ok(pool) => pool,
            Err(e) => {
                error!("Failed to connect to database {}: {}", database_url, e);
                return Err(e.into());
            }
        };

        let database = Self::from_pool(pool).await?;
        info!("Database initialized at {}", database_path);
        Ok(database)
    }

    /// Wrap an existing pool and create the schema on it
    pub async fn from_pool(pool: Pool<Sqlite>) -> Result<Self> {
        let database = Self { pool };
        database.initialize_tables().await?;
        Ok(database)
    }

    async fn initialize_tables(&self) -> Result<()> {
        for (name, sql) in SCHEMA {
            if let Err(e) = sqlx::query(sql).execute(&self.pool).await {
                error!("Failed to create {}: {}", name, e);
                return Err(e.into());
            }
        }
        info!("Database schema ready ({} objects)", SCHEMA.len());
        Ok(())
    }
}
