// Appointment reminder automation endpoints

use axum::{
    extract::{Query, State},
    response::Json,
};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use super::common::{error_response, ApiResponse, ApiResult, HistoryQuery};
use crate::config::{AutomationConfig, AutomationConfigUpdate};
use crate::database::NotificationRecord;
use crate::services::{AutomationStats, RunOutcome};
use crate::web::AppState;

pub async fn get_reminder_config(State(state): State<AppState>) -> ApiResult<AutomationConfig> {
    Ok(Json(ApiResponse::success(state.automation.get_config().await)))
}

/// Partial update; the scheduler is restarted so the new schedule applies
pub async fn update_reminder_config(
    State(state): State<AppState>,
    Json(update): Json<AutomationConfigUpdate>,
) -> ApiResult<AutomationConfig> {
    info!("Reminder config update requested: {:?}", update);

    match state.automation.update_config(&update).await {
        Ok(config) => Ok(Json(ApiResponse::success_with_message(
            config,
            "Reminder configuration updated",
        ))),
        Err(e) => {
            warn!("Failed to update reminder config: {}", e);
            Err(error_response(&e))
        }
    }
}

pub async fn get_reminder_stats(State(state): State<AppState>) -> ApiResult<AutomationStats> {
    match state.automation.get_stats().await {
        Ok(stats) => Ok(Json(ApiResponse::success(stats))),
        Err(e) => {
            error!("Failed to load reminder stats: {}", e);
            Err(error_response(&e))
        }
    }
}

pub async fn get_reminder_history(
    Query(query): Query<HistoryQuery>,
    State(state): State<AppState>,
) -> ApiResult<Vec<NotificationRecord>> {
    match state.automation.history(query.limit).await {
        Ok(records) => Ok(Json(ApiResponse::success(records))),
        Err(e) => {
            error!("Failed to load reminder history: {}", e);
            Err(error_response(&e))
        }
    }
}

/// Runs the job inline and returns its outcome
pub async fn run_reminders_manually(State(state): State<AppState>) -> ApiResult<RunOutcome> {
    match state.automation.run_manual().await {
        Ok(outcome) => Ok(Json(ApiResponse::success(outcome))),
        Err(e) => {
            warn!("Manual reminder run rejected: {}", e);
            Err(error_response(&e))
        }
    }
}

pub async fn start_reminder_scheduler(State(state): State<AppState>) -> ApiResult<Value> {
    match state.automation.start().await {
        Ok(active) => {
            let message = if active {
                "Reminder scheduler started"
            } else {
                "Reminders are disabled, scheduler not started"
            };
            Ok(Json(ApiResponse::success_with_message(
                json!({ "isActive": active }),
                message,
            )))
        }
        Err(e) => {
            error!("Failed to start reminder scheduler: {}", e);
            Err(error_response(&e))
        }
    }
}

pub async fn stop_reminder_scheduler(State(state): State<AppState>) -> ApiResult<Value> {
    state.automation.stop().await;
    Ok(Json(ApiResponse::success_with_message(
        json!({ "isActive": false }),
        "Reminder scheduler stopped",
    )))
}
