// File: reminders/src/web/server.rs
use crate::config::Settings;
use crate::web::{handlers, AppState};
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub async fn start_web_server(settings: Arc<Settings>, state: AppState) -> Result<()> {
    let app = create_router(state);
    let addr = format!("{}:{}", settings.host, settings.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health_check))
        // === APPOINTMENT REMINDER AUTOMATION ===
        .route(
            "/api/automation/reminders/config",
            get(handlers::get_reminder_config).put(handlers::update_reminder_config),
        )
        .route(
            "/api/automation/reminders/stats",
            get(handlers::get_reminder_stats),
        )
        .route(
            "/api/automation/reminders/history",
            get(handlers::get_reminder_history),
        )
        .route(
            "/api/automation/reminders/run-manual",
            post(handlers::run_reminders_manually),
        )
        .route(
            "/api/automation/reminders/start",
            post(handlers::start_reminder_scheduler),
        )
        .route(
            "/api/automation/reminders/stop",
            post(handlers::stop_reminder_scheduler),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
