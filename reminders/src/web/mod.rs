// File: reminders/src/web/mod.rs
pub mod handlers;
pub mod server;

pub use server::{create_router, start_web_server};

use std::sync::Arc;

use crate::services::AutomationService;

// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub automation: Arc<AutomationService>,
}

impl AppState {
    pub fn new(automation: Arc<AutomationService>) -> Self {
        Self { automation }
    }
}
