//! This module provides reusable test utilities:
//! - In-memory test databases with CRM seed helpers
//! - A scripted notification sender
//! - A recording trigger backend that fires on demand
//! - A mock delivery webhook
//! - Common test data

// Each test binary uses a different subset of the fixtures
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mock_webhook;
pub mod recording_trigger;
pub mod scripted_sender;
pub mod test_data;
pub mod test_database;

// Re-export commonly used items
pub use mock_webhook::MockDeliveryWebhook;
pub use recording_trigger::RecordingTriggerBackend;
pub use scripted_sender::ScriptedSender;
pub use test_data::*;
pub use test_database::TestDatabase;
