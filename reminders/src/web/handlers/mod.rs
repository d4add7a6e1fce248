//! HTTP request handlers for the reminders API.
//!
//! - `automation` - Config, stats, history and control of the reminder job
//! - `common` - Response envelope, query structs and error mapping
//! - `health` - Liveness endpoint

pub mod automation;
pub mod common;
pub mod health;

pub use automation::*;
pub use health::*;
