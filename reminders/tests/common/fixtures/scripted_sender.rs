//! Notification sender with per-appointment scripted behavior

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use reminders::services::{NotificationSender, ReminderContext, SendOutcome};

#[derive(Default)]
pub struct ScriptedSender {
    failing: HashSet<String>,
    erroring: HashSet<String>,
    panicking: HashSet<String>,
    delay: Duration,
    sent: Mutex<Vec<ReminderContext>>,
}

impl ScriptedSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `success == false` for this appointment
    pub fn failing_for(mut self, appointment_id: &str) -> Self {
        self.failing.insert(appointment_id.to_string());
        self
    }

    /// Return `Err` for this appointment
    pub fn erroring_for(mut self, appointment_id: &str) -> Self {
        self.erroring.insert(appointment_id.to_string());
        self
    }

    pub fn panicking_for(mut self, appointment_id: &str) -> Self {
        self.panicking.insert(appointment_id.to_string());
        self
    }

    /// Sleep before answering, to keep a run in flight
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Every context handed to `send`, in call order
    pub fn calls(&self) -> Vec<ReminderContext> {
        self.sent.lock().unwrap().clone()
    }

    pub fn called_ids(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|context| context.appointment.id)
            .collect()
    }
}

#[async_trait]
impl NotificationSender for ScriptedSender {
    async fn send(&self, context: &ReminderContext) -> Result<SendOutcome> {
        self.sent.lock().unwrap().push(context.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let id = &context.appointment.id;
        if self.panicking.contains(id) {
            panic!("scripted panic for {}", id);
        }
        if self.erroring.contains(id) {
            return Err(anyhow!("scripted transport error for {}", id));
        }
        if self.failing.contains(id) {
            return Ok(SendOutcome::failed(format!("mailbox rejected {}", id)));
        }
        Ok(SendOutcome::delivered(Some(format!("msg-{}", id))))
    }
}
