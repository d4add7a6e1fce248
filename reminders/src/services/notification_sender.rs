// File: reminders/src/services/notification_sender.rs
//! Delivery seam for reminders.
//!
//! The job only depends on [`NotificationSender`]: give it a context, get a
//! success flag back. Template rendering and transport live behind it. The
//! shipped implementation hands the context to a delivery webhook.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::database::ReminderCandidate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentContext {
    pub id: String,
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientContext {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorContext {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicContext {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
}

/// Everything a delivery needs for one reminder
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderContext {
    pub template_type: String,
    pub appointment: AppointmentContext,
    pub patient: PatientContext,
    pub doctor: DoctorContext,
    pub clinic: ClinicContext,
}

impl ReminderContext {
    pub fn from_candidate(candidate: &ReminderCandidate, template_type: &str) -> Self {
        Self {
            template_type: template_type.to_string(),
            appointment: AppointmentContext {
                id: candidate.id.clone(),
                date: candidate.date.clone(),
                time: candidate.time.clone(),
            },
            patient: PatientContext {
                id: candidate.patient_id.clone(),
                name: candidate.patient_name.clone(),
                email: candidate.patient_email.trim().to_string(),
            },
            doctor: DoctorContext {
                id: candidate.doctor_id.clone(),
                name: candidate.doctor_name.clone(),
            },
            clinic: ClinicContext {
                id: candidate.clinic_id.clone(),
                name: candidate.clinic_name.clone(),
                address: candidate.clinic_address.clone(),
                phone: candidate.clinic_phone.clone(),
            },
        }
    }
}

/// Delivery result: a success flag plus an optional provider id or reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOutcome {
    pub success: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

impl SendOutcome {
    pub fn delivered(message_id: Option<String>) -> Self {
        Self {
            success: true,
            message_id,
            error: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(reason.into()),
        }
    }
}

/// Delivers a single reminder. `Err` means something unexpected happened;
/// an ordinary delivery failure is `Ok` with `success == false`.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, context: &ReminderContext) -> Result<SendOutcome>;
}

/// Posts the reminder context as JSON to a delivery webhook
pub struct WebhookNotificationSender {
    webhook_url: String,
    client: Client,
    request_timeout: Duration,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeliveryResponse {
    message_id: Option<String>,
}

impl WebhookNotificationSender {
    pub fn new(webhook_url: String, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client for delivery webhook: {}", e))?;

        Ok(Self {
            webhook_url,
            client,
            request_timeout,
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.webhook_url.is_empty()
    }
}

#[async_trait]
impl NotificationSender for WebhookNotificationSender {
    async fn send(&self, context: &ReminderContext) -> Result<SendOutcome> {
        if !self.is_configured() {
            return Ok(SendOutcome::failed("delivery endpoint not configured"));
        }

        let request = self.client.post(&self.webhook_url).json(context).send();

        match timeout(self.request_timeout, request).await {
            Ok(Ok(response)) => {
                let status = response.status();
                if !status.is_success() {
                    warn!(
                        "Delivery webhook returned status {} for appointment {}",
                        status, context.appointment.id
                    );
                    return Ok(SendOutcome::failed(format!(
                        "delivery endpoint returned status {}",
                        status
                    )));
                }

                // A 2xx without a parsable body still counts as delivered
                let message_id = response
                    .json::<DeliveryResponse>()
                    .await
                    .ok()
                    .and_then(|body| body.message_id);
                debug!(
                    "Reminder delivered for appointment {} (message id {:?})",
                    context.appointment.id, message_id
                );
                Ok(SendOutcome::delivered(message_id))
            }
            Ok(Err(e)) => Ok(SendOutcome::failed(format!("delivery request failed: {}", e))),
            Err(_) => Ok(SendOutcome::failed("delivery request timed out")),
        }
    }
}
