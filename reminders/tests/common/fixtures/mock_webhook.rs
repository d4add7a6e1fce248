//! Mock delivery webhook for testing reminder delivery
//!
//! Simulates the endpoint that renders and sends the reminder email, so tests
//! can check what was posted and how responses are interpreted.

use serde_json::{json, Value};
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const DELIVERY_PATH: &str = "/notifications/appointment-reminder";

pub struct MockDeliveryWebhook {
    pub server: MockServer,
}

impl MockDeliveryWebhook {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn url(&self) -> String {
        format!("{}{}", self.server.uri(), DELIVERY_PATH)
    }

    /// 200 with a provider message id
    pub async fn mock_delivered(&self, message_id: &str) {
        Mock::given(method("POST"))
            .and(path(DELIVERY_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "messageId": message_id
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_status(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path(DELIVERY_PATH))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_slow(&self, delay: Duration) {
        Mock::given(method("POST"))
            .and(path(DELIVERY_PATH))
            .respond_with(ResponseTemplate::new(200).set_delay(delay))
            .mount(&self.server)
            .await;
    }

    /// JSON bodies of every request the webhook received
    pub async fn received_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| request.body_json::<Value>().ok())
            .collect()
    }
}
