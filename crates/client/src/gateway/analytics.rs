//! Analytics endpoint.
//!
//! Event tracking is fire-and-forget: a lost event is acceptable, a
//! blocked UI interaction is not. Failures are logged and dropped; they
//! never reach the caller.

use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::debug;

use super::ApiGateway;

#[derive(Debug, Serialize)]
struct AnalyticsEvent<'a> {
    event: &'a str,
    properties: serde_json::Value,
}

impl ApiGateway {
    // =========================================================================
    // Analytics Methods (fire-and-forget)
    // =========================================================================

    /// Record an analytics event without blocking the caller.
    ///
    /// No-op when no analytics key is configured.
    pub fn track(&self, event: &str, properties: serde_json::Value) {
        let Some(key) = self.analytics_key() else {
            return;
        };
        let key = key.expose_secret().to_string();
        let gateway = self.clone();
        let event = event.to_string();

        tokio::spawn(async move {
            let url = gateway.url("analytics/events");
            let payload = AnalyticsEvent {
                event: &event,
                properties,
            };
            let result = gateway
                .inner
                .client
                .post(&url)
                .header("X-Analytics-Key", key)
                .json(&payload)
                .send()
                .await;
            match result {
                Ok(response) if response.status().is_success() => {}
                Ok(response) => {
                    debug!(event = %event, status = %response.status(), "Analytics event rejected");
                }
                Err(e) => {
                    debug!(event = %event, error = %e, "Analytics event failed");
                }
            }
        });
    }
}
