use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::user::errors::NotifierError;
use crate::user::ports::Notifier;
use crate::user::ports::Template;

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Notification adapter for an HTTP transactional-mail API.
///
/// Retries transient failures with linear backoff between attempts; the
/// caller only ever sees overall success or failure. The final failure
/// returns immediately so the registration compensation path is not stalled.
pub struct MailApiNotifier {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from_email: String,
    retry_delay: Duration,
}

impl MailApiNotifier {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        from_email: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            from_email: from_email.into(),
            retry_delay: RETRY_DELAY,
        }
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}

#[async_trait]
impl Notifier for MailApiNotifier {
    async fn send(
        &self,
        template: Template,
        recipient_name: &str,
        recipient_address: &str,
        data: serde_json::Value,
        sandbox: bool,
    ) -> Result<(), NotifierError> {
        let payload = json!({
            "template": template.key(),
            "from": { "email": self.from_email },
            "to": { "name": recipient_name, "email": recipient_address },
            "data": data,
            "sandbox": sandbox,
        });

        for attempt in 1..=MAX_RETRIES {
            let response = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&payload)
                .send()
                .await;

            match response {
                Ok(response) if response.status().is_success() => {
                    tracing::info!(
                        template = template.key(),
                        status = response.status().as_u16(),
                        "Notification sent"
                    );
                    return Ok(());
                }
                Ok(response) => {
                    tracing::warn!(
                        template = template.key(),
                        status = response.status().as_u16(),
                        attempt,
                        max_attempts = MAX_RETRIES,
                        "Mail API rejected notification"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        template = template.key(),
                        error = %e,
                        attempt,
                        max_attempts = MAX_RETRIES,
                        "Notification dispatch failed"
                    );
                }
            }

            // Backoff runs between attempts only, never after the last one.
            if attempt < MAX_RETRIES {
                tokio::time::sleep(self.retry_delay * attempt).await;
            }
        }

        Err(NotifierError::SendFailed(format!(
            "giving up after {} attempts",
            MAX_RETRIES
        )))
    }
}
