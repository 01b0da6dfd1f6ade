//! Discord webhook notifications -- best-effort status reporting.

/// Fire-and-forget delivery of human-readable status strings. Failures are
/// logged locally and never surfaced to the caller.
#[allow(async_fn_in_trait)]
pub trait NotifySink {
    async fn send(&self, message: &str);
}

/// Posts messages to a Discord webhook. A missing URL disables delivery.
#[derive(Clone)]
pub struct DiscordNotifier {
    webhook_url: Option<String>,
    http: reqwest::Client,
}

impl DiscordNotifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        if webhook_url.is_none() {
            tracing::info!("No Discord webhook configured, notifications disabled");
        }
        Self {
            webhook_url,
            http: reqwest::Client::new(),
        }
    }
}

impl NotifySink for DiscordNotifier {
    async fn send(&self, message: &str) {
        let Some(url) = &self.webhook_url else {
            return;
        };

        let body = serde_json::json!({ "content": message });

        match self.http.post(url).json(&body).send().await {
            // Discord answers 204 on success
            Ok(resp) if resp.status().is_success() => {}
            Ok(resp) => {
                tracing::warn!("Discord webhook returned HTTP {}", resp.status());
            }
            Err(e) => {
                tracing::warn!("Failed to send Discord message: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_notifier_is_a_noop() {
        // Must return without attempting any network call.
        let notifier = DiscordNotifier::new(None);
        notifier.send("hello").await;
    }
}
