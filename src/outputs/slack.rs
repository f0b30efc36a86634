//! Best-effort delivery of the digest to a Slack incoming webhook.
//!
//! The digest is posted once as `{"text": ...}`. Nothing here returns an
//! error: a missing webhook, a rejected post or a network failure is logged
//! and reported as a [`Delivery`] outcome.

use crate::transport::Transport;
use crate::utils::truncate_for_log;
use serde_json::json;
use tracing::{error, info, instrument, warn};

/// What happened to a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// No webhook configured.
    Skipped,
    Delivered,
    /// The webhook answered with a status other than 200.
    Rejected { status: u16, body: String },
    /// The request never got a response.
    Failed(String),
}

/// Post `text` to `webhook_url`. Single attempt, never retried.
#[instrument(level = "info", skip_all, fields(bytes = text.len()))]
pub async fn notify<T: Transport>(transport: &T, webhook_url: Option<&str>, text: &str) -> Delivery {
    let Some(url) = webhook_url else {
        warn!("Slack webhook URL is not set; skipping notification");
        return Delivery::Skipped;
    };

    let payload = json!({ "text": text });
    match transport.post_json(url, &payload).await {
        Ok(resp) if resp.status == 200 => {
            info!("Digest posted to Slack");
            Delivery::Delivered
        }
        Ok(resp) => {
            error!(
                status = resp.status,
                body = %truncate_for_log(&resp.body, 300),
                "Slack rejected the notification"
            );
            Delivery::Rejected {
                status: resp.status,
                body: resp.body,
            }
        }
        Err(e) => {
            error!(error = %e, "Slack notification failed");
            Delivery::Failed(e.to_string())
        }
    }
}
