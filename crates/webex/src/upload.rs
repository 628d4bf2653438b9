use std::time::Duration;

use tracing::{debug, info, warn};

use crate::{
    session::WebexSession,
    types::{DeliveryOutcome, FileUpload, Precondition, Recipient},
};

pub const CONFIG_FILENAME: &str = "config.txt";
pub const CONFIG_MIME: &str = "text/plain";
pub const UPLOAD_CAPTION: &str = "Here is the device configuration.";
pub const CONFIG_UNAVAILABLE_TEXT: &str = "Configuration is not available for this device.";

/// Fixed-delay retry budget for file uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay: Duration::from_secs(3),
        }
    }
}

impl WebexSession {
    /// Upload `content` as `config.txt`, retrying until the platform answers 200.
    ///
    /// `None` content sends [`CONFIG_UNAVAILABLE_TEXT`] instead. A recipient
    /// that resolves to nothing is a silent no-op. Exhausting the retry
    /// budget is logged, not returned as an error.
    pub async fn upload_attachment(
        &self,
        content: Option<&str>,
        recipient: &Recipient,
    ) -> DeliveryOutcome {
        let Some(content) = content else {
            debug!("no configuration available, sending notice instead");
            return self.send_text(CONFIG_UNAVAILABLE_TEXT, recipient).await;
        };

        let destination = match recipient.resolve(self.default_room_id()) {
            Ok(destination) => destination,
            Err(Precondition::Missing) => {
                debug!("upload skipped: no destination");
                return DeliveryOutcome::SkippedPrecondition;
            },
            Err(Precondition::Ambiguous) => {
                warn!("both person email and room id supplied, not uploading file");
                return DeliveryOutcome::SkippedPrecondition;
            },
        };

        let upload = FileUpload {
            destination: &destination,
            markdown: UPLOAD_CAPTION,
            filename: CONFIG_FILENAME,
            mime: CONFIG_MIME,
            content,
        };

        let retry = self.retry_policy();
        for attempt in 1..=retry.attempts {
            match self.api().upload_file(&upload).await {
                Ok(200) => {
                    info!(attempt, bytes = content.len(), "configuration uploaded");
                    return DeliveryOutcome::Sent;
                },
                Ok(status) => warn!(attempt, status, "configuration upload rejected"),
                Err(e) => warn!(attempt, error = %e, "configuration upload failed"),
            }
            if attempt < retry.attempts {
                tokio::time::sleep(retry.delay).await;
            }
        }

        warn!(
            attempts = retry.attempts,
            "giving up on configuration upload"
        );
        DeliveryOutcome::ExhaustedRetries
    }
}
