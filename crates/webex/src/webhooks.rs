//! Keeps the bot's webhook registrations equal to the canonical pair.
//!
//! Synchronization is delete-all-then-create: it does not diff against what
//! is already registered, and a failure between the two phases leaves the
//! bot with no subscriptions until the next run.

use {
    serde::Serialize,
    tracing::{debug, info},
};

use crate::{error::Result, session::WebexSession};

pub const MESSAGES_WEBHOOK_NAME: &str = "netpulse messages";
pub const ATTACHMENT_ACTIONS_WEBHOOK_NAME: &str = "netpulse attachment actions";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WebhookResource {
    #[serde(rename = "messages")]
    Messages,
    #[serde(rename = "attachmentActions")]
    AttachmentActions,
}

impl WebhookResource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Messages => "messages",
            Self::AttachmentActions => "attachmentActions",
        }
    }
}

/// Registration body for `POST /webhooks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSubscription {
    pub name: String,
    pub target_url: String,
    pub resource: WebhookResource,
    pub event: String,
}

/// The fixed set of subscriptions the bot needs, all pointed at `target_url`.
pub fn desired_subscriptions(target_url: &str) -> [WebhookSubscription; 2] {
    let subscription = |name: &str, resource| WebhookSubscription {
        name: name.to_string(),
        target_url: target_url.to_string(),
        resource,
        event: "created".into(),
    };
    [
        subscription(MESSAGES_WEBHOOK_NAME, WebhookResource::Messages),
        subscription(
            ATTACHMENT_ACTIONS_WEBHOOK_NAME,
            WebhookResource::AttachmentActions,
        ),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub deleted: usize,
    pub created: usize,
}

impl WebexSession {
    /// Replace every registered webhook with [`desired_subscriptions`].
    ///
    /// Not safe to run concurrently with itself.
    pub async fn synchronize(&self, target_url: &str) -> Result<SyncReport> {
        let api = self.api();
        let existing = api.list_webhooks().await?;
        debug!(count = existing.len(), "existing webhooks");

        for webhook in &existing {
            api.delete_webhook(&webhook.id).await?;
            debug!(
                webhook_id = %webhook.id,
                name = %webhook.name,
                resource = %webhook.resource,
                "deleted webhook"
            );
        }

        let desired = desired_subscriptions(target_url);
        for subscription in &desired {
            let created = api.create_webhook(subscription).await?;
            debug!(
                webhook_id = %created.id,
                resource = subscription.resource.as_str(),
                "created webhook"
            );
        }

        let report = SyncReport {
            deleted: existing.len(),
            created: desired.len(),
        };
        info!(
            target_url,
            deleted = report.deleted,
            created = report.created,
            "webhooks synchronized"
        );
        Ok(report)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use {super::*, crate::fake::{Call, FakeWebexApi}, rstest::rstest};

    #[test]
    fn desired_set_is_messages_and_attachment_actions() {
        let desired = desired_subscriptions("https://bot.example.com/webexbot");
        let pairs: Vec<_> = desired
            .iter()
            .map(|s| (s.resource.as_str(), s.event.as_str()))
            .collect();
        assert_eq!(pairs, vec![
            ("messages", "created"),
            ("attachmentActions", "created")
        ]);
        assert!(
            desired
                .iter()
                .all(|s| s.target_url == "https://bot.example.com/webexbot")
        );
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(4)]
    #[tokio::test]
    async fn deletes_all_then_creates_two(#[case] existing: usize) {
        let api = Arc::new(FakeWebexApi::default().with_webhooks(existing));
        let session = WebexSession::new(api.clone(), None);

        let report = session.synchronize("https://bot.example.com/hook").await.unwrap();
        assert_eq!(report, SyncReport {
            deleted: existing,
            created: 2,
        });

        let calls = api.calls();
        assert_eq!(calls[0], Call::ListWebhooks);
        let deletes = &calls[1..=existing];
        assert!(deletes.iter().all(|c| matches!(c, Call::DeleteWebhook(_))));
        let creates: Vec<_> = calls[existing + 1..]
            .iter()
            .map(|c| match c {
                Call::CreateWebhook(resource, target) => {
                    assert_eq!(target, "https://bot.example.com/hook");
                    *resource
                },
                other => panic!("unexpected call {other:?}"),
            })
            .collect();
        assert_eq!(creates, vec![
            WebhookResource::Messages,
            WebhookResource::AttachmentActions
        ]);
    }

    #[tokio::test]
    async fn delete_failure_stops_before_create() {
        let api = Arc::new(
            FakeWebexApi::default()
                .with_webhooks(2)
                .failing_webhook_deletes(),
        );
        let session = WebexSession::new(api.clone(), None);
        assert!(session.synchronize("https://x/hook").await.is_err());
        assert!(
            !api.calls()
                .iter()
                .any(|c| matches!(c, Call::CreateWebhook(..)))
        );
    }
}
