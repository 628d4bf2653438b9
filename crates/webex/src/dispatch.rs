use {
    netpulse_cards::RichMessage,
    tracing::{debug, warn},
};

use crate::{
    session::WebexSession,
    types::{CreateMessage, DeliveryOutcome, Destination, Precondition, Recipient},
};

impl WebexSession {
    /// Resolve `recipient` against the default room, logging a warning when
    /// it is missing or ambiguous.
    pub(crate) fn destination_for(&self, recipient: &Recipient) -> Option<Destination> {
        match recipient.resolve(self.default_room_id()) {
            Ok(destination) => Some(destination),
            Err(Precondition::Missing) => {
                warn!("no person email or room id supplied, not sending message");
                None
            },
            Err(Precondition::Ambiguous) => {
                warn!("both person email and room id supplied, not sending message");
                None
            },
        }
    }

    /// Send `message` to exactly one destination.
    ///
    /// Fire-and-forget: platform and transport failures are logged and
    /// reported as [`DeliveryOutcome::Failed`], never returned as errors.
    pub async fn send(&self, message: &RichMessage, recipient: &Recipient) -> DeliveryOutcome {
        let Some(destination) = self.destination_for(recipient) else {
            return DeliveryOutcome::SkippedPrecondition;
        };
        self.send_to(message, &destination).await
    }

    /// Plain markdown message.
    pub async fn send_text(&self, markdown: &str, recipient: &Recipient) -> DeliveryOutcome {
        self.send(&RichMessage::text(markdown), recipient).await
    }

    pub(crate) async fn send_to(
        &self,
        message: &RichMessage,
        destination: &Destination,
    ) -> DeliveryOutcome {
        let request = CreateMessage::new(destination, message);
        match self.api().create_message(&request).await {
            Ok(sent) => {
                debug!(
                    message_id = %sent.id,
                    cards = message.attachments().len(),
                    "message sent"
                );
                DeliveryOutcome::Sent
            },
            Err(e) => {
                warn!(error = %e, "exception occurred while trying to send message");
                DeliveryOutcome::Failed
            },
        }
    }
}
