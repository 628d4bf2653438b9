//! Alert relay: dashboard webhook in, alert card out to the default room.

use {
    axum::{
        extract::{Json, State},
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    netpulse_cards::{CardError, RichMessage},
    netpulse_common::types::AlertPayload,
    netpulse_webex::{DeliveryOutcome, Recipient},
    serde_json::Value,
    tracing::{error, info, warn},
};

use crate::state::AppState;

/// Plain-text body of every alert message; clients that cannot render the
/// card show this instead.
pub const ALERT_FALLBACK_TEXT: &str = "Meraki Alert Card";

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("invalid alert payload: {0}")]
    Payload(#[from] netpulse_common::Error),

    #[error("cannot build alert card: {0}")]
    Card(#[from] CardError),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Payload(_) | Self::Card(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Validate `body`, build the alert card and post it to the default room.
///
/// Delivery is at most once: a send the platform rejects is logged and
/// reported as its outcome, never as an error, so the caller does not retry.
pub async fn relay_alert(state: &AppState, body: Value) -> Result<DeliveryOutcome, RelayError> {
    let alert = AlertPayload::from_value(body)?;
    let card = state.zone.alert_card(&alert)?;
    let message = RichMessage::card(ALERT_FALLBACK_TEXT, card);

    let outcome = state
        .session
        .send(&message, &Recipient::default_room())
        .await;
    match outcome {
        DeliveryOutcome::Sent => {
            info!(
                alert_type = %alert.alert_type,
                device = %alert.device_name,
                "relayed alert"
            );
            Ok(outcome)
        },
        DeliveryOutcome::SkippedPrecondition => {
            warn!(alert_type = %alert.alert_type, "alert not relayed, no alert room");
            Ok(outcome)
        },
        DeliveryOutcome::Failed | DeliveryOutcome::ExhaustedRetries => {
            warn!(
                alert_type = %alert.alert_type,
                device = %alert.device_name,
                "alert card was not delivered"
            );
            Ok(outcome)
        },
    }
}

pub async fn alert_handler(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    match relay_alert(&state, body).await {
        Ok(_) => (StatusCode::OK, "Done").into_response(),
        Err(e) => {
            error!(error = ?e, "alert relay failed");
            (e.status(), e.to_string()).into_response()
        },
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, crate::testing::Harness, serde_json::json};

    fn alert() -> Value {
        json!({
            "occurredAt": "2023-05-01T14:30:00Z",
            "alertLevel": "critical",
            "alertType": "APs went down",
            "organizationName": "Acme",
            "organizationUrl": "https://dashboard.example.com/o/1",
            "networkName": "HQ",
            "networkUrl": "https://dashboard.example.com/n/1",
            "deviceName": "ap-lobby",
            "deviceModel": "MR46",
            "deviceUrl": "https://dashboard.example.com/d/1",
            "deviceSerial": "Q2XX-AAAA-BBBB"
        })
    }

    #[tokio::test]
    async fn alert_card_goes_to_default_room() {
        let harness = Harness::new().with_room("room-1");
        let outcome = relay_alert(&harness.state, alert()).await.unwrap();

        assert_eq!(outcome, DeliveryOutcome::Sent);
        let sent = harness.api.messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["roomId"], "room-1");
        assert_eq!(sent[0]["markdown"], ALERT_FALLBACK_TEXT);
        let card = sent[0]["attachments"][0]["content"].to_string();
        assert!(card.contains("Mon May 01 2023 02:30 PM"));
        assert!(card.contains("[Device Link](https://dashboard.example.com/d/1)"));
    }

    #[tokio::test]
    async fn missing_field_is_a_bad_request() {
        let harness = Harness::new().with_room("room-1");
        let mut body = alert();
        body.as_object_mut().unwrap().remove("deviceSerial");

        let err = relay_alert(&harness.state, body).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("deviceSerial"));
        assert!(harness.api.messages().is_empty());
    }

    #[tokio::test]
    async fn bad_timestamp_is_a_bad_request() {
        let harness = Harness::new().with_room("room-1");
        let mut body = alert();
        body["occurredAt"] = json!("yesterday");

        let err = relay_alert(&harness.state, body).await.unwrap_err();
        assert!(matches!(err, RelayError::Card(CardError::InvalidTimestamp { .. })));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn no_room_skips_without_failing() {
        let harness = Harness::new();
        let outcome = relay_alert(&harness.state, alert()).await.unwrap();
        assert_eq!(outcome, DeliveryOutcome::SkippedPrecondition);
        assert!(harness.api.messages().is_empty());
    }

    #[tokio::test]
    async fn rejected_send_is_swallowed() {
        let harness = Harness::new().with_room("room-1").with_failing_messages();
        let outcome = relay_alert(&harness.state, alert()).await.unwrap();
        assert_eq!(outcome, DeliveryOutcome::Failed);
        assert_eq!(harness.api.messages().len(), 1);
    }

    #[tokio::test]
    async fn handler_answers_done_when_send_fails() {
        let harness = Harness::new().with_room("room-1").with_failing_messages();
        let resp = alert_handler(State(harness.state.clone()), Json(alert())).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"Done");
        assert_eq!(harness.api.messages().len(), 1);
    }

    #[tokio::test]
    async fn handler_rejects_invalid_payload() {
        let harness = Harness::new().with_room("room-1");
        let resp = alert_handler(State(harness.state.clone()), Json(json!({}))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(harness.api.messages().is_empty());
    }
}
