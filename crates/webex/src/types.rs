use {
    netpulse_cards::{Attachment, RichMessage},
    serde::{Deserialize, Serialize},
};

// ── Destinations ────────────────────────────────────────────────────────────

/// Exactly one target for an outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Person(String),
    Room(String),
}

impl Destination {
    /// Form field name and value identifying this destination.
    pub fn field(&self) -> (&'static str, &str) {
        match self {
            Self::Person(email) => ("toPersonEmail", email),
            Self::Room(id) => ("roomId", id),
        }
    }
}

/// What a caller asked for: an optional person and an optional room.
///
/// Both being set is a caller error; neither being set falls back to the
/// session's default room.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipient {
    pub person_email: Option<String>,
    pub room_id: Option<String>,
}

/// Why a recipient could not be turned into a [`Destination`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// No person, no room, and no default room bound.
    Missing,
    /// Both a person and a room were supplied.
    Ambiguous,
}

impl Recipient {
    pub fn person(email: impl Into<String>) -> Self {
        Self {
            person_email: Some(email.into()),
            room_id: None,
        }
    }

    pub fn room(id: impl Into<String>) -> Self {
        Self {
            person_email: None,
            room_id: Some(id.into()),
        }
    }

    /// Target the session's default room.
    pub fn default_room() -> Self {
        Self::default()
    }

    pub fn resolve(&self, default_room: Option<&str>) -> Result<Destination, Precondition> {
        let person = self.person_email.as_deref().filter(|s| !s.is_empty());
        let room = self.room_id.as_deref().filter(|s| !s.is_empty());
        match (person, room) {
            (Some(_), Some(_)) => Err(Precondition::Ambiguous),
            (Some(email), None) => Ok(Destination::Person(email.to_string())),
            (None, Some(id)) => Ok(Destination::Room(id.to_string())),
            (None, None) => default_room
                .filter(|s| !s.is_empty())
                .map(|id| Destination::Room(id.to_string()))
                .ok_or(Precondition::Missing),
        }
    }
}

/// Result of a best-effort send. Delivery failures never surface as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    /// Destination missing or ambiguous; nothing was sent.
    SkippedPrecondition,
    /// Every upload attempt failed.
    ExhaustedRetries,
    /// The single message-create call failed.
    Failed,
}

impl DeliveryOutcome {
    pub fn is_sent(self) -> bool {
        matches!(self, Self::Sent)
    }
}

// ── Requests ────────────────────────────────────────────────────────────────

/// JSON body for `POST /messages`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessage<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_person_email: Option<&'a str>,
    pub markdown: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment<'a>>,
}

impl<'a> CreateMessage<'a> {
    pub fn new(destination: &'a Destination, message: &'a RichMessage) -> Self {
        let (room_id, to_person_email) = match destination {
            Destination::Room(id) => (Some(id.as_str()), None),
            Destination::Person(email) => (None, Some(email.as_str())),
        };
        Self {
            room_id,
            to_person_email,
            markdown: message.markdown(),
            attachments: message.wire_attachments(),
        }
    }
}

/// Multipart file message for `POST /messages`.
#[derive(Debug, Clone)]
pub struct FileUpload<'a> {
    pub destination: &'a Destination,
    pub markdown: &'a str,
    pub filename: &'a str,
    pub mime: &'a str,
    pub content: &'a str,
}

// ── Responses ───────────────────────────────────────────────────────────────

/// Paged list envelope used by every Webex list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemList<T> {
    pub items: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub id: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub room_type: Option<String>,
}

/// A room bound by name at session start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    pub id: String,
    pub name: String,
    pub target_url: String,
    pub resource: String,
    pub event: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    #[serde(default)]
    pub emails: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub room_type: Option<String>,
    #[serde(default)]
    pub person_id: Option<String>,
    #[serde(default)]
    pub person_email: Option<String>,
}

/// A submitted card, with the values of its inputs and the action's data.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentAction {
    pub id: String,
    #[serde(default)]
    pub person_id: Option<String>,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub inputs: serde_json::Map<String, serde_json::Value>,
}

impl AttachmentAction {
    pub fn input(&self, name: &str) -> Option<&str> {
        self.inputs.get(name).and_then(|v| v.as_str())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, netpulse_cards::menu_card, rstest::rstest, serde_json::json};

    #[rstest]
    #[case(Recipient::person("a@example.com"), Some("default"), Ok(Destination::Person("a@example.com".into())))]
    #[case(Recipient::room("r1"), Some("default"), Ok(Destination::Room("r1".into())))]
    #[case(Recipient::default_room(), Some("default"), Ok(Destination::Room("default".into())))]
    #[case(Recipient::default_room(), None, Err(Precondition::Missing))]
    #[case(Recipient::default_room(), Some(""), Err(Precondition::Missing))]
    #[case(
        Recipient { person_email: Some("a@example.com".into()), room_id: Some("r1".into()) },
        None,
        Err(Precondition::Ambiguous)
    )]
    #[case(
        Recipient { person_email: Some(String::new()), room_id: Some("r1".into()) },
        None,
        Ok(Destination::Room("r1".into()))
    )]
    fn resolves_recipient(
        #[case] recipient: Recipient,
        #[case] default_room: Option<&str>,
        #[case] expected: Result<Destination, Precondition>,
    ) {
        assert_eq!(recipient.resolve(default_room), expected);
    }

    #[test]
    fn create_message_sets_exactly_one_destination() {
        let message = RichMessage::card("Menu", menu_card("hi"));
        let dest = Destination::Person("a@example.com".into());
        let body = serde_json::to_value(CreateMessage::new(&dest, &message)).unwrap();
        assert_eq!(body["toPersonEmail"], "a@example.com");
        assert!(body.get("roomId").is_none());
        assert_eq!(body["markdown"], "Menu");
        assert_eq!(
            body["attachments"][0]["contentType"],
            "application/vnd.microsoft.card.adaptive"
        );

        let dest = Destination::Room("r1".into());
        let text = RichMessage::text("plain");
        let body = serde_json::to_value(CreateMessage::new(&dest, &text)).unwrap();
        assert_eq!(body, json!({"roomId": "r1", "markdown": "plain"}));
    }

    #[test]
    fn attachment_action_reads_string_inputs() {
        let action: AttachmentAction = serde_json::from_value(json!({
            "id": "act-1",
            "type": "submit",
            "inputs": {"action": "device_details", "device_id": "dev-9", "n": 3}
        }))
        .unwrap();
        assert_eq!(action.input("action"), Some("device_details"));
        assert_eq!(action.input("device_id"), Some("dev-9"));
        assert_eq!(action.input("n"), None);
    }
}
