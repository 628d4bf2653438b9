//! In-memory backends for handler tests.

use std::sync::{Arc, Mutex};

use {
    async_trait::async_trait,
    netpulse_common::types::{DeviceDetail, DeviceSummary},
    netpulse_inventory::{ConfigResult, DeviceInventory},
    netpulse_webex::{
        Error, Result, Room, WebexApi, WebexSession, WebhookSubscription,
        types::{AttachmentAction, CreateMessage, FileUpload, Message, Person, RoomSummary, Webhook},
    },
    serde_json::Value,
};

use crate::state::{AlertZone, AppState, BotIdentity};

#[derive(Default)]
pub struct RecordingApi {
    action_inputs: Option<Value>,
    message_author: Option<String>,
    fail_messages: bool,
    messages: Mutex<Vec<Value>>,
    uploads: Mutex<Vec<String>>,
}

impl RecordingApi {
    pub fn messages(&self) -> Vec<Value> {
        self.messages.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl WebexApi for RecordingApi {
    async fn list_rooms(&self, _room_type: &str) -> Result<Vec<RoomSummary>> {
        Ok(Vec::new())
    }

    async fn create_message(&self, message: &CreateMessage<'_>) -> Result<Message> {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(serde_json::to_value(message)?);
        if self.fail_messages {
            return Err(Error::Api {
                operation: "create message",
                status: 503,
                body: "unavailable".into(),
            });
        }
        Ok(Message {
            id: "msg-out".into(),
            room_id: message.room_id.map(str::to_string),
            room_type: None,
            person_id: None,
            person_email: None,
        })
    }

    async fn upload_file(&self, upload: &FileUpload<'_>) -> Result<u16> {
        self.uploads
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(upload.content.to_string());
        Ok(200)
    }

    async fn list_webhooks(&self) -> Result<Vec<Webhook>> {
        Ok(Vec::new())
    }

    async fn delete_webhook(&self, _webhook_id: &str) -> Result<()> {
        Ok(())
    }

    async fn create_webhook(&self, webhook: &WebhookSubscription) -> Result<Webhook> {
        Ok(Webhook {
            id: "wh-new".into(),
            name: webhook.name.clone(),
            target_url: webhook.target_url.clone(),
            resource: webhook.resource.as_str().into(),
            event: webhook.event.clone(),
        })
    }

    async fn me(&self) -> Result<Person> {
        Ok(Person {
            id: "netpulse-id".into(),
            emails: vec!["netpulse@example.com".into()],
        })
    }

    async fn get_message(&self, message_id: &str) -> Result<Message> {
        let Some(author) = self.message_author.clone() else {
            return Err(Error::message(format!("unknown message {message_id}")));
        };
        Ok(Message {
            id: message_id.to_string(),
            room_id: Some("group-room".into()),
            room_type: Some("group".into()),
            person_id: None,
            person_email: Some(author),
        })
    }

    async fn get_attachment_action(&self, action_id: &str) -> Result<AttachmentAction> {
        let Some(Value::Object(inputs)) = self.action_inputs.clone() else {
            return Err(Error::message(format!("unknown action {action_id}")));
        };
        Ok(AttachmentAction {
            id: action_id.to_string(),
            person_id: Some("ops-id".into()),
            room_id: Some("direct-room".into()),
            message_id: Some("card-msg".into()),
            inputs,
        })
    }
}

#[derive(Default)]
pub struct StubInventory {
    fail: bool,
}

#[async_trait]
impl DeviceInventory for StubInventory {
    async fn list_devices(&self) -> netpulse_inventory::Result<Vec<DeviceSummary>> {
        if self.fail {
            return Err(netpulse_inventory::Error::message("connection refused"));
        }
        Ok(vec![
            DeviceSummary {
                hostname: "cat9k-1".into(),
                id: "d1".into(),
            },
            DeviceSummary {
                hostname: "ap-lobby".into(),
                id: "ap-1".into(),
            },
        ])
    }

    async fn device_details(&self, device_id: &str) -> netpulse_inventory::Result<DeviceDetail> {
        Ok(DeviceDetail {
            platform_id: "C9300-24U".into(),
            software_version: "17.3.3".into(),
            serial_number: "FCW2214L0VK".into(),
            reachability_status: "Reachable".into(),
            up_time: "32 days".into(),
            location: "Global/San Jose".into(),
            hostname: (device_id == "d1").then(|| "cat9k-1".to_string()),
            management_ip_address: None,
        })
    }

    async fn device_config(&self, device_id: &str) -> netpulse_inventory::Result<ConfigResult> {
        Ok(match device_id {
            "d1" => ConfigResult::Available("hostname cat9k-1\n!".into()),
            _ => ConfigResult::Unsupported,
        })
    }
}

/// State wired to a [`RecordingApi`] and a [`StubInventory`].
pub struct Harness {
    pub api: Arc<RecordingApi>,
    pub state: AppState,
    room: Option<Room>,
    inventory: StubInventory,
    bot: BotIdentity,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(
            RecordingApi::default(),
            None,
            StubInventory::default(),
            BotIdentity::default(),
        )
    }

    fn build(
        api: RecordingApi,
        room: Option<Room>,
        inventory: StubInventory,
        bot: BotIdentity,
    ) -> Self {
        let api = Arc::new(api);
        let session = WebexSession::new(api.clone(), room.clone());
        let state = AppState::new(
            Arc::new(session),
            Arc::new(StubInventory {
                fail: inventory.fail,
            }),
            AlertZone::Named(chrono_tz::UTC),
            bot.clone(),
        );
        Self {
            api,
            state,
            room,
            inventory,
            bot,
        }
    }

    fn rebuild(self, change: impl FnOnce(&mut RecordingApi)) -> Self {
        let mut api = RecordingApi {
            action_inputs: self.api.action_inputs.clone(),
            message_author: self.api.message_author.clone(),
            fail_messages: self.api.fail_messages,
            ..Default::default()
        };
        change(&mut api);
        Self::build(api, self.room, self.inventory, self.bot)
    }

    pub fn with_room(mut self, id: &str) -> Self {
        self.room = Some(Room {
            name: "NetOps".into(),
            id: id.into(),
        });
        self.rebuild(|_| {})
    }

    pub fn with_bot(mut self, bot: BotIdentity) -> Self {
        self.bot = bot;
        self.rebuild(|_| {})
    }

    pub fn with_action(self, inputs: Value) -> Self {
        self.rebuild(|api| api.action_inputs = Some(inputs))
    }

    pub fn with_message_author(self, email: &str) -> Self {
        self.rebuild(|api| api.message_author = Some(email.to_string()))
    }

    pub fn with_failing_messages(self) -> Self {
        self.rebuild(|api| api.fail_messages = true)
    }

    pub fn with_failing_inventory(mut self) -> Self {
        self.inventory.fail = true;
        self.rebuild(|_| {})
    }
}
