//! In-memory [`WebexApi`] that records every call.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    api::WebexApi,
    error::{Error, Result},
    types::{
        AttachmentAction, CreateMessage, Destination, FileUpload, Message, Person, RoomSummary,
        Webhook,
    },
    webhooks::{WebhookResource, WebhookSubscription},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListRooms(String),
    CreateMessage(serde_json::Value),
    UploadFile {
        destination: Destination,
        markdown: String,
        filename: String,
        mime: String,
        content: String,
    },
    ListWebhooks,
    DeleteWebhook(String),
    CreateWebhook(WebhookResource, String),
}

#[derive(Default)]
pub struct FakeWebexApi {
    rooms: Vec<RoomSummary>,
    webhooks: Vec<Webhook>,
    fail_room_list: bool,
    fail_messages: bool,
    fail_webhook_deletes: bool,
    /// 1-based attempt that returns 200; earlier attempts return 500.
    upload_success_attempt: Option<usize>,
    /// Earlier attempts fail at the transport level instead.
    upload_transport_errors: bool,
    calls: Mutex<Vec<Call>>,
}

impl FakeWebexApi {
    pub fn with_rooms(mut self, rooms: &[(&str, &str)]) -> Self {
        self.rooms = rooms
            .iter()
            .map(|(id, title)| RoomSummary {
                id: (*id).to_string(),
                title: (*title).to_string(),
                room_type: Some("group".into()),
            })
            .collect();
        self
    }

    pub fn with_webhooks(mut self, count: usize) -> Self {
        self.webhooks = (0..count)
            .map(|i| Webhook {
                id: format!("wh-{i}"),
                name: format!("stale {i}"),
                target_url: "https://old.example.com/hook".into(),
                resource: "messages".into(),
                event: "created".into(),
            })
            .collect();
        self
    }

    pub fn failing_room_list(mut self) -> Self {
        self.fail_room_list = true;
        self
    }

    pub fn failing_messages(mut self) -> Self {
        self.fail_messages = true;
        self
    }

    pub fn failing_webhook_deletes(mut self) -> Self {
        self.fail_webhook_deletes = true;
        self
    }

    pub fn upload_succeeds_on(mut self, attempt: usize) -> Self {
        self.upload_success_attempt = Some(attempt);
        self
    }

    pub fn upload_errors_then_succeeds(mut self, failures: usize) -> Self {
        self.upload_success_attempt = Some(failures + 1);
        self.upload_transport_errors = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record(&self, call: Call) -> usize {
        let mut calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
        calls.push(call);
        calls.len()
    }

    fn upload_attempts(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::UploadFile { .. }))
            .count()
    }

    fn server_error(operation: &'static str) -> Error {
        Error::Api {
            operation,
            status: 500,
            body: "boom".into(),
        }
    }
}

#[async_trait]
impl WebexApi for FakeWebexApi {
    async fn list_rooms(&self, room_type: &str) -> Result<Vec<RoomSummary>> {
        self.record(Call::ListRooms(room_type.to_string()));
        if self.fail_room_list {
            return Err(Self::server_error("list rooms"));
        }
        Ok(self.rooms.clone())
    }

    async fn create_message(&self, message: &CreateMessage<'_>) -> Result<Message> {
        let n = self.record(Call::CreateMessage(serde_json::to_value(message)?));
        if self.fail_messages {
            return Err(Self::server_error("create message"));
        }
        Ok(Message {
            id: format!("msg-{n}"),
            room_id: message.room_id.map(str::to_string),
            room_type: None,
            person_id: None,
            person_email: None,
        })
    }

    async fn upload_file(&self, upload: &FileUpload<'_>) -> Result<u16> {
        self.record(Call::UploadFile {
            destination: upload.destination.clone(),
            markdown: upload.markdown.to_string(),
            filename: upload.filename.to_string(),
            mime: upload.mime.to_string(),
            content: upload.content.to_string(),
        });
        let attempt = self.upload_attempts();
        let succeed_on = self.upload_success_attempt.unwrap_or(1);
        if attempt >= succeed_on {
            return Ok(200);
        }
        if self.upload_transport_errors {
            return Err(Error::message("connection reset"));
        }
        Ok(500)
    }

    async fn list_webhooks(&self) -> Result<Vec<Webhook>> {
        self.record(Call::ListWebhooks);
        Ok(self.webhooks.clone())
    }

    async fn delete_webhook(&self, webhook_id: &str) -> Result<()> {
        self.record(Call::DeleteWebhook(webhook_id.to_string()));
        if self.fail_webhook_deletes {
            return Err(Self::server_error("delete webhook"));
        }
        Ok(())
    }

    async fn create_webhook(&self, webhook: &WebhookSubscription) -> Result<Webhook> {
        let n = self.record(Call::CreateWebhook(
            webhook.resource,
            webhook.target_url.clone(),
        ));
        Ok(Webhook {
            id: format!("new-{n}"),
            name: webhook.name.clone(),
            target_url: webhook.target_url.clone(),
            resource: webhook.resource.as_str().into(),
            event: webhook.event.clone(),
        })
    }

    async fn me(&self) -> Result<Person> {
        Ok(Person {
            id: "bot-id".into(),
            emails: vec!["bot@webex.bot".into()],
        })
    }

    async fn get_message(&self, message_id: &str) -> Result<Message> {
        Err(Error::message(format!("unknown message {message_id}")))
    }

    async fn get_attachment_action(&self, action_id: &str) -> Result<AttachmentAction> {
        Err(Error::message(format!("unknown action {action_id}")))
    }
}
