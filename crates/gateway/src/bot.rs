//! Interactive bot: replies to direct messages with the menu card and acts on
//! card submissions.

use {
    axum::{
        extract::{Json, State},
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    netpulse_cards::{
        DEVICE_ID_INPUT, MenuAction, RichMessage, device_detail_card, device_list_card, menu_card,
    },
    netpulse_webex::{DeliveryOutcome, Recipient, types::AttachmentAction},
    serde::Deserialize,
    tracing::{debug, error, info, warn},
};

use crate::state::{AppState, is_bot_email};

pub const MENU_TEXT: &str = "Hi! Pick an option below to query the network controller.";
pub const NO_DEVICE_SELECTED_TEXT: &str = "Select a device from the list first.";
pub const CONTROLLER_ERROR_TEXT: &str =
    "Sorry, the network controller could not be reached. Try again later.";

/// Webhook notification envelope. `data` carries only identifiers; the
/// content has to be fetched.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub resource: String,
    pub event: String,
    pub data: EventData,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventData {
    pub id: String,
    #[serde(default)]
    pub person_id: Option<String>,
    #[serde(default)]
    pub person_email: Option<String>,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub room_type: Option<String>,
}

impl EventData {
    /// Direct rooms answer the person, group rooms answer the room.
    fn reply_recipient(&self) -> Recipient {
        let direct = self.room_type.as_deref() == Some("direct");
        match (&self.person_email, &self.room_id) {
            (Some(email), _) if direct => Recipient::person(email.clone()),
            (_, Some(room)) => Recipient::room(room.clone()),
            (Some(email), None) => Recipient::person(email.clone()),
            (None, None) => Recipient::default(),
        }
    }
}

/// What the bot did with a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotOutcome {
    Ignored,
    Replied(DeliveryOutcome),
}

pub async fn handle_event(state: &AppState, event: WebhookEvent) -> anyhow::Result<BotOutcome> {
    match (event.resource.as_str(), event.event.as_str()) {
        ("messages", "created") => Ok(on_message(state, &event.data).await),
        ("attachmentActions", "created") => on_attachment_action(state, &event.data).await,
        (resource, kind) => {
            debug!(resource, event = kind, "ignoring webhook event");
            Ok(BotOutcome::Ignored)
        },
    }
}

async fn on_message(state: &AppState, data: &EventData) -> BotOutcome {
    if is_from_bot(state, data).await {
        debug!(message_id = %data.id, "ignoring bot message");
        return BotOutcome::Ignored;
    }
    let recipient = data.reply_recipient();
    let outcome = send_menu(state, &recipient).await;
    BotOutcome::Replied(outcome)
}

/// Messages the bot must not answer. Without a known identity any bot
/// account is skipped, and an author that cannot be determined is treated
/// as the bot itself.
async fn is_from_bot(state: &AppState, data: &EventData) -> bool {
    if state.bot.is_known() {
        return state
            .bot
            .is_self(data.person_id.as_deref(), data.person_email.as_deref());
    }
    if let Some(email) = data.person_email.as_deref() {
        return is_bot_email(email);
    }
    match state.session.api().get_message(&data.id).await {
        Ok(message) => message.person_email.as_deref().is_none_or(is_bot_email),
        Err(e) => {
            warn!(message_id = %data.id, error = %e, "cannot look up message author, not replying");
            true
        },
    }
}

async fn send_menu(state: &AppState, recipient: &Recipient) -> DeliveryOutcome {
    let message = RichMessage::card(MENU_TEXT, menu_card(MENU_TEXT));
    state.session.send(&message, recipient).await
}

async fn on_attachment_action(state: &AppState, data: &EventData) -> anyhow::Result<BotOutcome> {
    let action = state.session.api().get_attachment_action(&data.id).await?;
    let recipient = action_recipient(&action, data);
    let requested = action.input("action").and_then(MenuAction::parse);
    info!(
        action_id = %action.id,
        action = requested.map_or("menu", MenuAction::as_str),
        "card submission"
    );

    let outcome = match requested {
        Some(MenuAction::ListDevices) => list_devices(state, &recipient).await,
        Some(MenuAction::DeviceDetails) => match action.input(DEVICE_ID_INPUT) {
            Some(id) if !id.is_empty() => device_details(state, id, &recipient).await,
            _ => state.session.send_text(NO_DEVICE_SELECTED_TEXT, &recipient).await,
        },
        Some(MenuAction::DeviceConfig) => match action.input(DEVICE_ID_INPUT) {
            Some(id) if !id.is_empty() => device_config(state, id, &recipient).await,
            _ => state.session.send_text(NO_DEVICE_SELECTED_TEXT, &recipient).await,
        },
        None => send_menu(state, &recipient).await,
    };
    Ok(BotOutcome::Replied(outcome))
}

fn action_recipient(action: &AttachmentAction, data: &EventData) -> Recipient {
    match action.room_id.as_deref().or(data.room_id.as_deref()) {
        Some(room) if !room.is_empty() => Recipient::room(room),
        _ => data.reply_recipient(),
    }
}

async fn list_devices(state: &AppState, recipient: &Recipient) -> DeliveryOutcome {
    match state.inventory.list_devices().await {
        Ok(devices) => {
            let text = format!("{} devices in inventory.", devices.len());
            let message = RichMessage::card(text, device_list_card(&devices));
            state.session.send(&message, recipient).await
        },
        Err(e) => controller_error(state, recipient, "list devices", &e).await,
    }
}

async fn device_details(
    state: &AppState,
    device_id: &str,
    recipient: &Recipient,
) -> DeliveryOutcome {
    match state.inventory.device_details(device_id).await {
        Ok(detail) => {
            let text = format!(
                "Details for {}",
                detail.hostname.as_deref().unwrap_or(device_id)
            );
            let message = RichMessage::card(text, device_detail_card(&detail));
            state.session.send(&message, recipient).await
        },
        Err(e) => controller_error(state, recipient, "device details", &e).await,
    }
}

async fn device_config(
    state: &AppState,
    device_id: &str,
    recipient: &Recipient,
) -> DeliveryOutcome {
    match state.inventory.device_config(device_id).await {
        Ok(config) => {
            let text = config.into_option();
            state
                .session
                .upload_attachment(text.as_deref(), recipient)
                .await
        },
        Err(e) => controller_error(state, recipient, "device config", &e).await,
    }
}

async fn controller_error(
    state: &AppState,
    recipient: &Recipient,
    operation: &'static str,
    error: &netpulse_inventory::Error,
) -> DeliveryOutcome {
    warn!(operation, error = %error, "controller request failed");
    state.session.send_text(CONTROLLER_ERROR_TEXT, recipient).await
}

pub async fn bot_handler(
    State(state): State<AppState>,
    Json(event): Json<WebhookEvent>,
) -> Response {
    match handle_event(&state, event).await {
        Ok(_) => StatusCode::OK.into_response(),
        Err(e) => {
            error!(error = ?e, "bot event failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        },
    }
}
