use serde_json::json;

use crate::{
    adaptive::{Action, AdaptiveCard, Element},
    card::Card,
};

/// Actions a card submission can request, carried in the `action` input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ListDevices,
    DeviceDetails,
    DeviceConfig,
}

impl MenuAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ListDevices => "list_devices",
            Self::DeviceDetails => "device_details",
            Self::DeviceConfig => "device_config",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "list_devices" => Some(Self::ListDevices),
            "device_details" => Some(Self::DeviceDetails),
            "device_config" => Some(Self::DeviceConfig),
            _ => None,
        }
    }

    pub(crate) fn submit(self, title: &str) -> Action {
        Action::Submit {
            title: title.to_string(),
            data: json!({ "action": self.as_str() }),
        }
    }
}

/// Entry card sent in reply to any direct message to the bot.
pub fn menu_card(text: &str) -> Card {
    let body = vec![
        Element::heading("Network Assistant"),
        Element::TextBlock {
            text: text.to_string(),
            size: None,
            weight: None,
            wrap: true,
        },
    ];
    let actions = vec![MenuAction::ListDevices.submit("List devices")];
    Card::Menu(AdaptiveCard::new(body, actions))
}
