use std::sync::Arc;

use {
    chrono_tz::Tz,
    netpulse_cards::{Card, alert_card},
    netpulse_common::types::AlertPayload,
    netpulse_inventory::DeviceInventory,
    netpulse_webex::{WebexSession, types::Person},
};

/// Zone used to render alert timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertZone {
    /// The host's local zone.
    #[default]
    Local,
    Named(Tz),
}

impl AlertZone {
    pub fn from_option(zone: Option<Tz>) -> Self {
        zone.map_or(Self::Local, Self::Named)
    }

    pub fn alert_card(self, alert: &AlertPayload) -> netpulse_cards::Result<Card> {
        match self {
            Self::Local => alert_card(alert, &chrono::Local),
            Self::Named(tz) => alert_card(alert, &tz),
        }
    }
}

/// The bot's own account, used to drop the echo of its replies.
#[derive(Debug, Clone, Default)]
pub struct BotIdentity {
    pub id: String,
    pub emails: Vec<String>,
}

/// Domain of every Webex bot account.
pub const BOT_EMAIL_DOMAIN: &str = "@webex.bot";

/// True for addresses that belong to a bot account.
pub fn is_bot_email(email: &str) -> bool {
    email
        .to_ascii_lowercase()
        .ends_with(BOT_EMAIL_DOMAIN)
}

impl BotIdentity {
    /// Whether the bot's own account was looked up at start-up.
    pub fn is_known(&self) -> bool {
        !self.id.is_empty() || !self.emails.is_empty()
    }

    pub fn is_self(&self, person_id: Option<&str>, person_email: Option<&str>) -> bool {
        if let Some(id) = person_id
            && !self.id.is_empty()
            && id == self.id
        {
            return true;
        }
        person_email.is_some_and(|email| self.emails.iter().any(|e| e.eq_ignore_ascii_case(email)))
    }
}

impl From<Person> for BotIdentity {
    fn from(person: Person) -> Self {
        Self {
            id: person.id,
            emails: person.emails,
        }
    }
}

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<WebexSession>,
    pub inventory: Arc<dyn DeviceInventory>,
    pub zone: AlertZone,
    pub bot: Arc<BotIdentity>,
}

impl AppState {
    pub fn new(
        session: Arc<WebexSession>,
        inventory: Arc<dyn DeviceInventory>,
        zone: AlertZone,
        bot: BotIdentity,
    ) -> Self {
        Self {
            session,
            inventory,
            zone,
            bot: Arc::new(bot),
        }
    }
}
