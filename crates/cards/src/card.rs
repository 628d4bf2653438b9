use serde::Serialize;

use crate::{
    adaptive::AdaptiveCard,
    error::{CardError, Result},
};

pub const ADAPTIVE_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";

/// Webex accepts a single card attachment per message.
pub const MAX_ATTACHMENTS: usize = 1;

/// A built card. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub enum Card {
    Alert(AdaptiveCard),
    Menu(AdaptiveCard),
    DeviceList(AdaptiveCard),
    DeviceDetail(AdaptiveCard),
}

impl Card {
    pub fn document(&self) -> &AdaptiveCard {
        match self {
            Self::Alert(doc) | Self::Menu(doc) | Self::DeviceList(doc) | Self::DeviceDetail(doc) => {
                doc
            },
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Alert(_) => "alert",
            Self::Menu(_) => "menu",
            Self::DeviceList(_) => "device_list",
            Self::DeviceDetail(_) => "device_detail",
        }
    }

    pub fn to_attachment(&self) -> Attachment<'_> {
        Attachment {
            content_type: ADAPTIVE_CARD_CONTENT_TYPE,
            content: self.document(),
        }
    }
}

/// Wire form of a card attachment: `{contentType, content}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment<'a> {
    pub content_type: &'static str,
    pub content: &'a AdaptiveCard,
}

/// Markdown fallback text plus ordered card attachments.
#[derive(Debug, Clone, PartialEq)]
pub struct RichMessage {
    markdown: String,
    attachments: Vec<Card>,
}

impl RichMessage {
    /// Text-only message.
    pub fn text(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
            attachments: Vec::new(),
        }
    }

    /// Message carrying one card, with `markdown` shown by clients that cannot
    /// render cards.
    pub fn card(markdown: impl Into<String>, card: Card) -> Self {
        Self {
            markdown: markdown.into(),
            attachments: vec![card],
        }
    }

    pub fn with_attachments(markdown: impl Into<String>, attachments: Vec<Card>) -> Result<Self> {
        if attachments.len() > MAX_ATTACHMENTS {
            return Err(CardError::TooManyAttachments {
                max: MAX_ATTACHMENTS,
            });
        }
        Ok(Self {
            markdown: markdown.into(),
            attachments,
        })
    }

    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    pub fn attachments(&self) -> &[Card] {
        &self.attachments
    }

    /// Attachments in wire form, order preserved.
    pub fn wire_attachments(&self) -> Vec<Attachment<'_>> {
        self.attachments.iter().map(Card::to_attachment).collect()
    }
}
