//! Pure builders that turn alert and device records into Adaptive Cards.
//!
//! Nothing here performs I/O. Each builder returns a [`Card`] that the Webex
//! dispatcher serializes as a message attachment.

pub mod adaptive;
pub mod alert;
pub mod card;
pub mod devices;
pub mod error;
pub mod menu;

pub use {
    alert::{ALERT_TIME_FORMAT, alert_card, format_alert_time},
    card::{Attachment, Card, RichMessage},
    devices::{DEVICE_ID_INPUT, device_detail_card, device_list_card},
    error::{CardError, Result},
    menu::{MenuAction, menu_card},
};
