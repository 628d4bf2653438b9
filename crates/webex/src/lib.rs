//! Webex integration engine.
//!
//! A [`WebexSession`] is built once per process: it resolves the default room
//! by name, then dispatches card messages, uploads configuration files with
//! bounded retries, and keeps the bot's webhook subscriptions in sync. All
//! platform traffic goes through the [`WebexApi`] trait so the engine can be
//! exercised against fakes.

pub mod api;
pub mod dispatch;
pub mod error;
pub mod session;
pub mod types;
pub mod upload;
pub mod webhooks;

#[cfg(test)]
pub(crate) mod fake;

pub use {
    api::{DEFAULT_API_BASE, HttpWebexApi, WebexApi},
    error::{Error, Result},
    session::WebexSession,
    types::{DeliveryOutcome, Destination, Recipient, Room},
    upload::RetryPolicy,
    webhooks::{SyncReport, WebhookSubscription, desired_subscriptions},
};
