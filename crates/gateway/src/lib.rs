//! HTTP front end: the alert relay, the interactive bot webhook, and health.

pub mod alerts;
pub mod bot;
pub mod server;
pub mod state;
pub mod tunnel;

#[cfg(test)]
pub(crate) mod testing;

pub use {
    server::{build_app, prepare_state, start_server, sync_webhooks},
    state::{AlertZone, AppState, BotIdentity},
};
