//! Device inventory client for the network controller.
//!
//! Lists devices, fetches device details, and retrieves running
//! configuration. Device classes that cannot report a configuration yield
//! [`ConfigResult::Unsupported`] rather than an error.

pub mod auth;
pub mod client;
pub mod error;

use {
    async_trait::async_trait,
    netpulse_common::types::{DeviceDetail, DeviceSummary},
};

pub use {
    client::{DnacClient, UNSUPPORTED_CONFIG_STATUS},
    error::{Error, Result},
};

/// Outcome of a configuration fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigResult {
    Available(String),
    /// The controller does not support configuration retrieval for this
    /// device class.
    Unsupported,
}

impl ConfigResult {
    pub fn into_option(self) -> Option<String> {
        match self {
            Self::Available(text) => Some(text),
            Self::Unsupported => None,
        }
    }
}

/// Read-only view of the controller's device inventory.
#[async_trait]
pub trait DeviceInventory: Send + Sync {
    /// Devices with a non-empty hostname.
    async fn list_devices(&self) -> Result<Vec<DeviceSummary>>;

    async fn device_details(&self, device_id: &str) -> Result<DeviceDetail>;

    async fn device_config(&self, device_id: &str) -> Result<ConfigResult>;
}
