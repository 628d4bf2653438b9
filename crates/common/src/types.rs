//! Records exchanged between the network backends and the card builder.

use {
    serde::{Deserialize, Serialize, de::DeserializeOwned},
    serde_json::Value,
};

use crate::error::{Error, Result};

/// Check that every name in `fields` is present and non-null on `value`,
/// then deserialize it. Fails on the first missing field in `fields` order.
fn from_checked_value<T: DeserializeOwned>(
    record: &'static str,
    fields: &[&str],
    value: Value,
) -> Result<T> {
    let Some(obj) = value.as_object() else {
        return Err(Error::message(format!("{record} must be a JSON object")));
    };
    if let Some(missing) = fields
        .iter()
        .find(|&&f| obj.get(f).is_none_or(Value::is_null))
    {
        return Err(Error::missing_field(record, *missing));
    }
    Ok(serde_json::from_value(value)?)
}

// ── Alerts ──────────────────────────────────────────────────────────────────

/// Alert notification posted by the network dashboard webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPayload {
    /// ISO-8601 timestamp of the event.
    pub occurred_at: String,
    pub alert_level: String,
    pub alert_type: String,
    pub organization_name: String,
    pub organization_url: String,
    pub network_name: String,
    pub network_url: String,
    pub device_name: String,
    pub device_model: String,
    pub device_url: String,
    pub device_serial: String,
}

impl AlertPayload {
    pub const REQUIRED_FIELDS: &'static [&'static str] = &[
        "occurredAt",
        "alertLevel",
        "alertType",
        "organizationName",
        "organizationUrl",
        "networkName",
        "networkUrl",
        "deviceName",
        "deviceModel",
        "deviceUrl",
        "deviceSerial",
    ];

    /// Parse an inbound alert body, naming the first missing field on failure.
    pub fn from_value(value: Value) -> Result<Self> {
        from_checked_value("alert payload", Self::REQUIRED_FIELDS, value)
    }
}

// ── Devices ─────────────────────────────────────────────────────────────────

/// A device as listed by the controller inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSummary {
    pub hostname: String,
    pub id: String,
}

/// Detailed device record used for the detail card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDetail {
    pub platform_id: String,
    pub software_version: String,
    pub serial_number: String,
    pub reachability_status: String,
    pub up_time: String,
    pub location: String,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub management_ip_address: Option<String>,
}

impl DeviceDetail {
    pub const REQUIRED_FIELDS: &'static [&'static str] = &[
        "platformId",
        "softwareVersion",
        "serialNumber",
        "reachabilityStatus",
        "upTime",
        "location",
    ];

    pub fn from_value(value: Value) -> Result<Self> {
        from_checked_value("device detail", Self::REQUIRED_FIELDS, value)
    }
}
