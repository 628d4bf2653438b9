use std::fmt::Display;

use {
    chrono::{DateTime, NaiveDateTime, TimeZone},
    netpulse_common::types::AlertPayload,
};

use crate::{
    adaptive::{AdaptiveCard, Column, Element},
    card::Card,
    error::{CardError, Result},
};

/// `Mon May 01 2023 02:30 PM`
pub const ALERT_TIME_FORMAT: &str = "%a %b %d %Y %I:%M %p";

pub const ALERT_TITLE: &str = "Meraki Alert";

const LABELS: [&str; 11] = [
    "Time of Alert:",
    "Alert Severity:",
    "Alert Type:",
    "Org Name:",
    "Org URL:",
    "Network Name:",
    "Network URL:",
    "Hostname:",
    "Model:",
    "Device URL:",
    "Serial Number:",
];

/// Naive layouts accepted when the timestamp carries no offset; such values
/// are read as wall-clock time in `tz`.
const NAIVE_LAYOUTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Reformat an ISO-8601 timestamp into [`ALERT_TIME_FORMAT`] in zone `tz`.
pub fn format_alert_time<Tz>(occurred_at: &str, tz: &Tz) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let instant = match DateTime::parse_from_rfc3339(occurred_at) {
        Ok(parsed) => parsed.with_timezone(tz),
        Err(source) => {
            let naive = NAIVE_LAYOUTS
                .iter()
                .find_map(|layout| NaiveDateTime::parse_from_str(occurred_at, layout).ok())
                .ok_or_else(|| CardError::InvalidTimestamp {
                    value: occurred_at.to_string(),
                    source,
                })?;
            tz.from_local_datetime(&naive)
                .single()
                .ok_or_else(|| CardError::AmbiguousTime(occurred_at.to_string()))?
        },
    };
    Ok(instant.format(ALERT_TIME_FORMAT).to_string())
}

/// Build the two-column alert summary card.
///
/// Value rows follow the label order in `LABELS`; the device URL is rendered
/// as a markdown link.
pub fn alert_card<Tz>(alert: &AlertPayload, tz: &Tz) -> Result<Card>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let values = [
        format_alert_time(&alert.occurred_at, tz)?,
        alert.alert_level.clone(),
        alert.alert_type.clone(),
        alert.organization_name.clone(),
        alert.organization_url.clone(),
        alert.network_name.clone(),
        alert.network_url.clone(),
        alert.device_name.clone(),
        alert.device_model.clone(),
        format!("[Device Link]({})", alert.device_url),
        alert.device_serial.clone(),
    ];

    let body = vec![
        Element::heading(ALERT_TITLE),
        Element::ColumnSet {
            columns: vec![
                Column::new(LABELS.iter().map(|l| Element::text(*l)).collect()),
                Column::new(values.into_iter().map(Element::text).collect()),
            ],
        },
    ];

    Ok(Card::Alert(AdaptiveCard::new(body, Vec::new())))
}
