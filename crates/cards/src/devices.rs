use netpulse_common::types::{DeviceDetail, DeviceSummary};

use crate::{
    adaptive::{AdaptiveCard, Choice, Element, Fact},
    card::Card,
    menu::MenuAction,
};

/// Input id carrying the selected device in list-card submissions.
pub const DEVICE_ID_INPUT: &str = "device_id";

/// Device picker with details and configuration actions.
pub fn device_list_card(devices: &[DeviceSummary]) -> Card {
    let body = if devices.is_empty() {
        vec![
            Element::heading("Devices"),
            Element::text("No devices were found on the controller."),
        ]
    } else {
        vec![
            Element::heading("Devices"),
            Element::text(format!("{} device(s) found. Pick one:", devices.len())),
            Element::ChoiceSet {
                id: DEVICE_ID_INPUT.into(),
                style: "compact",
                placeholder: Some("Select a device".into()),
                choices: devices
                    .iter()
                    .map(|d| Choice {
                        title: d.hostname.clone(),
                        value: d.id.clone(),
                    })
                    .collect(),
            },
        ]
    };
    let actions = if devices.is_empty() {
        Vec::new()
    } else {
        vec![
            MenuAction::DeviceDetails.submit("Details"),
            MenuAction::DeviceConfig.submit("Configuration"),
        ]
    };
    Card::DeviceList(AdaptiveCard::new(body, actions))
}

pub fn device_detail_card(detail: &DeviceDetail) -> Card {
    let fact = |title: &str, value: &str| Fact {
        title: title.to_string(),
        value: value.to_string(),
    };
    let mut facts = Vec::with_capacity(8);
    if let Some(hostname) = detail.hostname.as_deref() {
        facts.push(fact("Hostname", hostname));
    }
    if let Some(ip) = detail.management_ip_address.as_deref() {
        facts.push(fact("Management IP", ip));
    }
    facts.extend([
        fact("Platform", &detail.platform_id),
        fact("Software Version", &detail.software_version),
        fact("Serial Number", &detail.serial_number),
        fact("Reachability", &detail.reachability_status),
        fact("Up Time", &detail.up_time),
        fact("Location", &detail.location),
    ]);

    let body = vec![Element::heading("Device Details"), Element::FactSet {
        facts,
    }];
    let actions = vec![MenuAction::ListDevices.submit("Back to devices")];
    Card::DeviceDetail(AdaptiveCard::new(body, actions))
}
