use chrono::NaiveDateTime;
use serde_json::Value;

use super::{fault_text, health_from_text, id, text};
use crate::translation::Tables;
use crate::types::*;

/// XT1 panels have a single implicit area; every device lives in area 0.
const XT1_AREA: u8 = 0;

pub(super) fn panel_condition(updates: &Value, tables: &Tables) -> PanelCondition {
    let mode = text(updates, "mode_st")
        .map(|code| tables.mode(code.trim()))
        .unwrap_or(Mode::Unknown);

    PanelCondition {
        areas: vec![AreaState { area: None, mode }],
        battery: health_from_text(updates, "battery"),
        tamper: health_from_text(updates, "tamper"),
    }
}

pub(super) fn device(row: &Value, tables: &Tables) -> Option<Device> {
    let zone = id::<u16>(row, "zone")?;
    let device_type = text(row, "type")
        .map(|code| tables.device_type(code.trim()))
        .unwrap_or(DeviceType::Unknown);

    let status = device_type.is_binary().then(|| {
        text(row, "status")
            .map(|code| tables.status(code.trim()))
            .unwrap_or(SensorStatus::Unknown)
    });

    let battery_detail = fault_text(row, "battery");
    let battery = match (text(row, "battery"), &battery_detail) {
        (None, _) => BatteryState::None,
        (Some(_), None) => BatteryState::Normal,
        (Some(_), Some(_)) => BatteryState::Trouble,
    };
    let tamper_detail = fault_text(row, "tamp");
    let condition_detail = fault_text(row, "cond");

    Some(Device {
        key: DeviceKey::new(XT1_AREA, zone),
        name: text(row, "name").unwrap_or_default(),
        device_type,
        battery,
        battery_detail: battery_detail.map(VendorText::Known),
        tampered: tamper_detail.is_some(),
        tamper_detail: tamper_detail.map(VendorText::Known),
        condition_ok: condition_detail.is_none(),
        condition_detail: condition_detail.map(VendorText::Known),
        status,
    })
}

pub(super) fn history_entry(row: &Value, _tables: &Tables) -> HistoryEntry {
    let date = text(row, "d").unwrap_or_default();
    let time = text(row, "t").unwrap_or_default();
    let timestamp = parse_panel_clock(&date, &time);

    HistoryEntry {
        timestamp,
        date,
        time,
        source: text(row, "s").unwrap_or_default(),
        kind: None,
        event: VendorText::Known(text(row, "a").unwrap_or_default()),
    }
}

/// XT1 logs use the panel's wall clock (`dd.mm.yyyy` or `dd.mm.yy`); it is
/// carried as UTC without conversion.
fn parse_panel_clock(date: &str, time: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let stamp = format!("{} {}", date.trim(), time.trim());
    ["%d.%m.%Y %H:%M:%S", "%d.%m.%y %H:%M:%S", "%d.%m.%Y %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&stamp, fmt).ok())
        .map(|naive| naive.and_utc())
}
