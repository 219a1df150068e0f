use chrono::DateTime;
use serde_json::Value;

use super::{flag, health_from_flag, id, text};
use crate::translation::Tables;
use crate::types::*;

const MODE_PREFIX: &str = "mode_a";
const AREA_PLACEHOLDER: &str = "%s";

pub(super) fn panel_condition(updates: &Value, tables: &Tables) -> PanelCondition {
    let mut areas: Vec<AreaState> = updates
        .as_object()
        .map(|fields| {
            fields
                .iter()
                .filter_map(|(key, value)| {
                    let area = key.strip_prefix(MODE_PREFIX)?.parse::<u8>().ok()?;
                    let mode = value
                        .as_str()
                        .map(|code| tables.mode(code.trim()))
                        .unwrap_or(Mode::Unknown);
                    Some(AreaState { area: Some(area), mode })
                })
                .collect()
        })
        .unwrap_or_default();
    areas.sort_by_key(|a| a.area);

    if areas.is_empty() {
        areas.push(AreaState {
            area: Some(1),
            mode: Mode::Unknown,
        });
    }

    PanelCondition {
        areas,
        battery: health_from_flag(updates, "battery_ok"),
        tamper: health_from_flag(updates, "tamper_ok"),
    }
}

/// Reason text for a field whose `<field>_ok` flag is `'0'`.
fn reason(row: &Value, field: &str, tables: &Tables) -> Option<VendorText> {
    text(row, field)
        .map(|code| code.trim().to_string())
        .filter(|code| !code.is_empty())
        .map(|code| tables.text(&code))
}

pub(super) fn device(row: &Value, tables: &Tables) -> Option<Device> {
    let area = id::<u8>(row, "area")?;
    let zone = id::<u16>(row, "zone")?;

    let device_type = text(row, "type_f")
        .map(|code| tables.device_type(code.trim()))
        .unwrap_or(DeviceType::Unknown);

    let status = device_type.is_binary().then(|| {
        text(row, "status")
            .map(|code| tables.status(code.trim()))
            .unwrap_or(SensorStatus::Unknown)
    });

    let (battery, battery_detail) = match flag(row, "battery_ok") {
        Some(true) => (BatteryState::Normal, None),
        Some(false) => (BatteryState::Trouble, reason(row, "battery", tables)),
        None => (BatteryState::None, None),
    };

    let tampered = flag(row, "tamper_ok") == Some(false);
    let tamper_detail = tampered.then(|| reason(row, "tamper", tables)).flatten();

    let condition_ok = flag(row, "cond_ok") != Some(false);
    let condition_detail = (!condition_ok).then(|| reason(row, "cond", tables)).flatten();

    Some(Device {
        key: DeviceKey::new(area, zone),
        name: text(row, "name").unwrap_or_default(),
        device_type,
        battery,
        battery_detail,
        tampered,
        tamper_detail,
        condition_ok,
        condition_detail,
        status,
    })
}

/// The vendor appends extra data after the template key in the same field;
/// the key runs up to and including the first `}`.
pub(crate) fn event_key(raw: &str) -> &str {
    match raw.find('}') {
        Some(end) => &raw[..=end],
        None => raw,
    }
}

pub(crate) fn fill_area(template: &str, area: &str) -> String {
    template.replacen(AREA_PLACEHOLDER, area, 1)
}

pub(super) fn history_entry(row: &Value, tables: &Tables) -> HistoryEntry {
    let area = text(row, "area").unwrap_or_default();
    let raw_event = text(row, "event").unwrap_or_default();

    let event = match tables.text(event_key(raw_event.trim())) {
        VendorText::Known(template) => VendorText::Known(fill_area(&template, area.trim())),
        unknown => unknown,
    };

    let kind = text(row, "type_f")
        .filter(|code| !code.trim().is_empty())
        .map(|code| tables.text(code.trim()));

    let raw_time = text(row, "time").unwrap_or_default();
    let timestamp = raw_time
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0));
    let (date, time) = match timestamp {
        Some(ts) => (
            ts.format("%Y-%m-%d").to_string(),
            ts.format("%H:%M:%S").to_string(),
        ),
        None => (raw_time.clone(), raw_time),
    };

    HistoryEntry {
        date,
        time,
        timestamp,
        source: text(row, "name").unwrap_or_default(),
        kind,
        event,
    }
}
