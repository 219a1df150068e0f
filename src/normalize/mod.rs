//! Turns decoded panel documents into the device/area/history model.
//!
//! Vendor documents are loosely typed: the same field may arrive as a string
//! or a number depending on firmware. The accessors below are total and
//! return `None` for anything missing or unreadable, so normalization can
//! degrade to UNKNOWN values instead of failing.

mod xt1;
mod xt2;

use serde_json::Value;
use tracing::{debug, warn};

use crate::registry::DeviceRegistry;
use crate::translation::Tables;
use crate::types::*;

/// Generation-specific normalization strategy.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    generation: Generation,
    tables: &'static Tables,
}

impl Normalizer {
    pub fn new(generation: Generation) -> Self {
        Self::with_tables(generation, generation.tables())
    }

    /// Use a custom vocabulary with the field layout of `generation`.
    pub fn with_tables(generation: Generation, tables: &'static Tables) -> Self {
        Self { generation, tables }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn tables(&self) -> &'static Tables {
        self.tables
    }

    pub fn panel_condition(&self, doc: &Value) -> PanelCondition {
        let updates = doc.get("updates").unwrap_or(&Value::Null);
        if updates.is_null() {
            debug!("panel condition without updates object");
        }

        let mut condition = match self.generation {
            Generation::Xt1 => xt1::panel_condition(updates, self.tables),
            Generation::Xt2 => xt2::panel_condition(updates, self.tables),
        };

        if text(updates, "alarm_ex").as_deref() == Some("1") {
            for area in &mut condition.areas {
                area.mode = Mode::Triggered;
            }
        }
        condition
    }

    /// Normalize every readable device row. Rows without a usable
    /// (area, zone) identity are skipped.
    pub fn device_rows(&self, doc: &Value) -> Vec<Device> {
        rows(doc, "senrows")
            .iter()
            .enumerate()
            .filter_map(|(index, row)| {
                let device = match self.generation {
                    Generation::Xt1 => xt1::device(row, self.tables),
                    Generation::Xt2 => xt2::device(row, self.tables),
                };
                if device.is_none() {
                    warn!(index, generation = %self.generation, "skipping device row without identity");
                }
                device
            })
            .collect()
    }

    /// Upsert every device row of a device-list document into `registry`.
    /// Applying the same document twice leaves the registry unchanged.
    pub fn apply_device_list(&self, doc: &Value, registry: &mut DeviceRegistry) -> Vec<Event> {
        let mut events = Vec::new();
        for device in self.device_rows(doc) {
            events.extend(registry.upsert(device));
        }
        events
    }

    /// History rows in the order the panel returned them.
    pub fn history(&self, doc: &Value) -> Vec<HistoryEntry> {
        let (key, parse): (&str, fn(&Value, &Tables) -> HistoryEntry) = match self.generation {
            Generation::Xt1 => ("hisrows", xt1::history_entry),
            Generation::Xt2 => ("logrows", xt2::history_entry),
        };
        rows(doc, key)
            .iter()
            .filter(|row| row.is_object())
            .map(|row| parse(row, self.tables))
            .collect()
    }
}

fn rows<'a>(doc: &'a Value, key: &str) -> &'a [Value] {
    match doc.get(key) {
        Some(Value::Array(rows)) => rows,
        _ => {
            debug!(key, "document has no row list");
            &[]
        }
    }
}

/// String or number field as text.
pub(crate) fn text(row: &Value, key: &str) -> Option<String> {
    match row.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numeric identity field; accepts `3`, `"3"` and `" 3 "`.
pub(crate) fn id<T: std::str::FromStr>(row: &Value, key: &str) -> Option<T> {
    text(row, key)?.trim().parse().ok()
}

/// `'1'`/`'0'` style flag; also accepts JSON booleans and numbers.
pub(crate) fn flag(row: &Value, key: &str) -> Option<bool> {
    match row.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64()? {
            1 => Some(true),
            0 => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim() {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Health encoded as "empty string means ok, anything else is the fault".
pub(crate) fn health_from_text(updates: &Value, key: &str) -> Health {
    match text(updates, key) {
        None => Health::Unknown,
        Some(s) if is_ok_text(&s) => Health::Ok,
        Some(_) => Health::Fault,
    }
}

/// Health encoded as a `'1'` (ok) / `'0'` (fault) flag.
pub(crate) fn health_from_flag(updates: &Value, key: &str) -> Health {
    match flag(updates, key) {
        Some(true) => Health::Ok,
        Some(false) => Health::Fault,
        None => Health::Unknown,
    }
}

fn is_ok_text(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || s == "Normal" || s == "OK"
}

/// Non-empty, non-"ok" text of a field, i.e. the vendor's fault description.
pub(crate) fn fault_text(row: &Value, key: &str) -> Option<String> {
    text(row, key).filter(|s| !is_ok_text(s))
}
