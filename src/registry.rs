use std::collections::HashMap;

use crate::diff::device_events;
use crate::types::{Device, DeviceKey, Event, SensorStatus};

/// Devices seen on a panel, keyed by (area, zone).
///
/// Entries are created on first sighting and updated in place afterwards;
/// nothing is ever evicted.
#[derive(Debug, Default, Clone)]
pub struct DeviceRegistry {
    devices: HashMap<DeviceKey, Device>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn get(&self, key: &DeviceKey) -> Option<&Device> {
        self.devices.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    /// Devices ordered by (area, zone), for stable reporting.
    pub fn sorted(&self) -> Vec<&Device> {
        let mut devices: Vec<_> = self.devices.values().collect();
        devices.sort_by_key(|d| d.key);
        devices
    }

    /// Insert a new device or refresh the mutable fields of an existing one.
    /// Name and type stay as first seen. Returns what changed.
    pub(crate) fn upsert(&mut self, reading: Device) -> Vec<Event> {
        match self.devices.get_mut(&reading.key) {
            Some(device) => {
                let previous = device.clone();
                device.battery = reading.battery;
                device.battery_detail = reading.battery_detail;
                device.tampered = reading.tampered;
                device.tamper_detail = reading.tamper_detail;
                device.condition_ok = reading.condition_ok;
                device.condition_detail = reading.condition_detail;
                if device.device_type.is_binary() {
                    // A reading whose type code no longer maps to a binary type
                    // carries no status; keep the slot populated.
                    device.status = Some(reading.status.unwrap_or(SensorStatus::Unknown));
                }
                device_events(Some(&previous), device)
            }
            None => {
                let events = device_events(None, &reading);
                self.devices.insert(reading.key, reading);
                events
            }
        }
    }
}

impl<'a> IntoIterator for &'a DeviceRegistry {
    type Item = &'a Device;
    type IntoIter = std::collections::hash_map::Values<'a, DeviceKey, Device>;

    fn into_iter(self) -> Self::IntoIter {
        self.devices.values()
    }
}
