use serde_json::Value;

use crate::types::*;

/// One changed leaf between two decoded documents.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Change {
    pub path: String,
    pub old: Value,
    pub new: Value,
}

fn child_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Walk `current` against `previous`. Vendor rows arrive as arrays, so
/// arrays are compared element by element; entries only present in
/// `previous` are reported with a null `new` value.
pub(crate) fn diff_json(previous: &Value, current: &Value, prefix: &str, changes: &mut Vec<Change>) {
    match (previous, current) {
        (Value::Object(prev), Value::Object(curr)) => {
            for (key, curr_val) in curr {
                let path = child_path(prefix, key);
                diff_json(prev.get(key).unwrap_or(&Value::Null), curr_val, &path, changes);
            }
            for (key, prev_val) in prev {
                if !curr.contains_key(key) {
                    changes.push(Change {
                        path: child_path(prefix, key),
                        old: prev_val.clone(),
                        new: Value::Null,
                    });
                }
            }
        }
        (Value::Array(prev), Value::Array(curr)) => {
            let len = prev.len().max(curr.len());
            for idx in 0..len {
                let path = child_path(prefix, &idx.to_string());
                match (prev.get(idx), curr.get(idx)) {
                    (Some(p), Some(c)) => diff_json(p, c, &path, changes),
                    (None, Some(c)) => diff_json(&Value::Null, c, &path, changes),
                    (Some(p), None) => changes.push(Change {
                        path,
                        old: p.clone(),
                        new: Value::Null,
                    }),
                    (None, None) => {}
                }
            }
        }
        (Value::Null, Value::Object(_)) => {
            diff_json(&Value::Object(serde_json::Map::new()), current, prefix, changes);
        }
        (prev, curr) if prev != curr => changes.push(Change {
            path: prefix.to_string(),
            old: prev.clone(),
            new: curr.clone(),
        }),
        _ => {}
    }
}

pub(crate) fn device_events(previous: Option<&Device>, current: &Device) -> Vec<Event> {
    let key = current.key;
    let name = current.name.clone();

    let Some(prev) = previous else {
        return vec![Event::DeviceAdded {
            key,
            name,
            device_type: current.device_type,
        }];
    };

    let mut events = Vec::new();
    if let Some(status) = current.status
        && prev.status != current.status
    {
        events.push(Event::DeviceStatusChanged {
            key,
            name: name.clone(),
            status,
        });
    }
    if prev.battery != current.battery {
        events.push(Event::DeviceBatteryChanged {
            key,
            name: name.clone(),
            battery: current.battery,
        });
    }
    if prev.tampered != current.tampered {
        events.push(Event::DeviceTamperChanged {
            key,
            name: name.clone(),
            tampered: current.tampered,
        });
    }
    if prev.condition_ok != current.condition_ok {
        events.push(Event::DeviceConditionChanged {
            key,
            name,
            ok: current.condition_ok,
        });
    }
    events
}

pub(crate) fn condition_events(previous: &PanelCondition, current: &PanelCondition) -> Vec<Event> {
    let mut events = Vec::new();
    for area in &current.areas {
        let prev_mode = previous
            .areas
            .iter()
            .find(|a| a.area == area.area)
            .map(|a| a.mode);
        if prev_mode != Some(area.mode) {
            events.push(Event::AreaModeChanged {
                area: area.area,
                mode: area.mode,
            });
        }
    }
    if previous.battery != current.battery {
        events.push(Event::PanelBatteryChanged {
            health: current.battery,
        });
    }
    if previous.tamper != current.tamper {
        events.push(Event::PanelTamperChanged {
            health: current.tamper,
        });
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn door(status: SensorStatus) -> Device {
        Device {
            key: DeviceKey::new(1, 3),
            name: "Front door".to_string(),
            device_type: DeviceType::DoorSensor,
            battery: BatteryState::Normal,
            battery_detail: None,
            tampered: false,
            tamper_detail: None,
            condition_ok: true,
            condition_detail: None,
            status: Some(status),
        }
    }

    #[test]
    fn diff_detects_leaf_change() {
        let prev = json!({"updates": {"mode_a1": "{AREA_MODE_0}"}});
        let curr = json!({"updates": {"mode_a1": "{AREA_MODE_1}"}});
        let mut changes = vec![];
        diff_json(&prev, &curr, "", &mut changes);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, "updates.mode_a1");
        assert_eq!(changes[0].old, json!("{AREA_MODE_0}"));
        assert_eq!(changes[0].new, json!("{AREA_MODE_1}"));
    }

    #[test]
    fn diff_walks_rows_by_index() {
        let prev = json!({"senrows": [{"zone": "1", "status": "a"}]});
        let curr = json!({"senrows": [{"zone": "1", "status": "b"}, {"zone": "2"}]});
        let mut changes = vec![];
        diff_json(&prev, &curr, "", &mut changes);
        let paths: Vec<_> = changes.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["senrows.0.status", "senrows.1.zone"]);
    }

    #[test]
    fn diff_reports_removed_keys() {
        let prev = json!({"a": 1, "b": 2});
        let curr = json!({"a": 1});
        let mut changes = vec![];
        diff_json(&prev, &curr, "", &mut changes);
        assert_eq!(changes, vec![Change { path: "b".into(), old: json!(2), new: Value::Null }]);
    }

    #[test]
    fn diff_ignores_unchanged() {
        let val = json!({"senrows": [{"zone": "1"}]});
        let mut changes = vec![];
        diff_json(&val, &val, "", &mut changes);
        assert!(changes.is_empty());
    }

    #[test]
    fn new_device_emits_added() {
        let events = device_events(None, &door(SensorStatus::Closed));
        assert_eq!(
            events,
            vec![Event::DeviceAdded {
                key: DeviceKey::new(1, 3),
                name: "Front door".to_string(),
                device_type: DeviceType::DoorSensor,
            }]
        );
    }

    #[test]
    fn status_flip_emits_status_changed_only() {
        let prev = door(SensorStatus::Closed);
        let events = device_events(Some(&prev), &door(SensorStatus::Open));
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            Event::DeviceStatusChanged { status: SensorStatus::Open, .. }
        ));
    }

    #[test]
    fn identical_device_emits_nothing() {
        let dev = door(SensorStatus::Closed);
        assert!(device_events(Some(&dev), &dev).is_empty());
    }

    #[test]
    fn condition_mode_and_health_changes() {
        let prev = PanelCondition {
            areas: vec![AreaState { area: Some(1), mode: Mode::Disarm }],
            battery: Health::Ok,
            tamper: Health::Ok,
        };
        let curr = PanelCondition {
            areas: vec![
                AreaState { area: Some(1), mode: Mode::Arm },
                AreaState { area: Some(2), mode: Mode::Disarm },
            ],
            battery: Health::Ok,
            tamper: Health::Fault,
        };
        let events = condition_events(&prev, &curr);
        assert_eq!(
            events,
            vec![
                Event::AreaModeChanged { area: Some(1), mode: Mode::Arm },
                Event::AreaModeChanged { area: Some(2), mode: Mode::Disarm },
                Event::PanelTamperChanged { health: Health::Fault },
            ]
        );
    }
}
