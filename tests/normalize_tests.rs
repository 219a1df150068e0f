use lupusec_xt::{
    decode_document, DeviceKey, DeviceRegistry, DeviceType, Generation, Mode, Normalizer,
    SensorStatus, Tables, VendorText, XT1_TABLES, XT2_TABLES,
};
use serde_json::json;

static TEMPLATE_TABLES: Tables = Tables {
    modes: &[],
    device_types: &[],
    statuses: &[],
    texts: &[("{SOME_EVENT}", "Alarm in area %s")],
};

fn xt2_row(zone: &str, status: &str) -> serde_json::Value {
    json!({
        "area": "1", "zone": zone, "name": format!("Contact {zone}"),
        "type_f": "{WEB_MSG_DC_WINDOW}", "status": status,
        "battery_ok": "1", "tamper_ok": "1", "cond_ok": "1"
    })
}

fn snapshot(registry: &DeviceRegistry) -> Vec<lupusec_xt::Device> {
    registry.sorted().into_iter().cloned().collect()
}

#[test]
fn applying_same_document_twice_is_idempotent() {
    let normalizer = Normalizer::new(Generation::Xt2);
    let doc = json!({"senrows": [xt2_row("3", "{WEB_MSG_DC_OPEN}"), xt2_row("4", "{WEB_MSG_DC_CLOSE}")]});

    let mut registry = DeviceRegistry::new();
    normalizer.apply_device_list(&doc, &mut registry);
    let once = snapshot(&registry);

    let events = normalizer.apply_device_list(&doc, &mut registry);
    assert!(events.is_empty());
    assert_eq!(snapshot(&registry), once);
    assert_eq!(registry.len(), 2);
}

#[test]
fn status_change_updates_existing_entry() {
    let normalizer = Normalizer::new(Generation::Xt2);
    let mut registry = DeviceRegistry::new();

    normalizer.apply_device_list(&json!({"senrows": [xt2_row("3", "{WEB_MSG_DC_CLOSE}")]}), &mut registry);
    normalizer.apply_device_list(&json!({"senrows": [xt2_row("3", "{WEB_MSG_DC_OPEN}")]}), &mut registry);

    assert_eq!(registry.len(), 1);
    let dev = registry.get(&DeviceKey::new(1, 3)).unwrap();
    assert_eq!(dev.status, Some(SensorStatus::Open));
    assert_eq!(dev.device_type, DeviceType::WindowSensor);
}

#[test]
fn unknown_codes_degrade_to_unknown() {
    let normalizer = Normalizer::new(Generation::Xt2);
    let rows = normalizer.device_rows(&json!({"senrows": [
        {"area": "1", "zone": "9", "type_f": "{WEB_MSG_FUTURE_DEVICE}"}
    ]}));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].device_type, DeviceType::Unknown);
    assert_eq!(rows[0].status, None);

    let cond = normalizer.panel_condition(&json!({"updates": {"mode_a1": "{AREA_MODE_77}"}}));
    assert_eq!(cond.areas[0].mode, Mode::Unknown);

    let xt1 = Normalizer::new(Generation::Xt1);
    let cond = xt1.panel_condition(&json!({"updates": {"mode_st": "42"}}));
    assert_eq!(cond.areas[0].mode, Mode::Unknown);
}

#[test]
fn canonical_open_and_closed_tokens() {
    for (generation, tables, door_type) in [
        (Generation::Xt1, &XT1_TABLES, "4"),
        (Generation::Xt2, &XT2_TABLES, "{WEB_MSG_DC_DOOR}"),
    ] {
        let token = |wanted: SensorStatus| {
            tables
                .statuses
                .iter()
                .find(|(_, s)| *s == wanted)
                .map(|(code, _)| *code)
                .unwrap()
        };
        let type_key = if generation == Generation::Xt1 { "type" } else { "type_f" };
        let normalizer = Normalizer::new(generation);

        let statuses: Vec<_> = [SensorStatus::Open, SensorStatus::Closed]
            .into_iter()
            .map(|wanted| {
                let mut row = json!({"area": "1", "zone": "1", "status": token(wanted)});
                row[type_key] = json!(door_type);
                normalizer.device_rows(&json!({"senrows": [row]}))[0].status
            })
            .collect();

        assert_eq!(statuses[0], Some(SensorStatus::Open));
        assert_eq!(statuses[1], Some(SensorStatus::Closed));
        assert_ne!(statuses[0], statuses[1]);
    }
}

#[test]
fn template_event_gets_area_substituted() {
    let normalizer = Normalizer::with_tables(Generation::Xt2, &TEMPLATE_TABLES);
    let history = normalizer.history(&json!({"logrows": [
        {"time": "1588432044", "area": "2", "name": "Hall", "event": "{SOME_EVENT}"}
    ]}));
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].event, VendorText::Known("Alarm in area 2".into()));
}

#[test]
fn history_order_is_preserved() {
    let normalizer = Normalizer::new(Generation::Xt1);
    let history = normalizer.history(&json!({"hisrows": [
        {"d": "03.05.2020", "t": "10:00:00", "s": "B", "a": "second"},
        {"d": "01.05.2020", "t": "10:00:00", "s": "A", "a": "first"}
    ]}));
    let sources: Vec<_> = history.iter().map(|h| h.source.as_str()).collect();
    assert_eq!(sources, vec!["B", "A"]);
}

#[test]
fn envelope_stripping() {
    let doc = decode_document("/*-secure-{\"a\":\t1}*/").unwrap();
    assert_eq!(doc, json!({"a": 1}));
}

#[test]
fn row_missing_zone_does_not_block_others() {
    let normalizer = Normalizer::new(Generation::Xt2);
    let mut registry = DeviceRegistry::new();
    let doc = json!({"senrows": [
        xt2_row("3", "{WEB_MSG_DC_OPEN}"),
        {"area": "1", "name": "no zone", "type_f": "{WEB_MSG_DC_WINDOW}"},
        xt2_row("5", "{WEB_MSG_DC_CLOSE}")
    ]});
    normalizer.apply_device_list(&doc, &mut registry);

    assert_eq!(registry.len(), 2);
    assert!(registry.get(&DeviceKey::new(1, 3)).is_some());
    assert!(registry.get(&DeviceKey::new(1, 5)).is_some());
}

#[test]
fn xt1_devices_live_in_area_zero() {
    let normalizer = Normalizer::new(Generation::Xt1);
    let rows = normalizer.device_rows(&json!({"senrows": [
        {"type": "24", "name": "Steckdose", "zone": "8", "tamp": "", "battery": "", "cond": "", "status": "An"}
    ]}));
    assert_eq!(rows[0].key, DeviceKey::new(0, 8));
    assert_eq!(rows[0].device_type, DeviceType::PowerSwitch);
    assert_eq!(rows[0].status, Some(SensorStatus::On));
}

#[test]
fn binary_device_with_changed_type_code_keeps_status() {
    let normalizer = Normalizer::new(Generation::Xt2);
    let mut registry = DeviceRegistry::new();
    let door = |type_f: &str, status: &str| {
        json!({"senrows": [{
            "area": "1", "zone": "3", "name": "Front door",
            "type_f": type_f, "status": status
        }]})
    };

    normalizer.apply_device_list(&door("{WEB_MSG_DC_DOOR}", "{WEB_MSG_DC_OPEN}"), &mut registry);
    normalizer.apply_device_list(&door("{WEB_MSG_NEW}", "{WEB_MSG_DC_CLOSE}"), &mut registry);

    let dev = registry.get(&DeviceKey::new(1, 3)).unwrap();
    assert_eq!(dev.device_type, DeviceType::DoorSensor);
    assert!(dev.status.is_some());
}
