use tracing::debug;

use crate::types::*;

/// Static vendor-code vocabularies for one panel generation.
///
/// Lookups are total: a code missing from a table yields the UNKNOWN variant
/// (or [`VendorText::Unknown`] carrying the raw code) instead of failing.
#[derive(Debug)]
pub struct Tables {
    pub modes: &'static [(&'static str, Mode)],
    pub device_types: &'static [(&'static str, DeviceType)],
    pub statuses: &'static [(&'static str, SensorStatus)],
    /// Reason codes, device-type captions and history event templates.
    /// Templates may contain one `%s` placeholder for the area.
    pub texts: &'static [(&'static str, &'static str)],
}

fn lookup<T: Copy>(table: &[(&str, T)], code: &str) -> Option<T> {
    table.iter().find(|(c, _)| *c == code).map(|(_, v)| *v)
}

impl Tables {
    pub fn mode(&self, code: &str) -> Mode {
        lookup(self.modes, code).unwrap_or_else(|| {
            debug!(code, "unmapped mode code");
            Mode::Unknown
        })
    }

    pub fn device_type(&self, code: &str) -> DeviceType {
        lookup(self.device_types, code).unwrap_or_else(|| {
            debug!(code, "unmapped device type code");
            DeviceType::Unknown
        })
    }

    pub fn status(&self, code: &str) -> SensorStatus {
        lookup(self.statuses, code).unwrap_or(SensorStatus::Unknown)
    }

    pub fn text(&self, code: &str) -> VendorText {
        match lookup(self.texts, code) {
            Some(text) => VendorText::Known(text.to_string()),
            None => {
                debug!(code, "unmapped text code");
                VendorText::Unknown(code.to_string())
            }
        }
    }
}

/// XT1 firmware: numeric codes and German status strings.
pub static XT1_TABLES: Tables = Tables {
    modes: &[
        ("0", Mode::Arm),
        ("1", Mode::Home),
        ("2", Mode::Disarm),
    ],
    device_types: &[
        ("3", DeviceType::Keypad),
        ("4", DeviceType::DoorSensor),
        ("5", DeviceType::WaterDetector),
        ("7", DeviceType::WindowSensor),
        ("9", DeviceType::MotionDetector),
        ("11", DeviceType::SmokeDetector),
        ("21", DeviceType::Siren),
        ("24", DeviceType::PowerSwitch),
        ("25", DeviceType::PowerSwitch),
    ],
    statuses: &[
        ("Offen", SensorStatus::Open),
        ("Geschlossen", SensorStatus::Closed),
        ("An", SensorStatus::On),
        ("Ein", SensorStatus::On),
        ("Aus", SensorStatus::Off),
    ],
    texts: &[],
};

/// XT2 firmware: `{TOKEN}` codes mirroring the panel's localization keys.
pub static XT2_TABLES: Tables = Tables {
    modes: &[
        ("{AREA_MODE_0}", Mode::Disarm),
        ("{AREA_MODE_1}", Mode::Arm),
        ("{AREA_MODE_2}", Mode::Home),
        ("{AREA_MODE_3}", Mode::Home2),
        ("{AREA_MODE_4}", Mode::Home3),
    ],
    device_types: &[
        ("{WEB_MSG_DC_WINDOW}", DeviceType::WindowSensor),
        ("{WEB_MSG_DC_DOOR}", DeviceType::DoorSensor),
        ("{WEB_MSG_DC_REED}", DeviceType::DoorSensor),
        ("{WEB_MSG_KEYPAD}", DeviceType::Keypad),
        ("{WEB_MSG_PIR}", DeviceType::MotionDetector),
        ("{WEB_MSG_SMOKE_DETECTOR}", DeviceType::SmokeDetector),
        ("{WEB_MSG_WATER_DETECTOR}", DeviceType::WaterDetector),
        ("{WEB_MSG_PSS}", DeviceType::PowerSwitch),
        ("{WEB_MSG_SIREN_INDOOR}", DeviceType::Siren),
        ("{WEB_MSG_SIREN_OUTDOOR}", DeviceType::Siren),
        ("{WEB_MSG_CONTROL_PANEL}", DeviceType::AlarmPanel),
    ],
    statuses: &[
        ("{WEB_MSG_DC_OPEN}", SensorStatus::Open),
        ("{WEB_MSG_DC_CLOSE}", SensorStatus::Closed),
        ("{WEB_MSG_PSS_ON}", SensorStatus::On),
        ("{WEB_MSG_PSS_OFF}", SensorStatus::Off),
    ],
    texts: &[
        ("{WEB_MSG_DC_WINDOW}", "Window contact"),
        ("{WEB_MSG_DC_DOOR}", "Door contact"),
        ("{WEB_MSG_DC_REED}", "Reed contact"),
        ("{WEB_MSG_KEYPAD}", "Keypad"),
        ("{WEB_MSG_PIR}", "Motion detector"),
        ("{WEB_MSG_SMOKE_DETECTOR}", "Smoke detector"),
        ("{WEB_MSG_WATER_DETECTOR}", "Water detector"),
        ("{WEB_MSG_PSS}", "Power switch"),
        ("{WEB_MSG_SIREN_INDOOR}", "Indoor siren"),
        ("{WEB_MSG_SIREN_OUTDOOR}", "Outdoor siren"),
        ("{WEB_MSG_CONTROL_PANEL}", "Control panel"),
        ("{WEB_MSG_BATTERY_LOW}", "Battery low"),
        ("{WEB_MSG_BATTERY_FAULT}", "Battery fault"),
        ("{WEB_MSG_TAMPER_OPEN}", "Tamper open"),
        ("{WEB_MSG_RF_LOST}", "Signal lost"),
        ("{WEB_MSG_RF_JAMMING}", "Radio jamming"),
        ("{WEB_MSG_AC_FAIL}", "Power failure"),
        ("{ESG_AREA_ARM}", "Area %s armed"),
        ("{ESG_AREA_DISARM}", "Area %s disarmed"),
        ("{ESG_AREA_HOME_1}", "Area %s home"),
        ("{ESG_AREA_HOME_2}", "Area %s home (night)"),
        ("{ESG_AREA_HOME_3}", "Area %s home (custom bypass)"),
        ("{ALARM_BURGLAR}", "Alarm in area %s"),
        ("{ALARM_FIRE}", "Fire alarm"),
        ("{ALARM_WATER}", "Water alarm"),
        ("{ALARM_PANIC}", "Panic alarm in area %s"),
        ("{ALARM_TAMPER}", "Tamper alarm in area %s"),
        ("{EVENT_DOOR_OPEN}", "Door opened"),
        ("{EVENT_DOOR_CLOSE}", "Door closed"),
        ("{EVENT_BATTERY_LOW}", "Battery low"),
        ("{EVENT_RF_LOST}", "Signal lost"),
    ],
};

impl Generation {
    pub fn tables(&self) -> &'static Tables {
        match self {
            Generation::Xt1 => &XT1_TABLES,
            Generation::Xt2 => &XT2_TABLES,
        }
    }
}
