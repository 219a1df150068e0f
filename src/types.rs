use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::Error;

/// Panel firmware family. XT1 panels are single-area, XT2 panels have
/// numbered areas and template-token vocabularies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Generation {
    Xt1,
    Xt2,
}

impl FromStr for Generation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "xt1" => Ok(Generation::Xt1),
            "2" | "xt2" => Ok(Generation::Xt2),
            other => Err(Error::InvalidGeneration(other.to_string())),
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Generation::Xt1 => write!(f, "XT1"),
            Generation::Xt2 => write!(f, "XT2"),
        }
    }
}

/// Composite (area, zone) identity of a device. XT1 devices all live in area 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DeviceKey {
    pub area: u8,
    pub zone: u16,
}

impl DeviceKey {
    pub fn new(area: u8, zone: u16) -> Self {
        Self { area, zone }
    }
}

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.area, self.zone)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeviceType {
    WindowSensor,
    DoorSensor,
    Keypad,
    MotionDetector,
    SmokeDetector,
    WaterDetector,
    PowerSwitch,
    Siren,
    AlarmPanel,
    Unknown,
}

impl DeviceType {
    /// Types that report an open/closed or on/off status.
    pub fn is_binary(&self) -> bool {
        matches!(
            self,
            DeviceType::WindowSensor | DeviceType::DoorSensor | DeviceType::PowerSwitch
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SensorStatus {
    Open,
    Closed,
    On,
    Off,
    Unknown,
}

impl SensorStatus {
    pub fn is_open_or_on(&self) -> bool {
        matches!(self, SensorStatus::Open | SensorStatus::On)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum BatteryState {
    /// Field absent or unreadable.
    #[default]
    None,
    Normal,
    Trouble,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mode {
    Arm,
    Home,
    Disarm,
    /// "Night" home mode (XT2 only).
    Home2,
    /// "Custom bypass" home mode (XT2 only).
    Home3,
    Triggered,
    Unknown,
}

/// Panel-wide ok/fault flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Health {
    Ok,
    Fault,
    #[default]
    Unknown,
}

/// Translated vendor text. An unmapped code keeps its raw token so callers
/// can still see what the panel sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum VendorText {
    Known(String),
    Unknown(String),
}

impl VendorText {
    pub fn is_known(&self) -> bool {
        matches!(self, VendorText::Known(_))
    }
}

impl fmt::Display for VendorText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VendorText::Known(text) => write!(f, "{text}"),
            VendorText::Unknown(code) => write!(f, "UNKNOWN ({code})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Device {
    pub key: DeviceKey,
    pub name: String,
    pub device_type: DeviceType,
    pub battery: BatteryState,
    pub battery_detail: Option<VendorText>,
    pub tampered: bool,
    pub tamper_detail: Option<VendorText>,
    pub condition_ok: bool,
    pub condition_detail: Option<VendorText>,
    /// Present only for binary-capable device types.
    pub status: Option<SensorStatus>,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Area: {}, Zone: {}, Type: {:?}, Name: {}, Battery: {:?}, Tampered: {}, Cond ok: {}",
            self.key.area,
            self.key.zone,
            self.device_type,
            self.name,
            self.battery,
            self.tampered,
            self.condition_ok,
        )?;
        if let Some(status) = self.status {
            write!(f, ", Status: {status:?}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AreaState {
    /// `None` on single-area panels.
    pub area: Option<u8>,
    pub mode: Mode,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PanelCondition {
    pub areas: Vec<AreaState>,
    pub battery: Health,
    pub tamper: Health,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub date: String,
    pub time: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub source: String,
    pub kind: Option<VendorText>,
    pub event: VendorText,
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} | {} | {}", self.date, self.time, self.source, self.event)?;
        if let Some(kind) = &self.kind {
            write!(f, " ({kind})")?;
        }
        Ok(())
    }
}

/// Changes observed while applying a poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Event {
    DeviceAdded { key: DeviceKey, name: String, device_type: DeviceType },
    DeviceStatusChanged { key: DeviceKey, name: String, status: SensorStatus },
    DeviceBatteryChanged { key: DeviceKey, name: String, battery: BatteryState },
    DeviceTamperChanged { key: DeviceKey, name: String, tampered: bool },
    DeviceConditionChanged { key: DeviceKey, name: String, ok: bool },
    AreaModeChanged { area: Option<u8>, mode: Mode },
    PanelBatteryChanged { health: Health },
    PanelTamperChanged { health: Health },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_parses_cli_spellings() {
        assert_eq!("1".parse::<Generation>().unwrap(), Generation::Xt1);
        assert_eq!("XT2".parse::<Generation>().unwrap(), Generation::Xt2);
        let err = "3".parse::<Generation>().unwrap_err();
        assert!(matches!(err, Error::InvalidGeneration(ref g) if g == "3"));
    }

    #[test]
    fn binary_types() {
        assert!(DeviceType::DoorSensor.is_binary());
        assert!(DeviceType::PowerSwitch.is_binary());
        assert!(!DeviceType::SmokeDetector.is_binary());
        assert!(!DeviceType::Unknown.is_binary());
    }

    #[test]
    fn open_or_on() {
        assert!(SensorStatus::Open.is_open_or_on());
        assert!(SensorStatus::On.is_open_or_on());
        assert!(!SensorStatus::Closed.is_open_or_on());
        assert!(!SensorStatus::Unknown.is_open_or_on());
    }

    #[test]
    fn device_key_display() {
        assert_eq!(DeviceKey::new(1, 3).to_string(), "1-3");
    }

    #[test]
    fn unknown_text_keeps_code() {
        let text = VendorText::Unknown("{WEB_MSG_X}".to_string());
        assert!(!text.is_known());
        assert_eq!(text.to_string(), "UNKNOWN ({WEB_MSG_X})");
    }
}
