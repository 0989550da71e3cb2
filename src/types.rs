//! Monitor records and the ordered layout they are collected into
//!
//! A `Layout` is what a capture produces and what a profile file stores:
//! monitor name → `MonitorRecord`, in the order xrandr reported the ports.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::constants::defaults;

/// Output rotation as understood by `xrandr --rotate`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    #[default]
    Normal,
    Left,
    Inverted,
    Right,
}

impl Rotation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::Normal => "normal",
            Rotation::Left => "left",
            Rotation::Inverted => "inverted",
            Rotation::Right => "right",
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Rotation::Normal),
            "left" => Ok(Rotation::Left),
            "inverted" => Ok(Rotation::Inverted),
            "right" => Ok(Rotation::Right),
            other => Err(format!("unknown rotation '{other}'")),
        }
    }
}

/// Everything known about a connected output
#[derive(Debug, Clone, PartialEq)]
pub struct OutputState {
    pub active: bool,
    pub primary: bool,
    /// `WIDTHxHEIGHT`, or `Unknown` when no mode drives the output
    pub mode: String,
    /// `XxY` offset inside the virtual screen
    pub position: String,
    pub rotation: Rotation,
    pub tear_free: String,
    pub colorspace: String,
    pub bpc: u32,
    pub scaling_mode: String,
    pub non_desktop: bool,
    pub refresh_rate: f64,
    /// Raw EDID hex, kept only as a fingerprint of the panel
    pub edid: String,
}

impl Default for OutputState {
    fn default() -> Self {
        Self {
            active: false,
            primary: false,
            mode: defaults::UNKNOWN_MODE.to_string(),
            position: defaults::POSITION.to_string(),
            rotation: Rotation::Normal,
            tear_free: defaults::TEAR_FREE.to_string(),
            colorspace: defaults::COLORSPACE.to_string(),
            bpc: defaults::BPC,
            scaling_mode: defaults::SCALING_MODE.to_string(),
            non_desktop: false,
            refresh_rate: defaults::REFRESH_RATE,
            edid: String::new(),
        }
    }
}

/// Whether a mode string describes an output that is actually lit
pub fn is_active_mode(mode: &str) -> bool {
    mode != defaults::UNKNOWN_MODE && mode != defaults::ZERO_MODE
}

/// One physical output port
///
/// A disconnected port carries no attributes at all; it is stored as
/// `{"connected": false}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredRecord", into = "StoredRecord")]
pub enum MonitorRecord {
    Disconnected,
    Connected(OutputState),
}

impl MonitorRecord {
    pub fn is_connected(&self) -> bool {
        matches!(self, MonitorRecord::Connected(_))
    }

    pub fn state(&self) -> Option<&OutputState> {
        match self {
            MonitorRecord::Connected(state) => Some(state),
            MonitorRecord::Disconnected => None,
        }
    }
}

/// On-disk shape of a record; field order here is the emission order
#[derive(Serialize, Deserialize)]
struct StoredRecord {
    connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    primary: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rotation: Option<Rotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tear_free: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    colorspace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bpc: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scaling_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    non_desktop: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    edid: Option<String>,
}

impl From<StoredRecord> for MonitorRecord {
    fn from(stored: StoredRecord) -> Self {
        if !stored.connected {
            return MonitorRecord::Disconnected;
        }
        // Profiles written by hand or by older versions may omit fields
        let fallback = OutputState::default();
        MonitorRecord::Connected(OutputState {
            active: stored.active.unwrap_or(fallback.active),
            primary: stored.primary.unwrap_or(fallback.primary),
            mode: stored.mode.unwrap_or(fallback.mode),
            position: stored.position.unwrap_or(fallback.position),
            rotation: stored.rotation.unwrap_or(fallback.rotation),
            tear_free: stored.tear_free.unwrap_or(fallback.tear_free),
            colorspace: stored.colorspace.unwrap_or(fallback.colorspace),
            bpc: stored.bpc.unwrap_or(fallback.bpc),
            scaling_mode: stored.scaling_mode.unwrap_or(fallback.scaling_mode),
            non_desktop: stored.non_desktop.unwrap_or(fallback.non_desktop),
            refresh_rate: stored.refresh_rate.unwrap_or(fallback.refresh_rate),
            edid: stored.edid.unwrap_or(fallback.edid),
        })
    }
}

impl From<MonitorRecord> for StoredRecord {
    fn from(record: MonitorRecord) -> Self {
        match record {
            MonitorRecord::Disconnected => StoredRecord {
                connected: false,
                active: None,
                primary: None,
                mode: None,
                position: None,
                rotation: None,
                tear_free: None,
                colorspace: None,
                bpc: None,
                scaling_mode: None,
                non_desktop: None,
                refresh_rate: None,
                edid: None,
            },
            MonitorRecord::Connected(state) => StoredRecord {
                connected: true,
                active: Some(state.active),
                primary: Some(state.primary),
                mode: Some(state.mode),
                position: Some(state.position),
                rotation: Some(state.rotation),
                tear_free: Some(state.tear_free),
                colorspace: Some(state.colorspace),
                bpc: Some(state.bpc),
                scaling_mode: Some(state.scaling_mode),
                non_desktop: Some(state.non_desktop),
                refresh_rate: Some(state.refresh_rate),
                edid: Some(state.edid),
            },
        }
    }
}

/// Ordered mapping of monitor name → record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    monitors: Vec<(String, MonitorRecord)>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing (in place) any record with the same name
    pub fn insert(&mut self, name: impl Into<String>, record: MonitorRecord) {
        let name = name.into();
        match self.monitors.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = record,
            None => self.monitors.push((name, record)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&MonitorRecord> {
        self.monitors
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, record)| record)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MonitorRecord)> {
        self.monitors.iter().map(|(name, record)| (name.as_str(), record))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.monitors.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    pub fn connected_count(&self) -> usize {
        self.monitors.iter().filter(|(_, record)| record.is_connected()).count()
    }
}

impl Serialize for Layout {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.monitors.len()))?;
        for (name, record) in &self.monitors {
            map.serialize_entry(name, record)?;
        }
        map.end()
    }
}

struct LayoutVisitor;

impl<'de> Visitor<'de> for LayoutVisitor {
    type Value = Layout;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of monitor name to monitor record")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Layout, A::Error> {
        let mut layout = Layout::new();
        while let Some((name, record)) = access.next_entry::<String, MonitorRecord>()? {
            layout.insert(name, record);
        }
        Ok(layout)
    }
}

impl<'de> Deserialize<'de> for Layout {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(LayoutVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laptop_panel() -> OutputState {
        OutputState {
            active: true,
            primary: true,
            mode: "1920x1080".to_string(),
            edid: "00ffffffffffff00".to_string(),
            ..OutputState::default()
        }
    }

    #[test]
    fn test_disconnected_serializes_to_connected_false_only() {
        let json = serde_json::to_string(&MonitorRecord::Disconnected).unwrap();
        assert_eq!(json, r#"{"connected":false}"#);
    }

    #[test]
    fn test_connected_fields_emitted_in_fixed_order() {
        let json = serde_json::to_string(&MonitorRecord::Connected(laptop_panel())).unwrap();
        let keys = [
            "connected", "active", "primary", "mode", "position", "rotation", "tear_free",
            "colorspace", "bpc", "scaling_mode", "non_desktop", "refresh_rate", "edid",
        ];
        let offsets: Vec<usize> = keys
            .iter()
            .map(|k| json.find(&format!("\"{k}\"")).expect("key present"))
            .collect();
        assert!(offsets.windows(2).all(|w| w[0] < w[1]), "order was {json}");
    }

    #[test]
    fn test_disconnected_drops_stray_fields_on_load() {
        let record: MonitorRecord =
            serde_json::from_str(r#"{"connected": false, "mode": "1920x1080"}"#).unwrap();
        assert_eq!(record, MonitorRecord::Disconnected);
    }

    #[test]
    fn test_connected_record_missing_fields_loads_defaults() {
        // Older profiles carry no rotation
        let record: MonitorRecord = serde_json::from_str(
            r#"{"connected": true, "active": true, "mode": "2560x1440", "position": "1920x0"}"#,
        )
        .unwrap();
        let state = record.state().unwrap();
        assert!(state.active);
        assert_eq!(state.mode, "2560x1440");
        assert_eq!(state.position, "1920x0");
        assert_eq!(state.rotation, Rotation::Normal);
        assert_eq!(state.bpc, 8);
        assert_eq!(state.refresh_rate, 60.0);
    }

    #[test]
    fn test_layout_preserves_insertion_order_through_json() {
        let mut layout = Layout::new();
        layout.insert("eDP-1", MonitorRecord::Connected(laptop_panel()));
        layout.insert("HDMI-1", MonitorRecord::Disconnected);
        layout.insert("DP-2", MonitorRecord::Disconnected);

        let json = serde_json::to_string(&layout).unwrap();
        let back: Layout = serde_json::from_str(&json).unwrap();
        assert_eq!(back.names().collect::<Vec<_>>(), vec!["eDP-1", "HDMI-1", "DP-2"]);
        assert_eq!(back, layout);
    }

    #[test]
    fn test_layout_insert_replaces_in_place() {
        let mut layout = Layout::new();
        layout.insert("DP-1", MonitorRecord::Disconnected);
        layout.insert("DP-2", MonitorRecord::Disconnected);
        layout.insert("DP-1", MonitorRecord::Connected(laptop_panel()));

        assert_eq!(layout.len(), 2);
        assert_eq!(layout.names().next(), Some("DP-1"));
        assert!(layout.get("DP-1").unwrap().is_connected());
        assert_eq!(layout.connected_count(), 1);
    }

    #[test]
    fn test_active_mode_rules() {
        assert!(!is_active_mode("Unknown"));
        assert!(!is_active_mode("0x0"));
        assert!(is_active_mode("3840x2160"));
    }

    #[test]
    fn test_rotation_parse_and_display() {
        assert_eq!("inverted".parse::<Rotation>(), Ok(Rotation::Inverted));
        assert!("sideways".parse::<Rotation>().is_err());
        assert_eq!(Rotation::Left.to_string(), "left");
    }
}
