use color_eyre::Result;
use derive_builder::Builder;
use serde::Serialize;
use serde_json::Value;

use crate::color::{RgbTriplet, Xy};

/// Power state as sent on the device wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerState::On => "ON",
            PowerState::Off => "OFF",
        }
    }
}

impl From<bool> for PowerState {
    fn from(on: bool) -> Self {
        if on {
            PowerState::On
        } else {
            PowerState::Off
        }
    }
}

impl From<PowerState> for String {
    fn from(state: PowerState) -> Self {
        state.as_str().to_string()
    }
}

/// The `color` field of an outgoing payload: xy chromaticity, or plain RGB
/// components for bulbs set up with the RGB encoder.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DeviceColor {
    Xy(Xy),
    Rgb(RgbTriplet),
}

impl From<Xy> for DeviceColor {
    fn from(xy: Xy) -> Self {
        DeviceColor::Xy(xy)
    }
}

impl From<RgbTriplet> for DeviceColor {
    fn from(rgb: RgbTriplet) -> Self {
        DeviceColor::Rgb(rgb)
    }
}

/// Light state sent to the device. Absent fields are left out of the JSON.
#[derive(Builder, Clone, Debug, Default, PartialEq, Serialize)]
#[builder(setter(into, strip_option), default)]
pub struct DeviceState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Device scale brightness (0-254)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<DeviceColor>,
}

impl DeviceState {
    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string(self)?;

        Ok(json)
    }
}

/// A payload received from the device.
///
/// Only the JSON parse can fail. Fields are looked up one at a time, so a
/// property rule is never affected by the shape of fields it does not read.
#[derive(Clone, Debug, PartialEq)]
pub struct DevicePayload(Value);

impl DevicePayload {
    pub fn from_json(payload: &str) -> Result<DevicePayload> {
        let mut de = serde_json::Deserializer::from_str(payload);
        let value: Value = serde_path_to_error::deserialize(&mut de)?;
        de.end()?;

        Ok(DevicePayload(value))
    }

    /// Looks up a top level field. Payloads that are not JSON objects have no
    /// fields.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Like [`DevicePayload::get`], but skips fields set to `null`, `false`,
    /// `0` or `""`, none of which count as an update.
    pub fn get_if_set(&self, name: &str) -> Option<&Value> {
        self.get(name).filter(|value| is_set(value))
    }
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn omits_absent_fields() {
        let state = DeviceStateBuilder::default()
            .state(PowerState::On)
            .build()
            .unwrap();

        assert_eq!(state.to_json().unwrap(), r#"{"state":"ON"}"#);
        assert_eq!(DeviceState::default().to_json().unwrap(), "{}");
    }

    #[test]
    fn serializes_fields_in_wire_order() {
        let state = DeviceStateBuilder::default()
            .state(PowerState::On)
            .brightness(76)
            .color(RgbTriplet::new(255, 0, 0))
            .build()
            .unwrap();

        assert_eq!(
            state.to_json().unwrap(),
            r#"{"state":"ON","brightness":76,"color":{"r":255,"g":0,"b":0}}"#
        );
    }

    #[test]
    fn serializes_xy_color() {
        let state = DeviceStateBuilder::default()
            .color(Xy { x: 0.5, y: 0.25 })
            .build()
            .unwrap();

        assert_eq!(state.to_json().unwrap(), r#"{"color":{"x":0.5,"y":0.25}}"#);
    }

    #[test]
    fn reads_fields_of_any_shape() {
        let payload = DevicePayload::from_json(
            r#"{"state":"ON","brightness":127.5,"color":{"hue":120},"linkquality":42}"#,
        )
        .unwrap();

        assert_eq!(payload.get("state"), Some(&json!("ON")));
        assert_eq!(payload.get("brightness"), Some(&json!(127.5)));
        assert_eq!(payload.get("color"), Some(&json!({"hue": 120})));
        assert_eq!(payload.get("effect"), None);
    }

    #[test]
    fn unset_fields_are_skipped() {
        let payload = DevicePayload::from_json(
            r#"{"a":null,"b":false,"c":0,"d":"","e":0.0,"f":true,"g":"OFF","h":{},"i":[]}"#,
        )
        .unwrap();

        for name in ["a", "b", "c", "d", "e"] {
            assert_eq!(payload.get_if_set(name), None, "field {}", name);
        }
        for name in ["f", "g", "h", "i"] {
            assert!(payload.get_if_set(name).is_some(), "field {}", name);
        }
    }

    #[test]
    fn non_object_payloads_have_no_fields() {
        assert_eq!(DevicePayload::from_json("42").unwrap().get("state"), None);
        assert_eq!(DevicePayload::from_json("null").unwrap().get("state"), None);
        assert_eq!(
            DevicePayload::from_json(r#"["ON"]"#).unwrap().get("state"),
            None
        );
    }

    #[test]
    fn rejects_unparseable_payloads() {
        assert!(DevicePayload::from_json("not json").is_err());
        assert!(DevicePayload::from_json(r#"{"state":"#).is_err());
        assert!(DevicePayload::from_json(r#"{"state":"ON"} trailing"#).is_err());
    }
}
