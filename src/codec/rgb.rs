use color_eyre::Result;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    color::{cie_to_rgb, rgb_to_xy, rounding::round_half_up, RgbTriplet},
    device_state::{DeviceColor, DevicePayload, DeviceStateBuilder, PowerState},
};

/// How the `color` field is written when encoding an RGB value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RgbColorMode {
    /// Send the RGB components as they are (`{"r", "g", "b"}`). This is what
    /// existing bulb setups expect.
    #[default]
    DeviceRgb,

    /// Send xy chromaticity (`{"x", "y"}`), symmetric with decoding.
    Xy,
}

/// Approximates device brightness from perceived luminance, using the
/// ITU-R BT.601 weights.
pub fn luminance_brightness(rgb: &RgbTriplet) -> i64 {
    round_half_up(0.299 * rgb.r as f64 + 0.587 * rgb.g as f64 + 0.114 * rgb.b as f64) as i64
}

pub fn encode_rgb(rgb: RgbTriplet, mode: RgbColorMode) -> Result<String> {
    let brightness = luminance_brightness(&rgb);

    let color = match mode {
        RgbColorMode::DeviceRgb => DeviceColor::Rgb(rgb),
        RgbColorMode::Xy => DeviceColor::Xy(rgb_to_xy(rgb)),
    };

    DeviceStateBuilder::default()
        .state(PowerState::from(brightness != 0))
        .brightness(brightness)
        .color(color)
        .build()?
        .to_json()
}

/// Converts the reported chromaticity to RGB, dimmed by the reported
/// brightness if there is one. A payload without `color` is no update.
///
/// Missing or non-numeric coordinates are passed on as NaN and come out as
/// black. A `color` made of `r`, `g` and `b` only is an echo of an RGB encoded
/// payload and is returned as is.
pub fn decode_rgb(payload: &str) -> Result<Option<RgbTriplet>> {
    let payload = DevicePayload::from_json(payload)?;

    let Some(color) = payload.get_if_set("color") else {
        return Ok(None);
    };

    if let Some(rgb) = echoed_rgb(color) {
        return Ok(Some(rgb));
    }

    let coordinate = |name: &str| color.get(name).and_then(Value::as_f64).unwrap_or(f64::NAN);

    let brightness = match payload.get("brightness") {
        None | Some(Value::Null) => None,
        Some(brightness) => Some(brightness.as_f64().unwrap_or(f64::NAN)),
    };

    Ok(Some(cie_to_rgb(coordinate("x"), coordinate("y"), brightness)))
}

fn echoed_rgb(color: &Value) -> Option<RgbTriplet> {
    if color.get("x").is_some() || color.get("y").is_some() {
        return None;
    }

    let component = |name: &str| color.get(name).and_then(Value::as_i64);

    Some(RgbTriplet::new(
        component("r")?,
        component("g")?,
        component("b")?,
    ))
}
