use color_eyre::Result;

use crate::{
    color::rounding::round_half_up,
    device_state::{DevicePayload, DeviceStateBuilder, PowerState},
};

/// Device brightness (0-254) per percent of automation brightness (0-100).
pub const DEVICE_BRIGHTNESS_PER_PERCENT: f64 = 2.54;

pub fn percent_to_device(percent: i64) -> i64 {
    round_half_up(percent as f64 * DEVICE_BRIGHTNESS_PER_PERCENT) as i64
}

pub fn device_to_percent(brightness: f64) -> i64 {
    round_half_up(brightness / DEVICE_BRIGHTNESS_PER_PERCENT) as i64
}

/// Zero brightness also switches the light off.
pub fn encode_brightness(percent: i64) -> Result<String> {
    let brightness = percent_to_device(percent);

    DeviceStateBuilder::default()
        .state(PowerState::from(brightness != 0))
        .brightness(brightness)
        .build()?
        .to_json()
}

/// A missing, zero or non-numeric `brightness` is no update. Powering off is
/// reported through the `on` property instead.
pub fn decode_brightness(payload: &str) -> Result<Option<i64>> {
    let payload = DevicePayload::from_json(payload)?;

    let percent = payload
        .get_if_set("brightness")
        .and_then(|brightness| brightness.as_f64())
        .map(device_to_percent);

    Ok(percent)
}
