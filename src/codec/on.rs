use color_eyre::Result;

use crate::device_state::{DevicePayload, DeviceStateBuilder, PowerState};

pub fn encode_on(on: bool) -> Result<String> {
    DeviceStateBuilder::default()
        .state(PowerState::from(on))
        .build()?
        .to_json()
}

/// Any set `state` counts as an update, and only the string `"ON"` means on.
pub fn decode_on(payload: &str) -> Result<Option<bool>> {
    let payload = DevicePayload::from_json(payload)?;

    let on = payload
        .get_if_set("state")
        .map(|state| state.as_str() == Some(PowerState::On.as_str()));

    Ok(on)
}
