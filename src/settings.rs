use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;

use crate::codec::rgb::RgbColorMode;

#[derive(Clone, Deserialize, Debug)]
pub struct CodecSettings {
    pub name: String,
    pub rgb_color_mode: RgbColorMode,
}

/// Topic templates, `{name}` is replaced with the codec name.
#[derive(Clone, Deserialize, Debug)]
pub struct HostSettings {
    pub state_topic: String,
    pub set_topic: String,
}

#[derive(Clone, Deserialize, Debug)]
pub struct Settings {
    pub codec: CodecSettings,
    pub host: HostSettings,
}

fn settings_builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("codec.name", "tradfri")?
        .set_default("codec.rgb_color_mode", "device_rgb")?
        .set_default("host.state_topic", "zigbee2mqtt/{name}")?
        .set_default("host.set_topic", "zigbee2mqtt/{name}/set")
}

/// Reads settings from an optional `Settings` file in the working directory,
/// overridden by `TRADFRI_CODEC__<SECTION>__<KEY>` environment variables.
pub fn read_settings() -> Result<Settings, ConfigError> {
    settings_builder()?
        .add_source(config::File::with_name("Settings").required(false))
        .add_source(config::Environment::with_prefix("TRADFRI_CODEC").separator("__"))
        .build()?
        .try_deserialize::<Settings>()
}
