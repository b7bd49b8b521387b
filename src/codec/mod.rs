use std::{fmt, sync::Arc};

use color_eyre::Result;
use eyre::WrapErr;
use log::Level;

use crate::{automation_value::AutomationValue, color::RgbTriplet, settings::CodecSettings};

use self::{
    brightness::{decode_brightness, encode_brightness},
    on::{decode_on, encode_on},
    rgb::{decode_rgb, encode_rgb, RgbColorMode},
};

pub mod brightness;
pub mod on;
pub mod rgb;

/// Receives the codec's log messages instead of the `log` backend.
pub type LogSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Properties with a dedicated translation rule. Everything else is passed
/// through unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Property {
    On,
    Brightness,
    Rgb,
    Other(String),
}

impl From<&str> for Property {
    fn from(name: &str) -> Self {
        match name {
            "on" => Property::On,
            "brightness" => Property::Brightness,
            "RGB" => Property::Rgb,
            other => Property::Other(other.to_string()),
        }
    }
}

/// Context of a message being translated, used for diagnostics and to pick
/// the translation rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageInfo {
    pub topic: String,
    pub property: String,
}

impl MessageInfo {
    pub fn new(topic: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            property: property.into(),
        }
    }
}

/// Translates property values of a single device between the home automation
/// bridge and the device's JSON payloads.
///
/// Holds no state besides configuration, so a codec can be cloned and shared
/// across threads freely.
#[derive(Clone)]
pub struct Codec {
    name: String,
    rgb_color_mode: RgbColorMode,
    log_sink: Option<LogSink>,
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("name", &self.name)
            .field("rgb_color_mode", &self.rgb_color_mode)
            .field("log_sink", &self.log_sink.is_some())
            .finish()
    }
}

impl Codec {
    pub fn new(name: impl Into<String>, log_sink: Option<LogSink>) -> Self {
        let codec = Self {
            name: name.into(),
            rgb_color_mode: RgbColorMode::default(),
            log_sink,
        };

        codec.log(Level::Info, &format!("Codec initialized for {}", codec.name));

        codec
    }

    pub fn from_settings(settings: &CodecSettings, log_sink: Option<LogSink>) -> Self {
        Self::new(settings.name.clone(), log_sink).with_rgb_color_mode(settings.rgb_color_mode)
    }

    pub fn with_rgb_color_mode(mut self, rgb_color_mode: RgbColorMode) -> Self {
        self.rgb_color_mode = rgb_color_mode;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Encodes a message from the home automation bridge into a device
    /// payload.
    pub fn encode(&self, message: &str, info: &MessageInfo) -> Result<String> {
        self.log(
            Level::Debug,
            &format!(
                "{}: encoding [{}] for topic [{}], property [{}]",
                self.name, message, info.topic, info.property
            ),
        );

        let value = match Property::from(info.property.as_str()) {
            Property::On => AutomationValue::OnOff(
                message
                    .trim()
                    .parse()
                    .wrap_err_with(|| format!("Invalid on/off value {:?}", message))?,
            ),
            Property::Brightness => AutomationValue::BrightnessPercent(
                message
                    .trim()
                    .parse()
                    .wrap_err_with(|| format!("Invalid brightness value {:?}", message))?,
            ),
            Property::Rgb => AutomationValue::Rgb(message.parse::<RgbTriplet>()?),
            Property::Other(_) => return Ok(message.to_string()),
        };

        self.encode_value(&value)
    }

    pub fn encode_value(&self, value: &AutomationValue) -> Result<String> {
        match value {
            AutomationValue::OnOff(on) => encode_on(*on),
            AutomationValue::BrightnessPercent(percent) => encode_brightness(*percent),
            AutomationValue::Rgb(rgb) => encode_rgb(*rgb, self.rgb_color_mode),
        }
    }

    /// Decodes a device payload into the property's textual value.
    ///
    /// Returns `Ok(None)` if the payload carries nothing for this property, in
    /// which case the current value should be left alone.
    pub fn decode(&self, message: &str, info: &MessageInfo) -> Result<Option<String>> {
        self.log(
            Level::Debug,
            &format!(
                "{}: decoding [{}] from topic [{}], property [{}]",
                self.name, message, info.topic, info.property
            ),
        );

        let value = match Property::from(info.property.as_str()) {
            Property::On => decode_on(message)?.map(AutomationValue::OnOff),
            Property::Brightness => {
                decode_brightness(message)?.map(AutomationValue::BrightnessPercent)
            }
            Property::Rgb => decode_rgb(message)?.map(AutomationValue::Rgb),
            Property::Other(_) => return Ok(Some(message.to_string())),
        };

        Ok(value.map(|value| value.to_string()))
    }

    fn log(&self, level: Level, message: &str) {
        match &self.log_sink {
            Some(sink) => sink(message),
            None => log::log!(level, "{}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn info(property: &str) -> MessageInfo {
        MessageInfo::new("zigbee2mqtt/bulb", property)
    }

    #[test]
    fn maps_property_names() {
        assert_eq!(Property::from("on"), Property::On);
        assert_eq!(Property::from("brightness"), Property::Brightness);
        assert_eq!(Property::from("RGB"), Property::Rgb);
        assert_eq!(
            Property::from("rgb"),
            Property::Other("rgb".to_string())
        );
    }

    #[test]
    fn encodes_each_property() {
        let codec = Codec::new("bulb", None);

        assert_eq!(
            codec.encode("true", &info("on")).unwrap(),
            r#"{"state":"ON"}"#
        );
        assert_eq!(
            codec.encode("0", &info("brightness")).unwrap(),
            r#"{"state":"OFF","brightness":0}"#
        );
        assert_eq!(
            codec.encode("255,0,0", &info("RGB")).unwrap(),
            r#"{"state":"ON","brightness":76,"color":{"r":255,"g":0,"b":0}}"#
        );
    }

    #[test]
    fn decodes_each_property() {
        let codec = Codec::new("bulb", None);
        let payload = r#"{"state":"ON","brightness":127,"color":{"x":0.3,"y":0.3}}"#;

        assert_eq!(
            codec.decode(payload, &info("on")).unwrap().as_deref(),
            Some("true")
        );
        assert_eq!(
            codec.decode(payload, &info("brightness")).unwrap().as_deref(),
            Some("50")
        );
        assert!(codec.decode(payload, &info("RGB")).unwrap().is_some());
    }

    #[test]
    fn absent_fields_are_no_update() {
        let codec = Codec::new("bulb", None);

        assert_eq!(codec.decode(r#"{}"#, &info("on")).unwrap(), None);
        assert_eq!(
            codec.decode(r#"{"state":"ON"}"#, &info("brightness")).unwrap(),
            None
        );
        assert_eq!(
            codec.decode(r#"{"state":"ON"}"#, &info("RGB")).unwrap(),
            None
        );
    }

    #[test]
    fn unrelated_fields_never_fail_a_decode() {
        let codec = Codec::new("bulb", None);

        assert_eq!(
            codec
                .decode(r#"{"state":"ON","color":{"hue":120,"saturation":50}}"#, &info("on"))
                .unwrap()
                .as_deref(),
            Some("true")
        );
        assert_eq!(
            codec
                .decode(r#"{"state":"ON","brightness":127.5}"#, &info("on"))
                .unwrap()
                .as_deref(),
            Some("true")
        );
        assert_eq!(
            codec
                .decode(r#"{"brightness":127,"color":{"hue":120}}"#, &info("brightness"))
                .unwrap()
                .as_deref(),
            Some("50")
        );
        assert_eq!(
            codec
                .decode(r#"{"state":true}"#, &info("on"))
                .unwrap()
                .as_deref(),
            Some("false")
        );
        assert_eq!(
            codec
                .decode(r#"{"color":{}}"#, &info("RGB"))
                .unwrap()
                .as_deref(),
            Some("0,0,0")
        );
    }

    #[test]
    fn passes_other_properties_through() {
        let codec = Codec::new("bulb", None);

        assert_eq!(
            codec.encode("whatever", &info("colorTemperature")).unwrap(),
            "whatever"
        );
        assert_eq!(
            codec
                .decode("not json either", &info("colorTemperature"))
                .unwrap()
                .as_deref(),
            Some("not json either")
        );
    }

    #[test]
    fn rejects_unparseable_input() {
        let codec = Codec::new("bulb", None);

        assert!(codec.encode("maybe", &info("on")).is_err());
        assert!(codec.encode("half", &info("brightness")).is_err());
        assert!(codec.encode("1,2", &info("RGB")).is_err());
        assert!(codec.decode("not json", &info("on")).is_err());
        assert!(codec.decode("not json", &info("brightness")).is_err());
        assert!(codec.decode("not json", &info("RGB")).is_err());
    }

    #[test]
    fn encodes_xy_when_configured() {
        let codec = Codec::new("bulb", None).with_rgb_color_mode(RgbColorMode::Xy);

        assert_eq!(
            codec.encode("255,39,60", &info("RGB")).unwrap(),
            r#"{"state":"ON","brightness":106,"color":{"x":0.6613,"y":0.2935}}"#
        );
    }

    #[test]
    fn logs_through_sink() {
        let messages = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink_messages = messages.clone();
        let sink: LogSink = Arc::new(move |message: &str| {
            sink_messages.lock().unwrap().push(message.to_string());
        });

        let codec = Codec::new("bulb", Some(sink));
        codec.encode("true", &info("on")).unwrap();
        codec.decode(r#"{"state":"OFF"}"#, &info("on")).unwrap();

        let messages = messages.lock().unwrap();
        assert_eq!(messages.len(), 3);
        assert!(messages[0].contains("bulb"));
        assert!(messages[1].contains("encoding [true]"));
        assert!(messages[2].contains("property [on]"));
    }

    #[test]
    fn codec_is_shareable_across_threads() {
        let codec = Codec::new("bulb", None);

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let codec = codec.clone();
                std::thread::spawn(move || {
                    codec
                        .encode(&(i * 25).to_string(), &info("brightness"))
                        .unwrap()
                })
            })
            .collect();

        let payloads: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(payloads[2], r#"{"state":"ON","brightness":127}"#);
    }
}
