use std::fmt;

use crate::color::RgbTriplet;

/// A property value in the home automation bridge's representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutomationValue {
    OnOff(bool),

    /// Brightness in percent (0-100)
    BrightnessPercent(i64),

    Rgb(RgbTriplet),
}

impl fmt::Display for AutomationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutomationValue::OnOff(on) => write!(f, "{}", on),
            AutomationValue::BrightnessPercent(percent) => write!(f, "{}", percent),
            AutomationValue::Rgb(rgb) => write!(f, "{}", rgb),
        }
    }
}
