use std::{fmt, str::FromStr};

use eyre::{eyre, WrapErr};
use serde::{Deserialize, Serialize};

pub mod cie;
pub mod rounding;

pub use cie::{cie_to_rgb, rgb_to_xy, MAX_DEVICE_BRIGHTNESS};

/// CIE 1931 chromaticity coordinates. No range is enforced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Xy {
    pub x: f64,
    pub y: f64,
}

/// 8-bit RGB color as exchanged with the home automation bridge.
///
/// Components are nominally 0-255 but are not validated: out-of-gamut
/// chromaticity input can produce values outside that range, and encoders pass
/// through whatever the host sends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RgbTriplet {
    pub r: i64,
    pub g: i64,
    pub b: i64,
}

impl RgbTriplet {
    pub fn new(r: i64, g: i64, b: i64) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for RgbTriplet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

impl FromStr for RgbTriplet {
    type Err = eyre::Report;

    /// Parses the comma-joined `"r,g,b"` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components = s
            .split(',')
            .map(|component| {
                component
                    .trim()
                    .parse::<i64>()
                    .wrap_err_with(|| format!("Invalid RGB component {:?} in {:?}", component, s))
            })
            .collect::<Result<Vec<i64>, _>>()?;

        match components.as_slice() {
            [r, g, b] => Ok(Self::new(*r, *g, *b)),
            _ => Err(eyre!(
                "Expected three comma separated RGB components, got {:?}",
                s
            )),
        }
    }
}
