//! Conversions between CIE 1931 xy chromaticity and 8-bit RGB, using the
//! Wide RGB D65 matrices from the Hue developer documentation.
//!
//! The arithmetic follows the same order of operations as the widely used
//! usolved cie-rgb-converter, so results match it bit for bit, quirks
//! included:
//!
//! - the luminance `Y` is rounded to two decimals before use;
//! - the gamut clamp only fires when a single channel is strictly the largest;
//! - channels are not clamped to 0-255 after gamma correction.

use super::{
    rounding::{round_half_up, round_to_decimals},
    RgbTriplet, Xy,
};

/// Brightness on the device scale (0-254) that maps to full luminance.
pub const MAX_DEVICE_BRIGHTNESS: i64 = 254;

/// Converts an xy chromaticity and an optional device brightness (1-254,
/// defaults to [`MAX_DEVICE_BRIGHTNESS`]) to RGB. Missing coordinates are
/// passed as NaN.
///
/// Never fails. Degenerate input such as `y == 0` produces infinities or NaN
/// internally, and any channel that ends up non-finite is reported as 0.
pub fn cie_to_rgb(x: f64, y: f64, brightness: Option<f64>) -> RgbTriplet {
    let brightness = brightness.unwrap_or(MAX_DEVICE_BRIGHTNESS as f64);

    let z = 1.0 - x - y;
    let luminance = round_to_decimals(brightness / MAX_DEVICE_BRIGHTNESS as f64, 2);
    let big_x = (luminance / y) * x;
    let big_z = (luminance / y) * z;

    let (red, green, blue) = xyz_to_linear_rgb(big_x, luminance, big_z);
    let (red, green, blue) = clamp_to_gamut(red, green, blue);

    RgbTriplet {
        r: to_channel(reverse_gamma(red)),
        g: to_channel(reverse_gamma(green)),
        b: to_channel(reverse_gamma(blue)),
    }
}

/// Converts an RGB color to xy chromaticity, each coordinate rounded to four
/// decimals. Black has no chromaticity and maps to `(0, 0)`.
pub fn rgb_to_xy(rgb: RgbTriplet) -> Xy {
    let red = gamma_expand(rgb.r as f64 / 255.0);
    let green = gamma_expand(rgb.g as f64 / 255.0);
    let blue = gamma_expand(rgb.b as f64 / 255.0);

    let big_x = red * 0.664511 + green * 0.154324 + blue * 0.162028;
    let big_y = red * 0.283881 + green * 0.668433 + blue * 0.047685;
    let big_z = red * 0.000088 + green * 0.072310 + blue * 0.986039;
    let sum = big_x + big_y + big_z;

    Xy {
        x: nan_to_zero(round_to_decimals(big_x / sum, 4)),
        y: nan_to_zero(round_to_decimals(big_y / sum, 4)),
    }
}

fn xyz_to_linear_rgb(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let red = x * 1.656492 - y * 0.354851 - z * 0.255038;
    let green = -x * 0.707196 + y * 1.655397 + z * 0.036152;
    let blue = x * 0.051713 - y * 0.121364 + z * 1.011530;

    (red, green, blue)
}

/// Scales the channels down so that a dominant channel above 1.0 becomes
/// exactly 1.0. Two equal dominant channels leave the color untouched.
fn clamp_to_gamut(red: f64, green: f64, blue: f64) -> (f64, f64, f64) {
    if red > blue && red > green && red > 1.0 {
        (1.0, green / red, blue / red)
    } else if green > blue && green > red && green > 1.0 {
        (red / green, 1.0, blue / green)
    } else if blue > red && blue > green && blue > 1.0 {
        (red / blue, green / blue, 1.0)
    } else {
        (red, green, blue)
    }
}

fn reverse_gamma(channel: f64) -> f64 {
    if channel <= 0.0031308 {
        12.92 * channel
    } else {
        (1.0 + 0.055) * channel.powf(1.0 / 2.4) - 0.055
    }
}

fn gamma_expand(channel: f64) -> f64 {
    if channel > 0.04045 {
        ((channel + 0.055) / (1.0 + 0.055)).powf(2.4)
    } else {
        channel / 12.92
    }
}

fn to_channel(value: f64) -> i64 {
    let value = round_half_up(value * 255.0);

    if value.is_finite() {
        value as i64
    } else {
        0
    }
}

fn nan_to_zero(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}
