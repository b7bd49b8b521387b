/// Rounds to the nearest integer, with half-way cases rounded towards positive
/// infinity (`-2.5` becomes `-2.0`, `2.5` becomes `3.0`).
///
/// `f64::round` rounds half-way cases away from zero, which differs for
/// negative inputs.
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();

    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Rounds to a fixed number of decimal places.
pub fn round_to_decimals(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    round_half_up(value * factor) / factor
}
