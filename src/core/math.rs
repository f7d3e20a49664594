// Math utilities and helper functions

/// Fractional part of a non-negative phase value, in `[0, 1)`
pub fn fract(value: f64) -> f64 {
    value - value.floor()
}

/// Round to the nearest integer, with exact halves going up
///
/// Differs from `f64::round` for negative halves: `-0.5` rounds to `0.0`.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
