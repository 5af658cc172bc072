pub fn clip01(x: f64) -> f64 {
    if x.is_nan() || x < 0.0 {
        0.0
    } else if x > 1.0 {
        1.0
    } else {
        x
    }
}

/// Negative and non-finite costs count as zero.
pub fn non_negative(x: f64) -> f64 {
    if x.is_finite() && x > 0.0 { x } else { 0.0 }
}

/// Rounds half away from zero to `places` decimals.
pub fn round_to(x: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (x * factor).round() / factor
}

pub fn round2(x: f64) -> f64 {
    round_to(x, 2)
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/numeric.rs"]
mod tests;
