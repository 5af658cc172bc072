use super::*;

#[test]
fn test_clip01_bounds() {
    assert_eq!(clip01(-0.5), 0.0);
    assert_eq!(clip01(0.25), 0.25);
    assert_eq!(clip01(1.5), 1.0);
    assert_eq!(clip01(f64::NAN), 0.0);
}

#[test]
fn test_round_half_away_from_zero() {
    assert_eq!(round2(57.125), 57.13);
    assert_eq!(round2(-1.005_000_1), -1.01);
    assert_eq!(round2(2.5), 2.5);
    assert_eq!(round_to(0.12345, 3), 0.123);
    assert_eq!(round_to(2.5, 0), 3.0);
    assert_eq!(round_to(-2.5, 0), -3.0);
}

#[test]
fn test_non_negative() {
    assert_eq!(non_negative(-3.0), 0.0);
    assert_eq!(non_negative(f64::INFINITY), 0.0);
    assert_eq!(non_negative(12.0), 12.0);
}
