//! Maps from a membership value to a truth value.
//!
//! The "fairly" and "very" variants are quarter circles; the "very" ones live below zero.

/// The membership is its own truth value.
pub fn true_(m: f64) -> f64 {
    m
}

pub fn false_(m: f64) -> f64 {
    1. - m
}

/// Quadrant I.
pub fn fairly_false(m: f64) -> f64 {
    (1. - m.powi(2)).sqrt()
}

/// Quadrant II.
pub fn fairly_true(m: f64) -> f64 {
    (1. - (1. - m).powi(2)).sqrt()
}

/// Quadrant III.
pub fn very_false(m: f64) -> f64 {
    -(1. - (1. - m).powi(2)).sqrt()
}

/// Quadrant IV.
pub fn very_true(m: f64) -> f64 {
    -(1. - m.powi(2)).sqrt()
}

#[test]
fn test_truth() {
    assert_eq!(true_(0.6), 0.6);
    assert_eq!(false_(0.6), 1. - 0.6);
    assert_eq!(fairly_false(0.6), 0.8);
    assert_eq!(very_true(0.6), -0.8);
    assert_eq!(fairly_true(1.), 1.);
    assert_eq!(fairly_true(0.), 0.);
    assert_eq!(very_false(1.), -1.);
    assert_eq!(fairly_false(1.), 0.);
}
