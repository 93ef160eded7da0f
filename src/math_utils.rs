/// Numeric helpers for projections and for float assertions in tests

/// Panic unless `actual` is within `max_percent` percent of `expected`
///
/// An optional trailing format string adds context to the failure message:
///
/// ```
/// use dot_globe::assert_deviation;
///
/// assert_deviation!(6371.0004, 6371.0, 1e-4, "radius of dot {}", 17);
/// ```
#[macro_export]
macro_rules! assert_deviation {
    ($actual:expr, $expected:expr, $max_percent:expr $(,)?) => {
        $crate::math_utils::check_deviation($actual, $expected, $max_percent, "")
    };
    ($actual:expr, $expected:expr, $max_percent:expr, $($context:tt)+) => {
        $crate::math_utils::check_deviation($actual, $expected, $max_percent, &format!($($context)+))
    };
}

#[doc(hidden)]
#[track_caller]
pub fn check_deviation(actual: f64, expected: f64, max_percent: f64, context: &str) {
    let off_by = deviation(actual, expected);
    if off_by >= max_percent {
        let separator = if context.is_empty() { "" } else { ": " };
        panic!(
            "assertion failed: deviation {:.6}% >= {:.6}%{}{}\n  actual: {:?},\n  expected: {:?}",
            off_by, max_percent, separator, context, actual, expected
        );
    }
}

/// Fold an angle in degrees into [-180, 180)
///
/// # Examples
/// ```
/// use dot_globe::math_utils::wrap_degrees;
///
/// assert_eq!(wrap_degrees(190.0), -170.0);
/// assert_eq!(wrap_degrees(180.0), -180.0);
/// assert_eq!(wrap_degrees(-540.0), -180.0);
/// ```
pub fn wrap_degrees(degrees: f64) -> f64 {
    let wrapped = (degrees + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 180.0 { wrapped - 360.0 } else { wrapped }
}

/// Relative difference of `actual` from `expected`, in percent
///
/// A zero `expected` gives 0 when `actual` is also zero and infinity otherwise.
///
/// ```
/// use dot_globe::math_utils::deviation;
///
/// assert!((deviation(2.2, 2.0) - 10.0).abs() < 1e-9);
/// assert!(deviation(0.999_999, 1.0) < 1e-3);
/// ```
pub fn deviation(actual: f64, expected: f64) -> f64 {
    if expected.abs() < f64::EPSILON {
        return if actual.abs() < f64::EPSILON { 0.0 } else { f64::INFINITY };
    }
    (actual - expected).abs() / expected.abs() * 100.0
}
