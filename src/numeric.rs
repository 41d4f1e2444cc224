use num_traits::{Float, ToPrimitive};
use std::fmt::Display;

/// Assert two float values are the same up to `eps`.
#[allow(dead_code)]
pub fn assert_float_eq<T>(left: T, right: T, eps: T)
where
    T: Float + Display,
{
    if left.is_nan() {
        assert!(right.is_nan(), "left is NaN, but right is not");
    } else {
        let diff = (left - right).abs();
        assert!(
            diff < eps,
            "values |{} - {}| ≥ {} (diff: {})",
            left,
            right,
            eps,
            diff
        );
    }
}

/// Find the tightest bracketing pair `(low, high)` of adjacent indices such
/// that `key(vec[low]) <= value < key(vec[high])`, for a `vec` sorted by `key`.
///
/// The window `[0, len - 1]` is halved until its ends are adjacent. Values
/// below the first key bracket as `(0, 1)` and values at or past the last key
/// as `(len - 2, len - 1)`, so callers extrapolate from the outermost pair.
///
/// Returns `None` if fewer than two entries are available.
pub fn search_bracket<T, K, F>(vec: &[T], value: K, key: F) -> Option<(usize, usize)>
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    if vec.len() < 2 {
        return None;
    }
    let mut low = 0;
    let mut high = vec.len() - 1;
    while high - low > 1 {
        let mid = low + (high - low) / 2;
        if key(&vec[mid]) > value {
            high = mid;
        } else {
            low = mid;
        }
    }
    Some((low, high))
}

/// Linearly interpolate (or extrapolate) the line through `(x1, y1)` and
/// `(x2, y2)` at `x0`.
///
/// `x0` equal to either end returns that end's `y` exactly. Otherwise returns
/// `None` when `x1 == x2`, or if a coordinate cannot be represented as an `f64`.
pub fn lerp<Tx>(x0: Tx, (x1, y1): (Tx, f64), (x2, y2): (Tx, f64)) -> Option<f64>
where
    Tx: ToPrimitive,
{
    let x0 = x0.to_f64()?;
    let x1 = x1.to_f64()?;
    let x2 = x2.to_f64()?;
    if x0 == x1 {
        return Some(y1);
    }
    if x0 == x2 {
        return Some(y2);
    }
    let span = x2 - x1;
    if span == 0.0 {
        return None;
    }
    Some(y1 + (y2 - y1) * (x0 - x1) / span)
}

/// Format a float with the shortest decimal representation that round-trips,
/// never in scientific notation and always with a decimal point (`0.0`,
/// `0.002`, `1.5`).
pub fn format_float(x: f64) -> String {
    let formatted = x.to_string();
    if formatted.contains('.') || !x.is_finite() {
        formatted
    } else {
        format!("{}.0", formatted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bracket(vec: &[u64], value: u64) -> Option<(usize, usize)> {
        search_bracket(vec, value, |v| *v)
    }

    #[test]
    fn test_search_bracket_too_short() {
        assert_eq!(bracket(&[], 5), None);
        assert_eq!(bracket(&[0], 5), None);
    }

    #[test]
    fn test_search_bracket_between() {
        let vec = vec![0, 10, 20, 30, 40];
        assert_eq!(bracket(&vec, 15), Some((1, 2)));
        assert_eq!(bracket(&vec, 31), Some((3, 4)));
    }

    #[test]
    fn test_search_bracket_exact() {
        let vec = vec![0, 10, 20, 30, 40];
        assert_eq!(bracket(&vec, 20), Some((2, 3)));
        assert_eq!(bracket(&vec, 0), Some((0, 1)));
    }

    #[test]
    fn test_search_bracket_past_end() {
        let vec = vec![0, 10, 20, 30, 40];
        assert_eq!(bracket(&vec, 40), Some((3, 4)));
        assert_eq!(bracket(&vec, 1000), Some((3, 4)));
    }

    #[test]
    fn test_search_bracket_before_start() {
        let vec = vec![10, 20, 30];
        assert_eq!(bracket(&vec, 5), Some((0, 1)));
    }

    #[test]
    fn test_search_bracket_with_floats() {
        let vec = vec![1.0, 2.5, 4., 4.8, 5.9];
        assert_eq!(search_bracket(&vec, 3.5, |v| *v), Some((1, 2)));
    }

    #[test]
    fn test_lerp() {
        assert_float_eq(lerp(150u64, (100, 0.1), (200, 0.3)).unwrap(), 0.2, 1e-12);
        // extrapolation past the right end is not clamped
        assert_float_eq(lerp(300u64, (100, 0.1), (200, 0.3)).unwrap(), 0.5, 1e-12);
        assert_eq!(lerp(200u64, (100, 0.1), (200, 0.3)), Some(0.3));
        assert_eq!(lerp(150u64, (100, 0.1), (100, 0.3)), None);
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(0.002), "0.002");
        assert_eq!(format_float(1.5), "1.5");
        assert_eq!(format_float(2.0), "2.0");
        assert_eq!(format_float(0.00003), "0.00003");
    }
}
