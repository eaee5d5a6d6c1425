//! Confidence helpers
//!
//! Every confidence in the model lives in [0.0, 1.0]. Values coming from
//! collaborators are clamped on the way in; `NaN` counts as no confidence.

/// Clamp a confidence into [0.0, 1.0]
///
/// # Examples
///
/// ```
/// use docmatch_domain::confidence::clamp;
///
/// assert_eq!(clamp(1.4), 1.0);
/// assert_eq!(clamp(-0.2), 0.0);
/// assert_eq!(clamp(f64::NAN), 0.0);
/// ```
pub fn clamp(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Check that a value is a valid confidence
pub fn is_valid(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

/// Arithmetic mean, or 0.0 for an empty input
pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Weighted sum of (weight, value) pairs, clamped into [0.0, 1.0]
pub fn weighted(parts: &[(f64, f64)]) -> f64 {
    clamp(parts.iter().map(|(w, v)| w * v).sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(Vec::<f64>::new()), 0.0);
    }

    #[test]
    fn test_mean_values() {
        assert!((mean([0.2, 0.4, 0.6]) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_weighted() {
        let value = weighted(&[(0.3, 1.0), (0.3, 0.5), (0.4, 0.0)]);
        assert!((value - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid(0.0));
        assert!(is_valid(1.0));
        assert!(!is_valid(1.01));
        assert!(!is_valid(f64::NAN));
    }

    proptest! {
        #[test]
        fn clamp_always_in_bounds(value in proptest::num::f64::ANY) {
            prop_assert!(is_valid(clamp(value)));
        }

        #[test]
        fn weighted_always_in_bounds(a in 0.0f64..=1.0, b in 0.0f64..=1.0, c in 0.0f64..=1.0) {
            prop_assert!(is_valid(weighted(&[(0.3, a), (0.3, b), (0.4, c)])));
        }
    }
}
