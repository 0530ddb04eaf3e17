//! Sample extraction: series source -> ordered `(x, y)` working sequence.

use crate::data::source::XYSource;
use crate::domain::Observation;

/// What to do with samples that have a NaN coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPolicy {
    /// Drop the sample.
    #[default]
    Skip,
    /// Keep it; NaN then propagates through the sums.
    Keep,
}

/// Copy one series out of `source`, in item order.
///
/// With `MissingPolicy::Skip`, samples where either coordinate is NaN are
/// dropped and the relative order of the rest is preserved. Infinite values
/// are not treated as missing.
pub fn extract_samples<S: XYSource + ?Sized>(
    source: &S,
    series: usize,
    policy: MissingPolicy,
) -> Vec<Observation> {
    let n = source.item_count(series);
    let mut out = Vec::with_capacity(n);
    for item in 0..n {
        let sample = Observation::new(source.x_value(series, item), source.y_value(series, item));
        if policy == MissingPolicy::Skip && sample.is_missing() {
            continue;
        }
        out.push(sample);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_drops_nan_pairs_and_keeps_order() {
        let data: &[[f64; 2]] = &[
            [0.0, 1.0],
            [f64::NAN, 2.0],
            [2.0, 3.0],
            [3.0, f64::NAN],
            [4.0, 5.0],
        ];
        let samples = extract_samples(data, 0, MissingPolicy::Skip);
        let xs: Vec<f64> = samples.iter().map(|s| s.x).collect();
        assert_eq!(xs, vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn keep_returns_everything() {
        let data: &[(f64, f64)] = &[(0.0, f64::NAN), (1.0, 1.0)];
        let samples = extract_samples(data, 0, MissingPolicy::Keep);
        assert_eq!(samples.len(), 2);
        assert!(samples[0].y.is_nan());
    }

    #[test]
    fn infinities_are_not_missing() {
        let data: &[[f64; 2]] = &[[f64::INFINITY, 1.0], [1.0, 1.0]];
        assert_eq!(extract_samples(data, 0, MissingPolicy::Skip).len(), 2);
    }
}
