//! Live item range search.
//!
//! Given an x window `[x_low, x_high]`, find the closed index range of items in a
//! series that fall inside it. When nothing falls inside, the range collapses to
//! the single item nearest the window.
//!
//! Sorted series use binary search; unordered series only skip leading and
//! trailing items that fall outside the window, so interior outliers stay in.

use crate::data::source::XYSource;
use crate::error::FitError;

/// Ordering of x-values within a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainOrder {
    Ascending,
    Descending,
    Unordered,
}

/// Closed index range `[lo, hi]` with `lo <= hi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRange {
    pub lo: usize,
    pub hi: usize,
}

impl ItemRange {
    /// Number of items covered (always at least one).
    pub fn count(&self) -> usize {
        self.hi - self.lo + 1
    }
}

/// Scan a series and classify the ordering of its x-values. NaN x-values are ignored.
pub fn detect_domain_order<S: XYSource + ?Sized>(source: &S, series: usize) -> DomainOrder {
    let mut ascending = true;
    let mut descending = true;
    let mut prev: Option<f64> = None;
    for item in 0..source.item_count(series) {
        let x = source.x_value(series, item);
        if x.is_nan() {
            continue;
        }
        if let Some(p) = prev {
            if x < p {
                ascending = false;
            }
            if x > p {
                descending = false;
            }
        }
        prev = Some(x);
    }
    if ascending {
        DomainOrder::Ascending
    } else if descending {
        DomainOrder::Descending
    } else {
        DomainOrder::Unordered
    }
}

fn check_window(x_low: f64, x_high: f64) -> Result<(), FitError> {
    if !(x_low < x_high) {
        return Err(FitError::InvalidRange {
            low: x_low,
            high: x_high,
        });
    }
    Ok(())
}

/// Lower index of the live items for the window `[x_low, x_high]`.
pub fn find_live_items_lower_bound<S: XYSource + ?Sized>(
    source: &S,
    series: usize,
    x_low: f64,
    x_high: f64,
    order: DomainOrder,
) -> Result<usize, FitError> {
    check_window(x_low, x_high)?;
    let count = source.item_count(series);
    if count <= 1 {
        return Ok(0);
    }
    let x = |item: usize| source.x_value(series, item);

    let index = match order {
        DomainOrder::Ascending => {
            let (mut low, mut high) = (0, count - 1);
            if x(low) >= x_low {
                return Ok(low);
            }
            if x(high) < x_low {
                return Ok(high);
            }
            while high - low > 1 {
                let mid = (low + high) / 2;
                if x(mid) >= x_low {
                    high = mid;
                } else {
                    low = mid;
                }
            }
            high
        }
        DomainOrder::Descending => {
            let (mut low, mut high) = (0, count - 1);
            if x(low) <= x_high {
                return Ok(low);
            }
            if x(high) > x_high {
                return Ok(high);
            }
            while high - low > 1 {
                let mid = (low + high) / 2;
                if x(mid) > x_high {
                    low = mid;
                } else {
                    high = mid;
                }
            }
            high
        }
        DomainOrder::Unordered => {
            let mut index = 0;
            while index < count && x(index) < x_low {
                index += 1;
            }
            index.min(count - 1)
        }
    };
    Ok(index)
}

/// Upper index of the live items for the window `[x_low, x_high]`.
pub fn find_live_items_upper_bound<S: XYSource + ?Sized>(
    source: &S,
    series: usize,
    x_low: f64,
    x_high: f64,
    order: DomainOrder,
) -> Result<usize, FitError> {
    check_window(x_low, x_high)?;
    let count = source.item_count(series);
    if count <= 1 {
        return Ok(0);
    }
    let x = |item: usize| source.x_value(series, item);

    let index = match order {
        DomainOrder::Ascending => {
            let (mut low, mut high) = (0, count - 1);
            if x(low) > x_high {
                return Ok(low);
            }
            if x(high) <= x_high {
                return Ok(high);
            }
            let mut mid = (low + high) / 2;
            while high - low > 1 {
                if x(mid) <= x_high {
                    low = mid;
                } else {
                    high = mid;
                }
                mid = (low + high) / 2;
            }
            mid
        }
        DomainOrder::Descending => {
            let (mut low, mut high) = (0, count - 1);
            if x(low) < x_low {
                return Ok(low);
            }
            if x(high) >= x_low {
                return Ok(high);
            }
            let mut mid = (low + high) / 2;
            while high - low > 1 {
                if x(mid) >= x_low {
                    low = mid;
                } else {
                    high = mid;
                }
                mid = (low + high) / 2;
            }
            mid
        }
        DomainOrder::Unordered => {
            let mut index = count;
            while index > 0 && x(index - 1) > x_high {
                index -= 1;
            }
            index.saturating_sub(1)
        }
    };
    Ok(index)
}

/// Both bounds at once, with `lo` clamped so that `lo <= hi`.
pub fn find_live_items<S: XYSource + ?Sized>(
    source: &S,
    series: usize,
    x_low: f64,
    x_high: f64,
    order: DomainOrder,
) -> Result<ItemRange, FitError> {
    let lo = find_live_items_lower_bound(source, series, x_low, x_high, order)?;
    let hi = find_live_items_upper_bound(source, series, x_low, x_high, order)?;
    Ok(ItemRange { lo: lo.min(hi), hi })
}

/// A single series of `source` restricted to an item range.
///
/// The view exposes exactly one series (index 0).
pub struct SeriesWindow<'a, S: XYSource + ?Sized> {
    source: &'a S,
    series: usize,
    range: ItemRange,
}

impl<'a, S: XYSource + ?Sized> SeriesWindow<'a, S> {
    pub fn new(source: &'a S, series: usize, range: ItemRange) -> Self {
        Self { source, series, range }
    }

    /// Locate the live items for `[x_low, x_high]` and wrap them.
    pub fn for_x_range(
        source: &'a S,
        series: usize,
        x_low: f64,
        x_high: f64,
    ) -> Result<Self, FitError> {
        let order = detect_domain_order(source, series);
        let range = find_live_items(source, series, x_low, x_high, order)?;
        Ok(Self::new(source, series, range))
    }

    pub fn range(&self) -> ItemRange {
        self.range
    }
}

impl<S: XYSource + ?Sized> XYSource for SeriesWindow<'_, S> {
    fn series_count(&self) -> usize {
        1
    }

    fn item_count(&self, _series: usize) -> usize {
        let available = self.source.item_count(self.series).saturating_sub(self.range.lo);
        self.range.count().min(available)
    }

    fn x_value(&self, _series: usize, item: usize) -> f64 {
        self.source.x_value(self.series, self.range.lo + item)
    }

    fn y_value(&self, _series: usize, item: usize) -> f64 {
        self.source.y_value(self.series, self.range.lo + item)
    }

    fn series_name(&self, _series: usize) -> Option<&str> {
        self.source.series_name(self.series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ascending() -> Vec<[f64; 2]> {
        (0..10).map(|i| [i as f64, 0.0]).collect()
    }

    #[test]
    fn ascending_window_bounds_inclusive() {
        let data = ascending();
        let range = find_live_items(data.as_slice(), 0, 2.5, 6.5, DomainOrder::Ascending).unwrap();
        assert_eq!(range, ItemRange { lo: 3, hi: 6 });

        let range = find_live_items(data.as_slice(), 0, 3.0, 6.0, DomainOrder::Ascending).unwrap();
        assert_eq!(range, ItemRange { lo: 3, hi: 6 });
    }

    #[test]
    fn ascending_window_outside_data() {
        let data = ascending();
        let below = find_live_items(data.as_slice(), 0, -5.0, -1.0, DomainOrder::Ascending).unwrap();
        assert_eq!(below, ItemRange { lo: 0, hi: 0 });
        let above = find_live_items(data.as_slice(), 0, 20.0, 30.0, DomainOrder::Ascending).unwrap();
        assert_eq!(above, ItemRange { lo: 9, hi: 9 });
    }

    #[test]
    fn descending_window() {
        let data: Vec<[f64; 2]> = (0..10).rev().map(|i| [i as f64, 0.0]).collect();
        assert_eq!(detect_domain_order(data.as_slice(), 0), DomainOrder::Descending);
        let range = find_live_items(data.as_slice(), 0, 2.0, 5.0, DomainOrder::Descending).unwrap();
        // x = 5 sits at index 4, x = 2 at index 7.
        assert_eq!(range, ItemRange { lo: 4, hi: 7 });
    }

    #[test]
    fn unordered_skips_leading_and_trailing() {
        let data: &[[f64; 2]] = &[[0.0, 0.0], [5.0, 0.0], [1.0, 0.0], [3.0, 0.0], [9.0, 0.0]];
        assert_eq!(detect_domain_order(data, 0), DomainOrder::Unordered);
        let range = find_live_items(data, 0, 2.0, 6.0, DomainOrder::Unordered).unwrap();
        assert_eq!(range, ItemRange { lo: 1, hi: 3 });
    }

    #[test]
    fn invalid_window_rejected() {
        let data = ascending();
        let err = find_live_items(data.as_slice(), 0, 4.0, 4.0, DomainOrder::Ascending).unwrap_err();
        assert!(matches!(err, FitError::InvalidRange { .. }));
    }

    #[test]
    fn window_view_offsets_items() {
        let data = ascending();
        let view = SeriesWindow::for_x_range(data.as_slice(), 0, 2.0, 4.0).unwrap();
        assert_eq!(view.item_count(0), 3);
        assert_eq!(view.x_value(0, 0), 2.0);
        assert_eq!(view.x_value(0, 2), 4.0);
    }

    #[test]
    fn window_over_empty_series_is_empty() {
        let data: &[[f64; 2]] = &[];
        let view = SeriesWindow::for_x_range(data, 0, 0.0, 1.0).unwrap();
        assert_eq!(view.item_count(0), 0);
    }
}
