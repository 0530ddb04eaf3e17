//! Series capability consumed by the fitting routines.
//!
//! The regression code never needs to know how samples are stored. It asks a
//! source for the number of items in a series and for the x/y value of each
//! item, and never mutates it. Slices of pairs act as a single series (index 0);
//! `SeriesTable` holds several named series.

use crate::domain::Observation;
use crate::error::FitError;

/// Read-only access to one or more `(x, y)` series.
///
/// Values may be NaN; callers decide whether to treat them as missing.
pub trait XYSource {
    /// Number of series available.
    fn series_count(&self) -> usize;

    /// Number of items in `series`.
    fn item_count(&self, series: usize) -> usize;

    /// x-value of `item` in `series`.
    fn x_value(&self, series: usize, item: usize) -> f64;

    /// y-value of `item` in `series`.
    fn y_value(&self, series: usize, item: usize) -> f64;

    /// Optional display name for `series`.
    fn series_name(&self, _series: usize) -> Option<&str> {
        None
    }
}

impl XYSource for [[f64; 2]] {
    fn series_count(&self) -> usize {
        1
    }

    fn item_count(&self, _series: usize) -> usize {
        self.len()
    }

    fn x_value(&self, _series: usize, item: usize) -> f64 {
        self[item][0]
    }

    fn y_value(&self, _series: usize, item: usize) -> f64 {
        self[item][1]
    }
}

impl XYSource for [(f64, f64)] {
    fn series_count(&self) -> usize {
        1
    }

    fn item_count(&self, _series: usize) -> usize {
        self.len()
    }

    fn x_value(&self, _series: usize, item: usize) -> f64 {
        self[item].0
    }

    fn y_value(&self, _series: usize, item: usize) -> f64 {
        self[item].1
    }
}

impl XYSource for [Observation] {
    fn series_count(&self) -> usize {
        1
    }

    fn item_count(&self, _series: usize) -> usize {
        self.len()
    }

    fn x_value(&self, _series: usize, item: usize) -> f64 {
        self[item].x
    }

    fn y_value(&self, _series: usize, item: usize) -> f64 {
        self[item].y
    }
}

#[derive(Debug, Clone, Default)]
struct NamedSeries {
    name: String,
    xs: Vec<f64>,
    ys: Vec<f64>,
}

/// Flat in-memory table of named series.
#[derive(Debug, Clone, Default)]
pub struct SeriesTable {
    series: Vec<NamedSeries>,
}

impl SeriesTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a complete series and return its index.
    pub fn add_series(
        &mut self,
        name: impl Into<String>,
        xs: Vec<f64>,
        ys: Vec<f64>,
    ) -> Result<usize, FitError> {
        if xs.len() != ys.len() {
            return Err(FitError::MismatchedLengths {
                x_len: xs.len(),
                y_len: ys.len(),
            });
        }
        self.series.push(NamedSeries {
            name: name.into(),
            xs,
            ys,
        });
        Ok(self.series.len() - 1)
    }

    /// Index of the series called `name`, creating an empty one if absent.
    pub fn ensure_series(&mut self, name: &str) -> usize {
        if let Some(idx) = self.series_index(name) {
            return idx;
        }
        self.series.push(NamedSeries {
            name: name.to_string(),
            ..NamedSeries::default()
        });
        self.series.len() - 1
    }

    /// Append one item to an existing series.
    pub fn push(&mut self, series: usize, x: f64, y: f64) -> Result<(), FitError> {
        let count = self.series.len();
        let s = self
            .series
            .get_mut(series)
            .ok_or(FitError::UnknownSeries { series, count })?;
        s.xs.push(x);
        s.ys.push(y);
        Ok(())
    }

    pub fn series_index(&self, name: &str) -> Option<usize> {
        self.series.iter().position(|s| s.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl XYSource for SeriesTable {
    fn series_count(&self) -> usize {
        self.series.len()
    }

    fn item_count(&self, series: usize) -> usize {
        self.series.get(series).map_or(0, |s| s.xs.len())
    }

    fn x_value(&self, series: usize, item: usize) -> f64 {
        self.series[series].xs[item]
    }

    fn y_value(&self, series: usize, item: usize) -> f64 {
        self.series[series].ys[item]
    }

    fn series_name(&self, series: usize) -> Option<&str> {
        self.series.get(series).map(|s| s.name.as_str())
    }
}

/// Check that `series` exists in `source`.
pub fn ensure_series<S: XYSource + ?Sized>(source: &S, series: usize) -> Result<(), FitError> {
    let count = source.series_count();
    if series >= count {
        return Err(FitError::UnknownSeries { series, count });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_round_trips_values() {
        let mut table = SeriesTable::new();
        let a = table.add_series("a", vec![1.0, 2.0], vec![3.0, 4.0]).unwrap();
        let b = table.ensure_series("b");
        table.push(b, 5.0, 6.0).unwrap();

        assert_eq!(table.series_count(), 2);
        assert_eq!(table.item_count(a), 2);
        assert_eq!(table.item_count(b), 1);
        assert_eq!(table.x_value(b, 0), 5.0);
        assert_eq!(table.y_value(a, 1), 4.0);
        assert_eq!(table.series_name(b), Some("b"));
        assert_eq!(table.ensure_series("a"), a);
    }

    #[test]
    fn mismatched_lengths_rejected() {
        let mut table = SeriesTable::new();
        let err = table.add_series("a", vec![1.0], vec![]).unwrap_err();
        assert_eq!(err, FitError::MismatchedLengths { x_len: 1, y_len: 0 });
    }

    #[test]
    fn unknown_series_detected() {
        let data: &[[f64; 2]] = &[[1.0, 2.0]];
        assert!(ensure_series(data, 0).is_ok());
        assert_eq!(
            ensure_series(data, 1),
            Err(FitError::UnknownSeries { series: 1, count: 1 })
        );
    }
}
