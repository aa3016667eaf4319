//! OHLCV time series stored as six parallel columns.
//!
//! The column layout matches the data arrays handed to the renderer: index `i` of every
//! column describes the same time bucket. Rows are validated for equal length and strictly
//! increasing time on construction; the `low <= open/close <= high` ordering is a data quality
//! concern and is not checked.

use crate::error::{Column, SeriesError};
use itertools::Itertools;
use serde::Deserialize;
use std::ops::RangeInclusive;

/// A single OHLCV row.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct Bar {
    /// Bucket start, unix seconds
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// A bar closing below its open.
    pub fn is_bearish(&self) -> bool {
        self.open > self.close
    }
}

/// Inclusive range of bar indices `[min, max]`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct IndexRange {
    pub min: usize,
    pub max: usize,
}

impl IndexRange {
    pub fn new(min: usize, max: usize) -> Self {
        debug_assert!(min <= max, "IndexRange min {min} > max {max}");
        Self { min, max }
    }

    /// Distance between the first and last visible index.
    pub fn span(&self) -> usize {
        self.max - self.min
    }

    /// Divisor used for column width: the span, never less than one.
    pub fn columns(&self) -> usize {
        self.span().max(1)
    }

    /// Number of bars inside the range.
    pub fn len(&self) -> usize {
        self.span() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.min..=self.max).contains(&index)
    }

    pub fn clamp(&self, index: usize) -> usize {
        index.clamp(self.min, self.max)
    }

    pub fn iter(&self) -> RangeInclusive<usize> {
        self.min..=self.max
    }
}

/// Validated OHLCV series.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "SeriesRepr")]
pub struct Series {
    time: Vec<i64>,
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<f64>,
}

/// Accepted wire layouts: `[[t..], [o..], [h..], [l..], [c..], [v..]]` or a list of rows.
#[derive(Deserialize)]
#[serde(untagged)]
enum SeriesRepr {
    Columns(
        (
            Vec<i64>,
            Vec<f64>,
            Vec<f64>,
            Vec<f64>,
            Vec<f64>,
            Vec<f64>,
        ),
    ),
    Rows(Vec<Bar>),
}

impl TryFrom<SeriesRepr> for Series {
    type Error = SeriesError;

    fn try_from(value: SeriesRepr) -> Result<Self, Self::Error> {
        match value {
            SeriesRepr::Columns((time, open, high, low, close, volume)) => {
                Series::new(time, open, high, low, close, volume)
            }
            SeriesRepr::Rows(bars) => Series::from_bars(&bars),
        }
    }
}

impl Series {
    /// Construct a series from its columns, failing fast on malformed input.
    pub fn new(
        time: Vec<i64>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
        volume: Vec<f64>,
    ) -> Result<Self, SeriesError> {
        let expected = time.len();
        if expected == 0 {
            return Err(SeriesError::Empty);
        }

        let columns = [
            (Column::Open, open.len()),
            (Column::High, high.len()),
            (Column::Low, low.len()),
            (Column::Close, close.len()),
            (Column::Volume, volume.len()),
        ];
        if let Some((column, actual)) = columns.into_iter().find(|(_, len)| *len != expected) {
            return Err(SeriesError::LengthMismatch {
                column,
                expected,
                actual,
            });
        }

        if let Some(index) = time
            .iter()
            .tuple_windows()
            .position(|(prev, next)| next <= prev)
        {
            return Err(SeriesError::NonMonotonicTime { index: index + 1 });
        }

        Ok(Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    /// Construct a series from row records.
    pub fn from_bars(bars: &[Bar]) -> Result<Self, SeriesError> {
        Self::new(
            bars.iter().map(|bar| bar.time).collect(),
            bars.iter().map(|bar| bar.open).collect(),
            bars.iter().map(|bar| bar.high).collect(),
            bars.iter().map(|bar| bar.low).collect(),
            bars.iter().map(|bar| bar.close).collect(),
            bars.iter().map(|bar| bar.volume).collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Always false: construction rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn bar(&self, index: usize) -> Option<Bar> {
        Some(Bar {
            time: *self.time.get(index)?,
            open: self.open[index],
            high: self.high[index],
            low: self.low[index],
            close: self.close[index],
            volume: self.volume[index],
        })
    }

    pub fn bars(&self, range: IndexRange) -> impl Iterator<Item = (usize, Bar)> + '_ {
        range
            .iter()
            .filter_map(move |index| self.bar(index).map(|bar| (index, bar)))
    }

    pub fn time(&self) -> &[i64] {
        &self.time
    }

    pub fn volume(&self) -> &[f64] {
        &self.volume
    }

    /// Every index of the series.
    pub fn full_range(&self) -> IndexRange {
        IndexRange::new(0, self.len().saturating_sub(1))
    }

    pub fn first_open(&self) -> Option<f64> {
        self.open.first().copied()
    }

    /// Largest volume across the whole series.
    pub fn max_volume(&self) -> f64 {
        self.volume.iter().copied().fold(0.0, f64::max)
    }

    /// Lowest low and highest high within `range`.
    pub fn price_extent(&self, range: IndexRange) -> Option<(f64, f64)> {
        let lows = self.low.get(range.iter())?;
        let highs = self.high.get(range.iter())?;
        let low = lows.iter().copied().fold(f64::INFINITY, f64::min);
        let high = highs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (low.is_finite() && high.is_finite()).then_some((low, high))
    }

    /// First index whose time is at or after `ts`, clamped to the last bar.
    pub fn index_at_or_after(&self, ts: i64) -> usize {
        self.time
            .partition_point(|time| *time < ts)
            .min(self.len().saturating_sub(1))
    }

    /// Index whose time is nearest to `ts`.
    pub fn nearest_index(&self, ts: f64) -> usize {
        let after = self.time.partition_point(|time| (*time as f64) < ts);
        match (after.checked_sub(1), self.time.get(after)) {
            (Some(before), Some(next)) => {
                let before_distance = ts - self.time[before] as f64;
                let after_distance = *next as f64 - ts;
                if before_distance <= after_distance {
                    before
                } else {
                    after
                }
            }
            (Some(before), None) => before,
            (None, _) => 0,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn bars(rows: &[(i64, f64, f64, f64, f64, f64)]) -> Series {
        let bars: Vec<Bar> = rows
            .iter()
            .map(|&(time, open, high, low, close, volume)| Bar {
                time,
                open,
                high,
                low,
                close,
                volume,
            })
            .collect();
        Series::from_bars(&bars).unwrap()
    }

    pub(crate) fn sample() -> Series {
        bars(&[
            (1546300800, 1284.7, 1284.75, 1282.85, 1283.35, 120.0),
            (1546387200, 1319.9, 1320.6, 1315.0, 1315.3, 80.0),
            (1546473600, 1318.7, 1327.0, 1318.7, 1326.1, 200.0),
            (1546560000, 1328.0, 1330.8, 1309.6, 1317.4, 50.0),
            (1546819200, 1317.6, 1326.8, 1317.6, 1321.5, 90.0),
        ])
    }

    #[test]
    fn test_series_new_rejects_malformed_input() {
        struct TestCase {
            input: Result<Series, SeriesError>,
            expected: SeriesError,
        }

        let tests = vec![
            TestCase {
                // TC0: empty columns
                input: Series::new(vec![], vec![], vec![], vec![], vec![], vec![]),
                expected: SeriesError::Empty,
            },
            TestCase {
                // TC1: short low column
                input: Series::new(
                    vec![1, 2],
                    vec![1.0, 1.0],
                    vec![1.0, 1.0],
                    vec![1.0],
                    vec![1.0, 1.0],
                    vec![1.0, 1.0],
                ),
                expected: SeriesError::LengthMismatch {
                    column: Column::Low,
                    expected: 2,
                    actual: 1,
                },
            },
            TestCase {
                // TC2: repeated timestamp
                input: Series::new(
                    vec![1, 2, 2],
                    vec![1.0; 3],
                    vec![1.0; 3],
                    vec![1.0; 3],
                    vec![1.0; 3],
                    vec![1.0; 3],
                ),
                expected: SeriesError::NonMonotonicTime { index: 2 },
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            assert_eq!(test.input, Err(test.expected), "TC{} failed", index);
        }
    }

    #[test]
    fn test_series_deserialises_column_layout() {
        let json = "[[1,2,3],[10,11,12],[12,13,14],[9,10,11],[11,12,13],[5,6,7]]";
        let series: Series = serde_json::from_str(json).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.time(), &[1, 2, 3]);
        assert_eq!(series.bar(1).unwrap().close, 12.0);
    }

    #[test]
    fn test_series_deserialises_row_layout() {
        let json = r#"[
            {"time": 10, "open": 2.0, "high": 3.0, "low": 1.0, "close": 1.5, "volume": 4.0},
            {"time": 20, "open": 1.5, "high": 2.5, "low": 1.0, "close": 2.0, "volume": 6.0}
        ]"#;
        let series: Series = serde_json::from_str(json).unwrap();

        assert_eq!(series.len(), 2);
        assert!(series.bar(0).unwrap().is_bearish());
        assert!(!series.bar(1).unwrap().is_bearish());
    }

    #[test]
    fn test_series_deserialise_rejects_non_integer_time() {
        struct TestCase {
            json: &'static str,
        }

        let tests = vec![
            TestCase {
                // TC0: fractional seconds in the column layout
                json: "[[1.5,2],[1,1],[1,1],[1,1],[1,1],[1,1]]",
            },
            TestCase {
                // TC1: beyond i64
                json: "[[1e19,2e19],[1,1],[1,1],[1,1],[1,1],[1,1]]",
            },
            TestCase {
                // TC2: fractional seconds in the row layout
                json: r#"[{"time": 0.5, "open": 1, "high": 1, "low": 1, "close": 1, "volume": 1}]"#,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            assert!(serde_json::from_str::<Series>(test.json).is_err(), "TC{} failed", index);
        }
    }

    #[test]
    fn test_series_deserialise_rejects_non_monotonic_time() {
        let json = "[[2,1],[1,1],[1,1],[1,1],[1,1],[1,1]]";
        assert!(serde_json::from_str::<Series>(json).is_err());
    }

    #[test]
    fn test_series_extents() {
        let series = sample();

        assert_eq!(series.max_volume(), 200.0);
        assert_eq!(series.first_open(), Some(1284.7));
        assert_eq!(
            series.price_extent(IndexRange::new(1, 3)),
            Some((1309.6, 1330.8))
        );
        assert_eq!(series.price_extent(IndexRange::new(3, 9)), None);
    }

    #[test]
    fn test_series_time_lookup() {
        let series = sample();

        assert_eq!(series.index_at_or_after(0), 0);
        assert_eq!(series.index_at_or_after(1546387200), 1);
        assert_eq!(series.index_at_or_after(1546387201), 2);
        assert_eq!(series.index_at_or_after(i64::MAX), 4);

        assert_eq!(series.nearest_index(1546387200.0 + 100.0), 1);
        assert_eq!(series.nearest_index(1546473600.0 - 100.0), 2);
        assert_eq!(series.nearest_index(f64::MAX), 4);
        assert_eq!(series.nearest_index(0.0), 0);
    }

    #[test]
    fn test_index_range_guards_single_bar() {
        let range = IndexRange::new(3, 3);
        assert_eq!(range.span(), 0);
        assert_eq!(range.columns(), 1);
        assert_eq!(range.len(), 1);
        assert_eq!(range.clamp(7), 3);
    }
}
