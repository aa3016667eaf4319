use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column identifier used when reporting malformed [`Series`](crate::series::Series) input.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize, derive_more::Display)]
pub enum Column {
    #[display("time")]
    Time,
    #[display("open")]
    Open,
    #[display("high")]
    High,
    #[display("low")]
    Low,
    #[display("close")]
    Close,
    #[display("volume")]
    Volume,
}

/// Precondition violations detected while constructing a [`Series`](crate::series::Series).
#[derive(Debug, Clone, Eq, PartialEq, Hash, Deserialize, Serialize, Error)]
pub enum SeriesError {
    #[error("series must contain at least one bar")]
    Empty,

    #[error("column {column} has {actual} values, expected {expected}")]
    LengthMismatch {
        column: Column,
        expected: usize,
        actual: usize,
    },

    #[error("time column is not strictly increasing at index {index}")]
    NonMonotonicTime { index: usize },
}

/// All errors generated in `candle-chart`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Deserialize, Serialize, Error)]
pub enum ChartError {
    #[error("invalid series: {0}")]
    Series(#[from] SeriesError),

    #[error("visible range {min}..={max} is outside the series of {len} bars")]
    InvalidRange { min: usize, max: usize, len: usize },
}

impl ChartError {
    /// Determine if the error was caused by the input data rather than by the caller's view state.
    pub fn is_data_error(&self) -> bool {
        matches!(self, ChartError::Series(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_error_is_data_error() {
        struct TestCase {
            input: ChartError,
            expected: bool,
        }

        let tests = vec![
            TestCase {
                // TC0: empty series is a data error
                input: ChartError::from(SeriesError::Empty),
                expected: true,
            },
            TestCase {
                // TC1: mismatched column is a data error
                input: ChartError::from(SeriesError::LengthMismatch {
                    column: Column::Close,
                    expected: 3,
                    actual: 2,
                }),
                expected: true,
            },
            TestCase {
                // TC2: bad visible range is a view error
                input: ChartError::InvalidRange { min: 4, max: 9, len: 5 },
                expected: false,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = test.input.is_data_error();
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_series_error_display_names_column() {
        let error = SeriesError::LengthMismatch {
            column: Column::Volume,
            expected: 10,
            actual: 9,
        };
        assert_eq!(error.to_string(), "column volume has 9 values, expected 10");
    }
}
