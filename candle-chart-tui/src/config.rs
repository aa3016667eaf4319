//! Environment configuration of the candle-chart binary.

use crate::surface::{CellMetrics, DEFAULT_CELL_HEIGHT_PX, DEFAULT_CELL_WIDTH_PX};
use candle_chart::{options::DEFAULT_RESIZE_THROTTLE, ChartOptions};
use std::{path::PathBuf, time::Duration};

/// Bars generated per demo series.
pub const DEFAULT_DEMO_BARS: usize = 120;

#[derive(Debug, Clone, PartialEq)]
pub struct TuiConfig {
    /// Series files, one chart each; empty shows the demo series
    pub data: Vec<PathBuf>,
    pub resize_throttle: Duration,
    /// Only show bars of the last N calendar days
    pub days: Option<i64>,
    pub cell: CellMetrics,
    /// Log file; logging is off without one
    pub log_file: Option<PathBuf>,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            resize_throttle: DEFAULT_RESIZE_THROTTLE,
            days: None,
            cell: CellMetrics::default(),
            log_file: None,
        }
    }
}

impl TuiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data = lookup("CHART_DATA")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|path| !path.is_empty())
                    .map(PathBuf::from)
                    .collect()
            })
            .unwrap_or_default();

        let resize_throttle = lookup("CHART_THROTTLE_MS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_RESIZE_THROTTLE);

        let days = lookup("CHART_DAYS")
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|days| *days > 0);

        let cell = CellMetrics::new(
            lookup("CHART_CELL_WIDTH_PX")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CELL_WIDTH_PX),
            lookup("CHART_CELL_HEIGHT_PX")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CELL_HEIGHT_PX),
        );

        let log_file = lookup("CHART_LOG")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self {
            data,
            resize_throttle,
            days,
            cell,
            log_file,
        }
    }

    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions::default().with_resize_throttle(self.resize_throttle)
    }
}
