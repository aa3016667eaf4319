/// Candle Chart TUI - terminal front-end for candle-chart
///
/// This library provides the pieces of the `candle-chart` binary:
/// - Half-block canvas surface the chart scene is replayed onto
/// - Chart panel widget with axis labels, highlight and tooltip
/// - Series file loader and synthetic demo series
/// - Environment configuration
pub mod config;
pub mod demo;
pub mod loader;
pub mod surface;
pub mod widget;

// Re-export commonly used types for convenience
pub use config::TuiConfig;
pub use demo::{demo_series, DEMO_SYMBOLS};
pub use loader::{load_series, series_title, LoadError};
pub use surface::{CanvasSurface, CellMetrics};
pub use widget::{panel_inner, render_chart_panel};
