/// Candle Chart - OHLCV candlestick rendering core
///
/// Computes everything needed to draw a candlestick chart onto any pixel surface:
/// - Geometry mapping from time, price and volume to device pixels
/// - Wick, body and volume rectangles per bar
/// - Hovered column highlight and a pointer-tracking tooltip
/// - Throttled resize passes owned by each chart instance
///
/// Drawing goes through the `Surface` trait; `DrawList` records a scene for replay.
pub mod axis;
pub mod chart;
pub mod error;
pub mod format;
pub mod options;
pub mod overlay;
pub mod render;
pub mod resize;
pub mod scale;
pub mod series;
pub mod time;

// Re-export commonly used types for convenience
pub use axis::{AxisLabel, AxisLayout, BoundingBox, Side, Viewport};
pub use chart::{clear, draw, ChartContainer, ChartHandle, TooltipView};
pub use error::{ChartError, SeriesError};
pub use format::Formatters;
pub use options::ChartOptions;
pub use overlay::{Highlight, TooltipRow};
pub use render::{CandleStyle, DrawCommand, DrawList, PixelRect, Rgb, Surface};
pub use scale::{Axis, Distribution, Scales};
pub use series::{Bar, IndexRange, Series};
