use crate::{format::Formatters, render::CandleStyle, scale::Distribution};
use std::time::Duration;

/// Default resize throttle window.
pub const DEFAULT_RESIZE_THROTTLE: Duration = Duration::from_millis(100);

/// Viewports wider than this use the large axis layout.
pub const DEFAULT_LARGE_SCREEN_WIDTH: f64 = 900.0;

/// Chart configuration
#[derive(Debug, Clone)]
pub struct ChartOptions {
    /// Candle geometry constants and palette
    pub style: CandleStyle,
    /// Minimum interval between two resize layout passes
    pub resize_throttle: Duration,
    /// Horizontal placement of bars
    pub distribution: Distribution,
    /// Fraction of the visible price span added above and below the candles
    pub price_padding: f64,
    /// Volume scale maximum as a multiple of the largest volume
    pub volume_headroom: f64,
    /// Width above which the large axis layout is used
    pub large_screen_width: f64,
    /// Tooltip value formatters
    pub formatters: Formatters,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            style: CandleStyle::default(),
            resize_throttle: DEFAULT_RESIZE_THROTTLE,
            distribution: Distribution::Ordinal,
            price_padding: 0.1,
            volume_headroom: 3.0,
            large_screen_width: DEFAULT_LARGE_SCREEN_WIDTH,
            formatters: Formatters::default(),
        }
    }
}

impl ChartOptions {
    /// Set candle style
    pub fn with_style(mut self, style: CandleStyle) -> Self {
        self.style = style;
        self
    }

    /// Set resize throttle window
    pub fn with_resize_throttle(mut self, throttle: Duration) -> Self {
        self.resize_throttle = throttle;
        self
    }

    /// Set horizontal distribution
    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }

    /// Set price padding fraction
    pub fn with_price_padding(mut self, padding: f64) -> Self {
        self.price_padding = padding;
        self
    }

    /// Set volume headroom multiple
    pub fn with_volume_headroom(mut self, headroom: f64) -> Self {
        self.volume_headroom = headroom;
        self
    }

    /// Set large layout breakpoint
    pub fn with_large_screen_width(mut self, width: f64) -> Self {
        self.large_screen_width = width;
        self
    }

    /// Set tooltip formatters
    pub fn with_formatters(mut self, formatters: Formatters) -> Self {
        self.formatters = formatters;
        self
    }
}
