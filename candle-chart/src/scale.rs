//! Geometry mapper: domain values to device pixels.
//!
//! One horizontal time scale is shared by two independent vertical scales (price and
//! volume). Pixel offsets are floating point and relative to the viewport origin; rounding
//! happens only when rectangles are emitted.

use crate::{
    axis::BoundingBox,
    options::ChartOptions,
    series::{IndexRange, Series},
};

/// Scale selector for [`Scales::value_to_pixel`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Axis {
    Time,
    Price,
    Volume,
}

/// Horizontal distribution of bars.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Distribution {
    /// Each bar occupies one slot by index, so gaps in real time (weekends) leave no empty
    /// columns.
    #[default]
    Ordinal,
    /// Bars are placed by their unix timestamp.
    Linear,
}

/// Domain interval of one scale.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Position of `value` within the range as a 0..1 fraction. A degenerate range places
    /// every value in the middle.
    fn fraction(&self, value: f64) -> f64 {
        let span = self.span();
        if span.abs() < f64::EPSILON {
            0.5
        } else {
            (value - self.min) / span
        }
    }

    fn lerp(&self, fraction: f64) -> f64 {
        self.min + fraction * self.span()
    }

    /// Auto-fit price range: `[low, high]` widened by `padding` of the span on each side.
    fn padded(low: f64, high: f64, padding: f64) -> Self {
        let span = high - low;
        let pad = if span > 0.0 {
            span * padding
        } else if high != 0.0 {
            high.abs() * padding
        } else {
            1.0
        };
        Self::new(low - pad, high + pad)
    }
}

/// Scale state for one chart layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Scales {
    pub bbox: BoundingBox,
    pub distribution: Distribution,
    pub time: Range,
    pub price: Range,
    pub volume: Range,
}

impl Scales {
    /// Fit every scale to the visible `range` of `series` inside `bbox`.
    pub fn fit(
        series: &Series,
        range: IndexRange,
        bbox: BoundingBox,
        options: &ChartOptions,
    ) -> Self {
        let time = match options.distribution {
            Distribution::Ordinal => Range::new(range.min as f64, range.max as f64),
            Distribution::Linear => {
                let times = series.time();
                Range::new(times[range.min] as f64, times[range.max] as f64)
            }
        };

        let price = series
            .price_extent(range)
            .map(|(low, high)| Range::padded(low, high, options.price_padding))
            .unwrap_or_else(|| Range::new(0.0, 1.0));

        let max_volume = series.max_volume();
        let volume = if max_volume > 0.0 {
            Range::new(0.0, max_volume * options.volume_headroom)
        } else {
            Range::new(0.0, 1.0)
        };

        Self {
            bbox,
            distribution: options.distribution,
            time,
            price,
            volume,
        }
    }

    fn range(&self, axis: Axis) -> Range {
        match axis {
            Axis::Time => self.time,
            Axis::Price => self.price,
            Axis::Volume => self.volume,
        }
    }

    /// Map a domain value to a pixel offset. Time grows rightwards, price and volume upwards.
    pub fn value_to_pixel(&self, value: f64, axis: Axis) -> f64 {
        let fraction = self.range(axis).fraction(value);
        match axis {
            Axis::Time => self.bbox.left + fraction * self.bbox.width,
            Axis::Price | Axis::Volume => self.bbox.top + (1.0 - fraction) * self.bbox.height,
        }
    }

    /// Inverse of [`Scales::value_to_pixel`].
    pub fn pixel_to_value(&self, pixel: f64, axis: Axis) -> f64 {
        let range = self.range(axis);
        let fraction = match axis {
            Axis::Time if self.bbox.width > 0.0 => (pixel - self.bbox.left) / self.bbox.width,
            Axis::Price | Axis::Volume if self.bbox.height > 0.0 => {
                1.0 - (pixel - self.bbox.top) / self.bbox.height
            }
            _ => 0.5,
        };
        range.lerp(fraction)
    }

    /// Horizontal domain value of bar `index` under the active distribution.
    pub fn x_value(&self, series: &Series, index: usize) -> f64 {
        match self.distribution {
            Distribution::Ordinal => index as f64,
            Distribution::Linear => series.time().get(index).copied().unwrap_or_default() as f64,
        }
    }

    /// Pixel centre of bar `index`.
    pub fn index_to_pixel(&self, series: &Series, index: usize) -> f64 {
        self.value_to_pixel(self.x_value(series, index), Axis::Time)
    }

    /// Width of one time bucket.
    pub fn column_width(&self, range: IndexRange) -> f64 {
        self.bbox.width / range.columns() as f64
    }

    /// Bar index nearest to the horizontal pixel `x`, clamped to `range`.
    pub fn nearest_index(&self, series: &Series, range: IndexRange, x: f64) -> usize {
        let value = self.pixel_to_value(x, Axis::Time);
        let index = match self.distribution {
            Distribution::Ordinal => value.round().max(0.0) as usize,
            Distribution::Linear => series.nearest_index(value),
        };
        range.clamp(index)
    }
}
