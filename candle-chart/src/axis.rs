//! Viewport geometry, responsive axis layout and tick labels.

use crate::{
    format,
    options::ChartOptions,
    scale::{Axis, Scales},
    series::{IndexRange, Series},
};

/// Price axis gutter on large layouts.
pub const PRICE_GUTTER: f64 = 55.0;
/// Price axis gutter on large layouts for micro-priced series.
pub const MICRO_PRICE_GUTTER: f64 = 80.0;
/// First open below this selects [`MICRO_PRICE_GUTTER`].
pub const MICRO_PRICE_THRESHOLD: f64 = 0.001;
/// Volume axis gutter on large layouts.
pub const VOLUME_GUTTER: f64 = 75.0;
/// Gutter of both vertical axes on compact layouts.
pub const COMPACT_GUTTER: f64 = 40.0;
/// Minimum distance between two tick labels.
pub const TICK_SPACE: f64 = 40.0;
/// Height of the time axis under the plot.
pub const TIME_AXIS_SIZE: f64 = 50.0;
/// Height of the title row when a title is present.
pub const TITLE_HEIGHT: f64 = 30.0;
/// Distance between plot edge and label on axes without an explicit gap.
pub const DEFAULT_AXIS_GAP: f64 = 5.0;

/// Pixel size of a drawing surface.
#[derive(Debug, Copy, Clone, PartialEq, Default, derive_more::Constructor)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Plot area inside the viewport.
#[derive(Debug, Copy, Clone, PartialEq, Default, derive_more::Constructor)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x < self.right() && y >= self.top && y < self.bottom()
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Side {
    Left,
    Right,
    Bottom,
}

/// Label formatting of one axis.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AxisValues {
    /// `format_dollar(v)`
    Dollar,
    /// `format_dollar(v, 2, 4)`
    DollarVolume,
    /// `fmt_usd(v, 0)`
    WholeUsd,
    /// Plain number
    Plain,
    /// `YYYY-MM-DD`
    Date,
}

impl AxisValues {
    fn format(&self, value: f64) -> String {
        match self {
            AxisValues::Dollar => format::format_price(value),
            AxisValues::DollarVolume => format::format_volume_axis(value),
            AxisValues::WholeUsd => format::fmt_usd_whole(value),
            AxisValues::Plain => format::format_plain(value),
            AxisValues::Date => format::format_date(value as i64),
        }
    }
}

/// Configuration of one axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AxisSpec {
    pub scale: Axis,
    pub side: Side,
    /// Gutter reserved next to the plot
    pub size: f64,
    /// Minimum pixels between labels
    pub space: f64,
    /// Label offset from the plot edge
    pub gap: f64,
    /// Draw grid lines across the plot
    pub grid: bool,
    pub values: AxisValues,
}

/// Axis layout chosen for a viewport and series.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLayout {
    pub large: bool,
    pub title_height: f64,
    pub time: AxisSpec,
    pub price: AxisSpec,
    pub volume: AxisSpec,
}

/// One tick label positioned along its axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    pub scale: Axis,
    pub side: Side,
    /// Pixel coordinate along the axis direction (x for time, y otherwise)
    pub position: f64,
    /// Distance between plot edge and label
    pub gap: f64,
    pub value: f64,
    pub text: String,
}

/// Price gutter width: wider for series whose first open is a micro price.
pub fn price_gutter(series: &Series) -> f64 {
    match series.first_open() {
        Some(open) if open > 0.0 && open < MICRO_PRICE_THRESHOLD => MICRO_PRICE_GUTTER,
        _ => PRICE_GUTTER,
    }
}

impl AxisLayout {
    /// Pick the large or compact layout. The choice is made once per draw call; resizes
    /// relayout the plot area but keep the axes.
    pub fn for_chart(viewport: Viewport, title: &str, series: &Series, options: &ChartOptions) -> Self {
        let large = viewport.width > options.large_screen_width;
        let title_height = if title.is_empty() { 0.0 } else { TITLE_HEIGHT };

        let time = AxisSpec {
            scale: Axis::Time,
            side: Side::Bottom,
            size: TIME_AXIS_SIZE,
            space: TICK_SPACE,
            gap: DEFAULT_AXIS_GAP,
            grid: true,
            values: AxisValues::Date,
        };

        let (price, volume) = if large {
            (
                AxisSpec {
                    scale: Axis::Price,
                    side: Side::Right,
                    size: price_gutter(series),
                    space: TICK_SPACE,
                    gap: 0.0,
                    grid: true,
                    values: AxisValues::Dollar,
                },
                AxisSpec {
                    scale: Axis::Volume,
                    side: Side::Left,
                    size: VOLUME_GUTTER,
                    space: TICK_SPACE,
                    gap: DEFAULT_AXIS_GAP,
                    grid: false,
                    values: AxisValues::DollarVolume,
                },
            )
        } else {
            (
                AxisSpec {
                    scale: Axis::Price,
                    side: Side::Right,
                    size: COMPACT_GUTTER,
                    space: TICK_SPACE,
                    gap: 0.0,
                    grid: true,
                    values: AxisValues::WholeUsd,
                },
                AxisSpec {
                    scale: Axis::Volume,
                    side: Side::Left,
                    size: COMPACT_GUTTER,
                    space: TICK_SPACE,
                    gap: DEFAULT_AXIS_GAP,
                    grid: false,
                    values: AxisValues::Plain,
                },
            )
        };

        Self {
            large,
            title_height,
            time,
            price,
            volume,
        }
    }

    /// Plot area left after the title row and the three axis gutters.
    pub fn plot_box(&self, viewport: Viewport) -> BoundingBox {
        let left = self.volume.size;
        let top = self.title_height;
        BoundingBox::new(
            left,
            top,
            (viewport.width - left - self.price.size).max(0.0),
            (viewport.height - top - self.time.size).max(0.0),
        )
    }

    /// Tick labels of every axis for the current scales.
    pub fn labels(&self, scales: &Scales, series: &Series, range: IndexRange) -> Vec<AxisLabel> {
        let mut labels = Vec::new();

        for spec in [&self.price, &self.volume] {
            let domain = match spec.scale {
                Axis::Volume => scales.volume,
                _ => scales.price,
            };
            labels.extend(
                nice_ticks(domain.min, domain.max, scales.bbox.height, spec.space)
                    .into_iter()
                    .map(|value| AxisLabel {
                        scale: spec.scale,
                        side: spec.side,
                        position: scales.value_to_pixel(value, spec.scale),
                        gap: spec.gap,
                        value,
                        text: spec.values.format(value),
                    }),
            );
        }

        labels.extend(time_ticks(scales, series, range, self.time.space).into_iter().map(
            |index| {
                let ts = series.time()[index];
                AxisLabel {
                    scale: Axis::Time,
                    side: self.time.side,
                    position: scales.index_to_pixel(series, index),
                    gap: self.time.gap,
                    value: ts as f64,
                    text: self.time.values.format(ts as f64),
                }
            },
        ));

        labels
    }
}

/// Round tick values (1, 2 or 5 times a power of ten) covering `[min, max]` with at least
/// `space` pixels between neighbours over an axis `length` pixels long.
pub fn nice_ticks(min: f64, max: f64, length: f64, space: f64) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || max <= min || length <= 0.0 || space <= 0.0 {
        return Vec::new();
    }

    let max_labels = (length / space).floor().max(1.0);
    let raw_step = (max - min) / max_labels;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|factor| factor * magnitude)
        .find(|step| *step >= raw_step)
        .unwrap_or(10.0 * magnitude);

    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last)
        .map(|k| {
            let value = k as f64 * step;
            if value == 0.0 {
                0.0
            } else {
                value
            }
        })
        .collect()
}

/// Visible bar indices to label on the time axis, at least `space` pixels apart. Candidates
/// are multiples of a stride so labels stay put while panning.
pub fn time_ticks(scales: &Scales, series: &Series, range: IndexRange, space: f64) -> Vec<usize> {
    let column = scales.column_width(range);
    if column <= 0.0 || space <= 0.0 {
        return Vec::new();
    }

    let stride = (space / column).ceil().max(1.0) as usize;
    let first = range.min.div_ceil(stride) * stride;

    let mut ticks = Vec::new();
    let mut last_position = f64::NEG_INFINITY;
    for index in (first..=range.max).step_by(stride) {
        let position = scales.index_to_pixel(series, index);
        if position - last_position >= space {
            ticks.push(index);
            last_position = position;
        }
    }
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::tests::{bars, sample};

    #[test]
    fn test_layout_gutters() {
        struct TestCase {
            first_open: f64,
            width: f64,
            expected_price: f64,
            expected_volume: f64,
        }

        let tests = vec![
            TestCase {
                // TC0: micro price on a large screen
                first_open: 0.0005,
                width: 1200.0,
                expected_price: 80.0,
                expected_volume: 75.0,
            },
            TestCase {
                // TC1: regular price on a large screen
                first_open: 1200.0,
                width: 1200.0,
                expected_price: 55.0,
                expected_volume: 75.0,
            },
            TestCase {
                // TC2: micro price on a compact screen
                first_open: 0.0005,
                width: 600.0,
                expected_price: 40.0,
                expected_volume: 40.0,
            },
            TestCase {
                // TC3: breakpoint itself is compact
                first_open: 1200.0,
                width: 900.0,
                expected_price: 40.0,
                expected_volume: 40.0,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let open = test.first_open;
            let series = bars(&[(1, open, open * 1.1, open * 0.9, open, 10.0)]);
            let layout = AxisLayout::for_chart(
                Viewport::new(test.width, 400.0),
                "TEST",
                &series,
                &ChartOptions::default(),
            );
            assert_eq!(layout.price.size, test.expected_price, "TC{} failed", index);
            assert_eq!(layout.volume.size, test.expected_volume, "TC{} failed", index);
        }
    }

    #[test]
    fn test_layout_value_formats() {
        let series = sample();
        let large = AxisLayout::for_chart(Viewport::new(1000.0, 500.0), "", &series, &ChartOptions::default());
        assert!(large.large);
        assert_eq!(large.price.values, AxisValues::Dollar);
        assert_eq!(large.volume.values, AxisValues::DollarVolume);
        assert!(!large.volume.grid);
        assert_eq!(large.price.side, Side::Right);

        let compact = AxisLayout::for_chart(Viewport::new(500.0, 500.0), "", &series, &ChartOptions::default());
        assert!(!compact.large);
        assert_eq!(compact.price.values, AxisValues::WholeUsd);
        assert_eq!(compact.volume.side, Side::Left);
    }

    #[test]
    fn test_plot_box() {
        let series = sample();
        let layout = AxisLayout::for_chart(Viewport::new(1000.0, 500.0), "GOLD", &series, &ChartOptions::default());

        assert_eq!(
            layout.plot_box(Viewport::new(1000.0, 500.0)),
            BoundingBox::new(75.0, 30.0, 870.0, 420.0)
        );
        assert_eq!(
            layout.plot_box(Viewport::new(100.0, 60.0)),
            BoundingBox::new(75.0, 30.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_nice_ticks() {
        assert_eq!(nice_ticks(0.0, 100.0, 200.0, 40.0), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
        assert_eq!(nice_ticks(1281.0, 1334.0, 120.0, 40.0), vec![1300.0, 1320.0]);
        assert!(nice_ticks(5.0, 5.0, 100.0, 40.0).is_empty());
        assert!(nice_ticks(0.0, 1.0, 0.0, 40.0).is_empty());

        let ticks = nice_ticks(0.0000301, 0.0000402, 400.0, 40.0);
        assert!(!ticks.is_empty());
        assert!(ticks.iter().all(|tick| (0.0000301..=0.0000402).contains(tick)));
    }

    #[test]
    fn test_time_ticks_respect_space() {
        let series = sample();
        let bbox = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let scales = Scales::fit(&series, series.full_range(), bbox, &ChartOptions::default());

        // 25px columns: every second bar
        assert_eq!(time_ticks(&scales, &series, series.full_range(), 40.0), vec![0, 2, 4]);
        assert_eq!(time_ticks(&scales, &series, series.full_range(), 10.0), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_labels_format_each_axis() {
        let series = sample();
        let options = ChartOptions::default();
        let viewport = Viewport::new(1000.0, 500.0);
        let layout = AxisLayout::for_chart(viewport, "GOLD", &series, &options);
        let scales = Scales::fit(&series, series.full_range(), layout.plot_box(viewport), &options);

        let labels = layout.labels(&scales, &series, series.full_range());
        let time: Vec<_> = labels.iter().filter(|label| label.scale == Axis::Time).collect();
        assert_eq!(time.first().map(|label| label.text.as_str()), Some("2019-01-01"));
        assert!(labels
            .iter()
            .filter(|label| label.scale == Axis::Price)
            .all(|label| label.text.starts_with('$') && label.side == Side::Right));
        assert!(labels
            .iter()
            .any(|label| label.scale == Axis::Volume && label.text == "$0.00"));
    }
}
