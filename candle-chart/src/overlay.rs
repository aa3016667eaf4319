//! Pointer-driven overlays: hovered column highlight and a tooltip following the pointer.

use crate::{
    format::Formatters,
    render::{PixelRect, Rgb},
    scale::Scales,
    series::{IndexRange, Series},
};

/// `rgba(51, 204, 255, 0.3)` over a white plot.
pub const HIGHLIGHT_COLOR: Rgb = Rgb::new(194, 240, 255);
/// `rgba(255, 249, 196, 0.92)` over a white plot.
pub const TOOLTIP_BACKGROUND: Rgb = Rgb::new(255, 249, 201);
pub const TOOLTIP_TEXT: Rgb = Rgb::new(0, 0, 0);

/// Hovered time column.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Highlight {
    #[default]
    Hidden,
    Visible(usize),
}

impl Highlight {
    pub fn enter(&mut self, index: usize) {
        *self = Highlight::Visible(index);
    }

    /// Move the highlight to `index`. Returns true only when the visible column changed, so
    /// callers can skip relayout on redundant pointer moves.
    pub fn update(&mut self, index: usize) -> bool {
        match self {
            Highlight::Visible(current) if *current != index => {
                *current = index;
                true
            }
            _ => false,
        }
    }

    pub fn leave(&mut self) {
        *self = Highlight::Hidden;
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            Highlight::Visible(index) => Some(*index),
            Highlight::Hidden => None,
        }
    }

    /// Column rectangle: one column wide, centred on the bar, full plot height.
    pub fn column(&self, scales: &Scales, series: &Series, range: IndexRange) -> Option<PixelRect> {
        let index = self.index()?;
        let width = scales.column_width(range);
        let left = scales.index_to_pixel(series, index) - width / 2.0;
        Some(PixelRect::snap(
            left,
            scales.bbox.top,
            width,
            scales.bbox.height,
        ))
    }
}

/// One labelled tooltip line.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct TooltipRow {
    pub label: &'static str,
    pub value: String,
}

/// Floating label tracking the raw pointer position. Not clipped to the plot area.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Tooltip {
    visible: bool,
    left: f64,
    top: f64,
}

impl Tooltip {
    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn move_to(&mut self, left: f64, top: f64) {
        self.left = left;
        self.top = top;
    }

    /// Pointer position while visible.
    pub fn position(&self) -> Option<(f64, f64)> {
        self.visible.then_some((self.left, self.top))
    }

    /// Formatted OHLCV rows of bar `index`.
    pub fn rows(series: &Series, index: usize, formatters: &Formatters) -> Vec<TooltipRow> {
        let Some(bar) = series.bar(index) else {
            return Vec::new();
        };

        vec![
            TooltipRow {
                label: "Time",
                value: (formatters.timestamp)(bar.time),
            },
            TooltipRow {
                label: "Open",
                value: (formatters.value)(bar.open),
            },
            TooltipRow {
                label: "High",
                value: (formatters.price)(bar.high),
            },
            TooltipRow {
                label: "Low",
                value: (formatters.price)(bar.low),
            },
            TooltipRow {
                label: "Close",
                value: (formatters.price)(bar.close),
            },
            TooltipRow {
                label: "Volume",
                value: (formatters.value)(bar.volume),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{axis::BoundingBox, options::ChartOptions, series::tests::sample};

    #[test]
    fn test_highlight_state_machine() {
        let mut highlight = Highlight::default();
        assert_eq!(highlight.index(), None);

        // Moves before entering do nothing
        assert!(!highlight.update(2));
        assert_eq!(highlight, Highlight::Hidden);

        highlight.enter(1);
        assert_eq!(highlight.index(), Some(1));

        assert!(highlight.update(3));
        assert!(!highlight.update(3), "repeated index must be memoised");
        assert_eq!(highlight.index(), Some(3));

        highlight.leave();
        assert_eq!(highlight, Highlight::Hidden);
    }

    #[test]
    fn test_highlight_column_width() {
        let series = sample();
        let range = series.full_range();
        let bbox = BoundingBox::new(75.0, 30.0, 870.0, 420.0);
        let scales = Scales::fit(&series, range, bbox, &ChartOptions::default());

        let mut highlight = Highlight::default();
        assert_eq!(highlight.column(&scales, &series, range), None);

        highlight.enter(2);
        let column = highlight.column(&scales, &series, range).unwrap();
        // 870 / 4 = 217.5
        assert_eq!(column.width, 218);
        assert!((f64::from(column.width) - bbox.width / range.span() as f64).abs() <= 0.5);
        // Centred on bar 2 at x = 75 + 435
        assert_eq!(column.x, (510.0f64 - 108.75 + 0.5).floor() as i32);
        assert_eq!(column.y, 30);
        assert_eq!(column.height, 420);
    }

    #[test]
    fn test_tooltip_visibility_and_position() {
        let mut tooltip = Tooltip::default();
        tooltip.move_to(12.5, 40.0);
        assert_eq!(tooltip.position(), None);

        tooltip.show();
        tooltip.move_to(13.25, 41.0);
        assert_eq!(tooltip.position(), Some((13.25, 41.0)));

        tooltip.hide();
        assert!(!tooltip.is_visible());
    }

    #[test]
    fn test_tooltip_rows() {
        let series = sample();
        let rows = Tooltip::rows(&series, 1, &Formatters::default());

        let labels: Vec<_> = rows.iter().map(|row| row.label).collect();
        assert_eq!(labels, vec!["Time", "Open", "High", "Low", "Close", "Volume"]);
        assert_eq!(rows[0].value, "2019-01-02 00:00");
        assert_eq!(rows[1].value, "$1,319.90");
        assert_eq!(rows[5].value, "$80.00");

        assert!(Tooltip::rows(&series, 99, &Formatters::default()).is_empty());
    }
}
