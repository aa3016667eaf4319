//! Half-block raster surface: chart pixel rectangles onto a ratatui canvas.
//!
//! A terminal cell is `width` x `height` chart pixels and holds two half-block pixels stacked
//! vertically, so the raster is `columns` wide and `rows * 2` tall.

use candle_chart::{PixelRect, Rgb, Surface, Viewport};
use ratatui::{
    layout::Rect,
    style::Color,
    widgets::canvas::{Painter, Shape},
};

pub const DEFAULT_CELL_WIDTH_PX: f64 = 8.0;
pub const DEFAULT_CELL_HEIGHT_PX: f64 = 16.0;

pub fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Chart pixel size of one terminal cell.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CellMetrics {
    pub width: f64,
    pub height: f64,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            width: DEFAULT_CELL_WIDTH_PX,
            height: DEFAULT_CELL_HEIGHT_PX,
        }
    }
}

impl CellMetrics {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(2.0),
        }
    }

    /// Chart viewport covering `area`.
    pub fn viewport(&self, area: Rect) -> Viewport {
        Viewport::new(
            f64::from(area.width) * self.width,
            f64::from(area.height) * self.height,
        )
    }

    /// Chart pixel at the centre of terminal cell `(column, row)`, relative to `area`. `None`
    /// when the cell lies outside `area`.
    pub fn cell_centre(&self, area: Rect, column: u16, row: u16) -> Option<(f64, f64)> {
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        inside.then(|| {
            (
                (f64::from(column - area.x) + 0.5) * self.width,
                (f64::from(row - area.y) + 0.5) * self.height,
            )
        })
    }

    /// Terminal column offset holding chart pixel `x`.
    pub fn column(&self, x: f64) -> i32 {
        (x / self.width).floor() as i32
    }

    /// Terminal row offset holding chart pixel `y`.
    pub fn row(&self, y: f64) -> i32 {
        (y / self.height).floor() as i32
    }
}

/// Dense half-block raster implementing the chart [`Surface`].
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    metrics: CellMetrics,
    columns: usize,
    rows: usize,
    offset: (f64, f64),
    pixels: Vec<Color>,
}

impl CanvasSurface {
    /// Raster of `columns` x `rows` terminal cells filled with `background`.
    pub fn new(metrics: CellMetrics, columns: u16, rows: u16, background: Rgb) -> Self {
        let columns = usize::from(columns);
        let rows = usize::from(rows) * 2;
        Self {
            metrics,
            columns,
            rows,
            offset: (0.0, 0.0),
            pixels: vec![color(background); columns * rows],
        }
    }

    /// Raster size in half-block pixels.
    pub fn size(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        (x < self.columns && y < self.rows).then(|| self.pixels[y * self.columns + x])
    }

    /// Half-open span of raster indices covering chart pixels `[start, end)` at `step` chart
    /// pixels per raster pixel, clipped to `limit`.
    fn span(start: f64, end: f64, step: f64, limit: usize) -> (usize, usize) {
        let first = (start / step).floor().max(0.0) as usize;
        let last = ((end / step).ceil().max(0.0) as usize).min(limit);
        (first.min(limit), last)
    }
}

impl Surface for CanvasSurface {
    fn fill_rect(&mut self, rect: PixelRect, rgb: Rgb) {
        if rect.is_empty() {
            return;
        }

        let left = f64::from(rect.x) + self.offset.0;
        let top = f64::from(rect.y) + self.offset.1;
        let (x0, x1) = Self::span(
            left,
            left + f64::from(rect.width),
            self.metrics.width,
            self.columns,
        );
        let (y0, y1) = Self::span(
            top,
            top + f64::from(rect.height),
            self.metrics.height / 2.0,
            self.rows,
        );

        let fill = color(rgb);
        for y in y0..y1 {
            let row = y * self.columns;
            self.pixels[row + x0..row + x1].fill(fill);
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.offset.0 += dx;
        self.offset.1 += dy;
    }
}

impl Shape for CanvasSurface {
    fn draw(&self, painter: &mut Painter) {
        for (index, pixel) in self.pixels.iter().enumerate() {
            painter.paint(index % self.columns, index / self.columns, *pixel);
        }
    }
}
