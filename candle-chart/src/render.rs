//! Candle renderer: wick, body and volume rectangles per bar.
//!
//! Geometry is computed by [`CandleRenderer::layout`] as plain data and then painted onto any
//! [`Surface`]. All rectangles are snapped to whole pixels so axis-aligned edges stay crisp.

use crate::{
    axis::{AxisLabel, BoundingBox},
    scale::{Axis, Scales},
    series::{IndexRange, Series},
};

/// Opaque RGB colour.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, derive_more::Display)]
#[display("#{r:02x}{g:02x}{b:02x}")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// From `0xRRGGBB`.
    pub const fn hex(value: u32) -> Self {
        Self::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }
}

/// Integer pixel rectangle, origin top-left.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Round half up, as canvas pixel snapping does.
fn round_px(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

impl PixelRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Snap a floating point rectangle to the pixel grid. Negative extents collapse to zero.
    pub fn snap(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(
            round_px(x),
            round_px(y),
            round_px(width).max(0),
            round_px(height).max(0),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

/// Drawing target of the renderer.
pub trait Surface {
    /// Fill `rect` with `color`, offset by the current translation.
    fn fill_rect(&mut self, rect: PixelRect, color: Rgb);

    /// Shift every subsequent fill by `(dx, dy)`; cumulative.
    fn translate(&mut self, dx: f64, dy: f64);
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect { rect: PixelRect, color: Rgb },
    Translate { dx: f64, dy: f64 },
}

/// Recording [`Surface`]; the retained scene of a chart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Filled rectangles in draw order.
    pub fn rects(&self) -> impl Iterator<Item = (PixelRect, Rgb)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::FillRect { rect, color } => Some((*rect, *color)),
            DrawCommand::Translate { .. } => None,
        })
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Play every recorded command onto another surface.
    pub fn replay<S: Surface + ?Sized>(&self, surface: &mut S) {
        for command in &self.commands {
            match *command {
                DrawCommand::FillRect { rect, color } => surface.fill_rect(rect, color),
                DrawCommand::Translate { dx, dy } => surface.translate(dx, dy),
            }
        }
    }
}

impl Surface for DrawList {
    fn fill_rect(&mut self, rect: PixelRect, color: Rgb) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.commands.push(DrawCommand::Translate { dx, dy });
    }
}

/// Candle geometry constants and palette.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CandleStyle {
    /// Horizontal space kept free between neighbouring bodies
    pub gap: f64,
    pub shadow_width: f64,
    pub body_max_width: f64,
    pub body_outline: f64,
    pub shadow: Rgb,
    pub bearish: Rgb,
    pub bullish: Rgb,
    pub volume_bearish: Rgb,
    pub volume_bullish: Rgb,
    pub grid: Rgb,
}

impl Default for CandleStyle {
    fn default() -> Self {
        Self {
            gap: 2.0,
            shadow_width: 2.0,
            body_max_width: 20.0,
            body_outline: 1.0,
            shadow: Rgb::hex(0x000000),
            bearish: Rgb::hex(0xcc0000),
            bullish: Rgb::hex(0x458b00),
            volume_bearish: Rgb::hex(0xbea6a0),
            volume_bullish: Rgb::hex(0xa6ae9d),
            grid: Rgb::hex(0xededed),
        }
    }
}

/// Pixel geometry of one bar.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CandleGeometry {
    pub index: usize,
    pub bearish: bool,
    pub wick: PixelRect,
    /// Outline rectangle; the fill is inset by the outline width
    pub body: PixelRect,
    pub body_fill: PixelRect,
    pub volume: PixelRect,
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct CandleRenderer {
    pub style: CandleStyle,
}

impl CandleRenderer {
    pub fn new(style: CandleStyle) -> Self {
        Self { style }
    }

    /// Body width for a column: capped on wide columns, shrunk on narrow ones.
    pub fn body_width(&self, column_width: f64) -> f64 {
        self.style
            .body_max_width
            .min(column_width - self.style.gap)
            .max(0.0)
    }

    /// Translation keeping odd-width wicks on the pixel grid.
    fn pixel_offset(&self) -> f64 {
        (self.style.shadow_width % 2.0) / 2.0
    }

    pub fn layout(&self, series: &Series, scales: &Scales, range: IndexRange) -> Vec<CandleGeometry> {
        let style = &self.style;
        let body_width = self.body_width(scales.column_width(range));
        let volume_zero = scales.value_to_pixel(0.0, Axis::Volume);

        series
            .bars(range)
            .map(|(index, bar)| {
                let x = scales.index_to_pixel(series, index);
                let high = scales.value_to_pixel(bar.high, Axis::Price);
                let low = scales.value_to_pixel(bar.low, Axis::Price);
                let open = scales.value_to_pixel(bar.open, Axis::Price);
                let close = scales.value_to_pixel(bar.close, Axis::Price);
                let volume = scales.value_to_pixel(bar.volume, Axis::Volume);

                let wick = PixelRect::snap(
                    x - style.shadow_width / 2.0,
                    high.min(low),
                    style.shadow_width,
                    (high - low).abs(),
                );

                let body_x = x - body_width / 2.0;
                let body_y = open.min(close);
                let body_height = (open - close).abs();
                let body = PixelRect::snap(body_x, body_y, body_width, body_height);
                let body_fill = PixelRect::snap(
                    body_x + style.body_outline,
                    body_y + style.body_outline,
                    body_width - style.body_outline * 2.0,
                    body_height - style.body_outline * 2.0,
                );

                let volume = PixelRect::snap(body_x, volume, body_width, volume_zero - volume);

                CandleGeometry {
                    index,
                    bearish: bar.is_bearish(),
                    wick,
                    body,
                    body_fill,
                    volume,
                }
            })
            .collect()
    }

    /// Paint candles in bar order: wick, body outline, body fill, volume.
    pub fn paint<S: Surface + ?Sized>(&self, candles: &[CandleGeometry], surface: &mut S) {
        let style = &self.style;
        let offset = self.pixel_offset();
        surface.translate(offset, offset);

        for candle in candles {
            let (body_color, volume_color) = if candle.bearish {
                (style.bearish, style.volume_bearish)
            } else {
                (style.bullish, style.volume_bullish)
            };

            surface.fill_rect(candle.wick, style.shadow);
            surface.fill_rect(candle.body, style.shadow);
            surface.fill_rect(candle.body_fill, body_color);
            surface.fill_rect(candle.volume, volume_color);
        }

        surface.translate(-offset, -offset);
    }

    /// One pixel grid lines through the labels of axes that request a grid.
    pub fn paint_grid<S: Surface + ?Sized>(
        &self,
        labels: &[AxisLabel],
        grid_axes: &[Axis],
        bbox: BoundingBox,
        surface: &mut S,
    ) {
        for label in labels.iter().filter(|label| grid_axes.contains(&label.scale)) {
            let rect = match label.scale {
                Axis::Time => PixelRect::snap(label.position, bbox.top, 1.0, bbox.height),
                Axis::Price | Axis::Volume => {
                    PixelRect::snap(bbox.left, label.position, bbox.width, 1.0)
                }
            };
            surface.fill_rect(rect, self.style.grid);
        }
    }
}
