//! Ratatui widget for a candlestick chart panel

use candle_chart::{
    overlay::{HIGHLIGHT_COLOR, TOOLTIP_BACKGROUND, TOOLTIP_TEXT},
    AxisLabel, ChartHandle, Rgb, Side, Surface, TooltipView,
};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{canvas::Canvas, Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::surface::{color, CanvasSurface, CellMetrics};

// Colors matching the candle-chart binary palette
const C_DIM: Color = Color::Rgb(120, 120, 120);
const C_ACCENT: Color = Color::Rgb(100, 180, 220);
const C_LABEL: Color = Color::Rgb(60, 60, 60);
const C_TITLE: Color = Color::Rgb(0, 0, 0);

/// Plot background, the white page the chart palette is designed for.
pub const PLOT_BACKGROUND: Rgb = Rgb::new(255, 255, 255);

fn panel_block(focused: bool) -> Block<'static> {
    let border_color = if focused { C_ACCENT } else { C_DIM };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
}

/// Area left for the chart inside the panel border.
pub fn panel_inner(area: Rect) -> Rect {
    panel_block(false).inner(area)
}

/// Render one chart panel: border, title row, candles, axis labels and overlays.
pub fn render_chart_panel(
    f: &mut Frame,
    area: Rect,
    chart: &ChartHandle,
    metrics: CellMetrics,
    focused: bool,
) {
    let range = chart.visible_range();
    let block = panel_block(focused).title_bottom(Line::from(Span::styled(
        format!(" bars {}-{} of {} ", range.min + 1, range.max + 1, chart.series().len()),
        Style::default().fg(C_DIM),
    )));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    // Highlight sits under the grid and the candles
    let mut surface = CanvasSurface::new(metrics, inner.width, inner.height, PLOT_BACKGROUND);
    if let Some(column) = chart.highlight_rect() {
        surface.fill_rect(column, HIGHLIGHT_COLOR);
    }
    chart.scene().replay(&mut surface);

    let canvas = Canvas::default()
        .marker(Marker::HalfBlock)
        .x_bounds([0.0, f64::from(inner.width)])
        .y_bounds([0.0, f64::from(inner.height) * 2.0])
        .paint(|ctx| ctx.draw(&surface));
    f.render_widget(canvas, inner);

    render_title(f, inner, chart);
    render_labels(f, inner, chart, metrics);

    if let Some(tooltip) = chart.tooltip() {
        render_tooltip(f, inner, &tooltip, metrics);
    }
}

fn render_title(f: &mut Frame, inner: Rect, chart: &ChartHandle) {
    if chart.axes().title_height <= 0.0 {
        return;
    }
    let title = Paragraph::new(Line::from(Span::styled(
        chart.title(),
        Style::default()
            .fg(C_TITLE)
            .bg(color(PLOT_BACKGROUND))
            .add_modifier(Modifier::BOLD),
    )))
    .centered();
    f.render_widget(title, Rect::new(inner.x, inner.y, inner.width, 1));
}

/// Terminal cell (column, row offset within the chart) where `label` starts.
fn label_cell(label: &AxisLabel, chart: &ChartHandle, metrics: CellMetrics) -> (i32, i32) {
    let bbox = chart.bbox();
    let width = label.text.chars().count() as i32;
    match label.side {
        Side::Right => (
            metrics.column(bbox.right() + label.gap) + 1,
            metrics.row(label.position),
        ),
        Side::Left => (
            metrics.column(bbox.left - label.gap) - width,
            metrics.row(label.position),
        ),
        Side::Bottom => (
            metrics.column(label.position) - width / 2,
            metrics.row(bbox.bottom() + label.gap) + 1,
        ),
    }
}

fn render_labels(f: &mut Frame, inner: Rect, chart: &ChartHandle, metrics: CellMetrics) {
    let style = Style::default().fg(C_LABEL).bg(color(PLOT_BACKGROUND));
    let buf = f.buffer_mut();
    // Time labels are spaced in chart pixels; skip those that would overlap in cells
    let mut time_free = 0;

    for label in chart.labels() {
        let (column, row) = label_cell(label, chart, metrics);
        let column = column.max(0);
        if row < 0 || row >= i32::from(inner.height) || column >= i32::from(inner.width) {
            continue;
        }
        if label.side == Side::Bottom {
            if column < time_free {
                continue;
            }
            time_free = column + label.text.chars().count() as i32 + 1;
        }

        let max_width = usize::from(inner.width) - column as usize;
        buf.set_stringn(
            inner.x + column as u16,
            inner.y + row as u16,
            &label.text,
            max_width,
            style,
        );
    }
}

/// Tooltip box anchored just below-right of the pointer, kept inside the frame but free to
/// leave the plot area.
pub fn tooltip_area(frame: Rect, inner: Rect, tooltip: &TooltipView, metrics: CellMetrics) -> Rect {
    let content = tooltip
        .rows
        .iter()
        .map(|row| row.label.len() + 2 + row.value.chars().count())
        .max()
        .unwrap_or(0);
    let width = (content as u16 + 2).min(frame.width);
    let height = (tooltip.rows.len() as u16 + 2).min(frame.height);

    let column = i32::from(inner.x) + metrics.column(tooltip.left) + 1;
    let row = i32::from(inner.y) + metrics.row(tooltip.top) + 1;
    let max_x = i32::from(frame.right() - width);
    let max_y = i32::from(frame.bottom() - height);

    Rect::new(
        column.clamp(i32::from(frame.x), max_x) as u16,
        row.clamp(i32::from(frame.y), max_y) as u16,
        width,
        height,
    )
}

fn render_tooltip(f: &mut Frame, inner: Rect, tooltip: &TooltipView, metrics: CellMetrics) {
    let area = tooltip_area(f.area(), inner, tooltip, metrics);
    let style = Style::default()
        .fg(color(TOOLTIP_TEXT))
        .bg(color(TOOLTIP_BACKGROUND));

    let lines: Vec<Line> = tooltip
        .rows
        .iter()
        .map(|row| {
            Line::from(vec![
                Span::styled(format!("{}: ", row.label), style.add_modifier(Modifier::BOLD)),
                Span::styled(row.value.clone(), style),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .style(style);

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);
}
