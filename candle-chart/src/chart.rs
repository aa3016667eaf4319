//! Chart instances and the containers that host them.
//!
//! A [`ChartContainer`] stands for the element a chart is drawn into: it knows its own size
//! and hosts at most one [`ChartHandle`]. Every handle owns its series, scene, overlays and
//! resize subscription, so any number of charts can live side by side.

use crate::{
    axis::{AxisLabel, AxisLayout, BoundingBox, Viewport},
    error::ChartError,
    options::ChartOptions,
    overlay::{Highlight, Tooltip, TooltipRow},
    render::{CandleRenderer, DrawList, PixelRect},
    resize::ResizeCoordinator,
    scale::Scales,
    series::{IndexRange, Series},
};
use std::time::Instant;
use tokio::sync::watch;
use tracing::{debug, info};

/// Element hosting a chart.
#[derive(Debug)]
pub struct ChartContainer {
    sizes: watch::Sender<Viewport>,
    chart: Option<ChartHandle>,
}

impl ChartContainer {
    pub fn new(viewport: Viewport) -> Self {
        let (sizes, _) = watch::channel(viewport);
        Self { sizes, chart: None }
    }

    pub fn viewport(&self) -> Viewport {
        *self.sizes.borrow()
    }

    /// Publish a new container size to the mounted chart. Unchanged sizes are not notified.
    pub fn resize(&self, viewport: Viewport) {
        self.sizes.send_if_modified(|current| {
            if *current == viewport {
                false
            } else {
                *current = viewport;
                true
            }
        });
    }

    pub fn chart(&self) -> Option<&ChartHandle> {
        self.chart.as_ref()
    }

    pub fn chart_mut(&mut self) -> Option<&mut ChartHandle> {
        self.chart.as_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.chart.is_none()
    }

    /// Live resize subscriptions on this container.
    pub fn listener_count(&self) -> usize {
        self.sizes.receiver_count()
    }
}

/// Tooltip contents and raw pointer position.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipView {
    pub left: f64,
    pub top: f64,
    pub rows: Vec<TooltipRow>,
}

/// One chart instance.
#[derive(Debug)]
pub struct ChartHandle {
    title: String,
    series: Series,
    options: ChartOptions,
    renderer: CandleRenderer,
    axes: AxisLayout,
    viewport: Viewport,
    range: IndexRange,
    scales: Scales,
    labels: Vec<AxisLabel>,
    scene: DrawList,
    highlight: Highlight,
    tooltip: Tooltip,
    resize: ResizeCoordinator,
}

/// Clear `container` and draw a new chart into it.
pub fn draw<'a>(
    title: &str,
    container: &'a mut ChartContainer,
    series: Series,
    options: &ChartOptions,
) -> &'a mut ChartHandle {
    clear(container);

    let handle = ChartHandle::new(title, series, options.clone(), container.sizes.subscribe());
    info!(
        title,
        bars = handle.series.len(),
        width = handle.viewport.width,
        height = handle.viewport.height,
        large = handle.axes.large,
        "chart mounted"
    );
    container.chart.insert(handle)
}

/// Remove the chart from `container`, dropping its scene and resize subscription.
pub fn clear(container: &mut ChartContainer) {
    if let Some(chart) = container.chart.take() {
        debug!(title = %chart.title, passes = chart.resize.passes(), "chart cleared");
    }
}

impl ChartHandle {
    fn new(
        title: &str,
        series: Series,
        options: ChartOptions,
        sizes: watch::Receiver<Viewport>,
    ) -> Self {
        let viewport = *sizes.borrow();
        let range = series.full_range();
        let axes = AxisLayout::for_chart(viewport, title, &series, &options);
        let bbox = axes.plot_box(viewport);
        let scales = Scales::fit(&series, range, bbox, &options);
        let resize = ResizeCoordinator::new(sizes, options.resize_throttle);

        let mut handle = Self {
            title: title.to_string(),
            renderer: CandleRenderer::new(options.style),
            series,
            options,
            axes,
            viewport,
            range,
            scales,
            labels: Vec::new(),
            scene: DrawList::new(),
            highlight: Highlight::default(),
            tooltip: Tooltip::default(),
            resize,
        };
        handle.layout();
        handle
    }

    /// Refit scales to the current viewport and range and rebuild the scene.
    fn layout(&mut self) {
        let bbox = self.axes.plot_box(self.viewport);
        self.scales = Scales::fit(&self.series, self.range, bbox, &self.options);
        self.labels = self.axes.labels(&self.scales, &self.series, self.range);

        let grid_axes: Vec<_> = [&self.axes.time, &self.axes.price, &self.axes.volume]
            .into_iter()
            .filter(|spec| spec.grid)
            .map(|spec| spec.scale)
            .collect();

        self.scene.clear();
        self.renderer
            .paint_grid(&self.labels, &grid_axes, bbox, &mut self.scene);
        let candles = self.renderer.layout(&self.series, &self.scales, self.range);
        self.renderer.paint(&candles, &mut self.scene);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    pub fn axes(&self) -> &AxisLayout {
        &self.axes
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn bbox(&self) -> BoundingBox {
        self.scales.bbox
    }

    pub fn scales(&self) -> &Scales {
        &self.scales
    }

    pub fn visible_range(&self) -> IndexRange {
        self.range
    }

    pub fn labels(&self) -> &[AxisLabel] {
        &self.labels
    }

    /// Retained drawing of grid and candles for the current layout.
    pub fn scene(&self) -> &DrawList {
        &self.scene
    }

    pub fn highlight(&self) -> Highlight {
        self.highlight
    }

    /// Resize immediately, bypassing the throttle.
    pub fn set_size(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.layout();
    }

    /// Consume a container size notification; true when a pass got scheduled.
    pub fn observe_resize(&mut self, now: Instant) -> bool {
        self.resize.observe(now)
    }

    /// Run a scheduled resize pass against the latest container size. Call once per paint.
    pub fn apply_pending_resize(&mut self) -> bool {
        match self.resize.run_pending() {
            Some(viewport) => {
                self.set_size(viewport);
                true
            }
            None => false,
        }
    }

    /// [`observe_resize`](Self::observe_resize) followed by
    /// [`apply_pending_resize`](Self::apply_pending_resize).
    pub fn poll_resize(&mut self, now: Instant) -> bool {
        self.observe_resize(now);
        self.apply_pending_resize()
    }

    /// Executed resize passes.
    pub fn resize_passes(&self) -> u64 {
        self.resize.passes()
    }

    pub fn pointer_enter(&mut self, x: f64, y: f64) {
        let index = self.scales.nearest_index(&self.series, self.range, x);
        self.highlight.enter(index);
        self.tooltip.show();
        self.tooltip.move_to(x, y);
    }

    /// Track the pointer. Returns true when the highlighted column changed.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.tooltip.move_to(x, y);
        let index = self.scales.nearest_index(&self.series, self.range, x);
        self.highlight.update(index)
    }

    pub fn pointer_leave(&mut self) {
        self.highlight.leave();
        self.tooltip.hide();
    }

    /// Dispatch enter, move or leave from a raw pointer position (`None` when the pointer left
    /// the surface). Returns true when the overlays need a redraw.
    pub fn pointer(&mut self, position: Option<(f64, f64)>) -> bool {
        let inside = position.filter(|(x, y)| self.bbox().contains(*x, *y));
        match (inside, self.tooltip.is_visible()) {
            (Some((x, y)), false) => {
                self.pointer_enter(x, y);
                true
            }
            (Some((x, y)), true) => {
                self.pointer_move(x, y);
                true
            }
            (None, true) => {
                self.pointer_leave();
                true
            }
            (None, false) => false,
        }
    }

    /// Highlighted column rectangle while the pointer hovers the plot.
    pub fn highlight_rect(&self) -> Option<PixelRect> {
        self.highlight.column(&self.scales, &self.series, self.range)
    }

    /// Tooltip at the raw pointer position while the pointer hovers the plot.
    pub fn tooltip(&self) -> Option<TooltipView> {
        let (left, top) = self.tooltip.position()?;
        let index = self.highlight.index()?;
        Some(TooltipView {
            left,
            top,
            rows: Tooltip::rows(&self.series, index, &self.options.formatters),
        })
    }

    /// Show bars `range` only.
    pub fn set_visible_range(&mut self, range: IndexRange) -> Result<(), ChartError> {
        if range.min > range.max || range.max >= self.series.len() {
            return Err(ChartError::InvalidRange {
                min: range.min,
                max: range.max,
                len: self.series.len(),
            });
        }

        self.range = range;
        if let Highlight::Visible(index) = self.highlight {
            self.highlight = Highlight::Visible(range.clamp(index));
        }
        self.layout();
        Ok(())
    }

    /// Scale the number of visible bars by `factor` around the range centre.
    pub fn zoom(&mut self, factor: f64) -> Result<(), ChartError> {
        let last = self.series.len() - 1;
        let current = self.range.span();
        let scaled = (current as f64 * factor).round() as usize;
        // Rounding must not swallow the step near the minimum span
        let span = if scaled != current {
            scaled
        } else if factor > 1.0 {
            current + 1
        } else if factor < 1.0 {
            current.saturating_sub(1)
        } else {
            current
        }
        .clamp(1.min(last), last);
        let centre = (self.range.min + self.range.max) / 2;
        let min = centre.saturating_sub(span / 2).min(last - span);
        self.set_visible_range(IndexRange::new(min, min + span))
    }

    /// Shift the visible range by `bars`, stopping at either end of the series.
    pub fn pan(&mut self, bars: isize) -> Result<(), ChartError> {
        let last = self.series.len() - 1;
        let span = self.range.span();
        let min = self
            .range
            .min
            .saturating_add_signed(bars)
            .min(last - span);
        self.set_visible_range(IndexRange::new(min, min + span))
    }
}
