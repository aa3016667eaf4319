/// Candle Chart - terminal candlestick viewer
///
/// - One panel per series file in CHART_DATA, demo series otherwise
/// - Hover a panel: column highlight + OHLCV tooltip
/// - Resize: throttled relayout, applied at the next paint
/// - Keys: Tab focus, +/- zoom, ←/→ pan, r reset, c clear, q/Esc quit
use std::{
    error::Error,
    fs::File,
    io,
    path::Path,
    sync::Mutex,
    time::{Duration, Instant},
};

use candle_chart::{clear, draw, time::recent_days, ChartContainer, ChartHandle, Series};
use candle_chart_tui::{
    config::DEFAULT_DEMO_BARS, demo_series, load_series, panel_inner, render_chart_panel,
    series_title, CellMetrics, TuiConfig, DEMO_SYMBOLS,
};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// ============================================================================
// COLORS
// ============================================================================
const C_DIM: Color = Color::Rgb(120, 120, 120);
const C_ACCENT: Color = Color::Rgb(100, 180, 220);

// ============================================================================
// CONSTANTS
// ============================================================================
const ZOOM_IN: f64 = 0.8;
const ZOOM_OUT: f64 = 1.25;
const PAN_STEP: isize = 5;

// ============================================================================
// HELPERS
// ============================================================================

/// Logs go to a file; anything written to the terminal would corrupt the alternate screen.
fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_charts(config: &TuiConfig) -> Result<Vec<(String, Series)>, Box<dyn Error>> {
    if config.data.is_empty() {
        return DEMO_SYMBOLS
            .iter()
            .map(|&(symbol, price)| -> Result<_, Box<dyn Error>> {
                Ok((symbol.to_string(), demo_series(symbol, DEFAULT_DEMO_BARS, price)?))
            })
            .collect();
    }

    config
        .data
        .iter()
        .map(|path| -> Result<_, Box<dyn Error>> { Ok((series_title(path), load_series(path)?)) })
        .collect()
}

/// Panel per chart side by side, help line below.
fn panel_areas(area: Rect, count: usize) -> (Vec<Rect>, Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let count = count.max(1) as u32;
    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..count).map(|_| Constraint::Ratio(1, count)))
        .split(rows[0]);

    (panels.to_vec(), rows[1])
}

fn focused_chart(containers: &mut [ChartContainer], focus: usize) -> Option<&mut ChartHandle> {
    containers.get_mut(focus).and_then(ChartContainer::chart_mut)
}

// ============================================================================
// MAIN
// ============================================================================
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = TuiConfig::from_env();
    if let Some(path) = &config.log_file {
        init_logging(path)?;
    }

    let charts = load_charts(&config)?;
    let options = config.chart_options();

    let (width, height) = crossterm::terminal::size()?;
    let (mut panels, mut help) = panel_areas(Rect::new(0, 0, width, height), charts.len());

    let mut containers: Vec<ChartContainer> = panels
        .iter()
        .map(|area| ChartContainer::new(config.cell.viewport(panel_inner(*area))))
        .collect();

    for ((title, series), container) in charts.into_iter().zip(containers.iter_mut()) {
        let chart = draw(&title, container, series, &options);
        if let Some(days) = config.days {
            let range = recent_days(chart.series(), days);
            if let Err(error) = chart.set_visible_range(range) {
                warn!(%error, title = %title, "ignoring CHART_DAYS");
            }
        }
    }
    info!(charts = containers.len(), "candle-chart started");

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let draw_interval = Duration::from_millis(50);
    let mut last_draw = Instant::now();
    let mut focus = 0usize;

    let result = loop {
        if event::poll(Duration::from_millis(5))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break Ok(()),
                    KeyCode::Tab => focus = (focus + 1) % containers.len().max(1),
                    KeyCode::Char('c') | KeyCode::Char('C') => {
                        if let Some(container) = containers.get_mut(focus) {
                            clear(container);
                        }
                    }
                    code => {
                        if let Some(chart) = focused_chart(&mut containers, focus) {
                            let changed = match code {
                                KeyCode::Char('+') | KeyCode::Char('=') => chart.zoom(ZOOM_IN),
                                KeyCode::Char('-') => chart.zoom(ZOOM_OUT),
                                KeyCode::Left => chart.pan(-PAN_STEP),
                                KeyCode::Right => chart.pan(PAN_STEP),
                                KeyCode::Char('r') | KeyCode::Char('R') => {
                                    let full = chart.series().full_range();
                                    chart.set_visible_range(full)
                                }
                                _ => Ok(()),
                            };
                            if let Err(error) = changed {
                                warn!(%error, title = %chart.title(), "visible range unchanged");
                            }
                        }
                    }
                },
                Event::Mouse(mouse)
                    if matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) =>
                {
                    for (index, (area, container)) in panels.iter().zip(containers.iter_mut()).enumerate() {
                        let position = config.cell.cell_centre(panel_inner(*area), mouse.column, mouse.row);
                        if position.is_some() {
                            focus = index;
                        }
                        if let Some(chart) = container.chart_mut() {
                            chart.pointer(position);
                        }
                    }
                }
                Event::Resize(width, height) => {
                    (panels, help) = panel_areas(Rect::new(0, 0, width, height), containers.len());
                    for (area, container) in panels.iter().zip(containers.iter()) {
                        container.resize(config.cell.viewport(panel_inner(*area)));
                    }
                }
                _ => {}
            }
        }

        // Size changes refused by the throttle stay pending, so observe every tick
        let now = Instant::now();
        for chart in containers.iter_mut().filter_map(ChartContainer::chart_mut) {
            chart.observe_resize(now);
        }

        if last_draw.elapsed() >= draw_interval {
            // Scheduled resize passes run with the paint
            for chart in containers.iter_mut().filter_map(ChartContainer::chart_mut) {
                chart.apply_pending_resize();
            }
            terminal.draw(|f| render_ui(f, &panels, help, &containers, config.cell, focus))?;
            last_draw = Instant::now();
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    result
}

// ============================================================================
// RENDER
// ============================================================================
fn render_ui(
    f: &mut Frame,
    panels: &[Rect],
    help: Rect,
    containers: &[ChartContainer],
    metrics: CellMetrics,
    focus: usize,
) {
    for (index, (area, container)) in panels.iter().zip(containers).enumerate() {
        match container.chart() {
            Some(chart) => render_chart_panel(f, *area, chart, metrics, index == focus),
            None => f.render_widget(
                Paragraph::new(Line::from(Span::styled(" (cleared)", Style::default().fg(C_DIM)))),
                *area,
            ),
        }
    }

    let keys = [("Tab", "focus"), ("+/-", "zoom"), ("←/→", "pan"), ("r", "reset"), ("c", "clear"), ("q", "quit")];
    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, action)| {
            [
                Span::styled(format!(" {} ", key), Style::default().fg(C_ACCENT)),
                Span::styled(format!("{} ", action), Style::default().fg(C_DIM)),
            ]
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(spans)), help);
}
