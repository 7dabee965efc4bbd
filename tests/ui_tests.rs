use term_chart::backend::FILL_CHAR;
use term_chart::data_types::{AxisSide, Color};
use term_chart::plot_types::LinePlot;
use term_chart::{Chart, ChartConfig, Command, HeadlessSurface, PlotKind, SeriesOptions, XAxisKind};

const COLS: u16 = 60;
const ROWS: u16 = 20;

fn numeric_config() -> ChartConfig {
    ChartConfig {
        index_spread: 1,
        bin_window: 1,
        x_zoom_unit: 1,
        grow_factor: 100,
        x_axis: XAxisKind::Numeric,
        ..ChartConfig::default()
    }
}

fn chart_with_surface(config: ChartConfig) -> (Chart, HeadlessSurface) {
    let surface = HeadlessSurface::new(COLS, ROWS);
    let chart = Chart::new(config, Box::new(surface.clone())).unwrap();
    (chart, surface)
}

fn filled_chart() -> (Chart, HeadlessSurface) {
    let (mut chart, surface) = chart_with_surface(numeric_config());
    let a = chart
        .add_series(SeriesOptions::new("a", PlotKind::line()), AxisSide::Left)
        .unwrap();
    let b = chart
        .add_series(
            SeriesOptions::new("b", PlotKind::histogram()).with_color(Color::Blue),
            AxisSide::Right,
        )
        .unwrap();
    for x in 0..100 {
        let x = x as f64;
        a.add_point(x, (x / 5.0).sin()).unwrap();
        b.add_point(x, x).unwrap();
    }
    (chart, surface)
}

fn screen_has(surface: &HeadlessSurface, ch: char) -> bool {
    surface.contents().iter().any(|row| row.contains(ch))
}

#[test]
fn test_draw_full_frame() {
    let (mut chart, surface) = filled_chart();
    chart.draw().unwrap();

    let top = surface.row_text(0);
    assert!(top.starts_with("∿ = a [1]"), "{top}");
    assert!(top.ends_with("П = b [2]"), "{top}");

    let status = surface.row_text(ROWS - 1);
    assert!(status.starts_with("l_offset: "), "{status}");
    assert!(status.contains("bin_window: 1"), "{status}");

    assert!(screen_has(&surface, FILL_CHAR));
    assert!(surface.flush_count() >= 1);

    // both axes got labels, so the plot is narrower than the screen
    let layout = *chart.backend().layout();
    assert!(layout.left > 1 && layout.right > 1);
    assert_eq!(layout.plot_cols, COLS as usize - layout.left - layout.right);
}

#[test]
fn test_empty_chart_draws() {
    let (mut chart, surface) = chart_with_surface(numeric_config());
    chart.draw().unwrap();
    assert!(!screen_has(&surface, FILL_CHAR));
    assert!(surface.row_text(ROWS - 1).starts_with("l_offset: 1"));
}

#[test]
fn test_toggles_through_commands() {
    let (mut chart, surface) = filled_chart();
    assert!(chart.frame().unwrap());

    let tx = chart.command_sender();
    tx.send(Command::ToggleLegend).unwrap();
    tx.send(Command::ToggleStatusLine).unwrap();
    // duplicates within one frame count once
    tx.send(Command::ToggleGrid).unwrap();
    tx.send(Command::ToggleGrid).unwrap();
    assert!(chart.frame().unwrap());

    assert!(!chart.toggles().legend);
    assert!(!chart.toggles().status_line);
    assert!(!chart.toggles().grid);
    assert!(!surface.row_text(0).contains("a [1]"));
    assert!(!surface.row_text(ROWS - 1).contains("l_offset"));
}

#[test]
fn test_redraw_only_on_new_data() {
    let (mut chart, _surface) = filled_chart();
    assert!(chart.frame().unwrap());
    assert!(!chart.frame().unwrap());

    chart.series("a").unwrap().add_point(100.0, 1.0).unwrap();
    assert!(chart.frame().unwrap());
    assert!(!chart.frame().unwrap());
}

#[test]
fn test_commands_and_data_draw_once() {
    let (mut chart, surface) = filled_chart();
    chart.frame().unwrap();
    let flushes = surface.flush_count();

    chart.command_sender().send(Command::ToggleGrid).unwrap();
    chart.add_point("a", 100.0, 1.0).unwrap();
    assert!(chart.frame().unwrap());
    assert_eq!(surface.flush_count(), flushes + 1);

    // the new point was already shown
    assert!(!chart.frame().unwrap());
}

#[test]
fn test_deep_y_zoom_draws() {
    let (mut chart, surface) = chart_with_surface(numeric_config());
    let a = chart
        .add_series(SeriesOptions::new("a", PlotKind::line()), AxisSide::Left)
        .unwrap();
    let c = chart
        .add_series(SeriesOptions::new("c", PlotKind::candlestick()), AxisSide::Left)
        .unwrap();
    for x in 0..40 {
        let x = x as f64;
        let y = match x as i64 {
            0 => 5.0,
            n if n % 2 == 0 => 0.0,
            _ => 10.0,
        };
        a.add_point(x, y).unwrap();
        c.add_ohlc(x, 2.0, 9.0, 1.0, 8.0).unwrap();
    }
    chart.draw().unwrap();

    for _ in 0..60 {
        chart.handle_command(Command::ZoomYIn);
    }
    assert!(chart.left_axis().range.span().unwrap() < 1e-3);
    chart.draw().unwrap();

    // every column crosses the middle of the range
    assert!(screen_has(&surface, FILL_CHAR));
}

#[test]
fn test_paused_ignores_data() {
    let (mut chart, _surface) = filled_chart();
    chart.frame().unwrap();

    chart.command_sender().send(Command::TogglePaused).unwrap();
    assert!(chart.frame().unwrap());
    assert!(chart.toggles().paused);

    chart.add_point("a", 100.0, 1.0).unwrap();
    assert!(!chart.frame().unwrap());

    chart.command_sender().send(Command::TogglePaused).unwrap();
    assert!(chart.frame().unwrap());
    assert!(!chart.toggles().paused);
}

#[test]
fn test_resize_redraws() {
    let (mut chart, surface) = filled_chart();
    chart.frame().unwrap();
    assert!(!chart.frame().unwrap());

    surface.resize(COLS + 20, ROWS + 5);
    assert!(chart.frame().unwrap());
    assert_eq!(chart.backend().cols(), (COLS + 20) as usize);
    assert!(surface.row_text(0).starts_with("∿ = a [1]"));
}

#[test]
fn test_disabled_series_not_drawn() {
    let (mut chart, surface) = chart_with_surface(numeric_config());
    let a = chart
        .add_series(SeriesOptions::new("a", PlotKind::histogram()), AxisSide::Left)
        .unwrap();
    for x in 0..50 {
        a.add_point(x as f64, x as f64).unwrap();
    }
    chart.draw().unwrap();
    assert!(screen_has(&surface, FILL_CHAR));

    chart.command_sender().send(Command::ToggleSeries(1)).unwrap();
    chart.frame().unwrap();
    assert!(!a.is_enabled());
    assert!(!screen_has(&surface, FILL_CHAR));

    // no series with that number
    chart.handle_command(Command::ToggleSeries(9));
    assert!(!a.is_enabled());
}

#[test]
fn test_horizontal_line_keeps_grid() {
    let (mut chart, surface) = chart_with_surface(numeric_config());
    let a = chart
        .add_series(
            SeriesOptions::new("a", PlotKind::Line(LinePlot::new(false))),
            AxisSide::Left,
        )
        .unwrap();
    chart
        .add_series(
            SeriesOptions::new("level", PlotKind::horizontal_line(5.0)).hidden(true),
            AxisSide::Left,
        )
        .unwrap();
    for x in 0..100 {
        a.add_point(x as f64, if x % 2 == 0 { 0.0 } else { 10.0 }).unwrap();
    }
    chart.draw().unwrap();

    let layout = *chart.backend().layout();
    let line_row = surface
        .contents()
        .into_iter()
        .find(|row| row.contains("5├"))
        .expect("horizontal line drawn");
    let plot: String = line_row
        .chars()
        .skip(layout.left + 2)
        .take(layout.plot_cols - 2)
        .collect();
    assert!(plot.contains('─'), "{plot}");
    assert!(plot.contains('.'), "{plot}");
    assert!(!plot.contains(' '), "{plot}");
    // hidden series stay out of the legend
    assert!(!surface.row_text(0).contains("level"));
}

#[test]
fn test_pan_and_zoom_commands() {
    let (mut chart, _surface) = filled_chart();
    chart.draw().unwrap();
    let left = chart.left_axis().range;

    chart.handle_command(Command::ZoomYIn);
    assert!(!chart.toggles().autorange_left_y);
    assert!(!chart.toggles().autorange_right_y);
    assert!(chart.left_axis().range.span().unwrap() < left.span().unwrap());

    chart.handle_command(Command::PanLeft);
    assert!(chart.toggles().paused);
    assert!(!chart.toggles().fit_all);
    assert!(chart.viewport().is_keeping_position());
    assert_eq!(chart.viewport().offset(), 10);
    chart.handle_command(Command::PanRight);
    assert_eq!(chart.viewport().offset(), 0);

    // bin window of 1 can't shrink
    chart.handle_command(Command::ZoomXIn);
    assert_eq!(chart.viewport().bin_window(), 1);
    chart.handle_command(Command::ZoomXOut);
    chart.handle_command(Command::ZoomXOut);
    assert_eq!(chart.viewport().bin_window(), 3);

    chart.handle_command(Command::CycleZoomUnit);
    assert_eq!(chart.zoom_unit(), 1);

    chart.handle_command(Command::Reset);
    assert!(chart.toggles().autorange_left_y);
    assert_eq!(chart.viewport().bin_window(), 1);
    assert!(!chart.viewport().is_keeping_position());
    // pausing is not a setting
    assert!(chart.toggles().paused);
    chart.draw().unwrap();
}

#[test]
fn test_cycle_zoom_unit_on_datetime_axis() {
    let (mut chart, _surface) = chart_with_surface(ChartConfig::default());
    assert_eq!(chart.zoom_unit(), 60);
    chart.handle_command(Command::CycleZoomUnit);
    assert_eq!(chart.zoom_unit(), 3_600);
    chart.handle_command(Command::ZoomXOut);
    assert_eq!(chart.viewport().bin_window(), 3_660);
}

#[test]
fn test_quit_command() {
    let (mut chart, _surface) = filled_chart();
    chart.command_sender().send(Command::Quit).unwrap();
    assert!(!chart.frame().unwrap());
    assert!(chart.should_quit());
}

#[test]
fn test_series_management() {
    let (mut chart, surface) = filled_chart();
    assert!(chart
        .add_series(SeriesOptions::new("a", PlotKind::line()), AxisSide::Right)
        .is_err());
    assert!(chart.remove_series("missing").is_err());
    assert!(chart.add_point("missing", 0.0, 0.0).is_err());

    chart.remove_series("b").unwrap();
    chart.draw().unwrap();
    assert!(!surface.row_text(0).contains("b [2]"));

    let c = chart
        .add_series(SeriesOptions::new("c", PlotKind::candlestick()), AxisSide::Right)
        .unwrap();
    assert_eq!(c.line_number(), 3);
    c.add_ohlc(0.0, 1.0, 2.0, 0.5, 1.5).unwrap();
    chart.draw().unwrap();

    let lines = chart.status_lines();
    assert_eq!(lines[0], "TERMINAL");
    assert_eq!(lines.last().unwrap(), "total points in chart: 101");
}

#[test]
fn test_reset_and_replay() {
    let (mut chart, _surface) = filled_chart();
    chart.replay_index(5).unwrap();
    assert_eq!(chart.config().index_spread, 5);
    assert_eq!(chart.viewport().bin_window(), 5);
    assert_eq!(chart.zoom_unit(), 5);
    {
        let index = chart.index();
        let index = index.acquire("test");
        assert_eq!(index.spread(), 5);
        assert_eq!(index.get("b", 42.0).map(|p| p.value()), Some(42.0));
        assert_eq!(index.columns().len(), 2);
    }
    assert!(chart.replay_index(0).is_err());
    chart.draw().unwrap();

    chart.reset_data();
    assert!(chart.series("a").unwrap().is_empty());
    assert!(!chart.index().acquire("test").has_data());
    chart.draw().unwrap();
}
