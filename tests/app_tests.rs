use crossterm::event::KeyCode;
use term_chart::data_types::AxisSide;
use term_chart::{
    App, Chart, ChartConfig, Command, HeadlessSurface, KeyBindings, PlotKind, ScriptedKeys, SeriesOptions,
    XAxisKind,
};

fn fast_config() -> ChartConfig {
    ChartConfig {
        index_spread: 1,
        bin_window: 1,
        x_zoom_unit: 1,
        grow_factor: 100,
        x_axis: XAxisKind::Numeric,
        update_interval_ms: 5,
        frame_interval_ms: 5,
        ..ChartConfig::default()
    }
}

#[test]
fn test_app_runs_until_quit() {
    let surface = HeadlessSurface::new(60, 20);
    let mut chart = Chart::new(fast_config(), Box::new(surface.clone())).unwrap();
    let series = chart
        .add_series(SeriesOptions::new("a", PlotKind::line()), AxisSide::Left)
        .unwrap();

    let keys = ScriptedKeys::new([KeyCode::Char('g')]);
    let trigger = keys.clone();
    let writer = series.clone();
    let mut x = 0.0;
    let source = move || -> eyre::Result<()> {
        writer.add_point(x, x * 2.0)?;
        x += 1.0;
        if x == 3.0 {
            trigger.push(KeyCode::Char('q'));
        }
        Ok(())
    };

    let mut app = App::new(chart).with_keys(keys).with_data_source(source);
    app.run().unwrap();

    assert!(app.chart().should_quit());
    assert!(!app.chart().toggles().grid);
    assert!(series.len() >= 3);
    assert!(surface.flush_count() >= 1);
    assert!(surface.row_text(0).contains("a [1]"));
}

#[test]
fn test_failing_source_keeps_running() {
    let chart = Chart::new(fast_config(), Box::new(HeadlessSurface::new(40, 12))).unwrap();
    let keys = ScriptedKeys::new([KeyCode::Char('x'), KeyCode::Char('q')]);
    let remaining = keys.clone();

    let mut app = App::new(chart)
        .with_keys(keys)
        .with_data_source(|| Err(eyre::eyre!("upstream unavailable")));
    app.run().unwrap();

    assert!(app.chart().should_quit());
    assert_eq!(remaining.remaining(), 0);
}

#[test]
fn test_custom_bindings() {
    let chart = Chart::new(fast_config(), Box::new(HeadlessSurface::new(40, 12))).unwrap();
    let mut bindings = KeyBindings::empty();
    bindings.bind(KeyCode::Esc, Command::Quit);
    bindings.bind(KeyCode::Char('a'), Command::ToggleFitAll);

    // `q` is unbound here
    let keys = ScriptedKeys::new([KeyCode::Char('q'), KeyCode::Char('a'), KeyCode::Esc]);
    let mut app = App::new(chart).with_bindings(bindings).with_keys(keys);
    app.run().unwrap();

    let chart = app.into_chart();
    assert!(chart.should_quit());
    assert!(chart.toggles().fit_all);
}
