//! Sine and cosine on a numeric X axis, with peaks marked on the sine.
//!
//! Logs go to `sine.log`. Press `q` to quit.

use eyre::WrapErr;
use term_chart::logging::init_file_logging;
use term_chart::{
    App, AxisSide, Chart, ChartConfig, Color, CrosstermKeys, CrosstermSurface, PlotKind, SeriesOptions,
    XAxisKind,
};
use tracing::Level;

fn main() -> eyre::Result<()> {
    init_file_logging("sine.log", Level::DEBUG)?;

    let config = ChartConfig {
        index_spread: 1,
        bin_window: 1,
        x_zoom_unit: 1,
        x_axis: XAxisKind::Numeric,
        x_decimals: 0,
        update_interval_ms: 200,
        ..ChartConfig::default()
    };
    let surface = CrosstermSurface::new().wrap_err("failed to set up terminal")?;
    let mut chart = Chart::new(config, Box::new(surface))?;

    let sine = chart.add_series(SeriesOptions::new("sine", PlotKind::line()), AxisSide::Left)?;
    let cosine = chart.add_series(
        SeriesOptions::new("cosine", PlotKind::histogram()).with_color(Color::Blue),
        AxisSide::Right,
    )?;
    chart.add_series(
        SeriesOptions::new("peaks", PlotKind::peaks("sine")).with_color(Color::Yellow),
        AxisSide::Left,
    )?;
    chart.add_series(
        SeriesOptions::new("zero", PlotKind::horizontal_line(0.0)).hidden(true),
        AxisSide::Left,
    )?;

    let mut x = 0.0f64;
    let source = move || -> eyre::Result<()> {
        for _ in 0..5 {
            sine.add_point(x, (x / 8.0).sin())?;
            cosine.add_point(x, (x / 8.0).cos())?;
            x += 1.0;
        }
        Ok(())
    };

    App::new(chart)
        .with_keys(CrosstermKeys)
        .with_data_source(source)
        .run()
}
