//! A random walk drawn as one-minute candles, with a line following the
//! latest close.
//!
//! Logs go to `candles.log`. Press `q` to quit, `z` to change the zoom unit.

use chrono::Utc;
use eyre::WrapErr;
use rand::Rng;
use term_chart::logging::init_file_logging;
use term_chart::runtime::DataSource;
use term_chart::{App, AxisSide, Chart, ChartConfig, CrosstermKeys, CrosstermSurface, PlotKind, Series, SeriesOptions};
use tracing::{info, Level};

/// Seconds covered by one candle.
const CANDLE: i64 = 60;

struct RandomWalk {
    candles: Series,
    volume: Series,
    time: i64,
    price: f64,
}

impl RandomWalk {
    fn new(candles: Series, volume: Series) -> Self {
        let now = Utc::now().timestamp();
        Self {
            candles,
            volume,
            // a day of history before now
            time: now - now.rem_euclid(CANDLE) - 24 * 3_600,
            price: 100.0,
        }
    }
}

impl DataSource for RandomWalk {
    fn update(&mut self) -> eyre::Result<()> {
        let mut rng = rand::rng();
        let now = Utc::now().timestamp();
        let mut added = 0;
        while self.time <= now {
            let open = self.price;
            let close = (open + rng.random_range(-1.0..1.0)).max(1.0);
            let high = open.max(close) + rng.random_range(0.0..0.5);
            let low = open.min(close) - rng.random_range(0.0..0.5);
            let t = self.time as f64;
            self.candles
                .add_ohlc(t, open, high, low, close)
                .wrap_err("failed to add candle")?;
            self.volume.add_point(t, rng.random_range(10.0..100.0))?;
            self.price = close;
            self.time += CANDLE;
            added += 1;
        }
        info!(added, price = self.price, "random walk updated");
        Ok(())
    }
}

fn main() -> eyre::Result<()> {
    init_file_logging("candles.log", Level::INFO)?;

    let config = ChartConfig {
        index_spread: CANDLE,
        bin_window: CANDLE,
        x_zoom_unit: CANDLE,
        update_interval_ms: 1_000,
        ..ChartConfig::default()
    };
    let surface = CrosstermSurface::new().wrap_err("failed to set up terminal")?;
    let mut chart = Chart::new(config, Box::new(surface))?;

    let candles = chart.add_series(
        SeriesOptions::new("price", PlotKind::candlestick()).with_symbol("$"),
        AxisSide::Left,
    )?;
    chart.add_series(SeriesOptions::new("last", PlotKind::current_value("price")), AxisSide::Left)?;
    let volume = chart.add_series(
        SeriesOptions::new("volume", PlotKind::histogram()).enabled(false),
        AxisSide::Right,
    )?;

    App::new(chart)
        .with_keys(CrosstermKeys)
        .with_data_source(RandomWalk::new(candles, volume))
        .run()
}
