use crate::backend::Backend;
use crate::data_types::{CandlestickConfig, CellStyle};
use crate::scales::scaled_row;

use super::{Frame, PlotRenderer, SeriesStyle};

/// Candlestick plot type
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CandlestickPlot {
    pub config: CandlestickConfig,
}

impl PlotRenderer for CandlestickPlot {
    fn draw(&self, backend: &mut Backend, frame: &Frame, style: &SeriesStyle, y_min: f64, y_max: f64) {
        let rows = backend.plot_rows();
        let top = rows as i64 - 1;

        for (x, group) in frame.groups.iter().enumerate() {
            let Some(candle) = group.ohlc(style.name) else {
                continue;
            };
            let x = x as i64;

            let y_open = scaled_row(candle.open, y_min, y_max, rows);
            let y_high = scaled_row(candle.high, y_min, y_max, rows);
            let y_low = scaled_row(candle.low, y_min, y_max, rows);
            let y_close = scaled_row(candle.close, y_min, y_max, rows);

            let is_up = candle.close >= candle.open;
            let cell = CellStyle::fg(if is_up {
                self.config.up_color
            } else {
                self.config.down_color
            });

            for y in y_low.max(0)..=y_high.min(top) {
                backend.set_point_in_plot(x, y, self.config.wick, cell, false);
            }

            if y_open == y_close {
                if backend.is_in_plot_area(y_close) {
                    backend.set_point_in_plot(x, y_close, self.config.body_small, cell, false);
                }
                continue;
            }

            for y in y_open.min(y_close).max(0)..=y_open.max(y_close).min(top) {
                backend.set_point_in_plot(x, y, self.config.body, cell, false);
            }
        }
    }

    fn icon(&self) -> char {
        '┿'
    }

    fn point_shape(&self) -> &'static str {
        "ohlc"
    }
}
