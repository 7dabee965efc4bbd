use crate::backend::Backend;
use crate::data_types::{CellStyle, ValueView};
use crate::scales::scaled_row;

use super::{Frame, PlotRenderer, SeriesStyle};

/// Bars from the bottom of the plot up to the column average.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistogramPlot;

impl PlotRenderer for HistogramPlot {
    fn draw(&self, backend: &mut Backend, frame: &Frame, style: &SeriesStyle, y_min: f64, y_max: f64) {
        let rows = backend.plot_rows();
        let cell = CellStyle::fg(style.color);

        for (x, group) in frame.groups.iter().enumerate() {
            let Some(avg) = group.avg(style.name, ValueView::Value) else {
                continue;
            };
            let top = scaled_row(avg, y_min, y_max, rows);
            if !backend.is_in_plot_area(top) {
                continue;
            }
            for y in 0..=top {
                backend.set_point_in_plot(x as i64, y, style.glyph, cell, false);
            }
        }
    }

    fn icon(&self) -> char {
        'П'
    }
}
