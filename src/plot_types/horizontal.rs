use tracing::debug;

use crate::backend::Backend;
use crate::data_types::{CellStyle, ValueView};
use crate::scales::scaled_row;

use super::{Frame, PlotRenderer, SeriesStyle};

const LINE_CHAR: char = '─';

/// A line at a fixed value.
#[derive(Clone, Debug, PartialEq)]
pub struct HorizontalLinePlot {
    pub y: f64,
}

impl HorizontalLinePlot {
    pub fn new(y: f64) -> Self {
        Self { y }
    }

    pub fn set_y(&mut self, y: f64) {
        self.y = y;
    }

    pub fn move_up(&mut self, step: f64) {
        self.y += step;
    }

    pub fn move_down(&mut self, step: f64) {
        self.y -= step;
    }
}

impl PlotRenderer for HorizontalLinePlot {
    fn draw(&self, backend: &mut Backend, _frame: &Frame, style: &SeriesStyle, y_min: f64, y_max: f64) {
        let row = scaled_row(self.y, y_min, y_max, backend.plot_rows());
        if !backend.is_in_plot_area(row) {
            return;
        }
        let prefix = format!("{}├", self.y);
        backend.draw_horizontal_line(row, LINE_CHAR, Some(&prefix), CellStyle::fg(style.color));
    }

    fn icon(&self) -> char {
        LINE_CHAR
    }

    fn always_populated(&self) -> bool {
        true
    }
}

/// A line that follows the latest value of another series.
#[derive(Clone, Debug, PartialEq)]
pub struct CurrentValuePlot {
    pub target: String,
}

impl CurrentValuePlot {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

impl PlotRenderer for CurrentValuePlot {
    fn draw(&self, backend: &mut Backend, frame: &Frame, style: &SeriesStyle, y_min: f64, y_max: f64) {
        let Some(group) = frame.last_group else {
            return;
        };
        let (Some(last), Some(avg)) = (
            group.last(&self.target),
            group.avg(&self.target, ValueView::Value),
        ) else {
            debug!(series = %self.target, "not enough data for current value line");
            return;
        };

        let row = scaled_row(avg, y_min, y_max, backend.plot_rows());
        if !backend.is_in_plot_area(row) {
            return;
        }
        let prefix = format!("{}├", last.value());
        backend.draw_horizontal_line(row, LINE_CHAR, Some(&prefix), CellStyle::fg(style.color));
    }

    fn icon(&self) -> char {
        LINE_CHAR
    }

    fn always_populated(&self) -> bool {
        true
    }
}
