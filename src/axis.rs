use std::collections::HashMap;

use crate::backend::Backend;
use crate::data_types::{AxisRange, AxisSide, CellStyle, Color, ValueView, XAxisKind};
use crate::index::Group;
use crate::scales::scaled_row;
use crate::series::Series;
use crate::utils::date_formatter::{format_date, format_rounded, format_time};
use crate::view_controller::ViewController;

/// Rows taken by the X axis labels.
pub const X_AXIS_HEIGHT: usize = 2;

/// One of the two value axes. Holds the visible value range and draws the
/// labels next to the plot.
#[derive(Clone, Debug)]
pub struct YAxis {
    pub side: AxisSide,
    pub decimals: u32,
    pub label_color: Color,
    pub range: AxisRange,
}

impl YAxis {
    pub fn new(side: AxisSide, decimals: u32) -> Self {
        Self {
            side,
            decimals,
            label_color: Color::White,
            range: AxisRange::default(),
        }
    }

    /// Fits the range to the enabled series in `columns`.
    pub fn set_data_dimensions(&mut self, groups: &[Group], columns: &[String]) {
        self.range = ViewController::compute_auto_fit(groups, columns);
    }

    pub fn zoom(&mut self) {
        ViewController::zoom_axis(&mut self.range, true);
    }

    pub fn unzoom(&mut self) {
        ViewController::zoom_axis(&mut self.range, false);
    }

    pub fn pan_up(&mut self) {
        ViewController::pan_axis(&mut self.range, 1.0);
    }

    pub fn pan_down(&mut self) {
        ViewController::pan_axis(&mut self.range, -1.0);
    }

    /// One label per plot row, bottom first, all padded to the same width.
    /// Fractions are padded with trailing zeros, whole numbers with leading
    /// spaces.
    pub fn labels(&self, rows: usize) -> Vec<String> {
        let Some((y_min, y_max)) = self.range.bounds() else {
            return Vec::new();
        };
        let span = y_max - y_min;
        let labels: Vec<String> = (0..rows)
            .map(|i| {
                let fraction = if rows > 1 {
                    i as f64 / (rows - 1) as f64
                } else {
                    0.0
                };
                format_rounded(fraction * span + y_min, self.decimals)
            })
            .collect();

        let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        labels
            .into_iter()
            .map(|l| {
                let pad = width - l.chars().count();
                if l.contains('.') {
                    format!("{l}{}", "0".repeat(pad))
                } else {
                    format!("{}{l}", " ".repeat(pad))
                }
            })
            .collect()
    }

    pub fn col_width(&self, rows: usize) -> usize {
        self.labels(rows)
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Draws the labels. The row holding a series' latest value is shown
    /// reversed in that series' color.
    pub fn draw(&self, backend: &mut Backend, last_group: Option<&Group>, series: &[Series]) {
        if series.is_empty() {
            return;
        }
        let Some((y_min, y_max)) = self.range.bounds() else {
            return;
        };

        let rows = backend.plot_rows();
        let mut highlights: HashMap<i64, Color> = HashMap::new();
        if let Some(group) = last_group {
            for s in series {
                if let Some(last) = group.last(s.name()) {
                    let value = ValueView::Value.read(last);
                    highlights.insert(scaled_row(value, y_min, y_max, rows), s.color());
                }
            }
        }

        let offset = backend.layout().bottom as i64;
        let cols = backend.cols() as i64;
        for (y, label) in self.labels(rows).iter().enumerate() {
            let y = y as i64;
            let style = match highlights.get(&y) {
                Some(color) => CellStyle {
                    reverse: true,
                    ..CellStyle::fg(*color)
                },
                None => CellStyle::fg(self.label_color),
            };
            match self.side {
                AxisSide::Left => {
                    backend.set_string(0, y + offset, label, style, false);
                }
                AxisSide::Right => {
                    let start = cols - label.chars().count() as i64;
                    backend.set_string(start, y + offset, label, style, false);
                }
            }
        }
    }
}

/// Key axis below the plot. Labels sit on every group whose ordinal is a
/// multiple of the tick distance.
#[derive(Clone, Debug)]
pub struct XAxis {
    pub kind: XAxisKind,
    pub decimals: u32,
    pub label_color: Color,
}

impl XAxis {
    pub fn new(kind: XAxisKind, decimals: u32) -> Self {
        Self {
            kind,
            decimals,
            label_color: Color::White,
        }
    }

    /// Columns between two labels.
    pub fn chars_per_tick(&self) -> i64 {
        match self.kind {
            XAxisKind::Numeric => 10,
            XAxisKind::Datetime => 16,
        }
    }

    pub fn height(&self) -> usize {
        X_AXIS_HEIGHT
    }

    pub fn is_tick(&self, count: i64) -> bool {
        count.rem_euclid(self.chars_per_tick()) == 0
    }

    fn draw_label(&self, backend: &mut Backend, col: i64, row: i64, text: &str) {
        let left = backend.layout().left as i64;
        let last_col = backend.cols() as i64 - 1;
        let style = CellStyle::fg(self.label_color);
        for (i, ch) in text.chars().enumerate() {
            let pos = col + i as i64 + left;
            if pos > last_col {
                break;
            }
            backend.set_char(pos, row, ch, style, false);
        }
    }

    pub fn draw(&self, backend: &mut Backend, groups: &[Group]) {
        for (col, group) in groups.iter().enumerate() {
            if !self.is_tick(group.count) {
                continue;
            }
            let Some(start) = group.start else {
                continue;
            };
            let col = col as i64;
            match self.kind {
                XAxisKind::Numeric => {
                    let label = format_rounded(start as f64, self.decimals);
                    self.draw_label(backend, col, 1, &label);
                }
                XAxisKind::Datetime => {
                    self.draw_label(backend, col, 1, &format_date(start as f64));
                    self.draw_label(backend, col, 2, &format_time(start as f64));
                }
            }
        }
    }
}
