//! Chart chrome drawn around and over the series.

use crate::backend::Backend;
use crate::data_types::{CellStyle, Color, XAxisKind};
use crate::index::Group;
use crate::series::Series;
use crate::utils::date_formatter::{format_key, format_rounded};

/// Dotted vertical lines on tick columns.
#[derive(Clone, Debug)]
pub struct Grid {
    pub ch: char,
    pub color: Color,
    pub every: i64,
}

impl Grid {
    pub fn new(every: i64) -> Self {
        Self {
            ch: '.',
            color: Color::Blue,
            every,
        }
    }

    fn is_tick(&self, count: i64) -> bool {
        count.rem_euclid(self.every) == 0
    }

    /// Lines follow the group ordinals; where there is no more data they are
    /// continued at the same distance up to the right edge.
    pub fn draw(&self, backend: &mut Backend, groups: &[Group]) {
        let rows = backend.plot_rows();
        let cols = backend.plot_cols() as i64;
        let column = vec![self.ch; rows];
        let style = CellStyle::fg(self.color);

        let mut last_tick = None;
        for (col, group) in groups.iter().enumerate() {
            if self.is_tick(group.count) {
                backend.set_col_in_plot(col as i64, &column, style);
                last_tick = Some(col as i64);
            }
        }

        let Some(last_tick) = last_tick else {
            return;
        };
        let mut col = groups.len() as i64;
        while col < cols - 1 {
            if self.is_tick(col - last_tick) {
                backend.set_col_in_plot(col, &column, style);
            }
            col += 1;
        }
    }
}

/// Series names along the top row: left axis series from the left edge,
/// right axis series from the right edge.
#[derive(Clone, Debug, Default)]
pub struct Legend;

impl Legend {
    pub fn draw(&self, backend: &mut Backend, left: &[Series], right: &[Series]) {
        let y = backend.rows() as i64 - 1;
        let plain = CellStyle::default();

        let visible: Vec<&Series> = left.iter().filter(|s| !s.is_hidden()).collect();
        let mut x = 0;
        for (i, s) in visible.iter().enumerate() {
            x = backend.set_string(x, y, &s.icon().to_string(), CellStyle::fg(s.color()), false);
            x = backend.set_string(x, y, &format!(" = {} [{}]", s.name(), s.line_number()), plain, false);
            if i + 1 != visible.len() {
                x = backend.set_string(x, y, ", ", plain, false);
            }
        }

        let visible: Vec<&Series> = right.iter().rev().filter(|s| !s.is_hidden()).collect();
        let mut x = backend.cols() as i64 - 1;
        for (i, s) in visible.iter().enumerate() {
            let text: String = format!(" = {} [{}]", s.name(), s.line_number()).chars().rev().collect();
            x = backend.set_string_rtl(x, y, &text, plain, false);
            x = backend.set_string_rtl(x, y, &s.icon().to_string(), CellStyle::fg(s.color()), false);
            if i + 1 != visible.len() {
                x = backend.set_string_rtl(x, y, " ,", plain, false);
            }
        }
    }
}

/// Latest point of every series, stacked down from below the legend.
#[derive(Clone, Debug)]
pub struct LastValues {
    pub x_axis: XAxisKind,
    pub decimals: u32,
}

impl LastValues {
    pub fn new(x_axis: XAxisKind, decimals: u32) -> Self {
        Self { x_axis, decimals }
    }

    pub fn draw(&self, backend: &mut Backend, series: &[Series]) {
        let x = backend.layout().left as i64;
        let mut y = backend.rows() as i64 - 2 - backend.layout().top as i64;

        for s in series.iter().filter(|s| !s.is_hidden()) {
            let Some(point) = s.get_last_value() else {
                continue;
            };
            let style = CellStyle {
                reverse: true,
                ..CellStyle::fg(s.color())
            };
            let symbol = s.symbol().unwrap_or("");

            let key = format_key(point.x, self.x_axis, self.decimals);
            backend.set_string(x, y, &format!("x {key}"), style, true);
            y -= 1;
            for (field, value) in point.fields() {
                backend.set_string(x, y, &format!("{field} {}{symbol}", format_rounded(value, 2)), style, true);
                y -= 1;
            }
        }
    }
}

/// `key: value` pairs on the bottom row.
#[derive(Clone, Debug, Default)]
pub struct StatusLine {
    entries: Vec<(Option<String>, String)>,
}

impl StatusLine {
    pub fn set(&mut self, key: &str, value: impl ToString) {
        let value = value.to_string();
        match self.entries.iter_mut().find(|(k, _)| k.as_deref() == Some(key)) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((Some(key.to_string()), value)),
        }
    }

    /// A value shown without a key, e.g. `paused`.
    pub fn set_flag(&mut self, value: impl ToString) {
        self.entries.push((None, value.to_string()));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn text(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| match k {
                Some(k) => format!("{k}: {v}"),
                None => v.clone(),
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }

    pub fn draw(&self, backend: &mut Backend) {
        let max = backend.cols().saturating_sub(1);
        let text: String = self.text().chars().take(max).collect();
        backend.set_status(&text);
    }
}
