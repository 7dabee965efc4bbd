use crate::backend::Backend;
use crate::data_types::{CellStyle, PeaksConfig, ValueView, XAxisKind};
use crate::index::Group;
use crate::scales::scaled_row;
use crate::smoothing::savgol_filter;
use crate::utils::date_formatter::{format_datetime, format_rounded};

use super::{Frame, PlotRenderer, SeriesStyle};

/// A detected peak or valley.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extremum {
    /// Plot column of the group holding the extreme value.
    pub column: usize,
    /// Start key of that group.
    pub key: Option<i64>,
    /// Raw maximum (peaks) or minimum (valleys) of the group.
    pub value: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Turn {
    Peak,
    Valley,
}

struct Column<'a> {
    index: usize,
    group: &'a Group,
    max: f64,
    min: f64,
}

/// Finds peaks and valleys of `target` over `groups`.
///
/// The per-column maxima are smoothed first; direction changes of the
/// smoothed curve mark the turns. Each peak then reports the largest raw
/// maximum between its neighbouring valleys, each valley the smallest raw
/// minimum between its neighbouring peaks. Columns without data are ignored.
pub fn find_extrema(groups: &[Group], target: &str, smoothing: usize) -> (Vec<Extremum>, Vec<Extremum>) {
    let columns: Vec<Column> = groups
        .iter()
        .enumerate()
        .filter_map(|(index, group)| {
            let max = group.max(&[target], ValueView::Max)?;
            let min = group.min(&[target], ValueView::Min)?;
            Some(Column { index, group, max, min })
        })
        .collect();

    let n = columns.len();
    if n < 3 {
        return (Vec::new(), Vec::new());
    }
    let window = if n % 2 == 0 { n - 1 } else { n };
    if window <= smoothing {
        return (Vec::new(), Vec::new());
    }

    let maxes: Vec<f64> = columns.iter().map(|c| c.max).collect();
    let Some(smooth) = savgol_filter(&maxes, window, smoothing) else {
        return (Vec::new(), Vec::new());
    };

    let scale = smooth.iter().fold(1.0f64, |acc, v| acc.max(v.abs()));
    let tolerance = scale * 1e-9;

    let mut turns: Vec<(usize, Turn)> = Vec::new();
    let mut direction = 0i8;
    for i in 1..n {
        let d = smooth[i] - smooth[i - 1];
        let next = if d > tolerance {
            1
        } else if d < -tolerance {
            -1
        } else {
            direction
        };
        match (direction, next) {
            (1, -1) => turns.push((i - 1, Turn::Peak)),
            (-1, 1) => turns.push((i - 1, Turn::Valley)),
            _ => {}
        }
        direction = next;
    }

    // segment of a turn: from the previous opposite turn to the next one
    let segment = |at: usize, kind: Turn| {
        let lo = turns[..at]
            .iter()
            .rev()
            .find(|(_, k)| *k != kind)
            .map_or(0, |(i, _)| *i);
        let hi = turns[at + 1..]
            .iter()
            .find(|(_, k)| *k != kind)
            .map_or(n - 1, |(i, _)| *i);
        lo..=hi
    };

    let mut peaks = Vec::new();
    let mut valleys = Vec::new();
    for (at, &(_, kind)) in turns.iter().enumerate() {
        let range = segment(at, kind);
        let best = match kind {
            Turn::Peak => columns[range]
                .iter()
                .reduce(|a, b| if b.max > a.max { b } else { a })
                .map(|c| (c, c.max)),
            Turn::Valley => columns[range]
                .iter()
                .reduce(|a, b| if b.min < a.min { b } else { a })
                .map(|c| (c, c.min)),
        };
        if let Some((column, value)) = best {
            let extremum = Extremum {
                column: column.index,
                key: column.group.start,
                value,
            };
            match kind {
                Turn::Peak => peaks.push(extremum),
                Turn::Valley => valleys.push(extremum),
            }
        }
    }

    (peaks, valleys)
}

/// Marks the peaks and valleys of another series.
#[derive(Clone, Debug, PartialEq)]
pub struct PeaksPlot {
    pub target: String,
    pub config: PeaksConfig,
}

impl PeaksPlot {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            config: PeaksConfig::default(),
        }
    }

    pub fn with_smoothing(mut self, smoothing: usize) -> Self {
        self.config.smoothing = smoothing;
        self
    }
}

impl PlotRenderer for PeaksPlot {
    fn draw(&self, backend: &mut Backend, frame: &Frame, style: &SeriesStyle, y_min: f64, y_max: f64) {
        let (peaks, valleys) = find_extrema(frame.groups, &self.target, self.config.smoothing);
        let cell = CellStyle::fg(style.color);
        let rows = backend.plot_rows();

        for extremum in peaks.iter().chain(valleys.iter()) {
            let row = scaled_row(extremum.value, y_min, y_max, rows);
            if !backend.is_in_plot_area(row) {
                continue;
            }
            let key = extremum.key.map(|k| match frame.x_axis {
                XAxisKind::Datetime => format_datetime(k as f64),
                XAxisKind::Numeric => k.to_string(),
            });
            let lines = vec![key.unwrap_or_default(), format_rounded(extremum.value, 2)];
            backend.set_arrow(extremum.column as i64, row, &lines, cell, true);
        }
    }

    fn icon(&self) -> char {
        '▲'
    }

    fn always_populated(&self) -> bool {
        true
    }
}
