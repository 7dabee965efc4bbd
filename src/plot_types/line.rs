use crate::backend::Backend;
use crate::data_types::{CellStyle, LinePlotConfig, ValueView};
use crate::scales::scaled_row;

use super::{Frame, PlotRenderer, SeriesStyle};

/// Line plot type
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinePlot {
    pub config: LinePlotConfig,
}

impl LinePlot {
    pub fn new(interpolate: bool) -> Self {
        Self {
            config: LinePlotConfig { interpolate },
        }
    }
}

/// Cells strictly between `y0` and `y1` in column `x`, limited to rows
/// `0..rows`.
fn y_interpolate(y0: i64, y1: i64, x: i64, rows: i64) -> Vec<(i64, i64)> {
    let (low, high) = if y1 > y0 + 1 {
        (y0 + 1, y1)
    } else if y1 < y0 - 1 {
        (y1 + 1, y0)
    } else {
        return Vec::new();
    };
    (low.max(0)..high.min(rows)).map(|y| (x, y)).collect()
}

/// Cells connecting `(x0, y0)` to `(x1, y1)`, excluding the start and
/// including the end. Skipped columns get a point on the straight line
/// between the ends (floored), and vertical gaps between neighbouring
/// columns are filled so the line has no holes. Gap fills are limited to
/// rows `0..rows`; the ends may lie outside.
pub fn interpolate(x0: i64, y0: i64, x1: i64, y1: i64, rows: i64) -> Vec<(i64, i64)> {
    let mut points = Vec::new();
    let mut last_y = y0;

    if x1 - x0 > 1 {
        let d = (y1 - y0) as f64 / (x1 - x0) as f64;
        for x in x0 + 1..x1 {
            let y = ((x - x0) as f64 * d + y0 as f64).floor() as i64;
            points.push((x, y));
            points.extend(y_interpolate(last_y, y, x, rows));
            last_y = y;
        }
    }

    points.extend(y_interpolate(last_y, y1, x1, rows));
    points.push((x1, y1));
    points
}

impl PlotRenderer for LinePlot {
    fn draw(&self, backend: &mut Backend, frame: &Frame, style: &SeriesStyle, y_min: f64, y_max: f64) {
        let rows = backend.plot_rows();
        let cell = CellStyle::fg(style.color);
        let mut last: Option<(i64, i64)> = None;

        for (x, group) in frame.groups.iter().enumerate() {
            let Some(avg) = group.avg(style.name, ValueView::Value) else {
                continue;
            };
            let x = x as i64;
            let y = scaled_row(avg, y_min, y_max, rows);

            if !self.config.interpolate {
                if backend.is_in_plot_area(y) {
                    backend.set_point_in_plot(x, y, style.glyph, cell, false);
                }
                continue;
            }

            match last {
                None => {
                    // the line starts at the first column that is on screen
                    if backend.is_in_plot_area(y) {
                        backend.set_point_in_plot(x, y, style.glyph, cell, false);
                        last = Some((x, y));
                    }
                }
                Some((x0, y0)) => {
                    for (px, py) in interpolate(x0, y0, x, y, rows as i64) {
                        if backend.is_in_plot_area(py) {
                            backend.set_point_in_plot(px, py, style.glyph, cell, false);
                        }
                    }
                    last = Some((x, y));
                }
            }
        }
    }

    fn icon(&self) -> char {
        '∿'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_columns_fill_vertical_gap() {
        assert_eq!(interpolate(0, 0, 1, 3, 10), vec![(1, 1), (1, 2), (1, 3)]);
        assert_eq!(interpolate(0, 3, 1, 0, 10), vec![(1, 1), (1, 2), (1, 0)]);
    }

    #[test]
    fn skipped_columns_follow_the_slope() {
        assert_eq!(interpolate(0, 0, 4, 4, 10), vec![(1, 1), (2, 2), (3, 3), (4, 4)]);
        assert_eq!(interpolate(0, 5, 2, 5, 10), vec![(1, 5), (2, 5)]);
    }

    #[test]
    fn gap_fill_stays_in_plot_rows() {
        let points = interpolate(0, -6_199_029, 1, 6_199_048, 20);
        assert_eq!(points.len(), 21);
        assert!(points[..20].iter().all(|&(x, y)| x == 1 && (0..20).contains(&y)));
        assert_eq!(points[20], (1, 6_199_048));

        let points = interpolate(0, 3, 1, -5_000_000, 20);
        assert_eq!(points, vec![(1, 0), (1, 1), (1, 2), (1, -5_000_000)]);
    }
}
