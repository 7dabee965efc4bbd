/// Blank column between an axis and the plot area.
pub const PLOT_PADDING: usize = 1;
/// The legend takes the top row.
pub const LEGEND_ROWS: usize = 1;
/// The status line takes the bottom row.
pub const STATUS_ROWS: usize = 1;

/// Screen regions around the plot area, in cells.
///
/// The offsets are measured from the screen edges: `left`/`right` hold the Y
/// axis labels, `top` the legend and `bottom` the X axis labels plus the
/// status line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Layout {
    pub cols: usize,
    pub rows: usize,
    pub left: usize,
    pub right: usize,
    pub top: usize,
    pub bottom: usize,
    pub plot_cols: usize,
    pub plot_rows: usize,
}

impl Layout {
    pub fn calculate(
        cols: usize,
        rows: usize,
        left_axis_width: usize,
        right_axis_width: usize,
        x_axis_height: usize,
    ) -> Self {
        let left = left_axis_width + PLOT_PADDING;
        let right = right_axis_width + PLOT_PADDING;
        let top = LEGEND_ROWS;
        let bottom = x_axis_height + STATUS_ROWS;

        Self {
            cols,
            rows,
            left,
            right,
            top,
            bottom,
            plot_cols: cols.saturating_sub(left + right),
            plot_rows: rows.saturating_sub(top + bottom),
        }
    }
}
