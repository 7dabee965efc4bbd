/// Maps `value` from the range `[a_min, a_max]` onto `[b_min, b_max]`.
///
/// A degenerate source range maps everything to 0.
pub fn map_value(value: f64, a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> f64 {
    let a_span = a_max - a_min;
    if a_span == 0.0 {
        return 0.0;
    }
    let scaled = (value - a_min) / a_span;
    b_min + scaled * (b_max - b_min)
}

/// Plot row for `value`, counted from the bottom. Truncates toward zero, so
/// values below `y_min` can land on row 0 or on negative rows.
pub fn scaled_row(value: f64, y_min: f64, y_max: f64, rows: usize) -> i64 {
    let top = rows.saturating_sub(1) as f64;
    map_value(value, y_min, y_max, 0.0, top).trunc() as i64
}

/// Inverse of [`scaled_row`]: the value a plot row stands for.
pub fn row_value(row: i64, y_min: f64, y_max: f64, rows: usize) -> f64 {
    let top = rows.saturating_sub(1) as f64;
    map_value(row as f64, 0.0, top, y_min, y_max)
}
