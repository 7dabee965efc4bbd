//! Compositing on top of a [`Surface`].
//!
//! The backend remembers, per cell, the last character drawn and the
//! foreground color of the last filled block (`█`). A later write with a
//! different foreground on a filled cell takes that color as background, so
//! a line crossing a candle body or histogram bar stays visible without
//! erasing it.
//!
//! Coordinates passed to the backend count rows from the bottom of the
//! screen; `*_in_plot` variants are relative to the plot area.

use tracing::warn;

use crate::data_types::{CellStyle, Color};
use crate::layout::Layout;
use crate::surface::Surface;

pub const FILL_CHAR: char = '█';

pub struct Backend {
    surface: Box<dyn Surface>,
    layout: Layout,
    left_axis_width: usize,
    right_axis_width: usize,
    x_axis_height: usize,
    chars: Vec<Option<char>>,
    fills: Vec<Option<Color>>,
}

impl Backend {
    pub fn new(surface: Box<dyn Surface>, x_axis_height: usize) -> Self {
        let mut backend = Self {
            surface,
            layout: Layout::default(),
            left_axis_width: 0,
            right_axis_width: 0,
            x_axis_height,
            chars: Vec::new(),
            fills: Vec::new(),
        };
        let (cols, rows) = backend.surface_size();
        backend.init_display(cols, rows);
        backend
    }

    fn surface_size(&self) -> (usize, usize) {
        match self.surface.size() {
            Ok((cols, rows)) => (cols as usize, rows as usize),
            Err(e) => {
                warn!("failed to read terminal size: {e}");
                (self.layout.cols, self.layout.rows)
            }
        }
    }

    fn init_display(&mut self, cols: usize, rows: usize) {
        self.layout = Layout::calculate(
            cols,
            rows,
            self.left_axis_width,
            self.right_axis_width,
            self.x_axis_height,
        );
        let cells = cols * rows;
        if self.chars.len() != cells {
            self.chars = vec![None; cells];
            self.fills = vec![None; cells];
        }
    }

    /// Updates the Y axis label widths. Recomputes the layout only when a
    /// width actually changed.
    pub fn set_axis_widths(&mut self, left: usize, right: usize) {
        if (left, right) != (self.left_axis_width, self.right_axis_width) {
            self.left_axis_width = left;
            self.right_axis_width = right;
            self.init_display(self.layout.cols, self.layout.rows);
        }
    }

    pub fn set_x_axis_height(&mut self, height: usize) {
        if height != self.x_axis_height {
            self.x_axis_height = height;
            self.init_display(self.layout.cols, self.layout.rows);
        }
    }

    /// Re-reads the terminal size; returns true if it changed.
    pub fn check_resized(&mut self) -> bool {
        let (cols, rows) = self.surface_size();
        if (cols, rows) == (self.layout.cols, self.layout.rows) {
            return false;
        }
        self.init_display(cols, rows);
        true
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn cols(&self) -> usize {
        self.layout.cols
    }

    pub fn rows(&self) -> usize {
        self.layout.rows
    }

    pub fn plot_cols(&self) -> usize {
        self.layout.plot_cols
    }

    pub fn plot_rows(&self) -> usize {
        self.layout.plot_rows
    }

    fn cell(&self, x: i64, y: i64) -> Option<(usize, u16, u16)> {
        let (cols, rows) = (self.layout.cols as i64, self.layout.rows as i64);
        if x < 0 || y < 0 || x >= cols || y >= rows {
            return None;
        }
        let row = rows - y - 1;
        Some(((row * cols + x) as usize, x as u16, row as u16))
    }

    /// Draws one character. Unless `skip_bg` is set, a cell that holds a
    /// filled block of another color keeps that color as background.
    pub fn set_char(&mut self, x: i64, y: i64, ch: char, style: CellStyle, skip_bg: bool) {
        let Some((i, col, row)) = self.cell(x, y) else {
            warn!(x, y, %ch, "write outside of screen skipped");
            return;
        };

        let mut style = style;
        if !skip_bg {
            if let Some(fill) = self.fills[i] {
                if style.fg != fill {
                    style.bg = fill;
                }
            }
        }

        if let Err(e) = self.surface.put(col, row, ch, style) {
            warn!(x, y, %ch, "failed to set point: {e}");
            return;
        }

        if ch == FILL_CHAR {
            self.fills[i] = Some(style.fg);
        }
        self.chars[i] = Some(ch);
    }

    /// Last character drawn at `(x, y)` since the previous clear.
    pub fn char_at(&self, x: i64, y: i64) -> Option<char> {
        self.cell(x, y).and_then(|(i, _, _)| self.chars[i])
    }

    pub fn fill_at(&self, x: i64, y: i64) -> Option<Color> {
        self.cell(x, y).and_then(|(i, _, _)| self.fills[i])
    }

    pub fn set_point_in_plot(&mut self, x: i64, y: i64, ch: char, style: CellStyle, skip_bg: bool) {
        let (x, y) = self.plot_to_screen(x, y);
        self.set_char(x, y, ch, style, skip_bg);
    }

    /// Writes `text` left to right and returns the column after it.
    pub fn set_string(&mut self, x: i64, y: i64, text: &str, style: CellStyle, skip_bg: bool) -> i64 {
        let mut x = x;
        for ch in text.chars() {
            self.set_char(x, y, ch, style, skip_bg);
            x += 1;
        }
        x
    }

    /// Writes `text` right to left starting at `x`, so the first character
    /// lands rightmost. Returns the column before the last one written.
    pub fn set_string_rtl(&mut self, x: i64, y: i64, text: &str, style: CellStyle, skip_bg: bool) -> i64 {
        let mut x = x;
        for ch in text.chars() {
            self.set_char(x, y, ch, style, skip_bg);
            x -= 1;
        }
        x
    }

    pub fn set_string_in_plot(&mut self, x: i64, y: i64, text: &str, style: CellStyle, skip_bg: bool) -> i64 {
        let (sx, sy) = self.plot_to_screen(x, y);
        self.set_string(sx, sy, text, style, skip_bg) - self.layout.left as i64
    }

    /// Fills plot column `x` bottom up with `col`.
    pub fn set_col_in_plot(&mut self, x: i64, col: &[char], style: CellStyle) {
        for (y, &ch) in col.iter().enumerate() {
            self.set_point_in_plot(x, y as i64, ch, style, false);
        }
    }

    /// Draws `ch` across the plot at row `y`. Blank cells and filled blocks
    /// are drawn over; any other glyph is left alone.
    pub fn draw_horizontal_line(&mut self, y: i64, ch: char, prefix: Option<&str>, style: CellStyle) {
        for x in 0..self.plot_cols() as i64 {
            let (sx, sy) = self.plot_to_screen(x, y);
            match self.char_at(sx, sy) {
                None | Some(' ') | Some(FILL_CHAR) => self.set_char(sx, sy, ch, style, false),
                Some(_) => {}
            }
        }
        if let Some(prefix) = prefix {
            self.set_string_in_plot(0, y, prefix, style, false);
        }
    }

    /// Places `lines` next to plot point `(x, y)`, one below the other, with
    /// an arrow pointing at the point. The label goes left of the point when
    /// it would not fit on the right.
    pub fn set_arrow(&mut self, x: i64, y: i64, lines: &[String], style: CellStyle, skip_bg: bool) {
        const LEFT_ARROW: &str = "◀ ";
        const RIGHT_ARROW: &str = " ▶";

        let arrow_len = LEFT_ARROW.chars().count();
        let Some(longest) = lines.iter().map(|l| arrow_len + l.chars().count()).max() else {
            return;
        };
        let fits_right = x + (longest as i64) < self.plot_cols() as i64;

        for (i, line) in lines.iter().enumerate() {
            let (left, right) = if i == 0 {
                (LEFT_ARROW.to_string(), RIGHT_ARROW.to_string())
            } else {
                (" ".repeat(arrow_len), " ".repeat(arrow_len))
            };

            let (text, x_start) = if fits_right {
                (format!("{left}{line}"), x + 1)
            } else {
                (format!("{:>longest$}", format!("{line}{right}")), x - longest as i64)
            };

            let row = if y - (i as i64) < 0 { y + i as i64 } else { y - i as i64 };
            for (z, ch) in text.chars().enumerate() {
                let col = x_start + z as i64;
                if col >= 0 && col < self.plot_cols() as i64 {
                    self.set_point_in_plot(col, row, ch, style, skip_bg);
                }
            }
        }
    }

    pub fn set_status(&mut self, text: &str) {
        self.set_string(0, 0, text, CellStyle::fg(Color::Red), false);
    }

    /// True if plot row `row` is visible.
    pub fn is_in_plot_area(&self, row: i64) -> bool {
        row >= 0 && row < self.plot_rows() as i64
    }

    pub fn plot_to_screen(&self, x: i64, y: i64) -> (i64, i64) {
        (x + self.layout.left as i64, y + self.layout.bottom as i64)
    }

    /// Screen coordinates to plot coordinates.
    pub fn convert_point_to_plot(&self, x: i64, y: i64) -> (i64, i64) {
        (x - self.layout.left as i64, y - self.layout.bottom as i64)
    }

    /// Blanks the screen and forgets every drawn cell.
    pub fn clear(&mut self) {
        if let Err(e) = self.surface.clear() {
            warn!("failed to clear screen: {e}");
        }
        self.chars.iter_mut().for_each(|c| *c = None);
        self.fills.iter_mut().for_each(|c| *c = None);
    }

    pub fn flush(&mut self) {
        if let Err(e) = self.surface.flush() {
            warn!("failed to flush screen: {e}");
        }
    }
}
