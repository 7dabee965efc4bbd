use std::sync::Arc;

use rayon::prelude::*;

use crate::data_types::{AxisRange, ValueView, XAxisKind};
use crate::error::Result;
use crate::index::{Group, Index};

/// Zoom units offered on datetime axes, in seconds.
pub const DATETIME_ZOOM_UNITS: [(i64, &str); 4] = [
    (1, "Seconds"),
    (60, "Minutes"),
    (3_600, "Hours"),
    (86_400, "Days"),
];

/// ViewController handles the business logic of interactions (zoom, pan,
/// autorange) independently of the terminal to facilitate testing.
pub struct ViewController;

impl ViewController {
    /// Moves the range by a tenth of its span, up for positive `direction`.
    pub fn pan_axis(range: &mut AxisRange, direction: f64) {
        if let Some(span) = range.span() {
            range.pan(direction.signum() * span / 10.0);
        }
    }

    /// Shrinks (zoom in) or widens (zoom out) the range by a tenth of its span
    /// on both ends.
    pub fn zoom_axis(range: &mut AxisRange, zoom_in: bool) {
        if let Some(span) = range.span() {
            let delta = span / 10.0;
            range.shrink(if zoom_in { delta } else { -delta });
        }
    }

    /// Value range for `columns` over `groups`: lowest average of the min
    /// view and highest average of the max view across all groups.
    pub fn compute_auto_fit(groups: &[Group], columns: &[String]) -> AxisRange {
        if columns.is_empty() {
            return AxisRange::default();
        }
        let min = groups
            .par_iter()
            .filter_map(|g| g.min_of_averages(columns, ValueView::Min))
            .reduce_with(f64::min);
        let max = groups
            .par_iter()
            .filter_map(|g| g.max_of_averages(columns, ValueView::Max))
            .reduce_with(f64::max);
        AxisRange { min, max }
    }

    /// New bin window after one X zoom step, or `None` when zooming in
    /// further would leave an empty window.
    pub fn zoom_bin_window(bin_window: i64, unit: i64, zoom_in: bool) -> Option<i64> {
        if zoom_in {
            let next = bin_window - unit;
            (next > 0).then_some(next)
        } else {
            Some(bin_window + unit)
        }
    }

    /// Next datetime zoom unit after `current` that is a multiple of
    /// `spread`, wrapping around to the smallest one.
    pub fn next_zoom_unit(current: i64, spread: i64) -> i64 {
        let usable: Vec<i64> = DATETIME_ZOOM_UNITS
            .iter()
            .map(|(u, _)| *u)
            .filter(|u| u % spread == 0)
            .collect();
        usable
            .iter()
            .copied()
            .find(|u| *u > current)
            .or_else(|| usable.first().copied())
            .unwrap_or(current)
    }

    pub fn zoom_unit_label(unit: i64, axis: XAxisKind) -> String {
        if axis == XAxisKind::Datetime {
            if let Some((_, name)) = DATETIME_ZOOM_UNITS.iter().find(|(u, _)| *u == unit) {
                return (*name).to_string();
            }
        }
        unit.to_string()
    }
}

/// Which slice of the index is on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    bin_window: i64,
    /// Key units between the newest data and the right edge.
    offset: i64,
    keep_position: bool,
    show_all: bool,
}

impl Viewport {
    pub fn new(bin_window: i64) -> Self {
        Self {
            bin_window,
            offset: 0,
            keep_position: false,
            show_all: false,
        }
    }

    pub fn bin_window(&self) -> i64 {
        self.bin_window
    }

    pub fn set_bin_window(&mut self, bin_window: i64) {
        self.bin_window = bin_window;
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn increase_offset(&mut self, steps: usize) {
        self.offset += steps as i64 * self.bin_window;
    }

    pub fn decrease_offset(&mut self, steps: usize) {
        self.offset = (self.offset - steps as i64 * self.bin_window).max(0);
    }

    /// Stop following new data.
    pub fn keep_position(&mut self) {
        self.keep_position = true;
    }

    pub fn is_keeping_position(&self) -> bool {
        self.keep_position
    }

    /// Follow new data again.
    pub fn forget_position(&mut self) {
        self.keep_position = false;
        self.offset = 0;
    }

    pub fn set_show_all(&mut self, show_all: bool) {
        self.show_all = show_all;
    }

    pub fn show_all(&self) -> bool {
        self.show_all
    }

    /// `amount` groups for the current view. A kept position wins over
    /// showing everything.
    pub fn get_bins(&self, index: &mut Index, amount: usize, offset: Option<i64>) -> Result<Arc<[Group]>> {
        let offset = offset.unwrap_or(self.offset);
        if self.keep_position {
            index.get_grouped_from_last_data(self.bin_window, amount, offset)
        } else if self.show_all {
            index.get_all_grouped(amount)
        } else {
            index.get_grouped_from_last_data(self.bin_window, amount, 0)
        }
    }

    pub fn y_min(groups: &[Group], columns: &[String]) -> Option<f64> {
        ViewController::compute_auto_fit(groups, columns).min
    }

    pub fn y_max(groups: &[Group], columns: &[String]) -> Option<f64> {
        ViewController::compute_auto_fit(groups, columns).max
    }
}
