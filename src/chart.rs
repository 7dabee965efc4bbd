//! Chart Model
//!
//! The `Chart` is the single owner of the chart state: the index behind the
//! advisory lock, the series registry, the axes, the viewport and the chrome
//! actors. Data sources append through [`Series`] handles from any thread;
//! everything else goes through the chart on the render thread, either
//! directly or as [`Command`]s posted to its queue.

use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use tracing::{debug, info};

use crate::actors::{Grid, LastValues, Legend, StatusLine};
use crate::axis::{XAxis, YAxis};
use crate::backend::Backend;
use crate::data_types::{AxisSide, ChartConfig, ColorCycle, XAxisKind};
use crate::error::{ChartError, Result};
use crate::index::{Group, Index};
use crate::input::Command;
use crate::plot_types::{Frame, SeriesStyle};
use crate::series::{Series, SeriesOptions, SeriesRegistry};
use crate::surface::Surface;
use crate::sync::ChartLock;
use crate::view_controller::{ViewController, Viewport};

/// On/off switches driven by commands. Initial values come from the config.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Toggles {
    pub legend: bool,
    pub grid: bool,
    pub last_values: bool,
    pub status_line: bool,
    pub paused: bool,
    pub fit_all: bool,
    pub autorange_left_y: bool,
    pub autorange_right_y: bool,
}

impl Toggles {
    pub fn from_config(config: &ChartConfig) -> Self {
        Self {
            legend: config.show_legend,
            grid: config.show_grid,
            last_values: config.show_last_values,
            status_line: config.show_statusline,
            paused: config.paused,
            fit_all: config.fit_all,
            autorange_left_y: config.autorange_left_y,
            autorange_right_y: config.autorange_right_y,
        }
    }

    fn disable_autorange(&mut self) {
        self.autorange_left_y = false;
        self.autorange_right_y = false;
    }
}

/// Smallest positive multiple of `step` that is at least `value`.
fn round_up_to_multiple(value: i64, step: i64) -> i64 {
    let rounded = (value + step - 1).div_euclid(step) * step;
    rounded.max(step)
}

pub struct Chart {
    config: ChartConfig,
    index: Arc<ChartLock<Index>>,
    backend: Backend,
    registry: SeriesRegistry,
    colors: ColorCycle,

    left_axis: YAxis,
    right_axis: YAxis,
    x_axis: XAxis,

    viewport: Viewport,
    zoom_unit: i64,
    toggles: Toggles,

    grid: Grid,
    legend: Legend,
    last_values: LastValues,
    status: StatusLine,

    command_tx: Sender<Command>,
    command_rx: Receiver<Command>,
    quit: bool,
}

impl Chart {
    pub fn new(config: ChartConfig, surface: Box<dyn Surface>) -> Result<Self> {
        config.validate()?;
        let index = Index::new(config.grow_factor, config.index_spread)?;

        let x_axis = XAxis::new(config.x_axis, config.x_decimals);
        let backend = Backend::new(surface, x_axis.height());
        let (command_tx, command_rx) = mpsc::channel();

        info!(
            spread = config.index_spread,
            bin_window = config.bin_window,
            cols = backend.cols(),
            rows = backend.rows(),
            "chart created"
        );

        Ok(Self {
            index: Arc::new(ChartLock::new(index)),
            backend,
            registry: SeriesRegistry::new(),
            colors: ColorCycle::new(),
            left_axis: YAxis::new(AxisSide::Left, config.left_decimals),
            right_axis: YAxis::new(AxisSide::Right, config.right_decimals),
            grid: Grid::new(x_axis.chars_per_tick()),
            legend: Legend,
            last_values: LastValues::new(config.x_axis, config.x_decimals),
            status: StatusLine::default(),
            x_axis,
            viewport: Viewport::new(config.bin_window),
            zoom_unit: config.x_zoom_unit,
            toggles: Toggles::from_config(&config),
            command_tx,
            command_rx,
            quit: false,
            config,
        })
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn toggles(&self) -> &Toggles {
        &self.toggles
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn zoom_unit(&self) -> i64 {
        self.zoom_unit
    }

    pub fn left_axis(&self) -> &YAxis {
        &self.left_axis
    }

    pub fn right_axis(&self) -> &YAxis {
        &self.right_axis
    }

    pub fn x_axis(&self) -> &XAxis {
        &self.x_axis
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Shared handle to the index, e.g. to inspect it from tests.
    pub fn index(&self) -> Arc<ChartLock<Index>> {
        Arc::clone(&self.index)
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Sender for the command queue, drained at the start of every frame.
    pub fn command_sender(&self) -> Sender<Command> {
        self.command_tx.clone()
    }

    /// Creates a series drawn against the `side` axis. Without a color in
    /// `options` the next color of the cycle is used.
    pub fn add_series(&mut self, options: SeriesOptions, side: AxisSide) -> Result<Series> {
        let color = match options.color {
            Some(color) => color,
            None => self.colors.next_color(),
        };
        let series = self
            .registry
            .register(options, color, side, Arc::clone(&self.index))?;
        debug!(series = series.name(), line_number = series.line_number(), ?side, "series added");
        Ok(series)
    }

    /// Stops drawing a series. Its points stay in the index until the next
    /// reset or replay.
    pub fn remove_series(&mut self, name: &str) -> Result<Series> {
        let series = self.registry.remove(name)?;
        debug!(series = name, "series removed");
        Ok(series)
    }

    pub fn series(&self, name: &str) -> Option<&Series> {
        self.registry.get(name)
    }

    pub fn all_series(&self) -> impl Iterator<Item = &Series> {
        self.registry.iter()
    }

    /// Forgets every point of every series.
    pub fn reset_data(&mut self) {
        let mut index = self.index.acquire("reset_data");
        index.reset();
        for series in self.registry.iter() {
            series.reset();
        }
        info!("data reset");
    }

    /// Rebuilds the index with a new bucket width from the points kept by
    /// each series. Bin window and zoom unit are rounded up to multiples of
    /// the new spread.
    pub fn replay_index(&mut self, spread: i64) -> Result<()> {
        let mut index = self.index.acquire("replay_index");
        let mut replayed = Index::new(index.grow_factor(), spread)?;
        let mut total = 0;
        for series in self.registry.iter() {
            for point in series.points() {
                replayed.insert(series.name(), point.x, point)?;
                total += 1;
            }
        }
        *index = replayed;
        drop(index);

        self.config.index_spread = spread;
        self.config.bin_window = round_up_to_multiple(self.config.bin_window, spread);
        self.config.x_zoom_unit = round_up_to_multiple(self.config.x_zoom_unit, spread);
        self.viewport
            .set_bin_window(round_up_to_multiple(self.viewport.bin_window(), spread));
        self.zoom_unit = round_up_to_multiple(self.zoom_unit, spread);

        info!(spread, points = total, "index replayed");
        Ok(())
    }

    /// True if any series got points since the last check. Every series is
    /// asked so all updated flags are cleared.
    pub fn has_new_data(&self) -> bool {
        self.registry
            .iter()
            .fold(false, |updated, series| series.is_updated() | updated)
    }

    fn enabled_columns(&self, side: AxisSide) -> Vec<String> {
        self.registry
            .on_side(side)
            .iter()
            .filter(|s| s.is_enabled())
            .map(|s| s.name().to_string())
            .collect()
    }

    fn autorange(&mut self, groups: &[Group]) {
        if self.toggles.fit_all || self.toggles.autorange_left_y {
            let columns = self.enabled_columns(AxisSide::Left);
            self.left_axis.set_data_dimensions(groups, &columns);
        }
        if self.toggles.fit_all || self.toggles.autorange_right_y {
            let columns = self.enabled_columns(AxisSide::Right);
            self.right_axis.set_data_dimensions(groups, &columns);
        }
    }

    fn update_axis_widths(&mut self) {
        let rows = self.backend.plot_rows();
        let left = self.left_axis.col_width(rows);
        let right = self.right_axis.col_width(rows);
        self.backend.set_axis_widths(left, right);
    }

    fn update_status(&mut self) {
        let layout = *self.backend.layout();
        self.status.clear();
        self.status.set("l_offset", layout.left);
        self.status.set("r_offset", layout.right);
        self.status.set("bin_window", self.viewport.bin_window());
        self.status.set(
            "x_zoom_unit",
            ViewController::zoom_unit_label(self.zoom_unit, self.x_axis.kind),
        );
        self.status.set("fit_all", self.toggles.fit_all);
        self.status.set("autorange_left_y", self.toggles.autorange_left_y);
        self.status.set("autorange_right_y", self.toggles.autorange_right_y);
        if self.toggles.paused {
            self.status.set_flag("paused");
        }
    }

    /// Draws one full frame.
    pub fn draw(&mut self) -> Result<()> {
        let index = Arc::clone(&self.index);
        let mut index = index.acquire("draw");
        self.draw_locked(&mut index)
    }

    fn draw_locked(&mut self, index: &mut Index) -> Result<()> {
        self.backend.clear();
        self.viewport.set_show_all(self.toggles.fit_all);

        let amount = self.backend.plot_cols();
        let mut groups = self.viewport.get_bins(index, amount, None)?;
        self.autorange(&groups);
        self.update_axis_widths();

        // axis label widths decide how many columns are left for the plot
        if self.backend.plot_cols() != amount {
            groups = self.viewport.get_bins(index, self.backend.plot_cols(), None)?;
            self.autorange(&groups);
        }

        let last = index.get_grouped_from_last_data(self.viewport.bin_window(), 1, 0)?;
        let frame = Frame {
            groups: &groups,
            last_group: last.last(),
            x_axis: self.x_axis.kind,
        };

        if self.toggles.grid {
            self.grid.draw(&mut self.backend, &groups);
        }

        let left = self.registry.on_side(AxisSide::Left);
        let right = self.registry.on_side(AxisSide::Right);
        let left_bounds = self.left_axis.range.bounds();
        let right_bounds = self.right_axis.range.bounds();
        for (series, bounds) in left
            .iter()
            .map(|s| (s, left_bounds))
            .chain(right.iter().map(|s| (s, right_bounds)))
        {
            if !series.is_enabled() || !series.is_populated() {
                continue;
            }
            let Some((y_min, y_max)) = bounds else {
                continue;
            };
            let style = SeriesStyle {
                name: series.name(),
                glyph: series.glyph(),
                color: series.color(),
            };
            let kind = series.kind();
            kind.renderer()
                .draw(&mut self.backend, &frame, &style, y_min, y_max);
        }

        self.x_axis.draw(&mut self.backend, &groups);
        let enabled_left: Vec<Series> = left.iter().filter(|s| s.is_enabled()).cloned().collect();
        let enabled_right: Vec<Series> = right.iter().filter(|s| s.is_enabled()).cloned().collect();
        self.left_axis.draw(&mut self.backend, frame.last_group, &enabled_left);
        self.right_axis.draw(&mut self.backend, frame.last_group, &enabled_right);

        if self.toggles.legend {
            self.legend.draw(&mut self.backend, &left, &right);
        }
        if self.toggles.status_line {
            self.update_status();
            self.status.draw(&mut self.backend);
        }
        if self.toggles.last_values {
            let all: Vec<Series> = left.into_iter().chain(right).collect();
            self.last_values.draw(&mut self.backend, &all);
        }

        self.backend.flush();
        Ok(())
    }

    /// Commands queued since the last frame, duplicates dropped.
    fn drain_commands(&self) -> Vec<Command> {
        let mut seen = HashSet::new();
        self.command_rx
            .try_iter()
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// One iteration of the render loop: apply queued commands, then draw
    /// once if a command arrived, the terminal was resized, or new data came
    /// in while not paused. Returns whether a frame was drawn.
    pub fn frame(&mut self) -> Result<bool> {
        let commands = self.drain_commands();
        let had_commands = !commands.is_empty();
        for command in commands {
            self.handle_command(command);
        }
        if self.quit {
            return Ok(false);
        }

        let index = Arc::clone(&self.index);
        let mut index = index.acquire("frame");

        let resized = self.backend.check_resized();
        if resized {
            debug!(cols = self.backend.cols(), rows = self.backend.rows(), "terminal resized");
        }
        // clears the updated flags
        let new_data = !self.toggles.paused && self.has_new_data();

        if had_commands || resized || new_data {
            self.draw_locked(&mut index)?;
            return Ok(true);
        }
        self.backend.flush();
        Ok(false)
    }

    pub fn handle_command(&mut self, command: Command) {
        debug!(?command, "handling command");
        match command {
            Command::ZoomXIn | Command::ZoomXOut => {
                let zoom_in = command == Command::ZoomXIn;
                if let Some(bin_window) =
                    ViewController::zoom_bin_window(self.viewport.bin_window(), self.zoom_unit, zoom_in)
                {
                    self.viewport.set_bin_window(bin_window);
                }
            }
            Command::ZoomYIn => {
                self.toggles.disable_autorange();
                self.left_axis.zoom();
                self.right_axis.zoom();
            }
            Command::ZoomYOut => {
                self.toggles.disable_autorange();
                self.left_axis.unzoom();
                self.right_axis.unzoom();
            }
            Command::PanUp => {
                self.toggles.disable_autorange();
                self.left_axis.pan_up();
                self.right_axis.pan_up();
            }
            Command::PanDown => {
                self.toggles.disable_autorange();
                self.left_axis.pan_down();
                self.right_axis.pan_down();
            }
            Command::PanLeft => {
                self.toggles.paused = true;
                self.toggles.fit_all = false;
                self.viewport.keep_position();
                self.viewport.increase_offset(self.config.x_pan_steps);
            }
            Command::PanRight => {
                self.toggles.paused = true;
                self.toggles.fit_all = false;
                self.viewport.keep_position();
                self.viewport.decrease_offset(self.config.x_pan_steps);
            }
            Command::Reset => self.reset_settings(),
            Command::ToggleLegend => self.toggles.legend = !self.toggles.legend,
            Command::ToggleGrid => self.toggles.grid = !self.toggles.grid,
            Command::ToggleLastValues => self.toggles.last_values = !self.toggles.last_values,
            Command::ToggleStatusLine => self.toggles.status_line = !self.toggles.status_line,
            Command::TogglePaused => {
                self.toggles.paused = !self.toggles.paused;
                self.viewport.forget_position();
            }
            Command::ToggleFitAll => self.toggles.fit_all = !self.toggles.fit_all,
            Command::ToggleSeries(line_number) => match self.registry.by_line_number(line_number) {
                Some(series) => {
                    debug!(series = series.name(), "toggling series");
                    series.toggle_enabled();
                }
                None => debug!(line_number, "no series with this line number"),
            },
            Command::CycleZoomUnit => {
                if self.x_axis.kind == XAxisKind::Datetime {
                    self.zoom_unit = ViewController::next_zoom_unit(self.zoom_unit, self.config.index_spread);
                } else {
                    debug!("zoom unit is fixed on numeric axes");
                }
            }
            Command::Quit => self.quit = true,
        }
    }

    fn reset_settings(&mut self) {
        let paused = self.toggles.paused;
        self.toggles = Toggles::from_config(&self.config);
        self.toggles.paused = paused;
        self.zoom_unit = self.config.x_zoom_unit;
        self.viewport = Viewport::new(self.config.bin_window);
        for series in self.registry.iter() {
            series.set_default_enabled();
        }
    }

    /// Terminal and series statistics, one entry per line.
    pub fn status_lines(&self) -> Vec<String> {
        let mut out = vec![
            "TERMINAL".to_string(),
            format!("term cols: {}", self.backend.cols()),
            format!("term rows: {}", self.backend.rows()),
            format!("plot cols: {}", self.backend.plot_cols()),
            format!("plot rows: {}", self.backend.plot_rows()),
            String::new(),
            "SERIES".to_string(),
        ];
        let mut total = 0;
        for series in self.registry.iter() {
            let points = series.len();
            total += points;
            out.push(format!("name:   {}", series.name()));
            out.push(format!("points: {points}"));
            out.push(String::new());
        }
        out.push(format!("total points in chart: {total}"));
        out
    }
}

impl std::fmt::Debug for Chart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chart")
            .field("series", &self.registry.len())
            .field("viewport", &self.viewport)
            .field("toggles", &self.toggles)
            .finish()
    }
}

/// Convenience for callers that only know a series by name.
impl Chart {
    pub fn add_point(&self, series: &str, x: f64, y: f64) -> Result<()> {
        self.registry
            .get(series)
            .ok_or_else(|| ChartError::UnknownSeries(series.to_string()))?
            .add_point(x, y)
    }

    pub fn add_ohlc(&self, series: &str, x: f64, open: f64, high: f64, low: f64, close: f64) -> Result<()> {
        self.registry
            .get(series)
            .ok_or_else(|| ChartError::UnknownSeries(series.to_string()))?
            .add_ohlc(x, open, high, low, close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_up_to_multiple() {
        assert_eq!(round_up_to_multiple(60, 60), 60);
        assert_eq!(round_up_to_multiple(61, 60), 120);
        assert_eq!(round_up_to_multiple(10, 60), 60);
        assert_eq!(round_up_to_multiple(0, 5), 5);
    }
}
