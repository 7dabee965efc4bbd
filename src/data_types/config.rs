use serde::{Deserialize, Serialize};

use super::XAxisKind;
use crate::error::{ChartError, Result};

/// Chart settings. Every field has a default, so a config file only needs the
/// values it changes. Unknown fields are rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    /// Width of one index bucket in key units.
    pub index_spread: i64,
    /// Buckets allocated per growth step.
    pub grow_factor: usize,
    /// Width of one screen column in key units.
    pub bin_window: i64,
    pub x_axis: XAxisKind,
    /// Step used by X zoom in/out, in key units.
    pub x_zoom_unit: i64,
    /// Columns moved by one X pan.
    pub x_pan_steps: usize,
    pub left_decimals: u32,
    pub right_decimals: u32,
    pub x_decimals: u32,
    pub show_grid: bool,
    pub show_legend: bool,
    pub show_statusline: bool,
    pub show_last_values: bool,
    pub autorange_left_y: bool,
    pub autorange_right_y: bool,
    pub fit_all: bool,
    pub paused: bool,
    pub update_interval_ms: u64,
    pub frame_interval_ms: u64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            index_spread: 60,
            grow_factor: 10_000,
            bin_window: 60,
            x_axis: XAxisKind::Datetime,
            x_zoom_unit: 60,
            x_pan_steps: 10,
            left_decimals: 2,
            right_decimals: 2,
            x_decimals: 1,
            show_grid: true,
            show_legend: true,
            show_statusline: true,
            show_last_values: true,
            autorange_left_y: true,
            autorange_right_y: true,
            fit_all: false,
            paused: false,
            update_interval_ms: 5_000,
            frame_interval_ms: 100,
        }
    }
}

impl ChartConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ChartConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.index_spread < 1 {
            return Err(ChartError::InvalidConfig(format!(
                "index_spread must be >= 1, got {}",
                self.index_spread
            )));
        }
        if self.grow_factor < 1 {
            return Err(ChartError::InvalidConfig(
                "grow_factor must be >= 1".to_string(),
            ));
        }
        if self.bin_window < 1 || self.bin_window % self.index_spread != 0 {
            return Err(ChartError::InvalidConfig(format!(
                "bin_window {} must be a positive multiple of index_spread {}",
                self.bin_window, self.index_spread
            )));
        }
        if self.x_zoom_unit < 1 || self.x_zoom_unit % self.index_spread != 0 {
            return Err(ChartError::InvalidConfig(format!(
                "x_zoom_unit {} must be a positive multiple of index_spread {}",
                self.x_zoom_unit, self.index_spread
            )));
        }
        if self.x_pan_steps < 1 {
            return Err(ChartError::InvalidConfig(
                "x_pan_steps must be >= 1".to_string(),
            ));
        }
        if self.update_interval_ms == 0 || self.frame_interval_ms == 0 {
            return Err(ChartError::InvalidConfig(
                "intervals must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
