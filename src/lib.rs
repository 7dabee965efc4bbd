//! term_chart crate for real-time charting in a terminal

pub mod actors;
pub mod axis;
pub mod backend;
pub mod chart;
pub mod data_types;
pub mod error;
pub mod index;
pub mod input;
pub mod layout;
pub mod logging;
pub mod plot_types;
pub mod runtime;
pub mod scales;
pub mod series;
pub mod smoothing;
pub mod surface;
pub mod sync;
pub mod utils;
pub mod view_controller;

pub use backend::Backend;
pub use chart::{Chart, Toggles};
pub use data_types::{AxisSide, ChartConfig, Color, Ohlc, Point, XAxisKind};
pub use error::{ChartError, Result};
pub use index::{Group, Index};
pub use input::{Command, KeyBindings};
pub use plot_types::{PlotKind, PlotRenderer};
pub use runtime::{App, DataSource, Worker};
pub use series::{Series, SeriesOptions};
pub use surface::{CrosstermKeys, CrosstermSurface, HeadlessSurface, KeySource, ScriptedKeys, Surface};
