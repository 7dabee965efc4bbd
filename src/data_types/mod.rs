pub mod axis;
pub mod config;
pub mod data;
pub mod plot_configs;

pub use axis::*;
pub use config::*;
pub use data::*;
pub use plot_configs::*;
