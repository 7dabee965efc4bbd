use thiserror::Error;

/// Errors raised by the charting core.
///
/// Every variant is a configuration or programming mistake. Conditions like
/// "no data yet" never surface here; they produce empty results instead.
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("group size {group_size} is not compatible with index spread {spread}")]
    InvalidGroupSize { group_size: i64, spread: i64 },

    #[error("index spread is fixed at {expected}, refusing to grow with spread {got}")]
    InconsistentSpread { expected: i64, got: i64 },

    #[error("key {0} is not a finite number")]
    NonFiniteKey(f64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("series `{series}` does not accept {shape} points")]
    PointShapeMismatch { series: String, shape: &'static str },

    #[error("series `{0}` already exists")]
    DuplicateSeries(String),

    #[error("unknown series `{0}`")]
    UnknownSeries(String),

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChartError>;
