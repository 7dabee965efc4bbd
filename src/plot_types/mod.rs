// Plot types module

pub mod candlestick;
pub mod histogram;
pub mod horizontal;
pub mod line;
pub mod peaks;

pub use candlestick::CandlestickPlot;
pub use histogram::HistogramPlot;
pub use horizontal::{CurrentValuePlot, HorizontalLinePlot};
pub use line::LinePlot;
pub use peaks::{find_extrema, Extremum, PeaksPlot};

use crate::backend::Backend;
use crate::data_types::{Color, XAxisKind};
use crate::index::Group;

/// Groups visible in one frame, shared by every renderer.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    /// One group per plot column, oldest first.
    pub groups: &'a [Group],
    /// The single most recent group, ignoring any pan offset.
    pub last_group: Option<&'a Group>,
    pub x_axis: XAxisKind,
}

/// Per-series drawing attributes.
#[derive(Clone, Copy, Debug)]
pub struct SeriesStyle<'a> {
    pub name: &'a str,
    pub glyph: char,
    pub color: Color,
}

/// Trait for rendering plot types
pub trait PlotRenderer: Send + Sync {
    fn draw(&self, backend: &mut Backend, frame: &Frame, style: &SeriesStyle, y_min: f64, y_max: f64);

    /// Legend icon.
    fn icon(&self) -> char;

    /// Kinds that derive everything from other series draw even when they
    /// hold no points themselves.
    fn always_populated(&self) -> bool {
        false
    }

    /// Shape of the points this kind accepts.
    fn point_shape(&self) -> &'static str {
        "scalar"
    }
}

/// Every chart kind a series can be drawn as.
#[derive(Clone, Debug, PartialEq)]
pub enum PlotKind {
    Line(LinePlot),
    Histogram(HistogramPlot),
    Candlestick(CandlestickPlot),
    HorizontalLine(HorizontalLinePlot),
    CurrentValue(CurrentValuePlot),
    Peaks(PeaksPlot),
}

impl PlotKind {
    pub fn line() -> Self {
        Self::Line(LinePlot::default())
    }

    pub fn histogram() -> Self {
        Self::Histogram(HistogramPlot)
    }

    pub fn candlestick() -> Self {
        Self::Candlestick(CandlestickPlot::default())
    }

    pub fn horizontal_line(y: f64) -> Self {
        Self::HorizontalLine(HorizontalLinePlot::new(y))
    }

    pub fn current_value(target: impl Into<String>) -> Self {
        Self::CurrentValue(CurrentValuePlot::new(target))
    }

    pub fn peaks(target: impl Into<String>) -> Self {
        Self::Peaks(PeaksPlot::new(target))
    }

    pub fn renderer(&self) -> &dyn PlotRenderer {
        match self {
            Self::Line(p) => p,
            Self::Histogram(p) => p,
            Self::Candlestick(p) => p,
            Self::HorizontalLine(p) => p,
            Self::CurrentValue(p) => p,
            Self::Peaks(p) => p,
        }
    }

    /// Series this kind reads instead of its own points.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::CurrentValue(p) => Some(&p.target),
            Self::Peaks(p) => Some(&p.target),
            _ => None,
        }
    }
}
