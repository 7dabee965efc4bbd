use serde::{Deserialize, Serialize};

/// The eight terminal colors every backend understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    #[default]
    White,
    Black,
}

impl Color {
    pub const SERIES_CYCLE: [Color; 7] = [
        Color::Green,
        Color::Blue,
        Color::Red,
        Color::Cyan,
        Color::Yellow,
        Color::Magenta,
        Color::White,
    ];
}

/// Hands out series colors in a fixed rotation. Owned by the chart so two
/// charts in one process don't share a cursor.
#[derive(Clone, Debug, Default)]
pub struct ColorCycle {
    next: usize,
}

impl ColorCycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_color(&mut self) -> Color {
        let c = Color::SERIES_CYCLE[self.next % Color::SERIES_CYCLE.len()];
        self.next += 1;
        c
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStyle {
    pub fg: Color,
    pub bg: Color,
    pub reverse: bool,
    pub dim: bool,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            fg: Color::White,
            bg: Color::Black,
            reverse: false,
            dim: false,
        }
    }
}

impl CellStyle {
    pub fn fg(fg: Color) -> Self {
        Self {
            fg,
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinePlotConfig {
    pub interpolate: bool,
}

impl Default for LinePlotConfig {
    fn default() -> Self {
        Self { interpolate: true }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CandlestickConfig {
    pub up_color: Color,
    pub down_color: Color,
    pub wick: char,
    pub body: char,
    pub body_small: char,
}

impl Default for CandlestickConfig {
    fn default() -> Self {
        Self {
            up_color: Color::Green,
            down_color: Color::Red,
            wick: '┃',
            body: crate::backend::FILL_CHAR,
            body_small: '╋',
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PeaksConfig {
    /// Polynomial order of the smoothing filter.
    pub smoothing: usize,
}

impl Default for PeaksConfig {
    fn default() -> Self {
        Self { smoothing: 7 }
    }
}
