use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisSide {
    #[default]
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XAxisKind {
    #[default]
    Datetime,
    Numeric,
}

/// Value bounds of a Y axis. Empty until the first autorange pass finds data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AxisRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AxisRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn bounds(&self) -> Option<(f64, f64)> {
        match (self.min, self.max) {
            (Some(min), Some(max)) => Some((min, max)),
            _ => None,
        }
    }

    pub fn span(&self) -> Option<f64> {
        self.bounds().map(|(min, max)| max - min)
    }

    pub fn pan(&mut self, delta: f64) {
        if let Some((min, max)) = self.bounds() {
            self.min = Some(min + delta);
            self.max = Some(max + delta);
        }
    }

    /// Moves both bounds toward (positive `delta`) or away from the center.
    pub fn shrink(&mut self, delta: f64) {
        if let Some((min, max)) = self.bounds() {
            self.min = Some(min + delta);
            self.max = Some(max - delta);
        }
    }
}
