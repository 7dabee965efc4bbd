use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ohlc {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointValue {
    Scalar(f64),
    Ohlc(Ohlc),
}

/// One sample of a series. `x` is already normalized to a float key
/// (timestamps are seconds since the epoch).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub value: PointValue,
}

impl Point {
    pub fn scalar(x: f64, y: f64) -> Self {
        Self {
            x,
            value: PointValue::Scalar(y),
        }
    }

    pub fn ohlc(x: f64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            x,
            value: PointValue::Ohlc(Ohlc {
                open,
                high,
                low,
                close,
            }),
        }
    }

    /// Representative value: y for scalars, close for candles.
    pub fn value(&self) -> f64 {
        match self.value {
            PointValue::Scalar(y) => y,
            PointValue::Ohlc(o) => o.close,
        }
    }

    pub fn min(&self) -> f64 {
        match self.value {
            PointValue::Scalar(y) => y,
            PointValue::Ohlc(o) => o.low,
        }
    }

    pub fn max(&self) -> f64 {
        match self.value {
            PointValue::Scalar(y) => y,
            PointValue::Ohlc(o) => o.high,
        }
    }

    pub fn as_ohlc(&self) -> Ohlc {
        match self.value {
            PointValue::Scalar(y) => Ohlc {
                open: y,
                high: y,
                low: y,
                close: y,
            },
            PointValue::Ohlc(o) => o,
        }
    }

    pub fn shape(&self) -> &'static str {
        match self.value {
            PointValue::Scalar(_) => "scalar",
            PointValue::Ohlc(_) => "ohlc",
        }
    }

    /// Named value fields, used by the last-values display.
    pub fn fields(&self) -> Vec<(&'static str, f64)> {
        match self.value {
            PointValue::Scalar(y) => vec![("y", y)],
            PointValue::Ohlc(o) => vec![
                ("open", o.open),
                ("high", o.high),
                ("low", o.low),
                ("close", o.close),
            ],
        }
    }
}

/// Which of the uniform point views an aggregation reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ValueView {
    #[default]
    Value,
    Min,
    Max,
}

impl ValueView {
    pub fn read(self, p: &Point) -> f64 {
        match self {
            ValueView::Value => p.value(),
            ValueView::Min => p.min(),
            ValueView::Max => p.max(),
        }
    }
}

/// Totally ordered float key, so points can live in ordered maps.
#[derive(Clone, Copy, Debug)]
pub struct Key(pub f64);

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for Key {}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}
