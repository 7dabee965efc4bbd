use std::collections::HashMap;

use crate::data_types::{Ohlc, Point, ValueView};

/// A run of contiguous index buckets merged into one display column.
///
/// `start`/`end` are `None` for groups that lie before the first bucket of
/// the index. `count` is the group ordinal counted from the index start and
/// may be negative for those groups. Aggregates are recomputed on every call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub count: i64,
    data: HashMap<String, Vec<Point>>,
}

impl Group {
    pub fn new(start: i64, end: i64, count: i64, data: HashMap<String, Vec<Point>>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            count,
            data,
        }
    }

    pub fn empty(count: i64) -> Self {
        Self {
            start: None,
            end: None,
            count,
            data: HashMap::new(),
        }
    }

    /// Points of one series, in key order.
    pub fn col(&self, name: &str) -> &[Point] {
        self.data.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn is_empty(&self, name: &str) -> bool {
        self.col(name).is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.data.values().map(Vec::len).sum()
    }

    pub fn first(&self, name: &str) -> Option<&Point> {
        self.col(name).first()
    }

    pub fn last(&self, name: &str) -> Option<&Point> {
        self.col(name).last()
    }

    pub fn avg(&self, name: &str, view: ValueView) -> Option<f64> {
        let points = self.col(name);
        if points.is_empty() {
            return None;
        }
        let sum: f64 = points.iter().map(|p| view.read(p)).sum();
        Some(sum / points.len() as f64)
    }

    /// Largest `view` value over all points of `columns`.
    pub fn max<S: AsRef<str>>(&self, columns: &[S], view: ValueView) -> Option<f64> {
        columns
            .iter()
            .flat_map(|c| self.col(c.as_ref()))
            .map(|p| view.read(p))
            .reduce(f64::max)
    }

    pub fn min<S: AsRef<str>>(&self, columns: &[S], view: ValueView) -> Option<f64> {
        columns
            .iter()
            .flat_map(|c| self.col(c.as_ref()))
            .map(|p| view.read(p))
            .reduce(f64::min)
    }

    /// Largest per-series average over `columns`. Used for autoranging, so a
    /// single outlier inside a wide group does not stretch the axis.
    pub fn max_of_averages<S: AsRef<str>>(&self, columns: &[S], view: ValueView) -> Option<f64> {
        columns
            .iter()
            .filter_map(|c| self.avg(c.as_ref(), view))
            .reduce(f64::max)
    }

    pub fn min_of_averages<S: AsRef<str>>(&self, columns: &[S], view: ValueView) -> Option<f64> {
        columns
            .iter()
            .filter_map(|c| self.avg(c.as_ref(), view))
            .reduce(f64::min)
    }

    /// Candle for one series: open of the first point, close of the last,
    /// extremes over all of them. Scalar points count as flat candles.
    pub fn ohlc(&self, name: &str) -> Option<Ohlc> {
        let first = self.first(name)?.as_ohlc();
        let last = self.last(name)?.as_ohlc();
        let high = self.max(&[name], ValueView::Max)?;
        let low = self.min(&[name], ValueView::Min)?;
        Some(Ohlc {
            open: first.open,
            high,
            low,
            close: last.close,
        })
    }
}
