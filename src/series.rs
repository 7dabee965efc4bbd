use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::data_types::{AxisSide, Color, Point};
use crate::error::{ChartError, Result};
use crate::index::Index;
use crate::plot_types::PlotKind;
use crate::sync::ChartLock;

/// Appends between two progress log lines.
const PROGRESS_EVERY: usize = 500;

/// How a series should look and behave; turned into a [`Series`] by
/// `Chart::add_series`.
#[derive(Clone, Debug)]
pub struct SeriesOptions {
    pub name: String,
    pub kind: PlotKind,
    pub color: Option<Color>,
    pub glyph: char,
    /// Suffix shown after values, e.g. `%` or `$`.
    pub symbol: Option<String>,
    pub enabled: bool,
    /// Hidden series are drawn but left out of the legend and last values.
    pub hidden: bool,
}

impl SeriesOptions {
    pub fn new(name: impl Into<String>, kind: PlotKind) -> Self {
        Self {
            name: name.into(),
            kind,
            color: None,
            glyph: crate::backend::FILL_CHAR,
            symbol: None,
            enabled: true,
            hidden: false,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_glyph(mut self, glyph: char) -> Self {
        self.glyph = glyph;
        self
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

#[derive(Debug)]
struct SeriesState {
    points: Vec<Point>,
    enabled: bool,
    updated: bool,
}

struct SeriesInner {
    name: String,
    color: Color,
    glyph: char,
    symbol: Option<String>,
    line_number: usize,
    hidden: bool,
    default_enabled: bool,
    kind: RwLock<PlotKind>,
    index: Arc<ChartLock<Index>>,
    state: Mutex<SeriesState>,
}

/// Handle to one series. Cheap to clone; clones can be moved to data source
/// threads and appended to from there.
#[derive(Clone)]
pub struct Series {
    inner: Arc<SeriesInner>,
}

impl std::fmt::Debug for Series {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Series")
            .field("name", &self.inner.name)
            .field("line_number", &self.inner.line_number)
            .field("points", &self.len())
            .finish()
    }
}

impl Series {
    pub(crate) fn new(options: SeriesOptions, color: Color, line_number: usize, index: Arc<ChartLock<Index>>) -> Self {
        Self {
            inner: Arc::new(SeriesInner {
                name: options.name,
                color,
                glyph: options.glyph,
                symbol: options.symbol,
                line_number,
                hidden: options.hidden,
                default_enabled: options.enabled,
                kind: RwLock::new(options.kind),
                index,
                state: Mutex::new(SeriesState {
                    points: Vec::new(),
                    enabled: options.enabled,
                    updated: false,
                }),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn color(&self) -> Color {
        self.inner.color
    }

    pub fn glyph(&self) -> char {
        self.inner.glyph
    }

    pub fn icon(&self) -> char {
        self.inner.kind.read().renderer().icon()
    }

    pub fn symbol(&self) -> Option<&str> {
        self.inner.symbol.as_deref()
    }

    pub fn line_number(&self) -> usize {
        self.inner.line_number
    }

    pub fn is_hidden(&self) -> bool {
        self.inner.hidden
    }

    pub fn kind(&self) -> PlotKind {
        self.inner.kind.read().clone()
    }

    /// Runs `f` with the plot kind locked for writing, e.g. to move a
    /// horizontal line.
    pub fn with_kind_mut<R>(&self, f: impl FnOnce(&mut PlotKind) -> R) -> R {
        f(&mut self.inner.kind.write())
    }

    pub fn add_point(&self, x: f64, y: f64) -> Result<()> {
        self.push(Point::scalar(x, y))
    }

    pub fn add_ohlc(&self, x: f64, open: f64, high: f64, low: f64, close: f64) -> Result<()> {
        self.push(Point::ohlc(x, open, high, low, close))
    }

    fn push(&self, point: Point) -> Result<()> {
        let expected = self.inner.kind.read().renderer().point_shape();
        if point.shape() != expected {
            return Err(ChartError::PointShapeMismatch {
                series: self.inner.name.clone(),
                shape: point.shape(),
            });
        }

        let total = {
            let mut index = self.inner.index.acquire("add_point");
            index.insert(&self.inner.name, point.x, point)?;
            let mut state = self.inner.state.lock();
            state.points.push(point);
            state.updated = true;
            state.points.len()
        };

        if total % PROGRESS_EVERY == 0 {
            debug!(series = %self.inner.name, points = total, "processed points");
        }
        Ok(())
    }

    /// Returns whether points were added since the last call, and clears the flag.
    pub fn is_updated(&self) -> bool {
        std::mem::take(&mut self.inner.state.lock().updated)
    }

    pub fn is_populated(&self) -> bool {
        self.inner.kind.read().renderer().always_populated() || self.len() > 0
    }

    pub fn len(&self) -> usize {
        self.inner.state.lock().points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get_last_value(&self) -> Option<Point> {
        self.inner.state.lock().points.last().copied()
    }

    /// Copy of every point, in insertion order.
    pub fn points(&self) -> Vec<Point> {
        self.inner.state.lock().points.clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.state.lock().enabled
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.inner.state.lock().enabled = enabled;
    }

    pub fn toggle_enabled(&self) {
        let mut state = self.inner.state.lock();
        state.enabled = !state.enabled;
    }

    pub fn set_default_enabled(&self) {
        self.inner.state.lock().enabled = self.inner.default_enabled;
    }

    /// Forgets all points. The index is reset separately by the chart.
    pub fn reset(&self) {
        let mut state = self.inner.state.lock();
        state.points.clear();
        state.updated = true;
        state.enabled = self.inner.default_enabled;
    }
}

/// Series of one chart with their axis side, in insertion order. Hands out
/// line numbers starting at 1; numbers are never reused within a chart.
#[derive(Debug, Default)]
pub struct SeriesRegistry {
    entries: Vec<(AxisSide, Series)>,
    next_line_number: usize,
}

impl SeriesRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_line_number: 1,
        }
    }

    pub(crate) fn register(
        &mut self,
        options: SeriesOptions,
        color: Color,
        side: AxisSide,
        index: Arc<ChartLock<Index>>,
    ) -> Result<Series> {
        if self.get(&options.name).is_some() {
            return Err(ChartError::DuplicateSeries(options.name));
        }
        let line_number = self.next_line_number.max(1);
        self.next_line_number = line_number + 1;

        let series = Series::new(options, color, line_number, index);
        self.entries.push((side, series.clone()));
        Ok(series)
    }

    pub fn remove(&mut self, name: &str) -> Result<Series> {
        let pos = self
            .entries
            .iter()
            .position(|(_, s)| s.name() == name)
            .ok_or_else(|| ChartError::UnknownSeries(name.to_string()))?;
        Ok(self.entries.remove(pos).1)
    }

    pub fn get(&self, name: &str) -> Option<&Series> {
        self.entries.iter().map(|(_, s)| s).find(|s| s.name() == name)
    }

    pub fn by_line_number(&self, line_number: usize) -> Option<&Series> {
        self.entries
            .iter()
            .map(|(_, s)| s)
            .find(|s| s.line_number() == line_number)
    }

    pub fn side_of(&self, name: &str) -> Option<AxisSide> {
        self.entries
            .iter()
            .find(|(_, s)| s.name() == name)
            .map(|(side, _)| *side)
    }

    pub fn on_side(&self, side: AxisSide) -> Vec<Series> {
        self.entries
            .iter()
            .filter(|(s, _)| *s == side)
            .map(|(_, series)| series.clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Series> {
        self.entries.iter().map(|(_, s)| s)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> Arc<ChartLock<Index>> {
        Arc::new(ChartLock::new(Index::new(100, 1).unwrap()))
    }

    #[test]
    fn test_points_reach_index() {
        let index = index();
        let series = Series::new(SeriesOptions::new("a", PlotKind::line()), Color::Red, 1, Arc::clone(&index));
        series.add_point(3.0, 1.5).unwrap();
        series.add_point(1.0, 2.5).unwrap();

        assert_eq!(series.len(), 2);
        assert!(series.is_updated());
        assert!(!series.is_updated());
        assert_eq!(series.get_last_value().map(|p| p.x), Some(1.0));
        let index = index.acquire("test");
        assert_eq!(index.get("a", 3.0).map(|p| p.value()), Some(1.5));
        assert_eq!(index.min_key(), Some(1.0));
    }

    #[test]
    fn test_shape_mismatch() {
        let line = Series::new(SeriesOptions::new("a", PlotKind::line()), Color::Red, 1, index());
        assert!(matches!(
            line.add_ohlc(0.0, 1.0, 2.0, 0.5, 1.5),
            Err(ChartError::PointShapeMismatch { .. })
        ));
        let candles = Series::new(SeriesOptions::new("c", PlotKind::candlestick()), Color::Red, 2, index());
        assert!(candles.add_point(0.0, 1.0).is_err());
        assert!(candles.add_ohlc(0.0, 1.0, 2.0, 0.5, 1.5).is_ok());
        assert!(line.is_empty());
    }

    #[test]
    fn test_reset_restores_default_enabled() {
        let series = Series::new(
            SeriesOptions::new("a", PlotKind::line()).enabled(false),
            Color::Red,
            1,
            index(),
        );
        series.add_point(0.0, 1.0).unwrap();
        series.toggle_enabled();
        assert!(series.is_enabled());
        series.reset();
        assert!(series.is_empty());
        assert!(!series.is_enabled());
    }

    #[test]
    fn test_registry_line_numbers() {
        let index = index();
        let mut registry = SeriesRegistry::new();
        let a = registry
            .register(SeriesOptions::new("a", PlotKind::line()), Color::Red, AxisSide::Left, Arc::clone(&index))
            .unwrap();
        let b = registry
            .register(SeriesOptions::new("b", PlotKind::line()), Color::Red, AxisSide::Right, Arc::clone(&index))
            .unwrap();
        assert_eq!((a.line_number(), b.line_number()), (1, 2));

        let duplicate = registry.register(
            SeriesOptions::new("a", PlotKind::line()),
            Color::Red,
            AxisSide::Left,
            Arc::clone(&index),
        );
        assert!(matches!(duplicate, Err(ChartError::DuplicateSeries(_))));

        registry.remove("a").unwrap();
        assert!(matches!(registry.remove("a"), Err(ChartError::UnknownSeries(_))));
        let c = registry
            .register(SeriesOptions::new("c", PlotKind::line()), Color::Red, AxisSide::Left, index)
            .unwrap();
        assert_eq!(c.line_number(), 3);
        assert_eq!(registry.by_line_number(2).map(|s| s.name()), Some("b"));
        assert_eq!(registry.side_of("c"), Some(AxisSide::Left));
        assert_eq!(registry.on_side(AxisSide::Right).len(), 1);
    }
}
