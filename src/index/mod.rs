//! Growable key index.
//!
//! Keys are bucketed into fixed-width slots laid out contiguously from the
//! first key ever inserted. The index only grows, in blocks of `grow_factor`
//! buckets, on whichever side a new key falls outside of.

mod cache;
mod group;
mod grouping;

pub use cache::{CacheKey, GroupCache, CLEANUP_INTERVAL};
pub use group::Group;

use std::collections::{BTreeMap, HashMap, VecDeque};

use tracing::debug;

use crate::data_types::{Key, Point};
use crate::error::{ChartError, Result};

/// One slot of the index: series name to the points that fall in the slot.
pub type Bucket = HashMap<String, BTreeMap<Key, Point>>;

#[derive(Debug)]
pub struct Index {
    grow_factor: usize,
    spread: i64,
    /// Key of the first bucket, fixed by the first insert and moved left on growth.
    start: Option<i64>,
    buckets: VecDeque<Bucket>,
    columns: Vec<String>,
    min_key: Option<f64>,
    max_key: Option<f64>,
    /// Bumped on every write, used to validate cached groups.
    generation: u64,
    cache: GroupCache,
}

impl Index {
    pub fn new(grow_factor: usize, spread: i64) -> Result<Self> {
        if spread < 1 {
            return Err(ChartError::InvalidConfig(format!(
                "index spread must be >= 1, got {spread}"
            )));
        }
        if grow_factor < 1 {
            return Err(ChartError::InvalidConfig(
                "index grow factor must be >= 1".to_string(),
            ));
        }
        Ok(Self {
            grow_factor,
            spread,
            start: None,
            buckets: VecDeque::new(),
            columns: Vec::new(),
            min_key: None,
            max_key: None,
            generation: 0,
            cache: GroupCache::new(),
        })
    }

    /// Drops all data, keeping spread and grow factor.
    pub fn reset(&mut self) {
        self.start = None;
        self.buckets.clear();
        self.columns.clear();
        self.min_key = None;
        self.max_key = None;
        self.cache.clear();
        self.generation += 1;
    }

    pub fn insert(&mut self, series: &str, key: f64, point: Point) -> Result<()> {
        if !key.is_finite() {
            return Err(ChartError::NonFiniteKey(key));
        }

        self.extend(key, self.spread)?;

        if !self.columns.iter().any(|c| c == series) {
            debug!(series, "new column detected");
            self.columns.push(series.to_string());
        }

        self.min_key = Some(self.min_key.map_or(key, |m| m.min(key)));
        self.max_key = Some(self.max_key.map_or(key, |m| m.max(key)));

        let pos = self
            .bucket_position(key)
            .ok_or(ChartError::NonFiniteKey(key))?;
        self.buckets[pos]
            .entry(series.to_string())
            .or_default()
            .insert(Key(key), point);

        self.generation += 1;
        Ok(())
    }

    /// Grows the index until `key` is covered. The first call fixes the index
    /// start at `floor(key)`. Buckets are always `spread` wide, so asking for
    /// any other width is an error.
    pub fn extend(&mut self, key: f64, spread: i64) -> Result<()> {
        if spread != self.spread {
            return Err(ChartError::InconsistentSpread {
                expected: self.spread,
                got: spread,
            });
        }
        if !key.is_finite() {
            return Err(ChartError::NonFiniteKey(key));
        }

        let mut start = match self.start {
            Some(start) => start,
            None => {
                let start = key.floor() as i64;
                debug!(start, buckets = self.grow_factor, spread, "building index");
                self.start = Some(start);
                self.push_block(false);
                start
            }
        };

        while key < start as f64 {
            self.push_block(true);
            start -= self.block_width();
            self.start = Some(start);
            debug!(key, start, "extended index to the left");
        }

        while key >= self.end_key_from(start) as f64 {
            self.push_block(false);
            debug!(key, end = self.end_key_from(start), "extended index to the right");
        }

        Ok(())
    }

    fn push_block(&mut self, front: bool) {
        for _ in 0..self.grow_factor {
            if front {
                self.buckets.push_front(Bucket::new());
            } else {
                self.buckets.push_back(Bucket::new());
            }
        }
    }

    fn block_width(&self) -> i64 {
        self.grow_factor as i64 * self.spread
    }

    fn end_key_from(&self, start: i64) -> i64 {
        start + self.buckets.len() as i64 * self.spread
    }

    /// Start key of the bucket `key` falls into.
    pub fn get_index_key(&self, key: f64) -> Option<i64> {
        let start = self.start?;
        let n = ((key - start as f64) / self.spread as f64).floor() as i64;
        Some(start + n * self.spread)
    }

    /// Position of the bucket holding `key` in the bucket array.
    pub fn bucket_position(&self, key: f64) -> Option<usize> {
        let start = self.start?;
        let n = ((key - start as f64) / self.spread as f64).floor();
        if n < 0.0 || n >= self.buckets.len() as f64 {
            return None;
        }
        Some(n as usize)
    }

    pub fn get(&self, series: &str, key: f64) -> Option<&Point> {
        let pos = self.bucket_position(key)?;
        self.buckets[pos].get(series)?.get(&Key(key))
    }

    pub fn has_data(&self) -> bool {
        self.start.is_some()
    }

    pub fn start_key(&self) -> Option<i64> {
        self.start
    }

    /// Exclusive upper bound of the allocated buckets.
    pub fn end_key(&self) -> Option<i64> {
        self.start.map(|s| self.end_key_from(s))
    }

    pub fn min_key(&self) -> Option<f64> {
        self.min_key
    }

    pub fn max_key(&self) -> Option<f64> {
        self.max_key
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn spread(&self) -> i64 {
        self.spread
    }

    pub fn grow_factor(&self) -> usize {
        self.grow_factor
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_parameters() {
        assert!(Index::new(10, 0).is_err());
        assert!(Index::new(0, 5).is_err());
    }

    #[test]
    fn first_insert_fixes_start() {
        let mut index = Index::new(4, 5).unwrap();
        index.insert("a", 12.7, Point::scalar(12.7, 1.0)).unwrap();
        assert_eq!(index.start_key(), Some(12));
        assert_eq!(index.end_key(), Some(32));
        assert_eq!(index.bucket_count(), 4);
        assert_eq!(index.get_index_key(12.7), Some(12));
        assert_eq!(index.get_index_key(18.0), Some(17));
    }

    #[test]
    fn grows_right_in_blocks() {
        let mut index = Index::new(4, 5).unwrap();
        index.insert("a", 0.0, Point::scalar(0.0, 1.0)).unwrap();
        index.insert("a", 45.0, Point::scalar(45.0, 1.0)).unwrap();
        assert_eq!(index.bucket_count(), 12);
        assert_eq!(index.start_key(), Some(0));
        assert_eq!(index.end_key(), Some(60));
    }

    #[test]
    fn grows_left_without_moving_data() {
        let mut index = Index::new(4, 5).unwrap();
        index.insert("a", 3.0, Point::scalar(3.0, 7.0)).unwrap();
        index.insert("a", -50.0, Point::scalar(-50.0, 8.0)).unwrap();
        assert_eq!(index.start_key(), Some(-57));
        assert_eq!(index.bucket_count(), 16);
        assert_eq!(index.get("a", 3.0).map(|p| p.value()), Some(7.0));
        assert_eq!(index.get("a", -50.0).map(|p| p.value()), Some(8.0));
        assert_eq!(index.get_index_key(-50.0), Some(-52));
    }

    #[test]
    fn duplicate_key_replaces_point() {
        let mut index = Index::new(4, 5).unwrap();
        index.insert("a", 1.0, Point::scalar(1.0, 1.0)).unwrap();
        index.insert("a", 1.0, Point::scalar(1.0, 2.0)).unwrap();
        assert_eq!(index.get("a", 1.0).map(|p| p.value()), Some(2.0));
    }

    #[test]
    fn non_finite_keys_are_rejected() {
        let mut index = Index::new(4, 5).unwrap();
        assert!(matches!(
            index.insert("a", f64::NAN, Point::scalar(f64::NAN, 1.0)),
            Err(ChartError::NonFiniteKey(_))
        ));
        assert!(!index.has_data());
    }

    #[test]
    fn inconsistent_spread_fails() {
        let mut index = Index::new(4, 5).unwrap();
        assert!(matches!(
            index.extend(100.0, 7),
            Err(ChartError::InconsistentSpread { expected: 5, got: 7 })
        ));
    }
}
