use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error};

use super::{CacheKey, Group, Index};
use crate::data_types::Point;
use crate::error::{ChartError, Result};

impl Index {
    /// Returns `amount` groups of `group_size` key units each, oldest first.
    /// The last group is the one holding the bucket of `end_key`.
    ///
    /// Groups that would start before the index are returned empty with no
    /// start or end key. An `end_key` outside the index yields no groups.
    pub fn get_grouped(&mut self, group_size: i64, end_key: i64, amount: usize) -> Result<Arc<[Group]>> {
        if group_size < self.spread || group_size % self.spread != 0 {
            return Err(ChartError::InvalidGroupSize {
                group_size,
                spread: self.spread,
            });
        }

        let key = CacheKey {
            end_key,
            amount,
            group_size,
        };
        if let Some(groups) = self.cache.get(&key, self.generation) {
            return Ok(groups);
        }

        if !self.has_data() {
            debug!("no data in index");
            return Ok(Arc::from(Vec::new()));
        }

        let groups: Arc<[Group]> = Arc::from(self.build_groups(group_size, end_key, amount));
        self.cache.add(key, self.generation, groups.clone());
        Ok(groups)
    }

    fn build_groups(&self, group_size: i64, end_key: i64, amount: usize) -> Vec<Group> {
        let Some(last_i) = self.bucket_position(end_key as f64) else {
            debug!(
                end_key,
                start = ?self.start_key(),
                end = ?self.end_key(),
                "end key out of index bounds"
            );
            return Vec::new();
        };

        let buckets_per_group = group_size / self.spread;
        let last_i = last_i as i64;
        let last_group_start = last_i - last_i % buckets_per_group;

        (0..amount)
            .map(|j| {
                let back = (amount - 1 - j) as i64;
                self.build_group(last_group_start - back * buckets_per_group, buckets_per_group)
            })
            .collect()
    }

    fn build_group(&self, first: i64, width: i64) -> Group {
        let count = first.div_euclid(width);
        let Some(start) = self.start else {
            return Group::empty(count);
        };
        if first < 0 {
            return Group::empty(count);
        }

        let lo = first as usize;
        let hi = ((first + width) as usize).min(self.buckets.len());

        let mut data: HashMap<String, Vec<Point>> = HashMap::new();
        for bucket in self.buckets.range(lo..hi) {
            for (name, points) in bucket {
                data.entry(name.clone())
                    .or_default()
                    .extend(points.values().copied());
            }
        }

        let start_key = start + first * self.spread;
        Group::new(start_key, start_key + width * self.spread, count, data)
    }

    /// Groups ending at the bucket of the newest key, moved back by `offset`
    /// key units.
    pub fn get_grouped_from_last_data(&mut self, group_size: i64, amount: usize, offset: i64) -> Result<Arc<[Group]>> {
        let Some(end_key) = self.max_key.and_then(|k| self.get_index_key(k)) else {
            debug!("no data yet in index");
            return Ok(Arc::from(Vec::new()));
        };
        self.get_grouped(group_size, end_key - offset, amount)
    }

    /// Spreads all data over `amount` groups.
    pub fn get_all_grouped(&mut self, amount: usize) -> Result<Arc<[Group]>> {
        let (Some(min), Some(max)) = (self.min_key, self.max_key) else {
            error!("not enough data to group everything");
            return Ok(Arc::from(Vec::new()));
        };
        if amount == 0 {
            return Ok(Arc::from(Vec::new()));
        }

        let mut group_size = ((max - min) / amount as f64).floor() as i64;
        group_size -= group_size.rem_euclid(self.spread);

        if self.spread > group_size {
            error!(spread = self.spread, group_size, "spread exceeds group size");
            return Ok(Arc::from(Vec::new()));
        }

        self.get_grouped_from_last_data(group_size, amount, 0)
    }
}
