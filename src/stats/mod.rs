//! Group-by aggregation over borrowed sales records.
//!
//! Groups come back ordered by key, so callers get years ascending, months in
//! calendar order and vehicle types sorted without an extra pass.

use std::collections::BTreeMap;

use crate::domain::SalesRecord;

/// How a group's values are reduced to one number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Mean,
    Sum,
}

/// One aggregated group.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<K> {
    pub key: K,
    pub value: f64,
    /// Rows that fell into this group.
    pub rows: usize,
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn finish(self, reducer: Reducer) -> f64 {
        match reducer {
            Reducer::Sum => self.sum,
            // `count` is never zero: an accumulator only exists once a row hit it.
            Reducer::Mean => self.sum / self.count as f64,
        }
    }
}

/// Group `rows` by `key` and reduce `value` within each group.
pub fn group_by<'a, I, K, FK, FV>(rows: I, key: FK, value: FV, reducer: Reducer) -> Vec<Group<K>>
where
    I: IntoIterator<Item = &'a SalesRecord>,
    K: Ord,
    FK: Fn(&SalesRecord) -> K,
    FV: Fn(&SalesRecord) -> f64,
{
    let mut groups: BTreeMap<K, Accumulator> = BTreeMap::new();
    for row in rows {
        groups.entry(key(row)).or_default().push(value(row));
    }

    groups
        .into_iter()
        .map(|(key, acc)| Group {
            key,
            value: acc.finish(reducer),
            rows: acc.count,
        })
        .collect()
}

/// Arithmetic mean of `value` per `key`.
pub fn group_mean<'a, I, K, FK, FV>(rows: I, key: FK, value: FV) -> Vec<Group<K>>
where
    I: IntoIterator<Item = &'a SalesRecord>,
    K: Ord,
    FK: Fn(&SalesRecord) -> K,
    FV: Fn(&SalesRecord) -> f64,
{
    group_by(rows, key, value, Reducer::Mean)
}

/// Sum of `value` per `key`.
pub fn group_sum<'a, I, K, FK, FV>(rows: I, key: FK, value: FV) -> Vec<Group<K>>
where
    I: IntoIterator<Item = &'a SalesRecord>,
    K: Ord,
    FK: Fn(&SalesRecord) -> K,
    FV: Fn(&SalesRecord) -> f64,
{
    group_by(rows, key, value, Reducer::Sum)
}
