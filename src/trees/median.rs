//! Running median over a multiset that changes in batches.
//!
//! The multiset is kept as two ordered halves. `low` holds the smaller half
//! (one extra element when the count is odd) and `high` the rest, so the
//! median is read off the boundary in O(1) and every insert or remove costs
//! O(log n). Running sums of both halves give the sum of absolute deviations
//! from the median without touching the elements.
use std::{cmp::Ordering, collections::BTreeMap};

use crate::{data::dataset::RealNumber, error::TreeError};

#[derive(Clone, Copy, Debug)]
struct Key<T>(T);

impl<T: RealNumber> PartialEq for Key<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: RealNumber> Eq for Key<T> {}

impl<T: RealNumber> PartialOrd for Key<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// NaN never reaches this point: sample tables reject it.
impl<T: RealNumber> Ord for Key<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }
}

/// Ordered multiset with multiplicities.
#[derive(Clone, Debug)]
struct SortedBag<T> {
    counts: BTreeMap<Key<T>, usize>,
    len: usize,
}

impl<T: RealNumber> SortedBag<T> {
    fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
            len: 0,
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn insert(&mut self, value: T) {
        *self.counts.entry(Key(value)).or_insert(0) += 1;
        self.len += 1;
    }

    fn remove(&mut self, value: T) -> bool {
        let key = Key(value);
        let Some(count) = self.counts.get_mut(&key) else {
            return false;
        };
        *count -= 1;
        if *count == 0 {
            self.counts.remove(&key);
        }
        self.len -= 1;
        true
    }

    fn first(&self) -> Option<T> {
        self.counts.keys().next().map(|key| key.0)
    }

    fn last(&self) -> Option<T> {
        self.counts.keys().next_back().map(|key| key.0)
    }

    fn pop_first(&mut self) -> Option<T> {
        let value = self.first()?;
        self.remove(value);
        Some(value)
    }

    fn pop_last(&mut self) -> Option<T> {
        let value = self.last()?;
        self.remove(value);
        Some(value)
    }
}

#[derive(Clone, Debug)]
pub struct RunningMedian<T: RealNumber> {
    low: SortedBag<T>,
    high: SortedBag<T>,
    low_sum: T,
    high_sum: T,
    median: Option<T>,
}

impl<T: RealNumber> RunningMedian<T> {
    /// Sorts `values` once and puts the lower half (rounded up) in `low`.
    pub fn new(values: &[T]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let split = (sorted.len() + 1) / 2;

        let mut low = SortedBag::new();
        let mut high = SortedBag::new();
        sorted[..split].iter().for_each(|&value| low.insert(value));
        sorted[split..].iter().for_each(|&value| high.insert(value));

        let mut running = Self {
            low,
            high,
            low_sum: sorted[..split].iter().fold(T::zero(), |acc, &value| acc + value),
            high_sum: sorted[split..].iter().fold(T::zero(), |acc, &value| acc + value),
            median: None,
        };
        running.median = running.boundary_median();
        running
    }

    pub fn len(&self) -> usize {
        self.low.len() + self.high.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn low_len(&self) -> usize {
        self.low.len()
    }

    pub fn high_len(&self) -> usize {
        self.high.len()
    }

    pub fn low_sum(&self) -> T {
        self.low_sum
    }

    pub fn high_sum(&self) -> T {
        self.high_sum
    }

    /// `None` only when the multiset is empty.
    pub fn median(&self) -> Option<T> {
        self.median
    }

    /// Sum of `|v - median|` over the multiset.
    pub fn absolute_deviation(&self) -> T {
        match self.median {
            Some(median) => {
                let surplus = T::from_usize(self.low.len() - self.high.len()).unwrap_or_else(T::zero);
                self.high_sum - self.low_sum + median * surplus
            }
            None => T::zero(),
        }
    }

    /// Adds a batch of values. Inserting into an empty structure is the same
    /// as building it from the batch.
    pub fn insert(&mut self, values: &[T]) {
        if self.is_empty() {
            *self = Self::new(values);
            return;
        }
        for &value in values {
            if self.belongs_low(value) {
                self.low.insert(value);
                self.low_sum += value;
            } else {
                self.high.insert(value);
                self.high_sum += value;
            }
        }
        self.rebalance();
    }

    /// Removes a batch of values.
    ///
    /// # Errors
    ///
    /// `ValueNotFound` if a value is missing from the half it would live in.
    /// The structure is left partially updated and should be discarded.
    pub fn remove(&mut self, values: &[T]) -> Result<(), TreeError> {
        for &value in values {
            if self.belongs_low(value) {
                if !self.low.remove(value) {
                    return Err(TreeError::ValueNotFound(value.to_string()));
                }
                self.low_sum -= value;
            } else {
                if !self.high.remove(value) {
                    return Err(TreeError::ValueNotFound(value.to_string()));
                }
                self.high_sum -= value;
            }
        }
        self.rebalance();
        Ok(())
    }

    fn belongs_low(&self, value: T) -> bool {
        self.low.last().is_some_and(|max| value <= max)
    }

    fn rebalance(&mut self) {
        while self.low.len() > self.high.len() + 1 {
            let Some(value) = self.low.pop_last() else {
                break;
            };
            self.high.insert(value);
            self.low_sum -= value;
            self.high_sum += value;
        }
        while self.high.len() > self.low.len() {
            let Some(value) = self.high.pop_first() else {
                break;
            };
            self.low.insert(value);
            self.low_sum += value;
            self.high_sum -= value;
        }
        self.median = self.boundary_median();
    }

    fn boundary_median(&self) -> Option<T> {
        match (self.low.last(), self.high.first()) {
            (Some(max_low), _) if self.low.len() > self.high.len() => Some(max_low),
            (Some(max_low), Some(min_high)) => Some((max_low + min_high) / (T::one() + T::one())),
            _ => None,
        }
    }
}
