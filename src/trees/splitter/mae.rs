//! Absolute-error splitting.
//!
//! The cost of a candidate is the sum over both sides of `Σ |y - median|`,
//! computed independently per target column and added up. The ordered sweep
//! keeps one [`RunningMedian`] per side and moves rows across in batches of
//! equal feature value, so every candidate costs O(log n) per moved row.
use std::cmp::Ordering;

use nalgebra::DMatrix;

use super::{leaf_sizes_ok, midpoint, sorted_order, Cut, Splitter};
use crate::{data::dataset::RealNumber, error::TreeError, trees::median::RunningMedian};

#[derive(Clone, Copy, Debug, Default)]
pub struct MaeSplitter;

/// Median found by selection in O(n) expected time. Reorders `values`.
fn select_median<T: RealNumber>(values: &mut [T]) -> Option<T> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    let (below, &mut upper, _) = values
        .select_nth_unstable_by(n / 2, |a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    if n % 2 == 1 {
        return Some(upper);
    }
    let lower = below.iter().copied().fold(T::neg_infinity(), T::max);
    Some((lower + upper) / (T::one() + T::one()))
}

fn absolute_deviation<T: RealNumber>(values: &mut [T]) -> T {
    match select_median(values) {
        Some(median) => values
            .iter()
            .fold(T::zero(), |acc, &value| acc + (value - median).abs()),
        None => T::zero(),
    }
}

fn total_deviation<T: RealNumber>(left: &[RunningMedian<T>], right: &[RunningMedian<T>]) -> T {
    left.iter()
        .zip(right)
        .fold(T::zero(), |acc, (left, right)| {
            acc + (right.absolute_deviation() + left.absolute_deviation())
        })
}

impl<T: RealNumber> Splitter<T> for MaeSplitter {
    fn default_statistic(&self) -> &'static str {
        "median"
    }

    fn binary_cut(
        &self,
        column: &[T],
        y: &DMatrix<T>,
        min_samples_leaf: usize,
    ) -> Result<Option<Cut<T>>, TreeError> {
        let threshold = midpoint(T::zero(), T::one());
        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) =
            (0..column.len()).partition(|&row| column[row] <= threshold);
        if !leaf_sizes_ok(left_rows.len(), right_rows.len(), min_samples_leaf) {
            return Ok(None);
        }

        let cost = y.column_iter().fold(T::zero(), |acc, target| {
            let mut left = left_rows.iter().map(|&row| target[row]).collect::<Vec<_>>();
            let mut right = right_rows.iter().map(|&row| target[row]).collect::<Vec<_>>();
            acc + (absolute_deviation(&mut right) + absolute_deviation(&mut left))
        });
        Ok(Some(Cut { threshold, cost }))
    }

    fn ordered_cut(
        &self,
        column: &[T],
        y: &DMatrix<T>,
        min_samples_leaf: usize,
    ) -> Result<Option<Cut<T>>, TreeError> {
        let order = sorted_order(column);
        let values = order.iter().map(|&row| column[row]).collect::<Vec<_>>();
        let targets = y
            .column_iter()
            .map(|target| order.iter().map(|&row| target[row]).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let n = values.len();

        let mut right = targets
            .iter()
            .map(|target| RunningMedian::new(target))
            .collect::<Vec<_>>();
        let mut left = targets
            .iter()
            .map(|_| RunningMedian::new(&[]))
            .collect::<Vec<_>>();

        let mut best: Option<Cut<T>> = None;
        let mut batch_start = 0;
        for i in 0..n.saturating_sub(1) {
            if values[i + 1] <= values[i] {
                continue;
            }
            for ((target, to), from) in targets.iter().zip(&mut left).zip(&mut right) {
                let batch = &target[batch_start..=i];
                to.insert(batch);
                from.remove(batch)?;
            }
            batch_start = i + 1;

            let cost = total_deviation(&left, &right);
            let sizes_ok = leaf_sizes_ok(i + 1, n - i - 1, min_samples_leaf);
            if sizes_ok && best.map_or(true, |current| cost < current.cost) {
                best = Some(Cut {
                    threshold: midpoint(values[i], values[i + 1]),
                    cost,
                });
            }
        }
        Ok(best)
    }
}
