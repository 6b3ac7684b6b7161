//! Cut-point search for a single node.
//!
//! A [`Splitter`] looks at one feature column at a time and returns the
//! threshold minimizing its impurity cost, or `None` when the column cannot be
//! cut (constant values, or no candidate leaving `min_samples_leaf` rows on
//! both sides). [`Splitter::select_best`] runs that search over every feature
//! column of a [`SampleTable`] and keeps the cheapest.
use std::cmp::Ordering;

use nalgebra::DMatrix;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::trace;

use super::node::SplitRule;
use crate::{
    data::dataset::{RealNumber, SampleTable},
    error::TreeError,
};

pub mod mae;
pub mod mse;

pub use mae::MaeSplitter;
pub use mse::MseSplitter;

/// Best threshold found on one feature column and its cost.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cut<T> {
    pub threshold: T,
    pub cost: T,
}

/// Best split over all feature columns of a table.
#[derive(Clone, Debug, PartialEq)]
pub struct BestSplit<T: RealNumber> {
    pub rule: SplitRule<T>,
    pub cost: T,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every value is the same (or the column is empty).
    Constant,
    /// Only 0 and 1 occur, both at least once.
    Binary,
    Ordered,
}

pub fn column_kind<T: RealNumber>(column: &[T]) -> ColumnKind {
    let Some(&first) = column.first() else {
        return ColumnKind::Constant;
    };
    if column.iter().all(|&value| value == first) {
        ColumnKind::Constant
    } else if column
        .iter()
        .all(|&value| value == T::zero() || value == T::one())
    {
        ColumnKind::Binary
    } else {
        ColumnKind::Ordered
    }
}

pub trait Splitter<T: RealNumber>: Send + Sync {
    /// Name of the node statistic predictions read by default.
    fn default_statistic(&self) -> &'static str;

    /// Full sweep over every boundary between consecutive distinct values.
    fn ordered_cut(
        &self,
        column: &[T],
        y: &DMatrix<T>,
        min_samples_leaf: usize,
    ) -> Result<Option<Cut<T>>, TreeError>;

    /// Cut of a 0/1 column at 0.5. Splitters with a cheaper direct formula
    /// override this.
    fn binary_cut(
        &self,
        column: &[T],
        y: &DMatrix<T>,
        min_samples_leaf: usize,
    ) -> Result<Option<Cut<T>>, TreeError> {
        self.ordered_cut(column, y, min_samples_leaf)
    }

    /// Rejects tables this splitter cannot score.
    fn validate(&self, _table: &SampleTable<T>) -> Result<(), TreeError> {
        Ok(())
    }

    fn best_cut(
        &self,
        column: &[T],
        y: &DMatrix<T>,
        min_samples_leaf: usize,
    ) -> Result<Option<Cut<T>>, TreeError> {
        match column_kind(column) {
            ColumnKind::Constant => Ok(None),
            ColumnKind::Binary => self.binary_cut(column, y, min_samples_leaf),
            ColumnKind::Ordered => self.ordered_cut(column, y, min_samples_leaf),
        }
    }

    /// Picks the feature whose best cut is cheapest. Ties go to the lower
    /// feature index. `None` means the node should become a leaf.
    fn select_best(
        &self,
        table: &SampleTable<T>,
        min_samples_leaf: usize,
    ) -> Result<Option<BestSplit<T>>, TreeError> {
        let y = table.y();
        let cuts = (0..table.ncols())
            .into_par_iter()
            .map(|feature| (feature, self.best_cut(&table.column(feature), y, min_samples_leaf)))
            .collect::<Vec<_>>();

        let mut best: Option<BestSplit<T>> = None;
        for (feature, cut) in cuts {
            let cut = cut?;
            trace!(feature, ?cut, "evaluated feature");
            if let Some(Cut { threshold, cost }) = cut {
                if best.as_ref().map_or(true, |current| cost < current.cost) {
                    best = Some(BestSplit {
                        rule: SplitRule::axis(feature, threshold),
                        cost,
                    });
                }
            }
        }
        Ok(best)
    }
}

/// Row indices ordering `column` ascending; equal values keep row order.
pub(crate) fn sorted_order<T: RealNumber>(column: &[T]) -> Vec<usize> {
    let mut order = (0..column.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| {
        column[a]
            .partial_cmp(&column[b])
            .unwrap_or(Ordering::Equal)
    });
    order
}

/// Threshold between two consecutive distinct values, always `>= low` and
/// `< high`. Adjacent floats and overflowing sums fall back to `low`.
pub(crate) fn midpoint<T: RealNumber>(low: T, high: T) -> T {
    let middle = low + (high - low) / (T::one() + T::one());
    if middle.is_finite() && middle < high {
        middle
    } else {
        low
    }
}

pub(crate) fn count<T: RealNumber>(n: usize) -> T {
    T::from_usize(n).unwrap_or_else(T::infinity)
}

pub(crate) fn leaf_sizes_ok(left: usize, right: usize, min_samples_leaf: usize) -> bool {
    left > 0 && right > 0 && left >= min_samples_leaf && right >= min_samples_leaf
}

#[cfg(test)]
mod tests {
    use nalgebra::DVector;

    use super::*;

    #[test]
    fn test_column_kind() {
        assert_eq!(column_kind::<f64>(&[]), ColumnKind::Constant);
        assert_eq!(column_kind(&[0.0, 0.0]), ColumnKind::Constant);
        assert_eq!(column_kind(&[1.0, 1.0, 1.0]), ColumnKind::Constant);
        assert_eq!(column_kind(&[3.5, 3.5]), ColumnKind::Constant);
        assert_eq!(column_kind(&[0.0, 1.0, 1.0]), ColumnKind::Binary);
        assert_eq!(column_kind(&[0.0, 1.0, 2.0]), ColumnKind::Ordered);
    }

    #[test]
    fn test_sorted_order_is_stable() {
        assert_eq!(sorted_order(&[3.0, 1.0, 3.0, 2.0]), vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_select_best_prefers_cheaper_feature() {
        // Feature 0 is noise, feature 1 separates the targets perfectly.
        let x = DMatrix::from_row_slice(
            6,
            2,
            &[3.0, 0.0, 1.0, 1.0, 2.0, 2.0, 0.0, 3.0, 5.0, 4.0, 4.0, 5.0],
        );
        let y = DVector::from_vec(vec![1.0, 1.0, 1.0, 9.0, 9.0, 9.0]);
        let table = SampleTable::from_vector(x, y).unwrap();

        let best = MseSplitter::new().select_best(&table, 1).unwrap().unwrap();
        assert_eq!(best.rule, SplitRule::axis(1, 2.5));

        let best = MaeSplitter.select_best(&table, 1).unwrap().unwrap();
        assert_eq!(best.rule, SplitRule::axis(1, 2.5));
    }

    #[test]
    fn test_select_best_breaks_ties_by_feature_index() {
        let column = [0.0, 1.0, 2.0, 3.0];
        let x = DMatrix::from_fn(4, 2, |row, _| column[row]);
        let y = DVector::from_vec(vec![1.0, 1.0, 5.0, 5.0]);
        let table = SampleTable::from_vector(x, y).unwrap();

        let best = MseSplitter::new().select_best(&table, 1).unwrap().unwrap();
        assert_eq!(best.rule, SplitRule::axis(0, 1.5));
    }

    #[test]
    fn test_midpoint_stays_below_the_upper_value() {
        assert_eq!(midpoint(2.0, 3.0), 2.5);
        assert_eq!(midpoint(-1.0, 0.0), -0.5);

        let low = 1.0 + f64::EPSILON;
        let high = 1.0 + 2.0 * f64::EPSILON;
        assert_eq!(midpoint(low, high), low);

        let middle: f64 = midpoint(1e308, 1.7e308);
        assert!(middle.is_finite());
        assert!(middle >= 1e308 && middle < 1.7e308);
        assert_eq!(midpoint(-f64::MAX, f64::MAX), -f64::MAX);
        assert_eq!(midpoint(1.0, f64::INFINITY), 1.0);
    }

    fn check_cut_separates<P: Splitter<f64>>(splitter: &P, column: [f64; 2]) {
        let x = DMatrix::from_column_slice(2, 1, &column);
        let y = DVector::from_vec(vec![0.0, 10.0]);
        let table = SampleTable::from_vector(x, y).unwrap();

        let best = splitter.select_best(&table, 1).unwrap().unwrap();
        let (left, right) = table.partition(&best.rule);
        assert_eq!(left.nrows(), 1);
        assert_eq!(right.nrows(), 1);
        assert_eq!(left.y()[(0, 0)], 0.0);
    }

    #[test]
    fn test_cuts_between_extreme_values_separate_rows() {
        let adjacent = [1.0 + f64::EPSILON, 1.0 + 2.0 * f64::EPSILON];
        let huge = [1e308, 1.7e308];
        check_cut_separates(&MseSplitter::new(), adjacent);
        check_cut_separates(&MaeSplitter, adjacent);
        check_cut_separates(&MseSplitter::new(), huge);
        check_cut_separates(&MaeSplitter, huge);
    }

    #[test]
    fn test_select_best_on_constant_features() {
        let x = DMatrix::from_element(5, 3, 1.0);
        let y = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let table = SampleTable::from_vector(x, y).unwrap();

        assert!(MseSplitter::new().select_best(&table, 1).unwrap().is_none());
        assert!(MaeSplitter.select_best(&table, 1).unwrap().is_none());
    }
}
