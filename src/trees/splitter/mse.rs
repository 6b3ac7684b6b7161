//! Squared-error splitting.
//!
//! For a group with target rows `y_i`, sum `S` and count `N` the cost is
//! `Σ y_iᵀ W y_i - Sᵀ W S / N`, i.e. the sum of squared (Mahalanobis, when `W`
//! is an inverse covariance) distances to the group mean. The first term is
//! the same for every candidate, so a sweep only has to track `S` and `N` on
//! both sides.
use nalgebra::{DMatrix, DVector};

use super::{count, leaf_sizes_ok, midpoint, sorted_order, Cut, Splitter};
use crate::{
    data::dataset::{RealNumber, SampleTable},
    error::TreeError,
};

#[derive(Clone, Debug, Default)]
pub struct MseSplitter<T: RealNumber> {
    weights: Option<DMatrix<T>>,
}

impl<T: RealNumber> MseSplitter<T> {
    /// Plain sum of squared errors over all target columns.
    pub fn new() -> Self {
        Self { weights: None }
    }

    /// Weights target errors by the inverse of `covariance`.
    ///
    /// # Errors
    ///
    /// `SingularCovariance` if the matrix is not square or cannot be inverted.
    pub fn with_covariance(covariance: &DMatrix<T>) -> Result<Self, TreeError> {
        if !covariance.is_square() {
            return Err(TreeError::SingularCovariance(format!(
                "expected a square matrix, got {}x{}",
                covariance.nrows(),
                covariance.ncols()
            )));
        }
        let inverse = covariance
            .map(|value| value.to_f64().unwrap_or(f64::NAN))
            .try_inverse()
            .ok_or_else(|| TreeError::SingularCovariance("matrix is singular".into()))?;

        Ok(Self {
            weights: Some(inverse.map(|value| T::from_f64(value).unwrap_or_else(T::nan))),
        })
    }

    pub fn weights(&self) -> Option<&DMatrix<T>> {
        self.weights.as_ref()
    }

    fn quadratic(&self, v: &DVector<T>) -> T {
        match &self.weights {
            Some(weights) => v.dot(&(weights * v)),
            None => v.dot(v),
        }
    }

    fn target_rows(y: &DMatrix<T>, order: &[usize]) -> Vec<DVector<T>> {
        order.iter().map(|&row| y.row(row).transpose()).collect()
    }
}

impl<T: RealNumber> Splitter<T> for MseSplitter<T> {
    fn default_statistic(&self) -> &'static str {
        "mean"
    }

    fn validate(&self, table: &SampleTable<T>) -> Result<(), TreeError> {
        match &self.weights {
            Some(weights) if weights.nrows() != table.ntargets() => {
                Err(TreeError::ShapeMismatch(format!(
                    "covariance is {}x{} but there are {} targets",
                    weights.nrows(),
                    weights.ncols(),
                    table.ntargets()
                )))
            }
            _ => Ok(()),
        }
    }

    // O(n) from two group sums; no sort needed.
    fn binary_cut(
        &self,
        column: &[T],
        y: &DMatrix<T>,
        min_samples_leaf: usize,
    ) -> Result<Option<Cut<T>>, TreeError> {
        let threshold = midpoint(T::zero(), T::one());
        let mut sums = [DVector::zeros(y.ncols()), DVector::zeros(y.ncols())];
        let mut counts = [0usize; 2];
        let mut total_quadratic = T::zero();

        for (row, &value) in column.iter().enumerate() {
            let side = usize::from(value > threshold);
            let target = y.row(row).transpose();
            total_quadratic += self.quadratic(&target);
            sums[side] += &target;
            counts[side] += 1;
        }

        if !leaf_sizes_ok(counts[0], counts[1], min_samples_leaf) {
            return Ok(None);
        }
        let cost = total_quadratic
            - self.quadratic(&sums[0]) / count(counts[0])
            - self.quadratic(&sums[1]) / count(counts[1]);
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
        let targets = Self::target_rows(y, &order);
        let n = values.len();

        let total_quadratic = targets
            .iter()
            .fold(T::zero(), |acc, target| acc + self.quadratic(target));
        let mut left_sum = DVector::zeros(y.ncols());
        let mut right_sum = targets
            .iter()
            .fold(DVector::zeros(y.ncols()), |acc, target| acc + target);

        let mut best: Option<Cut<T>> = None;
        for i in 0..n.saturating_sub(1) {
            left_sum += &targets[i];
            right_sum -= &targets[i];
            let (n_left, n_right) = (i + 1, n - i - 1);

            if values[i + 1] > values[i] && leaf_sizes_ok(n_left, n_right, min_samples_leaf) {
                let cost = total_quadratic
                    - (self.quadratic(&left_sum) / count(n_left)
                        + self.quadratic(&right_sum) / count(n_right));
                if best.map_or(true, |current| cost < current.cost) {
                    best = Some(Cut {
                        threshold: midpoint(values[i], values[i + 1]),
                        cost,
                    });
                }
            }
        }
        Ok(best)
    }
}
