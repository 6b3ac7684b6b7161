use nalgebra::DMatrix;

use crate::{data::dataset::RealNumber, error::TreeError};

fn check_shapes<T: RealNumber>(y_true: &DMatrix<T>, y_pred: &DMatrix<T>) -> Result<T, TreeError> {
    if y_true.shape() != y_pred.shape() {
        return Err(TreeError::ShapeMismatch(format!(
            "Predictions ({:?}) and labels ({:?}) are of different sizes.",
            y_pred.shape(),
            y_true.shape()
        )));
    }
    if y_true.is_empty() {
        return Err(TreeError::ShapeMismatch("No labels to compare against.".into()));
    }
    T::from_usize(y_true.len())
        .ok_or_else(|| TreeError::InvalidValue("Couldn't transform from usize".into()))
}

/// Error measures over an n × q target matrix. Every entry counts once, so
/// multi-target scores average over all targets.
pub trait RegressionMetrics<T: RealNumber> {
    fn mse(&self, y_true: &DMatrix<T>, y_pred: &DMatrix<T>) -> Result<T, TreeError> {
        let n = check_shapes(y_true, y_pred)?;
        let errors = y_pred - y_true;
        let errors_sq = errors.component_mul(&errors);

        Ok(errors_sq.sum() / n)
    }

    fn mae(&self, y_true: &DMatrix<T>, y_pred: &DMatrix<T>) -> Result<T, TreeError> {
        let n = check_shapes(y_true, y_pred)?;
        let abs_errors_sum = y_pred
            .iter()
            .zip(y_true.iter())
            .map(|(&y_p, &y_t)| (y_p - y_t).abs())
            .fold(T::zero(), |acc, x| acc + x);

        Ok(abs_errors_sum / n)
    }

    /// Coefficient of determination against the per-target mean.
    fn r2(&self, y_true: &DMatrix<T>, y_pred: &DMatrix<T>) -> Result<T, TreeError> {
        check_shapes(y_true, y_pred)?;
        let rows = T::from_usize(y_true.nrows())
            .ok_or_else(|| TreeError::InvalidValue("Couldn't transform from usize".into()))?;

        let mut residual = T::zero();
        let mut total = T::zero();
        for (truth, prediction) in y_true.column_iter().zip(y_pred.column_iter()) {
            let mean = truth.sum() / rows;
            for (&y_t, &y_p) in truth.iter().zip(prediction.iter()) {
                residual += (y_t - y_p) * (y_t - y_p);
                total += (y_t - mean) * (y_t - mean);
            }
        }

        Ok(T::one() - residual / total)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    struct Scorer;
    impl RegressionMetrics<f64> for Scorer {}

    #[test]
    fn test_mse_and_mae() {
        let y_true = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let y_pred = DMatrix::from_row_slice(2, 2, &[1.0, 3.0, 1.0, 4.0]);

        assert_relative_eq!(Scorer.mse(&y_true, &y_pred).unwrap(), 1.25);
        assert_relative_eq!(Scorer.mae(&y_true, &y_pred).unwrap(), 0.75);
    }

    #[test]
    fn test_r2() {
        let y_true = DMatrix::from_column_slice(4, 1, &[1.0, 2.0, 3.0, 4.0]);
        assert_relative_eq!(Scorer.r2(&y_true, &y_true).unwrap(), 1.0);

        let mean = DMatrix::from_element(4, 1, 2.5);
        assert_relative_eq!(Scorer.r2(&y_true, &mean).unwrap(), 0.0);
    }

    #[test]
    fn test_shape_mismatch() {
        let y_true = DMatrix::<f64>::zeros(3, 1);
        let y_pred = DMatrix::<f64>::zeros(3, 2);
        assert!(matches!(
            Scorer.mse(&y_true, &y_pred),
            Err(TreeError::ShapeMismatch(_))
        ));
        assert!(matches!(
            Scorer.r2(&DMatrix::<f64>::zeros(0, 1), &DMatrix::<f64>::zeros(0, 1)),
            Err(TreeError::ShapeMismatch(_))
        ));
    }
}
