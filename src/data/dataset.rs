use nalgebra::{DMatrix, DVector};
use num_traits::{Float, FromPrimitive, Num, ToPrimitive};
use std::cmp::PartialOrd;
use std::fmt::{self, Display};
use std::fmt::{Debug, Formatter};
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

use crate::error::TreeError;
use crate::trees::node::SplitRule;

pub trait DataValue:
    Debug
    + Clone
    + Copy
    + Num
    + FromPrimitive
    + ToPrimitive
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Send
    + Sync
    + Display
    + 'static
{
}

impl<T> DataValue for T where
    T: Debug
        + Clone
        + Copy
        + Num
        + FromPrimitive
        + ToPrimitive
        + AddAssign
        + SubAssign
        + MulAssign
        + DivAssign
        + Send
        + Sync
        + Display
        + 'static
{
}

pub trait Number: DataValue + PartialOrd {}
impl<T> Number for T where T: DataValue + PartialOrd {}

pub trait RealNumber: Number + Float {}
impl<T> RealNumber for T where T: Number + Float {}

/// Opaque identifier carried by every row of a [`SampleTable`].
pub type RowId = usize;

/// Columnar training data: features `x` (n × p), targets `y` (n × q), one
/// identifier per row and a name per feature/target column.
///
/// Tables are never mutated once built. [`SampleTable::partition`] produces
/// fresh row-filtered copies.
#[derive(Clone)]
pub struct SampleTable<T: RealNumber> {
    x: DMatrix<T>,
    y: DMatrix<T>,
    ids: Vec<RowId>,
    feature_names: Vec<String>,
    target_names: Vec<String>,
}

impl<T: RealNumber> Debug for SampleTable<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "SampleTable {{\n    columns: {:?} -> {:?},\n    rows: [\n", self.feature_names, self.target_names)?;

        for i in 0..self.x.nrows() {
            write!(f, "        {}: [", self.ids[i])?;
            for j in 0..self.x.ncols() {
                write!(f, "{:?}, ", self.x[(i, j)])?;
            }
            write!(f, "] -> [")?;
            for j in 0..self.y.ncols() {
                write!(f, "{:?}, ", self.y[(i, j)])?;
            }
            writeln!(f, "],")?;
        }

        write!(f, "    ]\n}}")
    }
}

fn default_names(count: usize) -> Vec<String> {
    (0..count).map(|index| index.to_string()).collect()
}

impl<T: RealNumber> SampleTable<T> {
    /// Builds a table from a feature matrix and a (possibly multi-column)
    /// target matrix. Row ids default to `0..n` and column names to their
    /// indices.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if the row counts differ, `InvalidValue` if either
    /// matrix contains NaN.
    pub fn new(x: DMatrix<T>, y: DMatrix<T>) -> Result<Self, TreeError> {
        if x.nrows() != y.nrows() {
            return Err(TreeError::ShapeMismatch(format!(
                "x has {} rows but y has {}",
                x.nrows(),
                y.nrows()
            )));
        }
        if x.iter().any(|value| value.is_nan()) {
            return Err(TreeError::InvalidValue("x contains NaN".into()));
        }
        if y.iter().any(|value| value.is_nan()) {
            return Err(TreeError::InvalidValue("y contains NaN".into()));
        }

        Ok(Self {
            ids: (0..x.nrows()).collect(),
            feature_names: default_names(x.ncols()),
            target_names: default_names(y.ncols()),
            x,
            y,
        })
    }

    /// Same as [`SampleTable::new`] for a single target given as a vector,
    /// which is stored as an n × 1 matrix.
    pub fn from_vector(x: DMatrix<T>, y: DVector<T>) -> Result<Self, TreeError> {
        let nrows = y.len();
        Self::new(x, DMatrix::from_column_slice(nrows, 1, y.as_slice()))
    }

    pub fn with_ids(mut self, ids: Vec<RowId>) -> Result<Self, TreeError> {
        if ids.len() != self.nrows() {
            return Err(TreeError::ShapeMismatch(format!(
                "{} row ids given for {} rows",
                ids.len(),
                self.nrows()
            )));
        }
        self.ids = ids;
        Ok(self)
    }

    pub fn with_feature_names(mut self, names: Vec<String>) -> Result<Self, TreeError> {
        if names.len() != self.ncols() {
            return Err(TreeError::ShapeMismatch(format!(
                "{} feature names given for {} columns",
                names.len(),
                self.ncols()
            )));
        }
        self.feature_names = names;
        Ok(self)
    }

    pub fn with_target_names(mut self, names: Vec<String>) -> Result<Self, TreeError> {
        if names.len() != self.ntargets() {
            return Err(TreeError::ShapeMismatch(format!(
                "{} target names given for {} columns",
                names.len(),
                self.ntargets()
            )));
        }
        self.target_names = names;
        Ok(self)
    }

    pub fn x(&self) -> &DMatrix<T> {
        &self.x
    }

    pub fn y(&self) -> &DMatrix<T> {
        &self.y
    }

    pub fn ids(&self) -> &[RowId] {
        &self.ids
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn target_names(&self) -> &[String] {
        &self.target_names
    }

    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.x.ncols()
    }

    pub fn ntargets(&self) -> usize {
        self.y.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.nrows() == 0
    }

    /// Copies feature column `index` out of the table.
    pub fn column(&self, index: usize) -> Vec<T> {
        self.x.column(index).iter().copied().collect()
    }

    /// Copies target column `index` out of the table.
    pub fn target_column(&self, index: usize) -> Vec<T> {
        self.y.column(index).iter().copied().collect()
    }

    /// Splits the rows into those the rule routes left and those it routes
    /// right. Both halves keep their row ids and the column names.
    pub fn partition(&self, rule: &SplitRule<T>) -> (Self, Self) {
        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) =
            (0..self.nrows()).partition(|&index| rule.goes_left(&self.x.row(index)));

        (self.select(&left_indices), self.select(&right_indices))
    }

    fn select(&self, indices: &[usize]) -> Self {
        Self {
            x: self.x.select_rows(indices.iter()),
            y: self.y.select_rows(indices.iter()),
            ids: indices.iter().map(|&index| self.ids[index]).collect(),
            feature_names: self.feature_names.clone(),
            target_names: self.target_names.clone(),
        }
    }

    /// Unbiased (n - 1) sample covariance of the target columns.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the table has fewer than two rows.
    pub fn target_covariance(&self) -> Result<DMatrix<T>, TreeError> {
        let (nrows, ntargets) = self.y.shape();
        if nrows < 2 {
            return Err(TreeError::InvalidParameter(
                "covariance needs at least two rows".into(),
            ));
        }
        let n = T::from_usize(nrows)
            .ok_or_else(|| TreeError::InvalidValue("Couldn't transform from usize".into()))?;
        let means = self
            .y
            .column_iter()
            .map(|column| column.sum() / n)
            .collect::<Vec<_>>();

        let mut covariance = DMatrix::zeros(ntargets, ntargets);
        for a in 0..ntargets {
            for b in a..ntargets {
                let mut sum = T::zero();
                for row in 0..nrows {
                    sum += (self.y[(row, a)] - means[a]) * (self.y[(row, b)] - means[b]);
                }
                let value = sum / (n - T::one());
                covariance[(a, b)] = value;
                covariance[(b, a)] = value;
            }
        }
        Ok(covariance)
    }
}
