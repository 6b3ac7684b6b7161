use std::{
    collections::BTreeMap,
    fmt::{self, Debug, Formatter},
    ops::Index,
    sync::Arc,
};

use nalgebra::DVector;

use crate::{
    data::dataset::{RealNumber, RowId, SampleTable},
    error::TreeError,
};

/// Side of a split a sample is routed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Branch {
    Left,
    Right,
}

/// Predicate sending a sample left when its (weighted) feature value is at
/// most the threshold.
#[derive(Clone, Debug, PartialEq)]
pub enum SplitRule<T: RealNumber> {
    /// Threshold on a single feature column.
    Axis { feature: usize, threshold: T },
    /// Threshold on a linear combination of all feature columns. The
    /// coefficient vector must be as long as a feature row.
    Oblique {
        coefficients: DVector<T>,
        threshold: T,
    },
}

impl<T: RealNumber> SplitRule<T> {
    pub fn axis(feature: usize, threshold: T) -> Self {
        Self::Axis { feature, threshold }
    }

    pub fn oblique(coefficients: DVector<T>, threshold: T) -> Self {
        Self::Oblique {
            coefficients,
            threshold,
        }
    }

    pub fn threshold(&self) -> T {
        match self {
            Self::Axis { threshold, .. } | Self::Oblique { threshold, .. } => *threshold,
        }
    }

    /// Feature columns the rule reads.
    pub fn features(&self) -> Vec<usize> {
        match self {
            Self::Axis { feature, .. } => vec![*feature],
            Self::Oblique { coefficients, .. } => coefficients
                .iter()
                .enumerate()
                .filter(|(_, coefficient)| !coefficient.is_zero())
                .map(|(index, _)| index)
                .collect(),
        }
    }

    pub fn goes_left<R>(&self, row: &R) -> bool
    where
        R: Index<usize, Output = T> + ?Sized,
    {
        match self {
            Self::Axis { feature, threshold } => row[*feature] <= *threshold,
            Self::Oblique {
                coefficients,
                threshold,
            } => {
                let weighted = coefficients
                    .iter()
                    .enumerate()
                    .fold(T::zero(), |acc, (index, &coefficient)| {
                        acc + coefficient * row[index]
                    });
                weighted <= *threshold
            }
        }
    }

    pub fn branch<R>(&self, row: &R) -> Branch
    where
        R: Index<usize, Output = T> + ?Sized,
    {
        if self.goes_left(row) {
            Branch::Left
        } else {
            Branch::Right
        }
    }
}

/// Summary function applied to one target column.
pub type Reducer<T> = Arc<dyn Fn(&[T]) -> T + Send + Sync>;

pub fn mean<T: RealNumber>(values: &[T]) -> T {
    if values.is_empty() {
        return T::nan();
    }
    let sum = values.iter().fold(T::zero(), |acc, &value| acc + value);
    sum / T::from_usize(values.len()).unwrap_or_else(T::nan)
}

pub fn median<T: RealNumber>(values: &[T]) -> T {
    quantile_of(values, 0.5)
}

/// Reducer returning the `q`-th quantile with linear interpolation between
/// order statistics.
pub fn quantile<T: RealNumber>(q: f64) -> impl Fn(&[T]) -> T + Send + Sync + 'static {
    move |values: &[T]| quantile_of(values, q)
}

fn quantile_of<T: RealNumber>(values: &[T], q: f64) -> T {
    if values.is_empty() {
        return T::nan();
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    // Matches the usual midpoint rule for an even-sized median.
    if q == 0.5 {
        return (sorted[lower] + sorted[upper]) / T::from_f64(2.0).unwrap_or_else(T::nan);
    }
    let fraction = T::from_f64(position - lower as f64).unwrap_or_else(T::nan);
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Describes which statistics a [`Node`] keeps: named reducers applied to
/// every target column, named reducers applied to every feature column, and
/// whether the node retains the ids of its rows.
#[derive(Clone)]
pub struct NodeSchema<T: RealNumber> {
    reducers: Vec<(String, Reducer<T>)>,
    feature_reducers: Vec<(String, Reducer<T>)>,
    save_ids: bool,
}

impl<T: RealNumber> Debug for NodeSchema<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeSchema")
            .field("statistics", &self.names().collect::<Vec<_>>())
            .field(
                "feature_statistics",
                &self.feature_statistic_names().collect::<Vec<_>>(),
            )
            .field("save_ids", &self.save_ids)
            .finish()
    }
}

impl<T: RealNumber> Default for NodeSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RealNumber> NodeSchema<T> {
    /// A schema keeping nothing but the sample count.
    pub fn new() -> Self {
        Self {
            reducers: Vec::new(),
            feature_reducers: Vec::new(),
            save_ids: false,
        }
    }

    /// Registers `reducer` under `name`, replacing any reducer already using it.
    pub fn with_reducer<F>(mut self, name: &str, reducer: F) -> Self
    where
        F: Fn(&[T]) -> T + Send + Sync + 'static,
    {
        self.reducers.retain(|(existing, _)| existing != name);
        self.reducers.push((name.to_string(), Arc::new(reducer)));
        self
    }

    /// Registers `reducer` over the feature columns under `name`.
    pub fn with_feature_reducer<F>(mut self, name: &str, reducer: F) -> Self
    where
        F: Fn(&[T]) -> T + Send + Sync + 'static,
    {
        self.feature_reducers.retain(|(existing, _)| existing != name);
        self.feature_reducers
            .push((name.to_string(), Arc::new(reducer)));
        self
    }

    pub fn with_saved_ids(mut self, save_ids: bool) -> Self {
        self.save_ids = save_ids;
        self
    }

    pub fn mean() -> Self {
        Self::new().with_reducer("mean", mean)
    }

    pub fn median() -> Self {
        Self::new().with_reducer("median", median)
    }

    /// Keeps both mean and median along with the row ids, for inspecting
    /// fitted trees.
    pub fn mean_median() -> Self {
        Self::mean()
            .with_reducer("median", median)
            .with_saved_ids(true)
    }

    /// The built-in schema providing the statistic `name`.
    pub fn for_statistic(name: &str) -> Result<Self, TreeError> {
        match name {
            "mean" => Ok(Self::mean()),
            "median" => Ok(Self::median()),
            _ => Err(TreeError::UnknownStatistic(name.to_string())),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.reducers.iter().map(|(name, _)| name.as_str())
    }

    pub fn feature_statistic_names(&self) -> impl Iterator<Item = &str> {
        self.feature_reducers.iter().map(|(name, _)| name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names().any(|existing| existing == name)
    }

    pub fn saves_ids(&self) -> bool {
        self.save_ids
    }

    /// Summarizes `table` into a node. A `None` rule makes the node a leaf.
    pub fn reduce(&self, table: &SampleTable<T>, rule: Option<SplitRule<T>>) -> Node<T> {
        let targets = (0..table.ntargets())
            .map(|index| table.target_column(index))
            .collect::<Vec<_>>();
        let features = if self.feature_reducers.is_empty() {
            Vec::new()
        } else {
            (0..table.ncols())
                .map(|index| table.column(index))
                .collect::<Vec<_>>()
        };

        Node {
            n_samples: table.nrows(),
            rule,
            statistics: reduce_columns(&self.reducers, &targets),
            feature_statistics: reduce_columns(&self.feature_reducers, &features),
            saved_ids: self.save_ids.then(|| table.ids().to_vec()),
        }
    }
}

fn reduce_columns<T: RealNumber>(
    reducers: &[(String, Reducer<T>)],
    columns: &[Vec<T>],
) -> BTreeMap<String, DVector<T>> {
    reducers
        .iter()
        .map(|(name, reducer)| {
            let values = columns
                .iter()
                .map(|column| reducer(column.as_slice()))
                .collect::<Vec<_>>();
            (name.clone(), DVector::from_vec(values))
        })
        .collect()
}

/// Immutable summary of the samples that reached one tree position.
#[derive(Clone, Debug, PartialEq)]
pub struct Node<T: RealNumber> {
    n_samples: usize,
    rule: Option<SplitRule<T>>,
    statistics: BTreeMap<String, DVector<T>>,
    feature_statistics: BTreeMap<String, DVector<T>>,
    saved_ids: Option<Vec<RowId>>,
}

impl<T: RealNumber> Node<T> {
    pub fn new(
        n_samples: usize,
        rule: Option<SplitRule<T>>,
        statistics: BTreeMap<String, DVector<T>>,
    ) -> Self {
        Self {
            n_samples,
            rule,
            statistics,
            feature_statistics: BTreeMap::new(),
            saved_ids: None,
        }
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn rule(&self) -> Option<&SplitRule<T>> {
        self.rule.as_ref()
    }

    pub fn statistic(&self, name: &str) -> Option<&DVector<T>> {
        self.statistics.get(name)
    }

    pub fn statistics(&self) -> &BTreeMap<String, DVector<T>> {
        &self.statistics
    }

    /// One value per feature column, for reducers registered with
    /// [`NodeSchema::with_feature_reducer`].
    pub fn feature_statistic(&self, name: &str) -> Option<&DVector<T>> {
        self.feature_statistics.get(name)
    }

    pub fn saved_ids(&self) -> Option<&[RowId]> {
        self.saved_ids.as_deref()
    }

    /// True when no split rule was chosen for this node.
    pub fn is_leaf(&self) -> bool {
        self.rule.is_none()
    }

    pub fn route<R>(&self, row: &R) -> Result<Branch, TreeError>
    where
        R: Index<usize, Output = T> + ?Sized,
    {
        self.rule
            .as_ref()
            .map(|rule| rule.branch(row))
            .ok_or(TreeError::NotRoutable)
    }
}
