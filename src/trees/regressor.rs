//! Decision Tree Regressor
use std::marker::PhantomData;

use nalgebra::{DMatrix, DVector};
use tracing::{debug, info};

use super::{
    node::{Branch, Node, NodeSchema, SplitRule},
    params::TreeParams,
    splitter::{leaf_sizes_ok, Splitter},
    storage::{LinkedTree, TreeCursor, TreeStorage},
};
use crate::{
    data::dataset::{RealNumber, SampleTable},
    error::TreeError,
    metrics::errors::RegressionMetrics,
};

/// Parent/child link reported by [`DecisionTreeRegressor::nodes_and_edges`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge<I> {
    pub parent: I,
    pub child: I,
    /// `Left` is the `<= threshold` side.
    pub branch: Branch,
}

/// Read-only description of one fitted node, enough to draw it.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSummary<T: RealNumber, I> {
    pub id: I,
    pub depth: usize,
    pub parent: Option<I>,
    pub children: Option<(I, I)>,
    /// No children in the stored tree. A node cut off by `max_depth` is a
    /// leaf here even though it carries a split rule.
    pub is_leaf: bool,
    pub n_samples: usize,
    /// Value of the prediction statistic, if the node keeps it.
    pub statistic: Option<DVector<T>>,
    /// Names of the features the split rule reads (empty without a rule).
    pub features: Vec<String>,
    pub threshold: Option<T>,
}

/// Decision Tree Regressor
///
/// Grows a binary tree over a [`SampleTable`] with any [`Splitter`] and
/// stores it in `S`. Predictions read a named statistic off the leaf each
/// row lands in: the splitter's default unless another is asked for.
#[derive(Clone, Debug)]
pub struct DecisionTreeRegressor<T: RealNumber, S: TreeStorage<T> = LinkedTree<T>> {
    tree: Option<S>,
    tree_params: TreeParams,
    schema: Option<NodeSchema<T>>,
    prediction_statistic: Option<String>,
    feature_names: Vec<String>,

    _marker: PhantomData<T>,
}

impl<T: RealNumber, S: TreeStorage<T>> Default for DecisionTreeRegressor<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RealNumber, S: TreeStorage<T>> RegressionMetrics<T> for DecisionTreeRegressor<T, S> {}

impl<T: RealNumber, S: TreeStorage<T>> DecisionTreeRegressor<T, S> {
    /// Creates a new instance of the decision tree regressor with default parameters.
    pub fn new() -> Self {
        Self::with_params(TreeParams::new())
    }

    pub fn with_params(tree_params: TreeParams) -> Self {
        Self {
            tree: None,
            tree_params,
            schema: None,
            prediction_statistic: None,
            feature_names: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Statistics every node keeps. Without a schema, `fit` keeps only the
    /// splitter's default statistic.
    pub fn with_schema(mut self, schema: NodeSchema<T>) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Sets the maximum depth of the tree.
    pub fn set_max_depth(&mut self, max_depth: Option<u16>) -> Result<(), TreeError> {
        self.tree_params.set_max_depth(max_depth)
    }

    /// Sets the minimum number of samples each leaf must keep.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `min_samples_leaf` is 0.
    pub fn set_min_samples_leaf(&mut self, min_samples_leaf: usize) -> Result<(), TreeError> {
        self.tree_params.set_min_samples_leaf(min_samples_leaf)
    }

    pub fn max_depth(&self) -> Option<u16> {
        self.tree_params.max_depth()
    }

    pub fn min_samples_leaf(&self) -> usize {
        self.tree_params.min_samples_leaf()
    }

    pub fn params(&self) -> &TreeParams {
        &self.tree_params
    }

    /// The fitted tree, if any.
    pub fn tree(&self) -> Option<&S> {
        self.tree.as_ref()
    }

    /// Statistic `predict` reads, fixed by the splitter at fit time.
    pub fn prediction_statistic(&self) -> Option<&str> {
        self.prediction_statistic.as_deref()
    }

    /// Builds the tree from `table`, replacing any previous fit.
    ///
    /// Every node is summarized with the schema and asks the splitter for a
    /// rule. Nodes with a rule get children until `max_depth` is reached.
    ///
    /// # Errors
    ///
    /// `EmptyDataset` for a table without rows, plus whatever the splitter
    /// rejects (e.g. a covariance of the wrong size).
    pub fn fit<P: Splitter<T>>(
        &mut self,
        table: &SampleTable<T>,
        splitter: &P,
    ) -> Result<(), TreeError> {
        if table.is_empty() {
            return Err(TreeError::EmptyDataset);
        }
        splitter.validate(table)?;

        let statistic = splitter.default_statistic();
        let schema = match &self.schema {
            Some(schema) => schema.clone(),
            None => NodeSchema::for_statistic(statistic)?,
        };

        let root = Self::build_node(table, splitter, &schema, self.min_samples_leaf(), 0)?;
        let mut tree = S::with_root(root);
        let root_id = tree.root_id();
        self.grow(&mut tree, root_id, table, splitter, &schema, 0)?;

        self.feature_names = table.feature_names().to_vec();
        self.prediction_statistic = Some(statistic.to_string());
        self.tree = Some(tree);

        info!(
            nodes = self.node_count(),
            leaves = self.leaf_count(),
            statistic,
            "finished building the tree"
        );
        Ok(())
    }

    fn build_node<P: Splitter<T>>(
        table: &SampleTable<T>,
        splitter: &P,
        schema: &NodeSchema<T>,
        min_samples_leaf: usize,
        depth: usize,
    ) -> Result<Node<T>, TreeError> {
        let best = splitter.select_best(table, min_samples_leaf)?;
        if let Some(best) = &best {
            debug!(
                depth,
                features = ?best.rule.features(),
                threshold = %best.rule.threshold(),
                cost = %best.cost,
                n_samples = table.nrows(),
                "found split"
            );
        }
        Ok(schema.reduce(table, best.map(|best| best.rule)))
    }

    fn grow<P: Splitter<T>>(
        &self,
        tree: &mut S,
        id: S::Id,
        table: &SampleTable<T>,
        splitter: &P,
        schema: &NodeSchema<T>,
        depth: usize,
    ) -> Result<(), TreeError> {
        if !self.tree_params.allows_split_at(depth) {
            return Ok(());
        }
        let rule = match tree.get(id).and_then(|(node, _)| node.rule()) {
            Some(rule) => rule.clone(),
            None => return Ok(()),
        };

        // Sibling nodes only read their own half of the table.
        let (left_table, right_table) = table.partition(&rule);
        let min_samples_leaf = self.min_samples_leaf();
        if !leaf_sizes_ok(left_table.nrows(), right_table.nrows(), min_samples_leaf) {
            debug!(
                depth,
                left = left_table.nrows(),
                right = right_table.nrows(),
                "split rule leaves a side too small, keeping the node as a leaf"
            );
            return Ok(());
        }
        let (left, right) = rayon::join(
            || Self::build_node(&left_table, splitter, schema, min_samples_leaf, depth + 1),
            || Self::build_node(&right_table, splitter, schema, min_samples_leaf, depth + 1),
        );
        let (left_id, right_id) = tree.insert_children(id, left?, right?)?;

        self.grow(tree, left_id, &left_table, splitter, schema, depth + 1)?;
        self.grow(tree, right_id, &right_table, splitter, schema, depth + 1)
    }

    fn fitted_tree(&self) -> Result<&S, TreeError> {
        self.tree.as_ref().ok_or(TreeError::NotFitted)
    }

    fn check_features(&self, features: &DMatrix<T>) -> Result<(), TreeError> {
        if features.ncols() != self.feature_names.len() {
            return Err(TreeError::ShapeMismatch(format!(
                "tree was fitted on {} features but got {}",
                self.feature_names.len(),
                features.ncols()
            )));
        }
        Ok(())
    }

    fn leaf_of<R>(tree: &S, row: &R) -> Result<S::Id, TreeError>
    where
        R: std::ops::Index<usize, Output = T> + ?Sized,
    {
        let mut cursor = tree.cursor();
        while !cursor.is_leaf() {
            let branch = cursor.get().0.route(row)?;
            cursor.descend(branch)?;
        }
        Ok(cursor.id())
    }

    /// Leaf id each row of `features` lands in.
    ///
    /// # Errors
    ///
    /// `NotFitted` before `fit`, `ShapeMismatch` for the wrong column count.
    pub fn apply(&self, features: &DMatrix<T>) -> Result<Vec<S::Id>, TreeError> {
        let tree = self.fitted_tree()?;
        self.check_features(features)?;

        (0..features.nrows())
            .map(|row| Self::leaf_of(tree, &features.row(row)))
            .collect()
    }

    /// Predicts with the splitter's default statistic (mean for MSE, median
    /// for MAE). Returns one row per sample and one column per target.
    pub fn predict(&self, features: &DMatrix<T>) -> Result<DMatrix<T>, TreeError> {
        let statistic = self
            .prediction_statistic
            .as_deref()
            .ok_or(TreeError::NotFitted)?;
        self.predict_statistic(features, statistic)
    }

    /// Predicts with any statistic the nodes keep.
    ///
    /// # Errors
    ///
    /// `UnknownStatistic` if a reached leaf doesn't store `statistic`.
    pub fn predict_statistic(
        &self,
        features: &DMatrix<T>,
        statistic: &str,
    ) -> Result<DMatrix<T>, TreeError> {
        let tree = self.fitted_tree()?;
        let leaves = self.apply(features)?;

        let values = leaves
            .into_iter()
            .map(|id| {
                let (node, _) = tree
                    .get(id)
                    .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))?;
                node.statistic(statistic)
                    .cloned()
                    .ok_or_else(|| TreeError::UnknownStatistic(statistic.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let ntargets = tree
            .get(tree.root_id())
            .and_then(|(root, _)| root.statistic(statistic))
            .map_or(0, |value| value.len());
        Ok(DMatrix::from_fn(values.len(), ntargets, |row, col| {
            values[row][col]
        }))
    }

    /// Ids in pre-order down to `max_depth` (root is 0, `None` for all),
    /// plus the edges between them.
    pub fn nodes_and_edges(
        &self,
        max_depth: Option<usize>,
    ) -> Result<(Vec<S::Id>, Vec<Edge<S::Id>>), TreeError> {
        let tree = self.fitted_tree()?;
        let mut nodes = Vec::new();
        let mut edges = Vec::new();

        let mut stack = vec![(tree.root_id(), 0)];
        while let Some((id, depth)) = stack.pop() {
            nodes.push(id);
            if max_depth.is_some_and(|max_depth| depth >= max_depth) {
                continue;
            }
            if let Some((left, right)) = tree.children(id) {
                edges.push(Edge {
                    parent: id,
                    child: left,
                    branch: Branch::Left,
                });
                edges.push(Edge {
                    parent: id,
                    child: right,
                    branch: Branch::Right,
                });
                stack.push((right, depth + 1));
                stack.push((left, depth + 1));
            }
        }
        Ok((nodes, edges))
    }

    pub fn summary(&self, id: S::Id) -> Result<NodeSummary<T, S::Id>, TreeError> {
        let tree = self.fitted_tree()?;
        let (node, depth) = tree
            .get(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))?;
        let children = tree.children(id);

        let features = node
            .rule()
            .map(SplitRule::features)
            .unwrap_or_default()
            .into_iter()
            .map(|index| {
                self.feature_names
                    .get(index)
                    .cloned()
                    .unwrap_or_else(|| index.to_string())
            })
            .collect();

        Ok(NodeSummary {
            id,
            depth,
            parent: tree.parent(id),
            children,
            is_leaf: children.is_none(),
            n_samples: node.n_samples(),
            statistic: self
                .prediction_statistic
                .as_deref()
                .and_then(|name| node.statistic(name))
                .cloned(),
            features,
            threshold: node.rule().map(SplitRule::threshold),
        })
    }

    /// Number of stored nodes, 0 before `fit`.
    pub fn node_count(&self) -> usize {
        self.tree.as_ref().map_or(0, |tree| tree.len())
    }

    /// Number of nodes without children, 0 before `fit`.
    pub fn leaf_count(&self) -> usize {
        self.tree.as_ref().map_or(0, |tree| {
            tree.node_ids()
                .into_iter()
                .filter(|&id| tree.children(id).is_none())
                .count()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use approx::assert_relative_eq;

    use super::*;
    use crate::trees::{
        splitter::{Cut, MaeSplitter, MseSplitter},
        storage::ArrayTree,
    };

    fn one_dimensional() -> SampleTable<f64> {
        let x = DMatrix::from_column_slice(12, 1, &(0..12).map(f64::from).collect::<Vec<_>>());
        let y = DVector::from_vec(vec![
            14.6, 15.1, 15.3, 24.3, 25.2, 25.5, 10.4, 9.8, 9.8, 17.0, 16.9, 17.1,
        ]);
        SampleTable::from_vector(x, y)
            .unwrap()
            .with_feature_names(vec!["x".into()])
            .unwrap()
    }

    fn two_targets() -> SampleTable<f64> {
        let y1 = [
            10.3, 9.8, 9.7, 10.5, 10.0, 9.9, 9.8, 15.0, 15.1, 15.3, 14.6, 14.8, 14.8, 15.4, 15.1,
            15.1, 14.6, 15.3, 15.0, 14.9,
        ];
        let y2 = [
            13.0, 8.0, 7.0, 15.0, 10.0, 9.0, 8.0, 10.0, 11.0, 13.0, 6.0, 8.0, 8.0, 14.0, 26.0,
            26.0, 21.0, 28.0, 25.0, 24.0,
        ];
        let x = DMatrix::from_fn(20, 1, |row, _| row as f64);
        let y = DMatrix::from_fn(20, 2, |row, col| if col == 0 { y1[row] } else { y2[row] });
        SampleTable::new(x, y).unwrap()
    }

    fn regressor<S: TreeStorage<f64>>(min_samples_leaf: usize) -> DecisionTreeRegressor<f64, S> {
        let params = TreeParams::new()
            .with_min_samples_leaf(min_samples_leaf)
            .unwrap();
        DecisionTreeRegressor::with_params(params)
    }

    fn assert_groups_of_three<I: Copy + Eq + std::hash::Hash + std::fmt::Debug>(ids: &[I]) {
        assert_eq!(ids.iter().collect::<HashSet<_>>().len(), 4);
        for group in ids.chunks(3) {
            assert!(group.iter().all(|id| *id == group[0]));
        }
    }

    fn check_mse_tree<S: TreeStorage<f64>>() {
        let table = one_dimensional();
        let mut tree = regressor::<S>(2);
        tree.fit(&table, &MseSplitter::new()).unwrap();

        let predictions = tree.predict(table.x()).unwrap();
        let expected = [15.0, 15.0, 15.0, 25.0, 25.0, 25.0, 10.0, 10.0, 10.0, 17.0, 17.0, 17.0];
        assert_eq!(predictions.shape(), (12, 1));
        for (prediction, expected) in predictions.iter().zip(expected) {
            assert_relative_eq!(*prediction, expected, epsilon = 0.1);
        }

        assert_groups_of_three(&tree.apply(table.x()).unwrap());
        assert_eq!(tree.leaf_count(), 4);
        assert_eq!(tree.node_count(), 7);
        assert_eq!(tree.prediction_statistic(), Some("mean"));
    }

    #[test]
    fn test_mse_tree() {
        check_mse_tree::<LinkedTree<f64>>();
        check_mse_tree::<ArrayTree<f64>>();
    }

    #[test]
    fn test_mae_tree() {
        let table = one_dimensional();
        let mut tree = regressor::<LinkedTree<f64>>(2);
        tree.fit(&table, &MaeSplitter).unwrap();

        let predictions = tree.predict(table.x()).unwrap();
        let expected = [15.1, 15.1, 15.1, 25.2, 25.2, 25.2, 9.8, 9.8, 9.8, 17.0, 17.0, 17.0];
        for (prediction, expected) in predictions.iter().zip(expected) {
            assert_relative_eq!(*prediction, expected, epsilon = 0.1);
        }
        assert_groups_of_three(&tree.apply(table.x()).unwrap());
        assert_eq!(tree.prediction_statistic(), Some("median"));

        // Root cut sits at 8.5 for absolute error.
        let root = tree.tree().unwrap().root_id();
        let summary = tree.summary(root).unwrap();
        assert_eq!(summary.threshold, Some(8.5));
        assert_eq!(summary.features, vec!["x".to_string()]);
    }

    fn check_one_sample_leaves<S: TreeStorage<f64>, P: Splitter<f64>>(splitter: &P) {
        let table = one_dimensional();
        let mut tree = regressor::<S>(1);
        tree.fit(&table, splitter).unwrap();

        let predictions = tree.predict(table.x()).unwrap();
        for (prediction, truth) in predictions.iter().zip(table.y().iter()) {
            assert_relative_eq!(*prediction, *truth, epsilon = 0.1);
        }
        let leaves = tree.apply(table.x()).unwrap();
        assert_eq!(leaves.iter().collect::<HashSet<_>>().len(), 12);
        assert_eq!(tree.leaf_count(), 12);
        assert_eq!(tree.node_count(), 23);
    }

    #[test]
    fn test_with_one_sample_nodes() {
        check_one_sample_leaves::<LinkedTree<f64>, _>(&MseSplitter::new());
        check_one_sample_leaves::<LinkedTree<f64>, _>(&MaeSplitter);
        check_one_sample_leaves::<ArrayTree<f64>, _>(&MseSplitter::new());
        check_one_sample_leaves::<ArrayTree<f64>, _>(&MaeSplitter);
    }

    #[test]
    fn test_2d_predict_returns_correct_dimensions() {
        let table = two_targets();
        let mut tree = DecisionTreeRegressor::<f64>::new();
        tree.set_max_depth(Some(1)).unwrap();
        tree.fit(&table, &MseSplitter::new()).unwrap();

        let head = table.x().rows(0, 5).into_owned();
        let predictions = tree.predict(&head).unwrap();
        assert_eq!(predictions.shape(), (5, 2));
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn test_depth_limited_nodes_keep_their_rule() {
        let table = two_targets();
        let mut tree = DecisionTreeRegressor::<f64, ArrayTree<f64>>::new();
        tree.set_max_depth(Some(1)).unwrap();
        tree.fit(&table, &MseSplitter::new()).unwrap();

        let summary = tree.summary(1).unwrap();
        assert!(summary.is_leaf);
        assert_eq!(summary.depth, 1);
        assert_eq!(summary.parent, Some(0));
        assert!(summary.threshold.is_some());
        let (node, _) = tree.tree().unwrap().get(1).unwrap();
        assert!(!node.is_leaf());
    }

    #[test]
    fn test_stump_is_just_the_root() {
        let table = one_dimensional();
        let mut tree = DecisionTreeRegressor::<f64>::new();
        tree.set_max_depth(Some(0)).unwrap();
        tree.fit(&table, &MseSplitter::new()).unwrap();

        assert_eq!(tree.node_count(), 1);
        let predictions = tree.predict(table.x()).unwrap();
        let mean = table.y().mean();
        assert!(predictions.iter().all(|&value| (value - mean).abs() < 1e-9));
    }

    fn check_adjacent_features<P: Splitter<f64>>(splitter: &P) {
        let x = DMatrix::from_column_slice(2, 1, &[1.0 + f64::EPSILON, 1.0 + 2.0 * f64::EPSILON]);
        let y = DVector::from_vec(vec![0.0, 10.0]);
        let table = SampleTable::from_vector(x, y).unwrap();

        let mut tree = DecisionTreeRegressor::<f64>::new();
        tree.fit(&table, splitter).unwrap();
        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.leaf_count(), 2);
        let predictions = tree.predict(table.x()).unwrap();
        assert_relative_eq!(predictions[(0, 0)], 0.0);
        assert_relative_eq!(predictions[(1, 0)], 10.0);
    }

    #[test]
    fn test_adjacent_float_features_grow_a_finite_tree() {
        check_adjacent_features(&MseSplitter::new());
        check_adjacent_features(&MaeSplitter);
    }

    /// Always proposes a threshold above every feature value.
    struct PastTheEnd;

    impl Splitter<f64> for PastTheEnd {
        fn default_statistic(&self) -> &'static str {
            "mean"
        }

        fn ordered_cut(
            &self,
            column: &[f64],
            _y: &DMatrix<f64>,
            _min_samples_leaf: usize,
        ) -> Result<Option<Cut<f64>>, TreeError> {
            let threshold = column.iter().copied().fold(f64::NEG_INFINITY, f64::max) + 1.0;
            Ok(Some(Cut {
                threshold,
                cost: 0.0,
            }))
        }
    }

    #[test]
    fn test_one_sided_split_keeps_the_node_a_leaf() {
        let table = one_dimensional();
        let mut tree = DecisionTreeRegressor::<f64>::new();
        tree.fit(&table, &PastTheEnd).unwrap();

        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.leaf_count(), 1);
        let root = tree.tree().unwrap().root_id();
        let summary = tree.summary(root).unwrap();
        assert!(summary.is_leaf);
        assert_eq!(summary.n_samples, 12);
        let predictions = tree.predict(table.x()).unwrap();
        assert!(predictions.iter().all(|value| value.is_finite()));
    }

    #[test]
    fn test_nodes_and_edges() {
        let table = one_dimensional();
        let mut tree = regressor::<ArrayTree<f64>>(2);
        tree.fit(&table, &MseSplitter::new()).unwrap();

        let (nodes, edges) = tree.nodes_and_edges(None).unwrap();
        assert_eq!(nodes, vec![0, 1, 3, 4, 2, 5, 6]);
        assert_eq!(edges.len(), 6);
        assert_eq!(
            edges[0],
            Edge {
                parent: 0,
                child: 1,
                branch: Branch::Left
            }
        );

        let (nodes, edges) = tree.nodes_and_edges(Some(1)).unwrap();
        assert_eq!(nodes, vec![0, 1, 2]);
        assert_eq!(
            edges,
            vec![
                Edge {
                    parent: 0,
                    child: 1,
                    branch: Branch::Left
                },
                Edge {
                    parent: 0,
                    child: 2,
                    branch: Branch::Right
                },
            ]
        );
    }

    #[test]
    fn test_summary_of_leaf_and_root() {
        let table = one_dimensional();
        let mut tree = regressor::<LinkedTree<f64>>(2);
        tree.fit(&table, &MseSplitter::new()).unwrap();

        let root = tree.tree().unwrap().root_id();
        let summary = tree.summary(root).unwrap();
        assert_eq!(summary.depth, 0);
        assert_eq!(summary.parent, None);
        assert_eq!(summary.n_samples, 12);
        assert_eq!(summary.threshold, Some(5.5));
        assert!(!summary.is_leaf);

        let leaf = tree.apply(table.x()).unwrap()[0];
        let summary = tree.summary(leaf).unwrap();
        assert!(summary.is_leaf);
        assert_eq!(summary.n_samples, 3);
        assert!(summary.features.is_empty());
        assert_eq!(summary.threshold, None);
        assert_relative_eq!(summary.statistic.unwrap()[0], 15.0, epsilon = 1e-9);
    }

    #[test]
    fn test_predict_statistic_override() {
        let table = one_dimensional();
        let mut tree =
            regressor::<LinkedTree<f64>>(2).with_schema(NodeSchema::mean_median());
        tree.fit(&table, &MseSplitter::new()).unwrap();

        let medians = tree.predict_statistic(table.x(), "median").unwrap();
        assert_relative_eq!(medians[(0, 0)], 15.1, epsilon = 1e-9);
        assert!(matches!(
            tree.predict_statistic(table.x(), "p90"),
            Err(TreeError::UnknownStatistic(_))
        ));
    }

    #[test]
    fn test_errors() {
        let table = one_dimensional();
        let mut tree = DecisionTreeRegressor::<f64>::new();
        assert!(matches!(
            tree.predict(table.x()),
            Err(TreeError::NotFitted)
        ));
        assert!(matches!(tree.apply(table.x()), Err(TreeError::NotFitted)));
        assert_eq!(tree.node_count(), 0);

        let empty = SampleTable::new(DMatrix::zeros(0, 1), DMatrix::zeros(0, 1)).unwrap();
        assert!(matches!(
            tree.fit(&empty, &MseSplitter::new()),
            Err(TreeError::EmptyDataset)
        ));

        tree.fit(&table, &MseSplitter::new()).unwrap();
        assert!(matches!(
            tree.predict(&DMatrix::zeros(3, 2)),
            Err(TreeError::ShapeMismatch(_))
        ));
        assert!(matches!(
            tree.set_min_samples_leaf(0),
            Err(TreeError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_metrics_on_fitted_tree() {
        let table = one_dimensional();
        let mut tree = regressor::<LinkedTree<f64>>(1);
        tree.fit(&table, &MseSplitter::new()).unwrap();

        let predictions = tree.predict(table.x()).unwrap();
        assert_relative_eq!(tree.mse(table.y(), &predictions).unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(tree.r2(table.y(), &predictions).unwrap(), 1.0, epsilon = 1e-12);
    }
}
