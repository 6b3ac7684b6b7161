//! # Rusty-arboretum
//!
//! `rusty-arboretum` grows regression decision trees over multi-target data.
//! Splits are chosen by squared error (optionally weighted by an inverse
//! covariance) or by absolute error, and the fitted tree can live in either
//! an index-linked arena or an implicit binary heap.
//!
//! ## Getting Started
//!
//! To use `rusty-arboretum`, add the following to your `Cargo.toml` file:
//!
//! ```toml
//! [dependencies]
//! rusty-arboretum = "*"
//! ```
//!
//! ## Example Usage
//!
//! Fitting a median-predicting tree on a step function:
//!
//! ```rust
//! use nalgebra::{DMatrix, DVector};
//! use rusty_arboretum::trees::splitter::MaeSplitter;
//! use rusty_arboretum::{DecisionTreeRegressor, SampleTable, TreeParams};
//!
//! let x = DMatrix::from_column_slice(6, 1, &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
//! let y = DVector::from_vec(vec![1.0, 1.2, 0.9, 5.0, 5.1, 4.8]);
//! let table = SampleTable::from_vector(x, y).unwrap();
//!
//! let params = TreeParams::new().with_min_samples_leaf(2).unwrap();
//! let mut tree = DecisionTreeRegressor::<f64>::with_params(params);
//! tree.fit(&table, &MaeSplitter).unwrap();
//!
//! let predictions = tree.predict(table.x()).unwrap();
//! assert_eq!(predictions.shape(), (6, 1));
//! ```

/// Sample tables and CSV input
pub mod data;
/// Error type shared by every module
pub mod error;
/// Functions for evaluating model performance
pub mod metrics;
/// Decision trees
pub mod trees;

pub use data::dataset::{RealNumber, RowId, SampleTable};
pub use error::TreeError;
pub use trees::{
    params::TreeParams,
    regressor::{DecisionTreeRegressor, Edge, NodeSummary},
};
