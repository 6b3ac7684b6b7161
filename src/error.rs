use thiserror::Error;

/// Errors returned while building, storing or querying regression trees.
/// A node without a valid split is not an error: splitters return `None`
/// and the node stays a leaf.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("node {0} does not exist")]
    NodeNotFound(String),

    #[error("children nodes of {0} already exist")]
    ChildrenAlreadyExist(String),

    #[error("node {0} is a leaf and has no children")]
    LeafHasNoChildren(String),

    #[error("a leaf node carries no split rule to route through")]
    NotRoutable,

    #[error("value {0} is not present in the expected half")]
    ValueNotFound(String),

    #[error("cannot allocate children for node {0}: index overflow")]
    CapacityExceeded(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("covariance matrix cannot be inverted: {0}")]
    SingularCovariance(String),

    #[error("statistic '{0}' is not stored on the node")]
    UnknownStatistic(String),

    #[error("tree wasn't built yet")]
    NotFitted,

    #[error("cannot fit a tree on an empty dataset")]
    EmptyDataset,

    #[error("failed to parse '{value}' in column '{column}'")]
    Parse { column: String, value: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
