use crate::error::TreeError;

/// Stopping rules for tree growth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeParams {
    pub max_depth: Option<u16>,
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeParams {
    /// Unbounded depth, leaves of at least one sample.
    pub fn new() -> Self {
        Self {
            max_depth: None,
            min_samples_leaf: 1,
        }
    }

    /// `None` grows until no split is possible. With `Some(0)` the tree is
    /// just its root.
    pub fn set_max_depth(&mut self, max_depth: Option<u16>) -> Result<(), TreeError> {
        self.max_depth = max_depth;
        Ok(())
    }

    pub fn set_min_samples_leaf(&mut self, min_samples_leaf: usize) -> Result<(), TreeError> {
        if min_samples_leaf < 1 {
            return Err(TreeError::InvalidParameter(
                "The minimum number of samples in a leaf must be at least 1.".into(),
            ));
        }
        self.min_samples_leaf = min_samples_leaf;
        Ok(())
    }

    pub fn with_max_depth(mut self, max_depth: Option<u16>) -> Result<Self, TreeError> {
        self.set_max_depth(max_depth)?;
        Ok(self)
    }

    pub fn with_min_samples_leaf(mut self, min_samples_leaf: usize) -> Result<Self, TreeError> {
        self.set_min_samples_leaf(min_samples_leaf)?;
        Ok(self)
    }

    pub fn max_depth(&self) -> Option<u16> {
        self.max_depth
    }

    pub fn min_samples_leaf(&self) -> usize {
        self.min_samples_leaf
    }

    /// Whether a node at `depth` (root is 0) may still get children.
    pub fn allows_split_at(&self, depth: usize) -> bool {
        self.max_depth
            .map_or(true, |max_depth| depth < usize::from(max_depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = TreeParams::default();
        assert_eq!(params.max_depth(), None);
        assert_eq!(params.min_samples_leaf(), 1);
        assert!(params.allows_split_at(1000));
    }

    #[test]
    fn test_min_samples_leaf_must_be_positive() {
        let mut params = TreeParams::new();
        assert!(matches!(
            params.set_min_samples_leaf(0),
            Err(TreeError::InvalidParameter(_))
        ));
        assert_eq!(params.min_samples_leaf(), 1);

        params.set_min_samples_leaf(5).unwrap();
        assert_eq!(params.min_samples_leaf(), 5);
    }

    #[test]
    fn test_max_depth_bounds_splits() {
        let params = TreeParams::new().with_max_depth(Some(2)).unwrap();
        assert!(params.allows_split_at(0));
        assert!(params.allows_split_at(1));
        assert!(!params.allows_split_at(2));

        let stump = TreeParams::new().with_max_depth(Some(0)).unwrap();
        assert!(!stump.allows_split_at(0));
    }
}
