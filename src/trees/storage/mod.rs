//! Node ownership and parent/child linkage behind an opaque id.
//!
//! Binary decision trees always insert both children of a split node at
//! once, so every backend keeps `leaves = internal nodes + 1`.
use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

use super::node::{Branch, Node};
use crate::{data::dataset::RealNumber, error::TreeError};

pub mod array;
pub mod linked;

pub use array::ArrayTree;
pub use linked::{LinkedId, LinkedTree};

pub trait TreeStorage<T: RealNumber>: Sized {
    type Id: Copy + Eq + Hash + Debug + Display + Send + Sync;
    type Cursor<'a>: TreeCursor<T, Id = Self::Id>
    where
        Self: 'a;

    /// Creates a tree holding only `root`.
    fn with_root(root: Node<T>) -> Self;

    fn root_id(&self) -> Self::Id;

    /// Node stored under `id` and its depth (root is 0).
    fn get(&self, id: Self::Id) -> Option<(&Node<T>, usize)>;

    /// `None` both when `id` is unknown and when it is a leaf.
    fn children(&self, id: Self::Id) -> Option<(Self::Id, Self::Id)>;

    fn parent(&self, id: Self::Id) -> Option<Self::Id>;

    /// Attaches both children to `parent` in one step.
    ///
    /// # Errors
    ///
    /// `NodeNotFound` for an unknown parent, `ChildrenAlreadyExist` if the
    /// parent was already split. Nothing is inserted on error.
    fn insert_children(
        &mut self,
        parent: Self::Id,
        left: Node<T>,
        right: Node<T>,
    ) -> Result<(Self::Id, Self::Id), TreeError>;

    /// Cursor positioned at the root.
    fn cursor(&self) -> Self::Cursor<'_>;

    /// Number of stored nodes.
    fn len(&self) -> usize;

    /// Every id in pre-order (node, left subtree, right subtree).
    fn node_ids(&self) -> Vec<Self::Id> {
        let mut ids = Vec::with_capacity(self.len());
        let mut stack = vec![self.root_id()];
        while let Some(id) = stack.pop() {
            ids.push(id);
            if let Some((left, right)) = self.children(id) {
                stack.push(right);
                stack.push(left);
            }
        }
        ids
    }
}

/// Stateful walk from the root towards the leaves. Only the position
/// changes; the tree is borrowed immutably.
pub trait TreeCursor<T: RealNumber> {
    type Id;

    fn id(&self) -> Self::Id;

    /// True when the current node has no children.
    fn is_leaf(&self) -> bool;

    fn get(&self) -> (&Node<T>, usize);

    /// # Errors
    ///
    /// `LeafHasNoChildren` when positioned at a leaf.
    fn descend_left(&mut self) -> Result<(), TreeError>;

    /// # Errors
    ///
    /// `LeafHasNoChildren` when positioned at a leaf.
    fn descend_right(&mut self) -> Result<(), TreeError>;

    fn descend(&mut self, branch: Branch) -> Result<(), TreeError> {
        match branch {
            Branch::Left => self.descend_left(),
            Branch::Right => self.descend_right(),
        }
    }
}
