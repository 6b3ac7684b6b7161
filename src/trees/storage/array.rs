use super::{TreeCursor, TreeStorage};
use crate::{data::dataset::RealNumber, error::TreeError, trees::node::Node};

fn left_index(id: usize) -> Option<usize> {
    id.checked_mul(2)?.checked_add(1)
}

fn right_index(id: usize) -> Option<usize> {
    left_index(id)?.checked_add(1)
}

/// Level of a heap index: indices `2^d - 1 ..= 2^(d+1) - 2` sit at depth `d`.
fn depth(id: usize) -> usize {
    id.checked_add(1).map_or(usize::BITS, usize::ilog2) as usize
}

/// Tree stored as an implicit binary heap: the children of `i` live at
/// `2i + 1` and `2i + 2`. Lookups are plain indexing, but an unbalanced tree
/// leaves unused slots between its nodes.
#[derive(Clone, Debug)]
pub struct ArrayTree<T: RealNumber> {
    root: Node<T>,
    // Slot `i` holds node `i + 1`.
    descendants: Vec<Option<Node<T>>>,
    len: usize,
}

impl<T: RealNumber> ArrayTree<T> {
    fn node(&self, id: usize) -> Option<&Node<T>> {
        match id {
            0 => Some(&self.root),
            _ => self.descendants.get(id - 1).and_then(Option::as_ref),
        }
    }

    fn exists(&self, id: usize) -> bool {
        self.node(id).is_some()
    }

    /// Allocated slots, including the empty ones.
    pub fn capacity(&self) -> usize {
        self.descendants.len() + 1
    }
}

impl<T: RealNumber> TreeStorage<T> for ArrayTree<T> {
    type Id = usize;
    type Cursor<'a> = ArrayCursor<'a, T>;

    fn with_root(root: Node<T>) -> Self {
        Self {
            root,
            descendants: Vec::new(),
            len: 1,
        }
    }

    fn root_id(&self) -> usize {
        0
    }

    fn get(&self, id: usize) -> Option<(&Node<T>, usize)> {
        self.node(id).map(|node| (node, depth(id)))
    }

    fn children(&self, id: usize) -> Option<(usize, usize)> {
        if !self.exists(id) {
            return None;
        }
        let (left, right) = (left_index(id)?, right_index(id)?);
        self.exists(right).then_some((left, right))
    }

    fn parent(&self, id: usize) -> Option<usize> {
        (id > 0 && self.exists(id)).then(|| (id - 1) / 2)
    }

    fn insert_children(
        &mut self,
        parent: usize,
        left: Node<T>,
        right: Node<T>,
    ) -> Result<(usize, usize), TreeError> {
        if !self.exists(parent) {
            return Err(TreeError::NodeNotFound(parent.to_string()));
        }
        let (left_id, right_id) = match (left_index(parent), right_index(parent)) {
            (Some(left_id), Some(right_id)) => (left_id, right_id),
            _ => return Err(TreeError::CapacityExceeded(parent.to_string())),
        };
        if self.exists(left_id) || self.exists(right_id) {
            return Err(TreeError::ChildrenAlreadyExist(parent.to_string()));
        }

        if right_id > self.descendants.len() {
            self.descendants
                .try_reserve(right_id - self.descendants.len())
                .map_err(|_| TreeError::CapacityExceeded(parent.to_string()))?;
            self.descendants.resize_with(right_id, || None);
        }
        self.descendants[left_id - 1] = Some(left);
        self.descendants[right_id - 1] = Some(right);
        self.len += 2;
        Ok((left_id, right_id))
    }

    fn cursor(&self) -> ArrayCursor<'_, T> {
        ArrayCursor {
            tree: self,
            position: 0,
            node: &self.root,
        }
    }

    fn len(&self) -> usize {
        self.len
    }
}

pub struct ArrayCursor<'a, T: RealNumber> {
    tree: &'a ArrayTree<T>,
    position: usize,
    node: &'a Node<T>,
}

impl<'a, T: RealNumber> ArrayCursor<'a, T> {
    fn step(&mut self, target: Option<usize>) -> Result<(), TreeError> {
        let tree = self.tree;
        match target.and_then(|id| tree.node(id).map(|node| (id, node))) {
            Some((id, node)) => {
                self.position = id;
                self.node = node;
                Ok(())
            }
            None => Err(TreeError::LeafHasNoChildren(self.position.to_string())),
        }
    }
}

impl<'a, T: RealNumber> TreeCursor<T> for ArrayCursor<'a, T> {
    type Id = usize;

    fn id(&self) -> usize {
        self.position
    }

    fn is_leaf(&self) -> bool {
        !left_index(self.position).is_some_and(|left| self.tree.exists(left))
    }

    fn get(&self) -> (&Node<T>, usize) {
        (self.node, depth(self.position))
    }

    fn descend_left(&mut self) -> Result<(), TreeError> {
        self.step(left_index(self.position))
    }

    fn descend_right(&mut self) -> Result<(), TreeError> {
        self.step(right_index(self.position))
    }
}
