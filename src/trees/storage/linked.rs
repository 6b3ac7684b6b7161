use std::fmt::{self, Display, Formatter};

use super::{TreeCursor, TreeStorage};
use crate::{data::dataset::RealNumber, error::TreeError, trees::node::Node};

/// Handle of a node inside one [`LinkedTree`]. Only meaningful for the tree
/// that returned it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkedId(usize);

impl Display for LinkedId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug)]
struct Slot<T: RealNumber> {
    node: Node<T>,
    depth: usize,
    parent: Option<LinkedId>,
    children: Option<(LinkedId, LinkedId)>,
}

/// Explicitly linked tree. Nodes live in one arena in insertion order and
/// refer to each other by index, so lookups are O(1) and the structure has
/// no gaps however unbalanced the tree is.
#[derive(Clone, Debug)]
pub struct LinkedTree<T: RealNumber> {
    slots: Vec<Slot<T>>,
}

impl<T: RealNumber> LinkedTree<T> {
    fn slot(&self, id: LinkedId) -> Option<&Slot<T>> {
        self.slots.get(id.0)
    }

    fn push(&mut self, node: Node<T>, depth: usize, parent: LinkedId) -> LinkedId {
        let id = LinkedId(self.slots.len());
        self.slots.push(Slot {
            node,
            depth,
            parent: Some(parent),
            children: None,
        });
        id
    }
}

impl<T: RealNumber> TreeStorage<T> for LinkedTree<T> {
    type Id = LinkedId;
    type Cursor<'a> = LinkedCursor<'a, T>;

    fn with_root(root: Node<T>) -> Self {
        Self {
            slots: vec![Slot {
                node: root,
                depth: 0,
                parent: None,
                children: None,
            }],
        }
    }

    fn root_id(&self) -> LinkedId {
        LinkedId(0)
    }

    fn get(&self, id: LinkedId) -> Option<(&Node<T>, usize)> {
        self.slot(id).map(|slot| (&slot.node, slot.depth))
    }

    fn children(&self, id: LinkedId) -> Option<(LinkedId, LinkedId)> {
        self.slot(id).and_then(|slot| slot.children)
    }

    fn parent(&self, id: LinkedId) -> Option<LinkedId> {
        self.slot(id).and_then(|slot| slot.parent)
    }

    fn insert_children(
        &mut self,
        parent: LinkedId,
        left: Node<T>,
        right: Node<T>,
    ) -> Result<(LinkedId, LinkedId), TreeError> {
        let slot = self
            .slot(parent)
            .ok_or_else(|| TreeError::NodeNotFound(parent.to_string()))?;
        if slot.children.is_some() {
            return Err(TreeError::ChildrenAlreadyExist(parent.to_string()));
        }
        let depth = slot.depth + 1;

        let ids = (
            self.push(left, depth, parent),
            self.push(right, depth, parent),
        );
        self.slots[parent.0].children = Some(ids);
        Ok(ids)
    }

    fn cursor(&self) -> LinkedCursor<'_, T> {
        LinkedCursor {
            tree: self,
            position: self.root_id(),
        }
    }

    fn len(&self) -> usize {
        self.slots.len()
    }
}

pub struct LinkedCursor<'a, T: RealNumber> {
    tree: &'a LinkedTree<T>,
    position: LinkedId,
}

impl<'a, T: RealNumber> LinkedCursor<'a, T> {
    fn current(&self) -> &'a Slot<T> {
        &self.tree.slots[self.position.0]
    }

    fn step(&mut self, pick: fn((LinkedId, LinkedId)) -> LinkedId) -> Result<(), TreeError> {
        let children = self
            .current()
            .children
            .ok_or_else(|| TreeError::LeafHasNoChildren(self.position.to_string()))?;
        self.position = pick(children);
        Ok(())
    }
}

impl<'a, T: RealNumber> TreeCursor<T> for LinkedCursor<'a, T> {
    type Id = LinkedId;

    fn id(&self) -> LinkedId {
        self.position
    }

    fn is_leaf(&self) -> bool {
        self.current().children.is_none()
    }

    fn get(&self) -> (&Node<T>, usize) {
        let slot = self.current();
        (&slot.node, slot.depth)
    }

    fn descend_left(&mut self) -> Result<(), TreeError> {
        self.step(|(left, _)| left)
    }

    fn descend_right(&mut self) -> Result<(), TreeError> {
        self.step(|(_, right)| right)
    }
}
