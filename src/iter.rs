use std::iter::FusedIterator;

use crate::node::NodeRef;
use crate::tree::{NodeId, Tree};

/// Direct children of a node, see [`NodeRef::children`].
#[must_use]
#[derive(Debug)]
pub struct Children<'a, T> {
    tree: &'a Tree<T>,
    ids: std::slice::Iter<'a, NodeId>,
}

impl<'a, T> Children<'a, T> {
    pub(crate) fn new(tree: &'a Tree<T>, ids: &'a [NodeId]) -> Self {
        Self {
            tree,
            ids: ids.iter(),
        }
    }
}

impl<T> Clone for Children<'_, T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            ids: self.ids.clone(),
        }
    }
}

impl<'a, T> Iterator for Children<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.ids.next().map(|id| NodeRef::new(self.tree, *id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl<T> DoubleEndedIterator for Children<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.ids.next_back().map(|id| NodeRef::new(self.tree, *id))
    }
}

impl<T> ExactSizeIterator for Children<'_, T> {}
impl<T> FusedIterator for Children<'_, T> {}

/// Lazy pre-order iteration over a subtree, see [`NodeRef::iter`].
///
/// Keeps one cursor over the remaining siblings per level between the start node and the current position.
/// Nothing is collected upfront.
/// Once finished it keeps returning `None`.
#[must_use]
#[derive(Debug)]
pub struct PreOrder<'a, T> {
    tree: &'a Tree<T>,
    /// The start node until it was emitted.
    start: Option<NodeId>,
    /// Remaining siblings of every level below the start node.
    levels: Vec<std::slice::Iter<'a, NodeId>>,
}

impl<'a, T> PreOrder<'a, T> {
    pub(crate) const fn new(tree: &'a Tree<T>, start: NodeId) -> Self {
        Self {
            tree,
            start: Some(start),
            levels: Vec::new(),
        }
    }

    fn enter(&mut self, id: NodeId) -> NodeRef<'a, T> {
        let tree = self.tree;
        let node = NodeRef::new(tree, id);
        if !node.is_leaf() {
            self.levels.push(tree.slot(id).children.iter());
        }
        node
    }
}

impl<'a, T> Iterator for PreOrder<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(start) = self.start.take() {
            return Some(self.enter(start));
        }
        loop {
            let siblings = self.levels.last_mut()?;
            if let Some(&next) = siblings.next() {
                return Some(self.enter(next));
            }
            self.levels.pop();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower = usize::from(self.start.is_some())
            + self.levels.iter().map(ExactSizeIterator::len).sum::<usize>();
        (lower, None)
    }
}

impl<T> FusedIterator for PreOrder<'_, T> {}

/// Lazy post-order iteration over a subtree, see [`NodeRef::iter_post_order`].
///
/// Every node is returned after all of its children.
#[must_use]
#[derive(Debug)]
pub struct PostOrder<'a, T> {
    tree: &'a Tree<T>,
    /// Nodes whose children are not done yet together with their remaining children.
    pending: Vec<(NodeId, std::slice::Iter<'a, NodeId>)>,
}

impl<'a, T> PostOrder<'a, T> {
    pub(crate) fn new(tree: &'a Tree<T>, start: NodeId) -> Self {
        Self {
            tree,
            pending: vec![(start, tree.slot(start).children.iter())],
        }
    }
}

impl<'a, T> Iterator for PostOrder<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (_, children) = self.pending.last_mut()?;
            if let Some(&child) = children.next() {
                let tree = self.tree;
                let grandchildren = tree.slot(child).children.iter();
                self.pending.push((child, grandchildren));
            } else {
                let (done, _) = self.pending.pop()?;
                return Some(NodeRef::new(self.tree, done));
            }
        }
    }
}

impl<T> FusedIterator for PostOrder<'_, T> {}

#[cfg(test)]
fn example() -> Tree<u8> {
    // 0
    // ├ 1
    // │ ├ 2
    // │ └ 3
    // │   └ 4
    // ├ 5
    // └ 6
    //   └ 7
    let mut tree = Tree::new(0);
    let root = tree.root_id();
    let one = tree.add(root, 1);
    tree.add(one, 2);
    let three = tree.add(one, 3);
    tree.add(three, 4);
    tree.add(root, 5);
    let six = tree.add(root, 6);
    tree.add(six, 7);
    tree
}

#[test]
fn pre_order_starts_with_start_node() {
    let tree = example();
    let mut iter = tree.iter();
    assert_eq!(iter.next(), Some(tree.root()));
    assert_eq!(iter.next().map(|node| *node.data()), Some(1));
}

#[test]
fn pre_order_full() {
    let tree = example();
    let order = tree.iter().map(|node| *node.data()).collect::<Vec<_>>();
    assert_eq!(order, [0, 1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn pre_order_single_node() {
    let tree = Tree::new("alone");
    let mut iter = tree.iter();
    assert_eq!(iter.size_hint(), (1, None));
    assert_eq!(iter.next().map(|node| *node.data()), Some("alone"));
    assert!(iter.next().is_none());
}

#[test]
fn pre_order_is_fused() {
    let tree = example();
    let mut iter = tree.iter();
    for _ in 0..8 {
        assert!(iter.next().is_some());
    }
    assert!(iter.next().is_none());
    assert!(iter.next().is_none());
}

#[test]
fn pre_order_restarts_with_new_iterator() {
    let tree = example();
    let first = tree.iter().count();
    let second = tree.iter().count();
    assert_eq!(first, 8);
    assert_eq!(second, 8);
}

#[test]
fn post_order_full() {
    let tree = example();
    let order = tree
        .root()
        .iter_post_order()
        .map(|node| *node.data())
        .collect::<Vec<_>>();
    assert_eq!(order, [2, 4, 3, 1, 5, 7, 6, 0]);
}

#[test]
fn post_order_of_leaf_is_itself() {
    let tree = example();
    let five = tree.root().child(1).unwrap();
    let order = five.iter_post_order().collect::<Vec<_>>();
    assert_eq!(order, [five]);
}

#[test]
fn children_are_in_insertion_order() {
    let tree = example();
    let children = tree.root().children();
    assert_eq!(children.len(), 3);
    let forward = children
        .clone()
        .map(|node| *node.data())
        .collect::<Vec<_>>();
    assert_eq!(forward, [1, 5, 6]);
    let backward = children.rev().map(|node| *node.data()).collect::<Vec<_>>();
    assert_eq!(backward, [6, 5, 1]);
}
