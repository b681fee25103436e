use std::fmt;

use crate::iter::{Children, PostOrder, PreOrder};
use crate::tree::{Node, NodeId, Tree};

/// Read-only view on one node of a [`Tree`].
///
/// Two views are equal when they point to the same node of the same tree.
pub struct NodeRef<'a, T> {
    tree: &'a Tree<T>,
    id: NodeId,
}

impl<'a, T> NodeRef<'a, T> {
    pub(crate) const fn new(tree: &'a Tree<T>, id: NodeId) -> Self {
        Self { tree, id }
    }

    fn node(&self) -> &'a Node<T> {
        self.tree.slot(self.id)
    }

    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub const fn tree(&self) -> &'a Tree<T> {
        self.tree
    }

    #[must_use]
    pub fn data(&self) -> &'a T {
        &self.node().data
    }

    /// The parent of this node or `None` when this is the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.node().parent.map(|parent| Self::new(self.tree, parent))
    }

    /// The direct children of this node in insertion order.
    #[must_use]
    pub fn children(&self) -> Children<'a, T> {
        Children::new(self.tree, &self.node().children)
    }

    #[must_use]
    pub fn child(&self, index: usize) -> Option<Self> {
        self.node()
            .children
            .get(index)
            .map(|child| Self::new(self.tree, *child))
    }

    #[must_use]
    pub fn child_count(&self) -> usize {
        self.node().children.len()
    }

    /// Position of `child` among the children of this node.
    ///
    /// Returns `None` when `child` is not a direct child of this node.
    #[must_use]
    pub fn index_of(&self, child: &Self) -> Option<usize> {
        if !std::ptr::eq(self.tree, child.tree) {
            return None;
        }
        self.node().children.iter().position(|id| *id == child.id)
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.node().children.is_empty()
    }

    /// Amount of ancestors. The root has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        std::iter::successors(self.parent(), NodeRef::parent).count()
    }

    /// Apply `action` to this node and then to all of its descendants, every node before its children.
    pub fn pre_order<F>(&self, action: F)
    where
        F: FnMut(NodeRef<'a, T>),
    {
        self.iter().for_each(action);
    }

    /// Apply `action` to all descendants of this node and then to itself, every node after its children.
    pub fn post_order<F>(&self, action: F)
    where
        F: FnMut(NodeRef<'a, T>),
    {
        self.iter_post_order().for_each(action);
    }

    /// Lazily iterate over the subtree of this node in pre-order.
    ///
    /// # Example
    ///
    /// ```
    /// # use growing_tree::Tree;
    /// let tree = Tree::grown(1, |n: &u32| if *n < 4 { vec![n * 2, n * 2 + 1] } else { vec![] });
    /// let order = tree.root().iter().map(|node| *node.data()).collect::<Vec<_>>();
    /// assert_eq!(order, [1, 2, 4, 5, 3, 6, 7]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> PreOrder<'a, T> {
        PreOrder::new(self.tree, self.id)
    }

    /// Lazily iterate over the subtree of this node in post-order.
    #[must_use]
    pub fn iter_post_order(&self) -> PostOrder<'a, T> {
        PostOrder::new(self.tree, self.id)
    }

    /// All nodes without children in the subtree of this node, in pre-order.
    pub fn leaves(&self) -> impl Iterator<Item = NodeRef<'a, T>> {
        self.iter().filter(NodeRef::is_leaf)
    }
}

impl<T> Clone for NodeRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<'_, T> {}

impl<T> PartialEq for NodeRef<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl<T> Eq for NodeRef<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for NodeRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("data", self.data())
            .field("children", &self.child_count())
            .finish()
    }
}

/// Shows the data of the node.
impl<T: fmt::Display> fmt::Display for NodeRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.data(), f)
    }
}

impl<'a, T> IntoIterator for NodeRef<'a, T> {
    type Item = Self;
    type IntoIter = PreOrder<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
fn example() -> Tree<char> {
    let mut tree = Tree::new('r');
    let root = tree.root_id();
    let a = tree.add(root, 'a');
    tree.add(a, 'x');
    let b = tree.add(a, 'y');
    tree.add(b, 'z');
    tree.add(root, 'b');
    tree
}

#[test]
fn root_and_leaf_status() {
    let tree = example();
    for node in tree.iter() {
        assert_eq!(node.is_root(), node.parent().is_none());
        assert_eq!(node.is_leaf(), node.children().len() == 0);
    }
    assert!(tree.root().is_root());
    assert!(!tree.root().is_leaf());
}

#[test]
fn pre_order_visits_parents_first() {
    let tree = example();
    let mut visited = Vec::new();
    tree.pre_order(|node| visited.push(*node.data()));
    assert_eq!(visited, ['r', 'a', 'x', 'y', 'z', 'b']);
}

#[test]
fn post_order_visits_children_first() {
    let tree = example();
    let mut visited = Vec::new();
    tree.post_order(|node| visited.push(*node.data()));
    assert_eq!(visited, ['x', 'z', 'y', 'a', 'b', 'r']);
}

#[test]
fn traversal_stays_in_subtree() {
    let tree = example();
    let a = tree.root().child(0).unwrap();
    let mut pre = Vec::new();
    a.pre_order(|node| pre.push(*node.data()));
    assert_eq!(pre, ['a', 'x', 'y', 'z']);
    let mut post = Vec::new();
    a.post_order(|node| post.push(*node.data()));
    assert_eq!(post, ['x', 'z', 'y', 'a']);
}

#[test]
fn lazy_iteration_equals_pre_order() {
    let tree = example();
    let mut eager = Vec::new();
    tree.pre_order(|node| eager.push(node));
    let lazy = tree.iter().collect::<Vec<_>>();
    assert_eq!(lazy, eager);
}

#[test]
fn lazy_post_order_equals_post_order() {
    let tree = example();
    let mut eager = Vec::new();
    tree.post_order(|node| eager.push(node));
    let lazy = tree.root().iter_post_order().collect::<Vec<_>>();
    assert_eq!(lazy, eager);
}

#[test]
fn depth_counts_ancestors() {
    let tree = example();
    let depths = tree.iter().map(|node| node.depth()).collect::<Vec<_>>();
    assert_eq!(depths, [0, 1, 2, 2, 3, 1]);
}

#[test]
fn index_of_finds_direct_children_only() {
    let tree = example();
    let root = tree.root();
    let a = root.child(0).unwrap();
    let b = root.child(1).unwrap();
    let x = a.child(0).unwrap();
    assert_eq!(root.index_of(&a), Some(0));
    assert_eq!(root.index_of(&b), Some(1));
    assert_eq!(root.index_of(&x), None);
    assert_eq!(root.child(2), None);
}

#[test]
fn equality_needs_the_same_tree() {
    let first = Tree::new(1);
    let second = first.clone();
    assert_eq!(first.root(), first.root());
    assert_ne!(first.root(), second.root());
}

#[test]
fn display_shows_data() {
    let tree = Tree::new(3.5);
    assert_eq!(tree.root().to_string(), "3.5");
    assert_eq!(format!("{:>5}", tree.root()), "  3.5");
}
