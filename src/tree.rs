use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use generational_arena::{Arena, Index};
use tracing::{debug, trace};

use crate::error::TreeError;
use crate::iter::PreOrder;
use crate::node::NodeRef;

/// Handle to a node inside a [`Tree`].
///
/// Handles are cheap to copy and stay valid until their node is detached with [`Tree::remove`].
/// A handle of a detached node is stale and never refers to another node later on,
/// neither in its former tree nor in the tree the subtree was detached into.
/// Handles of one tree are stale for every other tree except clones of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    tree: u64,
    index: Index,
}

/// Every tree gets its own tag so handles of other trees are recognized.
static NEXT_TREE: AtomicU64 = AtomicU64::new(0);

fn next_tree_tag() -> u64 {
    NEXT_TREE.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    pub(crate) data: T,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

/// A tree owning all of its nodes.
///
/// Every node holds its data, a back-reference to its parent and its children in insertion order.
/// Nodes are only created by the constructors and [`add`](Self::add) and only destroyed by [`remove`](Self::remove) or by dropping the tree.
/// The structure can therefore never contain cycles or shared children.
///
/// A clone is an independent copy which accepts the handles of the original.
///
/// # Example
///
/// ```
/// # use growing_tree::Tree;
/// let mut tree = Tree::new("root");
/// let a = tree.add(tree.root_id(), "a");
/// tree.add(a, "a1");
/// tree.add(tree.root_id(), "b");
///
/// let order = tree.iter().map(|node| *node.data()).collect::<Vec<_>>();
/// assert_eq!(order, ["root", "a", "a1", "b"]);
/// ```
#[derive(Debug, Clone)]
pub struct Tree<T> {
    tag: u64,
    arena: Arena<Node<T>>,
    root: NodeId,
}

impl<T> Tree<T> {
    /// Create a tree consisting of a single root node.
    #[must_use]
    pub fn new(data: T) -> Self {
        Self::with_root(Arena::new(), data)
    }

    fn with_root(mut arena: Arena<Node<T>>, data: T) -> Self {
        let tag = next_tree_tag();
        let index = arena.insert(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        let root = NodeId { tree: tag, index };
        Self { tag, arena, root }
    }

    /// Create a root node and grow its whole subtree with `grow`.
    ///
    /// `grow` is called with the data of every created node and returns the data of its children in the order they should be added.
    /// Growing stops on nodes for which `grow` returns nothing.
    /// A growth function that never returns nothing keeps growing until memory runs out.
    ///
    /// # Example
    ///
    /// ```
    /// # use growing_tree::Tree;
    /// // Binary counter: every node up to 3 digits gets the children `x0` and `x1`
    /// let tree = Tree::grown(String::new(), |digits: &String| {
    ///     if digits.len() < 3 {
    ///         vec![format!("{digits}0"), format!("{digits}1")]
    ///     } else {
    ///         Vec::new()
    ///     }
    /// });
    /// assert_eq!(tree.len(), 15);
    /// assert_eq!(tree.root().leaves().count(), 8);
    /// ```
    #[must_use]
    pub fn grown<G, I>(data: T, grow: G) -> Self
    where
        G: FnMut(&T) -> I,
        I: IntoIterator<Item = T>,
    {
        let mut tree = Self::new(data);
        let root = tree.root;
        tree.grow_from(root, grow);
        tree
    }

    /// Amount of nodes in this tree, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// A tree always contains its root so it is never empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    #[must_use]
    pub const fn root_id(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn root(&self) -> NodeRef<'_, T> {
        NodeRef::new(self, self.root)
    }

    /// Get a view on the node behind the handle.
    ///
    /// Returns `None` when the node is not part of this tree (anymore).
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_, T>> {
        self.lookup(id).map(|_| NodeRef::new(self, id))
    }

    /// Get a view on the node behind the handle.
    ///
    /// # Panics
    ///
    /// Panics when the node is not part of this tree (anymore).
    #[must_use]
    pub fn node(&self, id: NodeId) -> NodeRef<'_, T> {
        self.get(id)
            .unwrap_or_else(|| panic!("{}", TreeError::StaleNode(id)))
    }

    /// Add a new child with the given data as last child of `parent`.
    ///
    /// Returns the handle of the new child.
    ///
    /// # Errors
    ///
    /// Errors when `parent` is not part of this tree.
    pub fn try_add(&mut self, parent: NodeId, data: T) -> Result<NodeId, TreeError> {
        if self.lookup(parent).is_none() {
            return Err(TreeError::StaleNode(parent));
        }
        let child = self.insert_child(parent, data);
        trace!(?parent, ?child, "added node");
        Ok(child)
    }

    /// Add a new child with the given data as last child of `parent`.
    ///
    /// Returns the handle of the new child.
    ///
    /// # Panics
    ///
    /// Panics when `parent` is not part of this tree.
    pub fn add(&mut self, parent: NodeId, data: T) -> NodeId {
        self.try_add(parent, data)
            .unwrap_or_else(|error| panic!("{error}"))
    }

    /// Add a new child as last child of `parent` and grow its subtree with `grow`.
    ///
    /// See [`Tree::grown`] for how `grow` is applied.
    ///
    /// # Errors
    ///
    /// Errors when `parent` is not part of this tree.
    pub fn try_add_grown<G, I>(
        &mut self,
        parent: NodeId,
        data: T,
        grow: G,
    ) -> Result<NodeId, TreeError>
    where
        G: FnMut(&T) -> I,
        I: IntoIterator<Item = T>,
    {
        let child = self.try_add(parent, data)?;
        self.grow_from(child, grow);
        Ok(child)
    }

    /// Add a new child as last child of `parent` and grow its subtree with `grow`.
    ///
    /// See [`Tree::grown`] for how `grow` is applied.
    ///
    /// # Panics
    ///
    /// Panics when `parent` is not part of this tree.
    pub fn add_grown<G, I>(&mut self, parent: NodeId, data: T, grow: G) -> NodeId
    where
        G: FnMut(&T) -> I,
        I: IntoIterator<Item = T>,
    {
        self.try_add_grown(parent, data, grow)
            .unwrap_or_else(|error| panic!("{error}"))
    }

    /// Detach the child at `index` of `parent` together with its subtree.
    ///
    /// The detached subtree is returned as its own [`Tree`] with the removed child as its root.
    /// Its root has no parent anymore.
    /// All handles into the detached subtree become stale for this tree.
    ///
    /// # Errors
    ///
    /// Errors when `parent` is not part of this tree or has no child at `index`.
    pub fn try_remove(&mut self, parent: NodeId, index: usize) -> Result<Self, TreeError> {
        let children = &mut self
            .lookup_mut(parent)
            .ok_or(TreeError::StaleNode(parent))?
            .children;
        let len = children.len();
        if index >= len {
            return Err(TreeError::ChildIndexOutOfRange { index, len });
        }
        let child = children.remove(index);
        Ok(self.detach(child))
    }

    /// Detach the child at `index` of `parent` together with its subtree.
    ///
    /// See [`try_remove`](Self::try_remove).
    ///
    /// # Panics
    ///
    /// Panics when `parent` is not part of this tree or has no child at `index`.
    ///
    /// # Example
    ///
    /// ```
    /// # use growing_tree::Tree;
    /// let mut tree = Tree::new('r');
    /// let root = tree.root_id();
    /// let a = tree.add(root, 'a');
    /// tree.add(a, 'x');
    /// tree.add(root, 'b');
    ///
    /// let removed = tree.remove(root, 0);
    /// assert_eq!(*removed.root().data(), 'a');
    /// assert!(removed.root().is_root());
    /// assert_eq!(removed.len(), 2);
    /// assert_eq!(tree.len(), 2);
    /// assert!(tree.get(a).is_none());
    /// ```
    pub fn remove(&mut self, parent: NodeId, index: usize) -> Self {
        self.try_remove(parent, index)
            .unwrap_or_else(|error| panic!("{error}"))
    }

    /// Detach the first child of `parent` holding `data` together with its subtree.
    ///
    /// Returns `Ok(None)` and leaves the tree unchanged when no child holds `data`.
    ///
    /// # Errors
    ///
    /// Errors when `parent` is not part of this tree.
    pub fn try_remove_data(
        &mut self,
        parent: NodeId,
        data: &T,
    ) -> Result<Option<Self>, TreeError>
    where
        T: PartialEq,
    {
        let parent_node = self.get(parent).ok_or(TreeError::StaleNode(parent))?;
        let Some(index) = parent_node.children().position(|child| child.data() == data) else {
            return Ok(None);
        };
        self.try_remove(parent, index).map(Some)
    }

    /// Detach the first child of `parent` holding `data` together with its subtree.
    ///
    /// Returns `None` and leaves the tree unchanged when no child holds `data`.
    ///
    /// # Panics
    ///
    /// Panics when `parent` is not part of this tree.
    pub fn remove_data(&mut self, parent: NodeId, data: &T) -> Option<Self>
    where
        T: PartialEq,
    {
        self.try_remove_data(parent, data)
            .unwrap_or_else(|error| panic!("{error}"))
    }

    /// Apply `action` to every node in pre-order starting at the root.
    pub fn pre_order<'a, F>(&'a self, action: F)
    where
        F: FnMut(NodeRef<'a, T>),
    {
        self.root().pre_order(action);
    }

    /// Apply `action` to every node in post-order starting at the root.
    pub fn post_order<'a, F>(&'a self, action: F)
    where
        F: FnMut(NodeRef<'a, T>),
    {
        self.root().post_order(action);
    }

    /// Lazily iterate over all nodes in pre-order starting at the root.
    #[must_use]
    pub fn iter(&self) -> PreOrder<'_, T> {
        self.root().iter()
    }

    /// Handles of other trees may point at an occupied slot of this arena, so the tag is checked first.
    fn lookup(&self, id: NodeId) -> Option<&Node<T>> {
        if id.tree == self.tag {
            self.arena.get(id.index)
        } else {
            None
        }
    }

    fn lookup_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        if id.tree == self.tag {
            self.arena.get_mut(id.index)
        } else {
            None
        }
    }

    pub(crate) fn slot(&self, id: NodeId) -> &Node<T> {
        self.lookup(id)
            .unwrap_or_else(|| panic!("{}", TreeError::StaleNode(id)))
    }

    fn slot_mut(&mut self, id: NodeId) -> &mut Node<T> {
        self.lookup_mut(id)
            .unwrap_or_else(|| panic!("{}", TreeError::StaleNode(id)))
    }

    /// `parent` must be part of this tree.
    fn insert_child(&mut self, parent: NodeId, data: T) -> NodeId {
        let index = self.arena.insert(Node {
            data,
            parent: Some(parent),
            children: Vec::new(),
        });
        let child = NodeId {
            tree: self.tag,
            index,
        };
        self.slot_mut(parent).children.push(child);
        child
    }

    /// Expand the subtree of `start` depth first.
    ///
    /// A work stack replaces recursion so the depth is only limited by the heap.
    /// Children are pushed in reverse so `grow` sees the nodes in pre-order.
    fn grow_from<G, I>(&mut self, start: NodeId, mut grow: G)
    where
        G: FnMut(&T) -> I,
        I: IntoIterator<Item = T>,
    {
        let before = self.len();
        let mut pending = vec![start];
        while let Some(current) = pending.pop() {
            let grown = grow(&self.slot(current).data);
            let first_new = self.slot(current).children.len();
            for data in grown {
                self.insert_child(current, data);
            }
            let added = &self.slot(current).children[first_new..];
            trace!(node = ?current, children = added.len(), "grew node");
            pending.extend(added.iter().rev());
        }
        debug!(root = ?start, nodes = self.len() - before, "growth finished");
    }

    /// Move the subtree of an already unlinked `child` into a tree of its own.
    ///
    /// The new tree has a tag of its own so none of the old handles are valid in it.
    fn detach(&mut self, child: NodeId) -> Self {
        // Pre-order guarantees every parent is moved before its children
        let ids = PreOrder::new(self, child)
            .map(|node| node.id())
            .collect::<Vec<_>>();

        let mut take = |id: NodeId| {
            self.arena
                .remove(id.index)
                .unwrap_or_else(|| panic!("{}", TreeError::StaleNode(id)))
        };

        let mut detached = Self::with_root(Arena::with_capacity(ids.len()), take(child).data);
        let mut moved = HashMap::with_capacity(ids.len());
        moved.insert(child, detached.root);
        for &id in ids.iter().skip(1) {
            let node = take(id);
            let parent = node
                .parent
                .and_then(|parent| moved.get(&parent).copied())
                .unwrap_or_else(|| panic!("{}", TreeError::StaleNode(id)));
            moved.insert(id, detached.insert_child(parent, node.data));
        }

        trace!(?child, nodes = moved.len(), "detached subtree");
        detached
    }
}

impl<'a, T> IntoIterator for &'a Tree<T> {
    type Item = NodeRef<'a, T>;
    type IntoIter = PreOrder<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
fn example() -> Tree<&'static str> {
    let mut tree = Tree::new("root");
    let root = tree.root_id();
    let a = tree.add(root, "a");
    tree.add(a, "a1");
    tree.add(a, "a2");
    tree.add(root, "b");
    let c = tree.add(root, "c");
    tree.add(c, "c1");
    tree
}

#[cfg(test)]
fn datas<T: Copy>(tree: &Tree<T>) -> Vec<T> {
    tree.iter().map(|node| *node.data()).collect()
}

#[cfg(test)]
fn assert_consistent<T: std::fmt::Debug>(tree: &Tree<T>) {
    assert!(tree.root().parent().is_none());
    let mut count = 0;
    for node in tree {
        count += 1;
        for child in node.children() {
            assert_eq!(child.parent(), Some(node));
            assert_eq!(node.children().filter(|other| *other == child).count(), 1);
        }
    }
    assert_eq!(count, tree.len());
}

#[test]
fn new_is_a_single_root_leaf() {
    let tree = Tree::new(42);
    assert_eq!(tree.len(), 1);
    assert!(tree.root().is_root());
    assert!(tree.root().is_leaf());
    assert_eq!(*tree.root().data(), 42);
}

#[test]
fn add_appends_as_last_child() {
    let mut tree = example();
    let root = tree.root_id();
    let added = tree.add(root, "d");
    let node = tree.node(added);
    assert_eq!(node.parent(), Some(tree.root()));
    assert_eq!(*node.data(), "d");
    assert_eq!(tree.root().children().last(), Some(node));
    assert_consistent(&tree);
}

#[test]
fn add_grown_equals_grown() {
    fn countdown(n: &u8) -> Vec<u8> {
        (0..*n).rev().collect()
    }

    let grown = Tree::grown(3, countdown);

    let mut stepwise = Tree::new(3);
    let root = stepwise.root_id();
    for data in countdown(&3) {
        stepwise.add_grown(root, data, countdown);
    }

    assert_eq!(datas(&grown), datas(&stepwise));
    let shape = |tree: &Tree<u8>| {
        tree.iter()
            .map(|node| (node.depth(), node.child_count()))
            .collect::<Vec<_>>()
    };
    assert_eq!(shape(&grown), shape(&stepwise));
    assert_consistent(&grown);
}

#[test]
fn grow_is_called_in_pre_order() {
    let mut called = Vec::new();
    let tree = Tree::grown(0, |n: &u32| {
        called.push(*n);
        if *n < 10 {
            vec![n * 10 + 1, n * 10 + 2]
        } else {
            Vec::new()
        }
    });
    assert_eq!(called, [0, 1, 11, 12, 2, 21, 22]);
    assert_eq!(datas(&tree), called);
}

#[test]
fn grow_empty_is_leaf() {
    let tree = Tree::grown("only", |_: &&str| None::<&str>);
    assert_eq!(tree.len(), 1);
    assert!(tree.root().is_leaf());
}

#[test]
fn grow_deep_does_not_overflow_the_stack() {
    let tree = Tree::grown(0_u32, |n: &u32| (*n < 200_000).then_some(n + 1));
    assert_eq!(tree.len(), 200_001);
    assert_eq!(tree.iter().last().map(|node| *node.data()), Some(200_000));
    let mut visited = 0;
    tree.post_order(|_| visited += 1);
    assert_eq!(visited, 200_001);
}

#[test]
fn permutations_are_the_leaves() {
    const SUPERSET: [u8; 4] = [0, 1, 2, 3];
    let tree = Tree::grown(Vec::new(), |list: &Vec<u8>| {
        let mut children = Vec::new();
        if list.len() < SUPERSET.len() {
            for element in SUPERSET {
                if !list.contains(&element) {
                    let mut child = list.clone();
                    child.push(element);
                    children.push(child);
                }
            }
        }
        children
    });

    let leaves = tree
        .root()
        .leaves()
        .map(|leaf| leaf.data().clone())
        .collect::<Vec<_>>();
    assert_eq!(leaves.len(), 24);
    assert_eq!(leaves.first(), Some(&vec![0, 1, 2, 3]));
    assert_eq!(leaves.last(), Some(&vec![3, 2, 1, 0]));
    let mut unique = leaves.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 24);
    assert!(leaves.iter().all(|leaf| leaf.len() == 4));
    assert_eq!(tree.len(), 1 + 4 + 12 + 24 + 24);
    assert_consistent(&tree);
}

#[test]
fn remove_by_index_detaches_subtree() {
    let mut tree = example();
    let root = tree.root_id();
    let a = tree.root().child(0).map(|node| node.id()).unwrap();
    let a1 = tree.node(a).child(0).map(|node| node.id()).unwrap();

    let removed = tree.remove(root, 0);

    assert_eq!(datas(&removed), ["a", "a1", "a2"]);
    assert!(removed.root().is_root());
    assert_consistent(&removed);

    assert_eq!(datas(&tree), ["root", "b", "c", "c1"]);
    assert!(tree.get(a).is_none());
    assert!(tree.get(a1).is_none());
    assert_consistent(&tree);
}

#[test]
fn removed_handles_stay_stale() {
    let mut tree = Tree::new(0);
    let root = tree.root_id();
    let first = tree.add(root, 1);
    drop(tree.remove(root, 0));
    let second = tree.add(root, 2);
    assert_ne!(first, second);
    assert!(tree.get(first).is_none());
    assert_eq!(tree.try_add(first, 3), Err(TreeError::StaleNode(first)));
}

#[test]
fn handles_do_not_carry_over_into_the_detached_tree() {
    let mut tree = example();
    let root = tree.root_id();
    let a = tree.root().child(0).map(|node| node.id()).unwrap();
    let a1 = tree.node(a).child(0).map(|node| node.id()).unwrap();

    let mut removed = tree.remove(root, 0);
    assert_eq!(datas(&removed), ["a", "a1", "a2"]);
    assert!(removed.get(a).is_none());
    assert!(removed.get(a1).is_none());
    assert!(removed.get(root).is_none());
    assert_eq!(removed.try_add(root, "x"), Err(TreeError::StaleNode(root)));
    assert_eq!(
        removed.try_remove(a, 0).unwrap_err(),
        TreeError::StaleNode(a)
    );
    assert_consistent(&removed);
}

#[test]
fn handles_of_other_trees_are_stale() {
    let mut first = Tree::new(1);
    let second = Tree::new(2);
    let foreign = second.root_id();
    assert!(first.get(foreign).is_none());
    assert_eq!(first.try_add(foreign, 3), Err(TreeError::StaleNode(foreign)));
    assert_eq!(first.len(), 1);
}

#[test]
fn clones_accept_the_handles_of_the_original() {
    let tree = example();
    let mut copy = tree.clone();
    let root = tree.root_id();
    copy.add(root, "d");
    assert_eq!(copy.root().child_count(), 4);
    assert_eq!(tree.root().child_count(), 3);
}

#[test]
fn remove_data_takes_first_match() {
    let mut tree = Tree::new(0);
    let root = tree.root_id();
    let first = tree.add(root, 7);
    tree.add(first, 70);
    tree.add(root, 7);

    let removed = tree.remove_data(root, &7).unwrap();
    assert_eq!(datas(&removed), [7, 70]);
    assert_eq!(datas(&tree), [0, 7]);
}

#[test]
fn remove_data_missing_is_none() {
    let mut tree = example();
    let root = tree.root_id();
    assert!(tree.remove_data(root, &"nope").is_none());
    assert_eq!(datas(&tree), datas(&example()));
}

#[test]
fn try_remove_data_with_stale_parent() {
    let mut tree = example();
    let root = tree.root_id();
    let c = tree.root().child(2).map(|node| node.id()).unwrap();
    tree.remove(root, 2);
    assert_eq!(
        tree.try_remove_data(c, &"c1").unwrap_err(),
        TreeError::StaleNode(c)
    );
    assert!(matches!(tree.try_remove_data(root, &"nope"), Ok(None)));
    assert_eq!(tree.len(), 5);
}

#[test]
fn try_remove_out_of_range() {
    let mut tree = example();
    let root = tree.root_id();
    assert_eq!(
        tree.try_remove(root, 3).unwrap_err(),
        TreeError::ChildIndexOutOfRange { index: 3, len: 3 }
    );
    assert_eq!(tree.len(), 7);
}

#[test]
#[should_panic = "out of range"]
fn remove_out_of_range_panics() {
    let mut tree = Tree::new(());
    let root = tree.root_id();
    tree.remove(root, 0);
}

#[test]
#[should_panic = "is not part of this tree"]
fn node_after_remove_panics() {
    let mut tree = example();
    let root = tree.root_id();
    let c = tree.root().child(2).map(|node| node.id()).unwrap();
    tree.remove(root, 2);
    let _ = tree.node(c);
}
