use std::fmt::Display;

use crate::node::NodeRef;

/// Read-only capability a tree view needs to display a tree.
///
/// Implementations wrap a reference to some node and hand out wrappers of related nodes.
/// A view must never change the wrapped tree through this trait.
///
/// Implemented for [`NodeRef`] whenever the data can be displayed.
pub trait TreeModel: Sized {
    #[must_use]
    fn child_count(&self) -> usize;

    /// The child at the given position or `None` when out of range.
    #[must_use]
    fn child_at(&self, index: usize) -> Option<Self>;

    /// The parent or `None` for a root.
    #[must_use]
    fn parent(&self) -> Option<Self>;

    /// Position of `child` among the children of `self`.
    #[must_use]
    fn index_of(&self, child: &Self) -> Option<usize>;

    #[must_use]
    fn is_leaf(&self) -> bool {
        self.child_count() == 0
    }

    /// Whether children could be shown below this node even when it currently has none.
    #[must_use]
    fn allows_children(&self) -> bool {
        true
    }

    /// Human readable representation shown by the view.
    #[must_use]
    fn text(&self) -> String;
}

impl<T: Display> TreeModel for NodeRef<'_, T> {
    fn child_count(&self) -> usize {
        Self::child_count(self)
    }

    fn child_at(&self, index: usize) -> Option<Self> {
        self.child(index)
    }

    fn parent(&self) -> Option<Self> {
        Self::parent(self)
    }

    fn index_of(&self, child: &Self) -> Option<usize> {
        Self::index_of(self, child)
    }

    fn is_leaf(&self) -> bool {
        Self::is_leaf(self)
    }

    fn text(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
fn describe<M: TreeModel>(model: &M) -> String {
    let children = (0..model.child_count())
        .filter_map(|index| model.child_at(index))
        .map(|child| describe(&child))
        .collect::<Vec<_>>();
    if children.is_empty() {
        model.text()
    } else {
        format!("{}({})", model.text(), children.join(","))
    }
}

#[test]
fn node_ref_model_mirrors_the_tree() {
    let tree = crate::Tree::grown(3_u8, |n: &u8| (1..*n).collect::<Vec<_>>());
    let root = tree.root();
    assert_eq!(describe(&root), "3(1,2(1))");

    let two = TreeModel::child_at(&root, 1).unwrap();
    assert_eq!(TreeModel::child_count(&two), 1);
    assert_eq!(TreeModel::parent(&two), Some(root));
    assert_eq!(TreeModel::index_of(&root, &two), Some(1));
    assert!(TreeModel::parent(&root).is_none());
    assert!(TreeModel::child_at(&root, 2).is_none());
    assert!(TreeModel::allows_children(&two));
    assert!(!TreeModel::is_leaf(&two));
}
