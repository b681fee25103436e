#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]

/*!
Trees which grow themselves.

A [`Tree`] owns all of its nodes.
Every node holds its data, knows its parent and keeps its children in insertion order.
Trees are either built node by node with [`Tree::add`] or grown at once from a growth function with [`Tree::grown`].
Nodes are read through [`NodeRef`]s which can traverse their subtree in pre-order or post-order, eagerly with an action or lazily as an iterator.

With the `tui` feature (enabled by default) a [`TreeView`] widget shows trees in a [ratatui](https://ratatui.rs) terminal user interface.
It only reads a tree through the [`TreeModel`] capability.

# Example

Grow all permutations of `0..3` and print them:

```
# use growing_tree::Tree;
let tree = Tree::grown(Vec::new(), |list: &Vec<u8>| {
    (0..3)
        .filter(|element| !list.contains(element))
        .map(|element| {
            let mut child = list.clone();
            child.push(element);
            child
        })
        .collect::<Vec<_>>()
});

for leaf in tree.root().leaves() {
    println!("{:?}", leaf.data());
}
assert_eq!(tree.root().leaves().count(), 6);
```
*/

mod error;
#[cfg(feature = "tui")]
mod flatten;
mod iter;
mod model;
mod node;
mod tree;
#[cfg(feature = "tui")]
mod view;
#[cfg(feature = "tui")]
mod view_state;

pub use crate::error::TreeError;
#[cfg(feature = "tui")]
pub use crate::flatten::Flattened;
pub use crate::iter::{Children, PostOrder, PreOrder};
pub use crate::model::TreeModel;
pub use crate::node::NodeRef;
pub use crate::tree::{NodeId, Tree};
#[cfg(feature = "tui")]
pub use crate::view::TreeView;
#[cfg(feature = "tui")]
pub use crate::view_state::TreeViewState;
