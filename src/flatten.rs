use std::collections::HashSet;

use crate::model::TreeModel;

/// A visible row of a [`TreeView`](crate::TreeView).
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flattened<M> {
    /// Child indices leading from the top level to this node.
    /// The first index selects the root.
    pub identifier: Vec<usize>,
    pub item: M,
}

impl<M> Flattened<M> {
    /// Zero based depth. Depth 0 means top level with 0 indentation.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.identifier.len() - 1
    }
}

/// Get a flat list of all visible nodes.
///
/// The roots are always visible, children only when their parent is opened.
#[must_use]
pub fn flatten<M>(opened: &HashSet<Vec<usize>>, roots: &[M]) -> Vec<Flattened<M>>
where
    M: TreeModel + Clone,
{
    let mut result = Vec::new();
    for (index, root) in roots.iter().enumerate() {
        push_visible(opened, root.clone(), vec![index], &mut result);
    }
    result
}

fn push_visible<M: TreeModel>(
    opened: &HashSet<Vec<usize>>,
    item: M,
    identifier: Vec<usize>,
    result: &mut Vec<Flattened<M>>,
) {
    let children = if opened.contains(&identifier) {
        (0..item.child_count())
            .filter_map(|index| item.child_at(index).map(|child| (index, child)))
            .collect()
    } else {
        Vec::new()
    };

    result.push(Flattened {
        identifier: identifier.clone(),
        item,
    });

    for (index, child) in children {
        let mut child_identifier = identifier.clone();
        child_identifier.push(index);
        push_visible(opened, child, child_identifier, result);
    }
}

#[cfg(test)]
pub(crate) fn example() -> crate::Tree<&'static str> {
    let mut tree = crate::Tree::new("root");
    let root = tree.root_id();
    tree.add(root, "a");
    let b = tree.add(root, "b");
    tree.add(b, "c");
    let d = tree.add(b, "d");
    tree.add(d, "e");
    tree.add(d, "f");
    tree.add(b, "g");
    tree.add(root, "h");
    tree
}

#[cfg(test)]
fn flatten_works(opened: &[&[usize]], expected: &[&str]) {
    let tree = example();
    let opened = opened.iter().map(|path| path.to_vec()).collect();
    let actual = flatten(&opened, &[tree.root()])
        .into_iter()
        .map(|flattened| *flattened.item.data())
        .collect::<Vec<_>>();
    assert_eq!(actual, expected);
}

#[test]
fn depth_works() {
    let tree = example();
    let opened = [vec![0], vec![0, 1], vec![0, 1, 1]].into_iter().collect();
    let depths = flatten(&opened, &[tree.root()])
        .into_iter()
        .map(|flattened| flattened.depth())
        .collect::<Vec<_>>();
    assert_eq!(depths, [0, 1, 1, 2, 2, 3, 3, 2, 1]);
}

#[test]
fn nothing_opened_is_only_the_root() {
    flatten_works(&[], &["root"]);
}

#[test]
fn opened_below_closed_stays_hidden() {
    flatten_works(&[&[0, 1]], &["root"]);
}

#[test]
fn root_opened() {
    flatten_works(&[&[0]], &["root", "a", "b", "h"]);
}

#[test]
fn all_opened() {
    flatten_works(
        &[&[0], &[0, 1], &[0, 1, 1]],
        &["root", "a", "b", "c", "d", "e", "f", "g", "h"],
    );
}

#[test]
fn multiple_roots_are_top_level() {
    let first = crate::Tree::new("x");
    let second = example();
    let opened = [vec![1]].into_iter().collect();
    let identifiers = flatten(&opened, &[first.root(), second.root()])
        .into_iter()
        .map(|flattened| flattened.identifier)
        .collect::<Vec<_>>();
    assert_eq!(
        identifiers,
        [vec![0], vec![1], vec![1, 0], vec![1, 1], vec![1, 2]]
    );
}
