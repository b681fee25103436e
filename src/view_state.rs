use std::collections::HashSet;

use crate::flatten::{flatten, Flattened};
use crate::model::TreeModel;

/// Keeps the scroll position, the opened nodes and the selection of a [`TreeView`](crate::TreeView).
///
/// Nodes are identified by the child indices leading to them, starting with the index of their root.
/// An empty identifier means nothing is selected.
///
/// # Example
///
/// ```
/// # use growing_tree::{Tree, TreeViewState};
/// let tree = Tree::grown(2_u8, |n: &u8| (0..*n).collect::<Vec<_>>());
/// let roots = [tree.root()];
///
/// let mut state = TreeViewState::default();
/// state.select_first(&roots);
/// state.toggle_selected();
/// assert!(state.key_down(&roots));
/// assert_eq!(state.selected(), [0, 0]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct TreeViewState {
    pub(super) offset: usize,
    pub(super) opened: HashSet<Vec<usize>>,
    pub(super) selected: Vec<usize>,
    pub(super) ensure_selected_in_view_on_next_render: bool,
}

impl TreeViewState {
    #[must_use]
    pub const fn get_offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn get_all_opened(&self) -> Vec<Vec<usize>> {
        self.opened.iter().cloned().collect()
    }

    /// Get a flat list of all visible (= below opened) nodes with this state.
    #[must_use]
    pub fn flatten<M>(&self, roots: &[M]) -> Vec<Flattened<M>>
    where
        M: TreeModel + Clone,
    {
        flatten(&self.opened, roots)
    }

    #[must_use]
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    /// Selects the given identifier.
    ///
    /// Returns `true` when the selection changed.
    pub fn select(&mut self, identifier: Vec<usize>) -> bool {
        self.ensure_selected_in_view_on_next_render = true;
        let changed = self.selected != identifier;
        self.selected = identifier;
        changed
    }

    /// Open a node so its children become visible.
    ///
    /// Returns `true` when the node was closed before.
    pub fn open(&mut self, identifier: Vec<usize>) -> bool {
        if identifier.is_empty() {
            false
        } else {
            self.opened.insert(identifier)
        }
    }

    /// Close a node so its children are hidden.
    ///
    /// Returns `true` when the node was open before.
    pub fn close(&mut self, identifier: &[usize]) -> bool {
        self.opened.remove(identifier)
    }

    /// Open a closed node or close an open one.
    ///
    /// Only returns `false` for an empty identifier.
    pub fn toggle(&mut self, identifier: Vec<usize>) -> bool {
        if identifier.is_empty() {
            false
        } else if self.opened.contains(&identifier) {
            self.close(&identifier)
        } else {
            self.open(identifier)
        }
    }

    /// [`toggle`](Self::toggle) the selected node.
    pub fn toggle_selected(&mut self) -> bool {
        self.ensure_selected_in_view_on_next_render = true;
        self.toggle(self.selected.clone())
    }

    /// Returns `true` when any node was closed.
    pub fn close_all(&mut self) -> bool {
        if self.opened.is_empty() {
            false
        } else {
            self.opened.clear();
            true
        }
    }

    /// Select the first root.
    ///
    /// Returns `true` when the selection changed.
    pub fn select_first<M: TreeModel>(&mut self, roots: &[M]) -> bool {
        let identifier = if roots.is_empty() { Vec::new() } else { vec![0] };
        self.select(identifier)
    }

    /// Select the last visible node.
    ///
    /// Returns `true` when the selection changed.
    pub fn select_last<M>(&mut self, roots: &[M]) -> bool
    where
        M: TreeModel + Clone,
    {
        let identifier = self
            .flatten(roots)
            .pop()
            .map_or_else(Vec::new, |flattened| flattened.identifier);
        self.select(identifier)
    }

    /// Move the selection within the visible nodes.
    ///
    /// `change` gets the index of the currently selected visible node (`None` without selection) and returns the index to select.
    /// Indices past the end select the last visible node.
    ///
    /// Returns `true` when the selection changed.
    pub fn select_visible_relative<M, F>(&mut self, roots: &[M], change: F) -> bool
    where
        M: TreeModel + Clone,
        F: FnOnce(Option<usize>) -> usize,
    {
        let visible = self.flatten(roots);
        let current = visible
            .iter()
            .position(|flattened| flattened.identifier == self.selected);
        let index = change(current).min(visible.len().saturating_sub(1));
        let identifier = visible
            .into_iter()
            .nth(index)
            .map_or_else(Vec::new, |flattened| flattened.identifier);
        self.select(identifier)
    }

    /// Scroll the specified amount of lines up.
    ///
    /// Returns `false` when the top was already reached.
    pub fn scroll_up(&mut self, lines: usize) -> bool {
        let before = self.offset;
        self.offset = self.offset.saturating_sub(lines);
        before != self.offset
    }

    /// Scroll the specified amount of lines down.
    ///
    /// The bottom is only known on render so this always returns `true`.
    pub fn scroll_down(&mut self, lines: usize) -> bool {
        self.offset = self.offset.saturating_add(lines);
        true
    }

    /// Select the visible node above, the first one without selection.
    pub fn key_up<M>(&mut self, roots: &[M]) -> bool
    where
        M: TreeModel + Clone,
    {
        self.select_visible_relative(roots, |current| {
            current.map_or(usize::MAX, |current| current.saturating_sub(1))
        })
    }

    /// Select the visible node below, the first one without selection.
    pub fn key_down<M>(&mut self, roots: &[M]) -> bool
    where
        M: TreeModel + Clone,
    {
        self.select_visible_relative(roots, |current| {
            current.map_or(0, |current| current.saturating_add(1))
        })
    }

    /// Close the selected node or, when already closed, select its parent.
    pub fn key_left(&mut self) -> bool {
        self.ensure_selected_in_view_on_next_render = true;
        let mut changed = self.opened.remove(&self.selected);
        if !changed && self.selected.len() > 1 {
            self.selected.pop();
            changed = true;
        }
        changed
    }

    /// Open the selected node.
    pub fn key_right(&mut self) -> bool {
        self.ensure_selected_in_view_on_next_render = true;
        self.open(self.selected.clone())
    }
}

#[test]
fn toggle_opens_and_closes() {
    let mut state = TreeViewState::default();
    assert!(state.toggle(vec![0, 1]));
    assert_eq!(state.get_all_opened(), [vec![0, 1]]);
    assert!(state.toggle(vec![0, 1]));
    assert!(state.get_all_opened().is_empty());
    assert!(!state.toggle(Vec::new()));
}

#[test]
fn key_navigation_walks_visible_nodes() {
    let tree = crate::flatten::example();
    let roots = [tree.root()];
    let mut state = TreeViewState::default();

    assert!(state.key_down(&roots));
    assert_eq!(state.selected(), [0]);
    assert!(!state.key_down(&roots));

    assert!(state.key_right());
    assert!(state.key_down(&roots));
    assert!(state.key_down(&roots));
    assert_eq!(state.selected(), [0, 1]);

    assert!(state.key_right());
    assert!(state.key_down(&roots));
    assert_eq!(state.selected(), [0, 1, 0]);

    assert!(state.key_left());
    assert_eq!(state.selected(), [0, 1]);
    assert!(state.key_left());
    assert_eq!(state.get_all_opened(), [vec![0]]);

    assert!(state.select_last(&roots));
    assert_eq!(state.selected(), [0, 2]);
    assert!(state.key_up(&roots));
    assert_eq!(state.selected(), [0, 1]);
}

#[test]
fn key_left_keeps_the_root_selected() {
    let mut state = TreeViewState::default();
    state.select(vec![0]);
    assert!(!state.key_left());
    assert_eq!(state.selected(), [0]);
}

#[test]
fn scrolling_saturates_at_the_top() {
    let mut state = TreeViewState::default();
    assert!(!state.scroll_up(1));
    assert!(state.scroll_down(3));
    assert!(state.scroll_up(5));
    assert_eq!(state.get_offset(), 0);
}
