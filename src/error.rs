use crate::NodeId;

/// Caller errors reported by the fallible [`Tree`](crate::Tree) operations.
///
/// The panicking counterparts (like [`Tree::remove`](crate::Tree::remove)) panic with the message of this error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The node was detached from this tree or never belonged to it.
    #[error("node {0:?} is not part of this tree")]
    StaleNode(NodeId),

    #[error("child index {index} is out of range for a node with {len} children")]
    ChildIndexOutOfRange { index: usize, len: usize },
}

#[test]
fn messages_name_the_problem() {
    let error = TreeError::ChildIndexOutOfRange { index: 3, len: 2 };
    assert_eq!(
        error.to_string(),
        "child index 3 is out of range for a node with 2 children"
    );
}
