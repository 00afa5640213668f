use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("cannot merge trees with different null values")]
    NullValueMismatch,
}

/// A broken tree invariant reported by [`Tree::validate`](crate::Tree::validate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("keys are not in strictly ascending order")]
    Order,
    #[error("root node has a parent")]
    RootHasParent,
    #[error("child node doesn't point back to its parent")]
    ParentLink,
    #[error("tree records {recorded} nodes but holds {counted}")]
    Size { recorded: usize, counted: usize },
    #[error("a node stores the null value")]
    NullValue,
    #[error("stored height {stored} differs from computed height {computed}")]
    Height { stored: usize, computed: usize },
    #[error("subtree heights {left} and {right} differ by more than one")]
    Unbalanced { left: usize, right: usize },
    #[error("root node is red")]
    RedRoot,
    #[error("red node has a red child")]
    RedChild,
    #[error("black heights {left} and {right} differ")]
    BlackHeight { left: usize, right: usize },
}
