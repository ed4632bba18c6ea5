use thiserror::Error;

use crate::DataIndex;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("Key at index {existing} is equal to the inserted key")]
    DuplicateKey { existing: DataIndex },
    #[error("Node at index {0} does not fit in the data")]
    IndexOutOfBounds(DataIndex),
    #[error("Guard node is not black")]
    GuardNotBlack,
    #[error("Red node {node} has a red child")]
    RedChild { node: String },
    #[error("Black height {found} at {node} differs from {expected}")]
    BlackHeightMismatch {
        node: String,
        expected: usize,
        found: usize,
    },
    #[error("Node {node} is not greater than its in-order predecessor")]
    OutOfOrder { node: String },
}

pub type TreeResult<T> = Result<T, TreeError>;
