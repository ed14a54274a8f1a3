use crate::BlockId;
use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

/// Structural integrity violations of a page
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Duplicate block id: {0}")]
    DuplicateId(BlockId),

    #[error("Block {0} is listed more than once")]
    ListedTwice(BlockId),

    #[error("Block {0} has children but is not a container")]
    ChildrenOnLeaf(BlockId),

    #[error("Reference to missing block: {0}")]
    DanglingReference(BlockId),

    #[error("Block {id} records parent {recorded:?} but is listed under {actual:?}")]
    ParentMismatch {
        id: BlockId,
        recorded: Option<BlockId>,
        actual: Option<BlockId>,
    },

    #[error("Block {0} is not reachable from the root list")]
    Unreachable(BlockId),

    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for ModelError {
    fn from(e: serde_json::Error) -> Self {
        ModelError::Json(e.to_string())
    }
}
