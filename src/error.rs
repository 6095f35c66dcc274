//! Error types for editor operations.

use thiserror::Error;

/// Failures surfaced to the UI collaborator.
///
/// None of these are fatal: the model is left unchanged whenever one is
/// returned.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("no node with id `{0}`")]
    NodeNotFound(String),

    #[error("the root node cannot be deleted")]
    CannotDeleteRoot,

    #[error("no legend entry with id `{0}`")]
    LegendEntryNotFound(String),

    #[error("a legend entry needs a name")]
    EmptyLegendName,

    #[error("`{0}` is not a #rrggbb color")]
    InvalidColor(String),

    #[error("failed to decode archive: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EditorError>;
