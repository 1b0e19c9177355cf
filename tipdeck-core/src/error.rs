use tipdeck_model::ModelError;

/// Errors surfaced by the scheduling core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("catalog must contain at least one item")]
    EmptyCatalog,

    #[error("invalid catalog: {0}")]
    Model(#[from] ModelError),

    #[error("carousel runtime has shut down")]
    RuntimeClosed,

    #[error("carousel task failed: {0}")]
    TaskFailed(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
