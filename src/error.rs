use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    /// The canonical record could not be encoded. Indicates a programming
    /// defect, never a transient condition.
    #[error("failed to encode chunk: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("chunk does not extend the tip: expected parent #{expected}, found #{found}")]
    ParentMismatch { expected: u64, found: u64 },

    #[error("chunk #{index} failed validation")]
    InvalidChunk { index: u64 },
}

pub type Result<T> = std::result::Result<T, ChainError>;
