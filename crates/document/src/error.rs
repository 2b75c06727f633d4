use thiserror::Error;

pub type Result<T> = std::result::Result<T, DocumentError>;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Format error: {0}")]
    FormatError(String),

    #[error("Transfer cancelled after {bytes_copied} bytes")]
    Cancelled { bytes_copied: u64 },
}

impl DocumentError {
    #[must_use]
    pub const fn is_format(&self) -> bool {
        matches!(self, Self::FormatError(_))
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
