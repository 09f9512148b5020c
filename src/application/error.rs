use thiserror::Error;

/// The two classes of failure a ledger operation can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Unknown category: {0}")]
    CategoryNotFound(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::CategoryNotFound(_) => ErrorKind::NotFound,
            AppError::InvalidAmount(_) => ErrorKind::InvalidArgument,
        }
    }
}
