use thiserror::Error;

/// Raised only when a caller breaks the input contract. Text that simply
/// contains no names is never an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, ParseError>;
