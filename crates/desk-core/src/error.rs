use thiserror::Error;

/// Failures raised by the ticket engine.
///
/// Both kinds are validation failures: a rejected call leaves tickets and
/// technicians exactly as they were.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required value was absent or blank.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation is not allowed from the current state.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    InvalidState,
}

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::InvalidState(_) => ErrorKind::InvalidState,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Rejects empty text with `InvalidArgument`, naming the field.
pub(crate) fn require_text(value: &str, field: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::invalid_argument(format!("{} cannot be empty", field)));
    }
    Ok(())
}
