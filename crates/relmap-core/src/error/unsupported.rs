use super::{Error, ErrorKind};

/// Error when an operation is not supported by the model part it is invoked
/// on, e.g. asking the mapped-by side of an association for its key columns.
#[derive(Debug)]
pub(super) struct Unsupported {
    message: Box<str>,
}

impl std::error::Error for Unsupported {}

impl core::fmt::Display for Unsupported {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unsupported operation: {}", self.message)
    }
}

impl Error {
    pub fn unsupported(message: impl Into<String>) -> Error {
        Error::from(ErrorKind::Unsupported(Unsupported {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an unsupported operation error.
    pub fn is_unsupported(&self) -> bool {
        self.any_kind(|kind| matches!(kind, ErrorKind::Unsupported(_)))
    }
}
