use super::{Error, ErrorKind};

/// Error when a value passed to the metamodel has the wrong shape.
#[derive(Debug)]
pub(super) struct IllegalArgument {
    message: Box<str>,
}

impl std::error::Error for IllegalArgument {}

impl core::fmt::Display for IllegalArgument {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "illegal argument: {}", self.message)
    }
}

impl Error {
    pub fn illegal_argument(message: impl Into<String>) -> Error {
        Error::from(ErrorKind::IllegalArgument(IllegalArgument {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an illegal argument error.
    pub fn is_illegal_argument(&self) -> bool {
        self.any_kind(|kind| matches!(kind, ErrorKind::IllegalArgument(_)))
    }
}
