use super::{Error, ErrorKind};

/// Error when the metamodel is used in a way its contract forbids.
#[derive(Debug)]
pub(super) struct IllegalState {
    message: Box<str>,
}

impl std::error::Error for IllegalState {}

impl core::fmt::Display for IllegalState {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "illegal state: {}", self.message)
    }
}

impl Error {
    pub fn illegal_state(message: impl Into<String>) -> Error {
        Error::from(ErrorKind::IllegalState(IllegalState {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an illegal state error.
    pub fn is_illegal_state(&self) -> bool {
        self.any_kind(|kind| matches!(kind, ErrorKind::IllegalState(_)))
    }
}
