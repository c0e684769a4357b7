use super::{Error, ErrorKind};
use crate::stmt::Value;

/// Error when an uninitialized proxy must be loaded but the session cannot
/// load it.
#[derive(Debug)]
pub(super) struct LazyInitialization {
    entity: Box<str>,
    id: Value,
}

impl std::error::Error for LazyInitialization {}

impl core::fmt::Display for LazyInitialization {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "could not initialize proxy [{}#{}] - no session",
            self.entity, self.id
        )
    }
}

impl Error {
    pub fn lazy_initialization(entity: impl Into<String>, id: &Value) -> Error {
        Error::from(ErrorKind::LazyInitialization(LazyInitialization {
            entity: entity.into().into(),
            id: id.clone(),
        }))
    }

    /// Returns `true` if this error is a lazy initialization error.
    pub fn is_lazy_initialization(&self) -> bool {
        self.any_kind(|kind| matches!(kind, ErrorKind::LazyInitialization(_)))
    }
}
