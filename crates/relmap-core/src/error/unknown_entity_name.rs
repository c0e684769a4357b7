use super::{Error, ErrorKind};

/// Error when an entity or embeddable name is not known.
#[derive(Debug)]
pub(super) struct UnknownEntityName {
    name: Box<str>,
}

impl std::error::Error for UnknownEntityName {}

impl core::fmt::Display for UnknownEntityName {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unknown entity or embeddable name `{}`", self.name)
    }
}

impl Error {
    pub fn unknown_entity_name(name: impl Into<String>) -> Error {
        Error::from(ErrorKind::UnknownEntityName(UnknownEntityName {
            name: name.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown entity name error.
    pub fn is_unknown_entity_name(&self) -> bool {
        self.any_kind(|kind| matches!(kind, ErrorKind::UnknownEntityName(_)))
    }
}
