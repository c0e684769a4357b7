use super::{Error, ErrorKind};
use crate::stmt::Value;

/// Error when a relational discriminator value maps to no entity or
/// embeddable subtype.
///
/// This indicates corrupt data or a schema that does not match the mapping.
#[derive(Debug)]
pub(super) struct UnknownDiscriminator {
    value: Value,
    hierarchy: Box<str>,
}

impl std::error::Error for UnknownDiscriminator {}

impl core::fmt::Display for UnknownDiscriminator {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unrecognized discriminator value {} for hierarchy `{}`",
            self.value, self.hierarchy
        )
    }
}

impl Error {
    pub fn unknown_discriminator(value: Value, hierarchy: impl Into<String>) -> Error {
        Error::from(ErrorKind::UnknownDiscriminator(UnknownDiscriminator {
            value,
            hierarchy: hierarchy.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown discriminator error.
    pub fn is_unknown_discriminator(&self) -> bool {
        self.any_kind(|kind| matches!(kind, ErrorKind::UnknownDiscriminator(_)))
    }
}
