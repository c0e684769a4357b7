use super::{Error, ErrorKind};

/// Error when the boot-time source model cannot be turned into a mapping
/// model.
///
/// This occurs when:
/// - An entity has no identifier, or an ambiguous one
/// - An embeddable or entity reference cannot be resolved
/// - Attribute natures are combined in an unsupported way
/// - Discriminator values collide within a hierarchy
/// - A `mapped_by` reference names no owning attribute
///
/// These errors are always fatal for the build and are never retried.
#[derive(Debug)]
pub(super) struct InvalidMapping {
    entity: Box<str>,
    attribute: Option<Box<str>>,
    message: Box<str>,
}

impl std::error::Error for InvalidMapping {}

impl core::fmt::Display for InvalidMapping {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match &self.attribute {
            Some(attribute) => write!(
                f,
                "invalid mapping [{}.{}]: {}",
                self.entity, attribute, self.message
            ),
            None => write!(f, "invalid mapping [{}]: {}", self.entity, self.message),
        }
    }
}

impl Error {
    /// Creates an invalid mapping error naming the offending entity (or
    /// embeddable) and, when known, the attribute.
    pub fn invalid_mapping(
        entity: impl Into<String>,
        attribute: Option<&str>,
        message: impl Into<String>,
    ) -> Error {
        Error::from(ErrorKind::InvalidMapping(InvalidMapping {
            entity: entity.into().into(),
            attribute: attribute.map(Into::into),
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid mapping error.
    pub fn is_invalid_mapping(&self) -> bool {
        self.any_kind(|kind| matches!(kind, ErrorKind::InvalidMapping(_)))
    }
}
