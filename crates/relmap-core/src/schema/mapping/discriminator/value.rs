use crate::stmt::Value;

use std::fmt;

/// A relational discriminator value, or one of the two sentinels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DiscriminatorValue {
    /// A value of the discriminator's relational type
    Literal(Value),

    /// Matches rows whose discriminator is null
    Null,

    /// Matches rows whose discriminator is not null and matches no literal
    NotNull,
}

impl DiscriminatorValue {
    pub fn is_sentinel(&self) -> bool {
        !matches!(self, Self::Literal(_))
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Self::Literal(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for DiscriminatorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{value}"),
            Self::Null => f.write_str("<null>"),
            Self::NotNull => f.write_str("<not null>"),
        }
    }
}

/// The discriminator value of one entity or embeddable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscriminatorValueDetails {
    pub value: DiscriminatorValue,

    /// Entity or embeddable name
    pub indicated_name: String,

    /// Path of the Rust type of the entity or embeddable
    pub type_name: String,
}

impl DiscriminatorValueDetails {
    pub fn new(
        value: DiscriminatorValue,
        indicated_name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            value,
            indicated_name: indicated_name.into(),
            type_name: type_name.into(),
        }
    }

    pub fn indicated_name(&self) -> &str {
        &self.indicated_name
    }
}
