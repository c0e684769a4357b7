use super::TypeEnum;

/// A domain type.
///
/// Every mapped thing has one: basic attributes have a scalar type,
/// embeddables and entities are referenced by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Type {
    /// Boolean value
    Bool,

    /// Signed 8-bit integer
    I8,

    /// Signed 16-bit integer
    I16,

    /// Signed 32-bit integer
    I32,

    /// Signed 64-bit integer
    I64,

    /// A single character
    Char,

    /// String type
    String,

    /// Opaque bytes
    Bytes,

    /// An enumerated type
    Enum(TypeEnum),

    /// A fixed-length tuple where each item can have a different type.
    Record(Vec<Type>),

    /// An instance of the named entity
    Entity(String),

    /// An instance of the named embeddable
    Embeddable(String),

    /// A list of a single type
    List(Box<Type>),

    /// The null type can be cast to any type.
    Null,
}

impl Type {
    pub fn list(ty: impl Into<Self>) -> Self {
        Self::List(Box::new(ty.into()))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool)
    }

    pub fn is_char(&self) -> bool {
        matches!(self, Self::Char)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::String)
    }

    /// Returns `true` for the signed integer types.
    pub fn is_integral(&self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, Self::Enum(_))
    }

    pub fn as_enum(&self) -> Option<&TypeEnum> {
        match self {
            Self::Enum(ty) => Some(ty),
            _ => None,
        }
    }

    /// Returns `true` for types that map to a single relational value.
    pub fn is_scalar(&self) -> bool {
        !matches!(
            self,
            Self::Record(_) | Self::Entity(_) | Self::Embeddable(_) | Self::List(_)
        )
    }

    /// A short, human readable name used in error messages.
    pub fn name(&self) -> String {
        match self {
            Self::Enum(ty) => ty.name.clone(),
            Self::Entity(name) | Self::Embeddable(name) => name.clone(),
            Self::List(item) => format!("List<{}>", item.name()),
            Self::Record(fields) => {
                let names: Vec<_> = fields.iter().map(Type::name).collect();
                format!("({})", names.join(", "))
            }
            _ => format!("{self:?}"),
        }
    }
}

impl From<TypeEnum> for Type {
    fn from(value: TypeEnum) -> Self {
        Self::Enum(value)
    }
}
