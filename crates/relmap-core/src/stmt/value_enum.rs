use super::TypeEnum;

/// A constant of an enumerated type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueEnum {
    /// Name of the enum type the constant belongs to
    pub ty: String,

    /// Position of the constant in its declaring type
    pub ordinal: usize,

    /// The constant's name
    pub name: String,
}

impl ValueEnum {
    /// Returns the constant of `ty` at `ordinal`.
    pub fn from_ordinal(ty: &TypeEnum, ordinal: usize) -> Option<Self> {
        ty.variant(ordinal).map(|name| Self {
            ty: ty.name.clone(),
            ordinal,
            name: name.to_string(),
        })
    }

    /// Returns the constant of `ty` named `name`.
    pub fn from_name(ty: &TypeEnum, name: &str) -> Option<Self> {
        ty.ordinal_of(name).map(|ordinal| Self {
            ty: ty.name.clone(),
            ordinal,
            name: name.to_string(),
        })
    }

    /// The first character of the constant's name.
    pub fn first_char(&self) -> Option<char> {
        self.name.chars().next()
    }
}
