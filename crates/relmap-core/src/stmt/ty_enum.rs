/// An enumerated domain type: an ordered list of constant names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeEnum {
    /// Name of the enum type
    pub name: String,

    /// Constant names, in ordinal order
    pub variants: Vec<String>,
}

impl TypeEnum {
    pub fn new<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    pub fn ordinal_of(&self, name: &str) -> Option<usize> {
        self.variants.iter().position(|variant| variant == name)
    }

    pub fn variant(&self, ordinal: usize) -> Option<&str> {
        self.variants.get(ordinal).map(String::as_str)
    }

    /// Returns the constant whose name starts with `ch`, if exactly one does.
    pub fn variant_by_first_char(&self, ch: char) -> Option<usize> {
        let mut matches = self
            .variants
            .iter()
            .enumerate()
            .filter(|(_, variant)| variant.starts_with(ch));

        match (matches.next(), matches.next()) {
            (Some((ordinal, _)), None) => Some(ordinal),
            _ => None,
        }
    }
}
