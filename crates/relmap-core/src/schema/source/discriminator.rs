use super::{ColumnSource, ConverterSource, RelationalValueSource};
use crate::stmt::{Type, Value};

/// The discriminator of an entity or embeddable hierarchy.
#[derive(Debug, Clone)]
pub struct DiscriminatorSource {
    pub value: RelationalValueSource,

    /// Domain type of the discriminator
    pub ty: Type,

    pub converter: Option<ConverterSource>,

    /// Restrict every query on the hierarchy by discriminator, even when
    /// loading the root.
    pub forced: bool,

    pub insertable: bool,
}

impl DiscriminatorSource {
    pub fn column(column: impl Into<ColumnSource>) -> Self {
        Self {
            value: RelationalValueSource::Column(column.into()),
            ty: Type::String,
            converter: None,
            forced: false,
            insertable: true,
        }
    }

    pub fn formula(formula: impl Into<String>) -> Self {
        Self {
            value: RelationalValueSource::DerivedValue(formula.into()),
            ty: Type::String,
            converter: None,
            forced: false,
            insertable: false,
        }
    }

    pub fn ty(mut self, ty: impl Into<Type>) -> Self {
        self.ty = ty.into();
        self
    }

    pub fn converter(mut self, converter: ConverterSource) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn forced(mut self) -> Self {
        self.forced = true;
        self
    }

    pub fn insertable(mut self, insertable: bool) -> Self {
        self.insertable = insertable;
        self
    }
}

/// The discriminator value declared for one entity or embeddable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscriminatorMatch {
    /// Rows whose discriminator equals the value. Strings are parsed into
    /// the discriminator's relational type.
    Value(Value),

    /// Rows whose discriminator is null.
    Null,

    /// Rows whose discriminator is not null and matches no other value.
    NotNull,
}

impl From<Value> for DiscriminatorMatch {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            value => Self::Value(value),
        }
    }
}

macro_rules! impl_from_literal {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for DiscriminatorMatch {
                fn from(value: $ty) -> Self {
                    Self::Value(value.into())
                }
            }
        )*
    };
}

impl_from_literal!(&str, String, char, i32, i64);
