use super::{ColumnSource, PluralSource, RelationalValueSource, ToOneSource};
use crate::stmt::Type;

/// Marks an attribute as (part of) the identifier.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum IdMarker {
    #[default]
    None,

    /// `@Id`
    Id,

    /// `@EmbeddedId`
    EmbeddedId,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FetchTiming {
    #[default]
    Immediate,
    Delayed,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FetchStyle {
    #[default]
    Join,
    Select,
    Subselect,
    Batch,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchSource {
    pub timing: FetchTiming,
    pub style: FetchStyle,
}

impl FetchSource {
    pub fn eager() -> Self {
        Self::default()
    }

    pub fn lazy() -> Self {
        Self {
            timing: FetchTiming::Delayed,
            style: FetchStyle::Select,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CascadeStyle {
    All,
    Persist,
    Merge,
    Remove,
    Refresh,
    Detach,
}

/// A value conversion requested for a basic attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverterSource {
    /// Enum stored by ordinal. This is the default for enums.
    EnumOrdinal,

    /// Enum stored by constant name.
    EnumName,

    /// Boolean stored as `'Y'`/`'N'`.
    YesNo,

    /// Boolean stored as `'T'`/`'F'`.
    TrueFalse,

    /// Boolean stored as `1`/`0`.
    NumericBoolean,
}

#[derive(Debug, Clone)]
pub struct BasicSource {
    pub ty: Type,

    /// Column or formula. `None` uses a column named after the attribute.
    pub value: Option<RelationalValueSource>,

    pub converter: Option<ConverterSource>,
}

impl BasicSource {
    pub fn new(ty: impl Into<Type>) -> Self {
        Self {
            ty: ty.into(),
            value: None,
            converter: None,
        }
    }

    pub fn column(mut self, column: ColumnSource) -> Self {
        self.value = Some(RelationalValueSource::Column(column));
        self
    }

    pub fn formula(mut self, formula: impl Into<String>) -> Self {
        self.value = Some(RelationalValueSource::DerivedValue(formula.into()));
        self
    }

    pub fn converter(mut self, converter: ConverterSource) -> Self {
        self.converter = Some(converter);
        self
    }
}

#[derive(Debug, Clone)]
pub struct CompositeSource {
    /// Name of the embeddable
    pub embeddable: String,
}

#[derive(Debug, Clone)]
pub enum AttributeNature {
    Basic(BasicSource),
    Composite(CompositeSource),
    ManyToOne(ToOneSource),
    OneToOne(ToOneSource),
    Plural(PluralSource),
}

impl AttributeNature {
    pub fn is_basic(&self) -> bool {
        matches!(self, Self::Basic(_))
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Composite(_))
    }

    pub fn is_to_one(&self) -> bool {
        matches!(self, Self::ManyToOne(_) | Self::OneToOne(_))
    }

    pub fn as_to_one(&self) -> Option<&ToOneSource> {
        match self {
            Self::ManyToOne(to_one) | Self::OneToOne(to_one) => Some(to_one),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeSource> {
        match self {
            Self::Composite(composite) => Some(composite),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AttributeSource {
    pub name: String,
    pub nature: AttributeNature,
    pub id: IdMarker,

    /// Whether the attribute may hold null.
    pub optional: bool,

    pub insertable: bool,
    pub updatable: bool,
    pub fetch: FetchSource,
    pub cascade: Vec<CascadeStyle>,

    /// Whether changes to the attribute increment the version.
    pub optimistic_lock: bool,

    pub natural_id: bool,
    pub version: bool,
}

impl AttributeSource {
    fn new(name: impl Into<String>, nature: AttributeNature) -> Self {
        Self {
            name: name.into(),
            nature,
            id: IdMarker::None,
            optional: true,
            insertable: true,
            updatable: true,
            fetch: FetchSource::eager(),
            cascade: vec![],
            optimistic_lock: true,
            natural_id: false,
            version: false,
        }
    }

    pub fn basic(name: impl Into<String>, ty: impl Into<Type>) -> Self {
        Self::new(name, AttributeNature::Basic(BasicSource::new(ty)))
    }

    pub fn basic_with(name: impl Into<String>, basic: BasicSource) -> Self {
        Self::new(name, AttributeNature::Basic(basic))
    }

    pub fn composite(name: impl Into<String>, embeddable: impl Into<String>) -> Self {
        Self::new(
            name,
            AttributeNature::Composite(CompositeSource {
                embeddable: embeddable.into(),
            }),
        )
    }

    pub fn many_to_one(name: impl Into<String>, to_one: ToOneSource) -> Self {
        Self::new(name, AttributeNature::ManyToOne(to_one))
    }

    pub fn one_to_one(name: impl Into<String>, to_one: ToOneSource) -> Self {
        Self::new(name, AttributeNature::OneToOne(to_one))
    }

    pub fn plural(name: impl Into<String>, plural: PluralSource) -> Self {
        let mut attribute = Self::new(name, AttributeNature::Plural(plural));
        attribute.fetch = FetchSource::lazy();
        attribute
    }

    /// Marks the attribute `@Id`.
    pub fn id(mut self) -> Self {
        self.id = IdMarker::Id;
        self.optional = false;
        self
    }

    /// Marks the attribute `@EmbeddedId`.
    pub fn embedded_id(mut self) -> Self {
        self.id = IdMarker::EmbeddedId;
        self.optional = false;
        self
    }

    pub fn required(mut self) -> Self {
        self.optional = false;
        self
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn insertable(mut self, insertable: bool) -> Self {
        self.insertable = insertable;
        self
    }

    pub fn updatable(mut self, updatable: bool) -> Self {
        self.updatable = updatable;
        self
    }

    pub fn fetch(mut self, fetch: FetchSource) -> Self {
        self.fetch = fetch;
        self
    }

    pub fn cascade(mut self, style: CascadeStyle) -> Self {
        self.cascade.push(style);
        self
    }

    pub fn exclude_from_optimistic_lock(mut self) -> Self {
        self.optimistic_lock = false;
        self
    }

    pub fn natural_id(mut self) -> Self {
        self.natural_id = true;
        self
    }

    pub fn version(mut self) -> Self {
        self.version = true;
        self.optional = false;
        self
    }

    /// Replaces the relational value of a basic attribute. No-op for other
    /// natures.
    pub fn column(mut self, column: ColumnSource) -> Self {
        if let AttributeNature::Basic(basic) = &mut self.nature {
            basic.value = Some(RelationalValueSource::Column(column));
        }
        self
    }

    pub fn is_id(&self) -> bool {
        self.id != IdMarker::None
    }
}
