use super::{
    AttributeMapping, CacheKeyBuilder, CollectionPart, EmbeddableDiscriminatorMapping,
    EntityDiscriminatorMapping, EntityIdentifierMapping, ForeignKeyDescriptor, JdbcMapping,
    NavigableRole, SelectableMapping, Session,
};
use crate::{
    stmt::{Type, Value},
    Result,
};

/// What a mapped thing holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingType {
    /// A single value of the given type
    Basic(Type),

    /// A value of the named embeddable
    Embeddable(String),

    /// A reference to the named entity
    Entity(String),

    /// A collection of the given element type
    Collection(Type),
}

impl MappingType {
    /// The domain type of values of this mapping.
    pub fn domain_type(&self) -> Type {
        match self {
            Self::Basic(ty) => ty.clone(),
            Self::Embeddable(name) => Type::Embeddable(name.clone()),
            Self::Entity(name) => Type::Entity(name.clone()),
            Self::Collection(element) => Type::list(element.clone()),
        }
    }
}

pub trait ValueMapping {
    fn mapped_type(&self) -> MappingType;
}

/// Something that binds to a fixed list of JDBC values.
///
/// Positions passed to the visitors start at the caller supplied `offset` and
/// are contiguous. Each visitor returns how many positions it used.
pub trait Bindable {
    fn jdbc_type_count(&self) -> usize {
        self.for_each_jdbc_type(0, &mut |_, _| {})
    }

    fn for_each_jdbc_type(
        &self,
        offset: usize,
        action: &mut dyn FnMut(usize, &JdbcMapping),
    ) -> usize;

    /// Converts a domain value into its relational form. Composite values
    /// become records with the same nesting as the domain value.
    ///
    /// The session is only used to initialize lazy references.
    fn disassemble(&self, value: &Value, session: &dyn Session) -> Result<Value>;

    /// Visits each scalar of a disassembled value in selectable order.
    fn for_each_disassembled_jdbc_value(
        &self,
        value: &Value,
        offset: usize,
        action: &mut dyn FnMut(usize, &Value, &JdbcMapping),
    ) -> Result<usize>;

    fn for_each_jdbc_value(
        &self,
        value: &Value,
        offset: usize,
        session: &dyn Session,
        action: &mut dyn FnMut(usize, &Value, &JdbcMapping),
    ) -> Result<usize> {
        let disassembled = self.disassemble(value, session)?;
        self.for_each_disassembled_jdbc_value(&disassembled, offset, action)
    }

    fn add_to_cache_key(
        &self,
        cache_key: &mut CacheKeyBuilder,
        value: &Value,
        session: &dyn Session,
    ) -> Result<()> {
        let disassembled = self.disassemble(value, session)?;
        self.for_each_disassembled_jdbc_value(&disassembled, 0, &mut |_, value, jdbc_mapping| {
            cache_key.add_value(value, jdbc_mapping)
        })?;
        Ok(())
    }
}

/// An addressable node of the domain graph.
pub trait ModelPart: ValueMapping + Bindable {
    fn part_name(&self) -> &str;

    fn navigable_role(&self) -> &NavigableRole;

    fn for_each_selectable(
        &self,
        offset: usize,
        action: &mut dyn FnMut(usize, &SelectableMapping),
    ) -> usize;

    fn is_entity_identifier_mapping(&self) -> bool {
        false
    }
}

/// Visits a scalar or a null composite: a null composite yields one null per
/// JDBC type.
pub(crate) fn visit_nulls(
    part: &dyn Bindable,
    offset: usize,
    action: &mut dyn FnMut(usize, &Value, &JdbcMapping),
) -> usize {
    part.for_each_jdbc_type(offset, &mut |i, jdbc_mapping| {
        action(i, &Value::Null, jdbc_mapping)
    })
}

/// A borrowed model part of any kind, as returned by lookups.
#[derive(Debug, Clone, Copy)]
pub enum ModelPartRef<'a> {
    Attribute(&'a AttributeMapping),
    Identifier(&'a EntityIdentifierMapping),
    Discriminator(&'a EntityDiscriminatorMapping),
    EmbeddableDiscriminator(&'a EmbeddableDiscriminatorMapping),
    ForeignKey(&'a ForeignKeyDescriptor),
    CollectionPart(&'a CollectionPart),
}

impl<'a> ModelPartRef<'a> {
    fn as_dyn(&self) -> &'a dyn ModelPart {
        match *self {
            Self::Attribute(part) => part,
            Self::Identifier(part) => part,
            Self::Discriminator(part) => part,
            Self::EmbeddableDiscriminator(part) => part,
            Self::ForeignKey(part) => part,
            Self::CollectionPart(part) => part,
        }
    }

    pub fn as_attribute(&self) -> Option<&'a AttributeMapping> {
        match *self {
            Self::Attribute(attribute) => Some(attribute),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_attribute(&self) -> &'a AttributeMapping {
        match *self {
            Self::Attribute(attribute) => attribute,
            _ => panic!("expected attribute; actual={self:#?}"),
        }
    }

    pub fn as_identifier(&self) -> Option<&'a EntityIdentifierMapping> {
        match *self {
            Self::Identifier(identifier) => Some(identifier),
            _ => None,
        }
    }

    pub fn is_discriminator(&self) -> bool {
        matches!(
            self,
            Self::Discriminator(_) | Self::EmbeddableDiscriminator(_)
        )
    }
}

impl ValueMapping for ModelPartRef<'_> {
    fn mapped_type(&self) -> MappingType {
        self.as_dyn().mapped_type()
    }
}

impl Bindable for ModelPartRef<'_> {
    fn for_each_jdbc_type(
        &self,
        offset: usize,
        action: &mut dyn FnMut(usize, &JdbcMapping),
    ) -> usize {
        self.as_dyn().for_each_jdbc_type(offset, action)
    }

    fn disassemble(&self, value: &Value, session: &dyn Session) -> Result<Value> {
        self.as_dyn().disassemble(value, session)
    }

    fn for_each_disassembled_jdbc_value(
        &self,
        value: &Value,
        offset: usize,
        action: &mut dyn FnMut(usize, &Value, &JdbcMapping),
    ) -> Result<usize> {
        self.as_dyn()
            .for_each_disassembled_jdbc_value(value, offset, action)
    }
}

impl ModelPart for ModelPartRef<'_> {
    fn part_name(&self) -> &str {
        self.as_dyn().part_name()
    }

    fn navigable_role(&self) -> &NavigableRole {
        self.as_dyn().navigable_role()
    }

    fn for_each_selectable(
        &self,
        offset: usize,
        action: &mut dyn FnMut(usize, &SelectableMapping),
    ) -> usize {
        self.as_dyn().for_each_selectable(offset, action)
    }

    fn is_entity_identifier_mapping(&self) -> bool {
        self.as_dyn().is_entity_identifier_mapping()
    }
}
