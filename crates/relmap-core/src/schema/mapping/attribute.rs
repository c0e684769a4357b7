mod basic;
pub use basic::BasicAttribute;

mod embedded;
pub use embedded::EmbeddedAttribute;

mod plural;
pub use plural::PluralAttribute;

mod to_one;
pub use to_one::{Cardinality, ToOneAttribute};

use super::{
    Bindable, JdbcMapping, MappingType, ModelPart, NavigableRole, PropertyAccess,
    SelectableMapping, Session, ValueMapping,
};
use crate::{
    schema::source::{CascadeStyle, FetchStyle, FetchTiming},
    stmt::Value,
    Result,
};

use std::sync::Arc;

/// A named attribute of an entity or embeddable.
///
/// Attribute mappings are immutable and shared: a subtype holds the same
/// `Arc` as the supertype that declares the attribute.
#[derive(Debug)]
pub struct AttributeMapping {
    pub name: String,

    /// Position in the declaring type's state array. Inherited attributes
    /// come first, in declaration order.
    pub state_array_position: usize,

    pub fetchable_index: usize,

    /// Name of the entity or embeddable declaring the attribute
    pub declaring_type: String,

    pub role: NavigableRole,

    /// Reads and writes the attribute on instances of the declaring type
    pub property_access: Arc<dyn PropertyAccess>,

    pub metadata: AttributeMetadata,

    pub fetch: FetchOptions,

    pub cascade: Vec<CascadeStyle>,

    pub kind: AttributeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeMetadata {
    pub nullable: bool,
    pub insertable: bool,
    pub updatable: bool,

    /// Whether a change to the attribute increments the version
    pub optimistic_locked: bool,

    pub lazy: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub timing: FetchTiming,
    pub style: FetchStyle,
}

#[derive(Debug)]
pub enum AttributeKind {
    Basic(BasicAttribute),
    Embedded(EmbeddedAttribute),
    ToOne(ToOneAttribute),
    Plural(PluralAttribute),
}

impl AttributeMapping {
    pub fn is_basic(&self) -> bool {
        matches!(self.kind, AttributeKind::Basic(_))
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self.kind, AttributeKind::Embedded(_))
    }

    pub fn is_to_one(&self) -> bool {
        matches!(self.kind, AttributeKind::ToOne(_))
    }

    pub fn is_plural(&self) -> bool {
        matches!(self.kind, AttributeKind::Plural(_))
    }

    pub fn as_basic(&self) -> Option<&BasicAttribute> {
        match &self.kind {
            AttributeKind::Basic(basic) => Some(basic),
            _ => None,
        }
    }

    pub fn as_embedded(&self) -> Option<&EmbeddedAttribute> {
        match &self.kind {
            AttributeKind::Embedded(embedded) => Some(embedded),
            _ => None,
        }
    }

    pub fn as_to_one(&self) -> Option<&ToOneAttribute> {
        match &self.kind {
            AttributeKind::ToOne(to_one) => Some(to_one),
            _ => None,
        }
    }

    pub fn as_plural(&self) -> Option<&PluralAttribute> {
        match &self.kind {
            AttributeKind::Plural(plural) => Some(plural),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_basic(&self) -> &BasicAttribute {
        self.as_basic()
            .unwrap_or_else(|| panic!("expected basic attribute; actual={}", self.role))
    }

    #[track_caller]
    pub fn expect_embedded(&self) -> &EmbeddedAttribute {
        self.as_embedded()
            .unwrap_or_else(|| panic!("expected embedded attribute; actual={}", self.role))
    }

    #[track_caller]
    pub fn expect_to_one(&self) -> &ToOneAttribute {
        self.as_to_one()
            .unwrap_or_else(|| panic!("expected to-one attribute; actual={}", self.role))
    }

    #[track_caller]
    pub fn expect_plural(&self) -> &PluralAttribute {
        self.as_plural()
            .unwrap_or_else(|| panic!("expected plural attribute; actual={}", self.role))
    }

    /// Reads the attribute's value from an instance of the declaring type.
    pub fn get_value(&self, owner: &Value) -> Result<Value> {
        self.property_access.get(owner)
    }

    pub fn set_value(&self, owner: &mut Value, value: Value) -> Result<()> {
        self.property_access.set(owner, value)
    }

    /// Whether two values of this attribute differ in their relational form.
    pub fn is_dirty(&self, old: &Value, new: &Value, session: &dyn Session) -> Result<bool> {
        if let AttributeKind::Plural(_) = self.kind {
            return Ok(old != new);
        }

        let old = self.disassemble(old, session)?;
        let new = self.disassemble(new, session)?;

        let mut old_values = vec![];
        self.for_each_disassembled_jdbc_value(&old, 0, &mut |_, value, _| {
            old_values.push(value.clone());
        })?;

        let mut dirty = false;
        self.for_each_disassembled_jdbc_value(&new, 0, &mut |i, value, _| {
            dirty |= old_values.get(i) != Some(value);
        })?;

        Ok(dirty)
    }
}

impl ValueMapping for AttributeMapping {
    fn mapped_type(&self) -> MappingType {
        match &self.kind {
            AttributeKind::Basic(basic) => basic.mapped_type(),
            AttributeKind::Embedded(embedded) => embedded.embeddable.mapped_type(),
            AttributeKind::ToOne(to_one) => MappingType::Entity(to_one.associated_entity.clone()),
            AttributeKind::Plural(plural) => plural.mapped_type(),
        }
    }
}

impl Bindable for AttributeMapping {
    fn for_each_jdbc_type(
        &self,
        offset: usize,
        action: &mut dyn FnMut(usize, &JdbcMapping),
    ) -> usize {
        match &self.kind {
            AttributeKind::Basic(basic) => basic.for_each_jdbc_type(offset, action),
            AttributeKind::Embedded(embedded) => {
                embedded.embeddable.for_each_jdbc_type(offset, action)
            }
            AttributeKind::ToOne(to_one) => to_one.for_each_jdbc_type(offset, action),
            AttributeKind::Plural(plural) => plural.for_each_jdbc_type(offset, action),
        }
    }

    fn disassemble(&self, value: &Value, session: &dyn Session) -> Result<Value> {
        match &self.kind {
            AttributeKind::Basic(basic) => basic.disassemble(value, session),
            AttributeKind::Embedded(embedded) => embedded.embeddable.disassemble(value, session),
            AttributeKind::ToOne(to_one) => to_one.disassemble(value, session),
            AttributeKind::Plural(plural) => plural.disassemble(value, session),
        }
    }

    fn for_each_disassembled_jdbc_value(
        &self,
        value: &Value,
        offset: usize,
        action: &mut dyn FnMut(usize, &Value, &JdbcMapping),
    ) -> Result<usize> {
        match &self.kind {
            AttributeKind::Basic(basic) => {
                basic.for_each_disassembled_jdbc_value(value, offset, action)
            }
            AttributeKind::Embedded(embedded) => embedded
                .embeddable
                .for_each_disassembled_jdbc_value(value, offset, action),
            AttributeKind::ToOne(to_one) => {
                to_one.for_each_disassembled_jdbc_value(value, offset, action)
            }
            AttributeKind::Plural(plural) => {
                plural.for_each_disassembled_jdbc_value(value, offset, action)
            }
        }
    }
}

impl ModelPart for AttributeMapping {
    fn part_name(&self) -> &str {
        &self.name
    }

    fn navigable_role(&self) -> &NavigableRole {
        &self.role
    }

    fn for_each_selectable(
        &self,
        offset: usize,
        action: &mut dyn FnMut(usize, &SelectableMapping),
    ) -> usize {
        match &self.kind {
            AttributeKind::Basic(basic) => {
                action(offset, &basic.selectable);
                1
            }
            AttributeKind::Embedded(embedded) => {
                embedded.embeddable.for_each_selectable(offset, action)
            }
            AttributeKind::ToOne(to_one) => to_one.for_each_selectable(offset, action),
            AttributeKind::Plural(plural) => plural.for_each_selectable(offset, action),
        }
    }
}
