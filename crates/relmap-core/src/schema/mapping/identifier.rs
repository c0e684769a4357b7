mod aggregated;
pub use aggregated::AggregatedIdentifier;

mod non_aggregated;
pub use non_aggregated::{IdentifierValueMapper, NonAggregatedIdentifier};

mod simple;
pub use simple::SimpleIdentifier;

use super::{
    AttributeMapping, Bindable, EmbeddableMappingType, JdbcMapping, MappingType, ModelPart,
    NavigableRole, SelectableMapping, Session, ValueMapping,
};
use crate::{stmt::Value, Error, Result};

use std::sync::Arc;

/// The identifier of an entity hierarchy. One instance is shared by every
/// entity of the hierarchy.
///
/// Entity instances store the identifier in their leading fields: one field
/// for simple and aggregated identifiers, one per `@Id` attribute for
/// non-aggregated identifiers.
#[derive(Debug)]
pub struct EntityIdentifierMapping {
    pub role: NavigableRole,

    /// Name of the hierarchy root
    pub entity_name: String,

    pub nature: IdentifierNature,
}

#[derive(Debug)]
pub enum IdentifierNature {
    Simple(SimpleIdentifier),

    /// `@EmbeddedId`
    Aggregated(AggregatedIdentifier),

    /// Several `@Id` attributes
    NonAggregated(NonAggregatedIdentifier),
}

impl EntityIdentifierMapping {
    pub fn is_simple(&self) -> bool {
        matches!(self.nature, IdentifierNature::Simple(_))
    }

    pub fn is_aggregated(&self) -> bool {
        matches!(self.nature, IdentifierNature::Aggregated(_))
    }

    pub fn is_non_aggregated(&self) -> bool {
        matches!(self.nature, IdentifierNature::NonAggregated(_))
    }

    /// Number of leading entity instance fields holding the identifier.
    pub fn slot_count(&self) -> usize {
        match &self.nature {
            IdentifierNature::Simple(_) | IdentifierNature::Aggregated(_) => 1,
            IdentifierNature::NonAggregated(id) => id.virtual_embeddable.attributes.len(),
        }
    }

    /// Names of the identifier attributes declared on the entity.
    pub fn attribute_names(&self) -> Vec<&str> {
        match &self.nature {
            IdentifierNature::Simple(id) => vec![&id.attribute_name[..]],
            IdentifierNature::Aggregated(id) => vec![&id.attribute_name[..]],
            IdentifierNature::NonAggregated(id) => id
                .virtual_embeddable
                .attributes
                .iter()
                .map(|attribute| &attribute.name[..])
                .collect(),
        }
    }

    /// Whether the identifier value has a type of its own, separate from the
    /// entity.
    pub fn has_containing_class(&self) -> bool {
        match &self.nature {
            IdentifierNature::Simple(_) => false,
            IdentifierNature::Aggregated(_) => true,
            IdentifierNature::NonAggregated(id) => id.id_class.is_some(),
        }
    }

    /// The embeddable describing identifier values: the id class if one is
    /// configured, else the virtual embeddable.
    pub fn mapped_id_embeddable_type(&self) -> Option<&EmbeddableMappingType> {
        match &self.nature {
            IdentifierNature::Simple(_) => None,
            IdentifierNature::Aggregated(id) => Some(&*id.embeddable),
            IdentifierNature::NonAggregated(id) => {
                Some(id.id_class.as_deref().unwrap_or(&*id.virtual_embeddable))
            }
        }
    }

    pub fn identifier_value_mapper(&self) -> Option<IdentifierValueMapper<'_>> {
        match &self.nature {
            IdentifierNature::NonAggregated(id) => Some(id.mapper()),
            _ => None,
        }
    }

    /// Finds a part of a composite identifier by attribute name.
    pub fn find_sub_part(&self, name: &str) -> Option<&Arc<AttributeMapping>> {
        self.mapped_id_embeddable_type()
            .and_then(|embeddable| embeddable.find_attribute(name))
    }

    /// Reads the identifier of an entity instance. The identifier of a proxy
    /// is known without initializing it.
    pub fn get_identifier(&self, entity: &Value) -> Result<Value> {
        let record = match entity {
            Value::Proxy(proxy) => return Ok((*proxy.id).clone()),
            Value::Record(record) => record,
            other => return Err(Error::type_conversion(other.clone(), &self.entity_name)),
        };

        match &self.nature {
            IdentifierNature::Simple(_) | IdentifierNature::Aggregated(_) => {
                record.first().cloned().ok_or_else(|| self.missing_slots())
            }
            IdentifierNature::NonAggregated(id) => id.mapper().get_identifier(entity),
        }
    }

    pub fn set_identifier(&self, entity: &mut Value, id: Value) -> Result<()> {
        match &self.nature {
            IdentifierNature::Simple(_) | IdentifierNature::Aggregated(_) => {
                match entity.as_record_mut().and_then(|record| record.first_mut()) {
                    Some(slot) => {
                        *slot = id;
                        Ok(())
                    }
                    None => Err(self.missing_slots()),
                }
            }
            IdentifierNature::NonAggregated(non_aggregated) => {
                non_aggregated.mapper().set_identifier(entity, id)
            }
        }
    }

    /// An entity is unsaved while its identifier, or any part of it, is
    /// null.
    pub fn is_unsaved(&self, entity: &Value) -> Result<bool> {
        Ok(self.get_identifier(entity)?.has_null())
    }

    /// A fresh identifier value with every part null.
    pub fn instantiate(&self) -> Value {
        match self.mapped_id_embeddable_type() {
            Some(embeddable) => embeddable.instantiate(),
            None => Value::Null,
        }
    }

    fn missing_slots(&self) -> Error {
        Error::illegal_argument(format!(
            "instance of `{}` has no identifier fields",
            self.entity_name
        ))
    }

    fn as_bindable(&self) -> &dyn ModelPart {
        match &self.nature {
            IdentifierNature::Simple(id) => id,
            IdentifierNature::Aggregated(id) => &*id.embeddable,
            IdentifierNature::NonAggregated(id) => &*id.virtual_embeddable,
        }
    }
}

impl ValueMapping for EntityIdentifierMapping {
    fn mapped_type(&self) -> MappingType {
        match self.mapped_id_embeddable_type() {
            Some(embeddable) => embeddable.mapped_type(),
            None => self.as_bindable().mapped_type(),
        }
    }
}

impl Bindable for EntityIdentifierMapping {
    fn for_each_jdbc_type(
        &self,
        offset: usize,
        action: &mut dyn FnMut(usize, &JdbcMapping),
    ) -> usize {
        self.as_bindable().for_each_jdbc_type(offset, action)
    }

    fn disassemble(&self, value: &Value, session: &dyn Session) -> Result<Value> {
        self.as_bindable().disassemble(value, session)
    }

    fn for_each_disassembled_jdbc_value(
        &self,
        value: &Value,
        offset: usize,
        action: &mut dyn FnMut(usize, &Value, &JdbcMapping),
    ) -> Result<usize> {
        self.as_bindable()
            .for_each_disassembled_jdbc_value(value, offset, action)
    }
}

impl ModelPart for EntityIdentifierMapping {
    fn part_name(&self) -> &str {
        self.role.local_name()
    }

    fn navigable_role(&self) -> &NavigableRole {
        &self.role
    }

    fn for_each_selectable(
        &self,
        offset: usize,
        action: &mut dyn FnMut(usize, &SelectableMapping),
    ) -> usize {
        self.as_bindable().for_each_selectable(offset, action)
    }

    fn is_entity_identifier_mapping(&self) -> bool {
        true
    }
}
