use super::{
    model_part::visit_nulls, Bindable, EmbeddableMappingType, EntityIdentifierMapping,
    ForeignKeyDescriptor, JdbcMapping, MappingType, ModelPart, NavigableRole, SelectableMapping,
    Session, ValueMapping,
};
use crate::{stmt::Value, Result};

use std::sync::Arc;

/// The three parts a collection can have. A plural attribute has at most one
/// of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionPartNature {
    Element,

    /// List index or map key
    Index,

    /// Surrogate row identifier of an id-bag
    Id,
}

impl CollectionPartNature {
    pub fn part_name(self) -> &'static str {
        match self {
            Self::Element => "{element}",
            Self::Index => "{index}",
            Self::Id => "{collection-id}",
        }
    }
}

#[derive(Debug)]
pub struct CollectionPart {
    pub nature: CollectionPartNature,
    pub role: NavigableRole,
    pub kind: CollectionPartKind,
}

#[derive(Debug)]
pub enum CollectionPartKind {
    /// A single column of the collection table
    Basic(SelectableMapping),

    /// Embeddable values stored in the collection table
    Embedded(Arc<EmbeddableMappingType>),

    /// Entities whose own table holds the collection key. The part binds to
    /// the entity's identifier.
    OneToMany {
        entity: String,
        identifier: Arc<EntityIdentifierMapping>,
    },

    /// Entities referenced through a foreign key of the collection table
    ManyToMany {
        entity: String,
        foreign_key: Arc<ForeignKeyDescriptor>,
    },
}

impl CollectionPart {
    /// The associated entity, for entity-valued parts.
    pub fn associated_entity(&self) -> Option<&str> {
        match &self.kind {
            CollectionPartKind::OneToMany { entity, .. }
            | CollectionPartKind::ManyToMany { entity, .. } => Some(entity),
            _ => None,
        }
    }

    pub fn is_entity_valued(&self) -> bool {
        self.associated_entity().is_some()
    }

    /// Identifier value of an element entity. Proxies are not initialized.
    fn entity_identifier(
        identifier: &EntityIdentifierMapping,
        value: &Value,
    ) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        identifier.get_identifier(value)
    }
}

impl ValueMapping for CollectionPart {
    fn mapped_type(&self) -> MappingType {
        match &self.kind {
            CollectionPartKind::Basic(selectable) => {
                MappingType::Basic(selectable.jdbc_mapping.domain_ty.clone())
            }
            CollectionPartKind::Embedded(embeddable) => embeddable.mapped_type(),
            CollectionPartKind::OneToMany { entity, .. }
            | CollectionPartKind::ManyToMany { entity, .. } => MappingType::Entity(entity.clone()),
        }
    }
}

impl Bindable for CollectionPart {
    fn for_each_jdbc_type(
        &self,
        offset: usize,
        action: &mut dyn FnMut(usize, &JdbcMapping),
    ) -> usize {
        match &self.kind {
            CollectionPartKind::Basic(selectable) => {
                action(offset, &selectable.jdbc_mapping);
                1
            }
            CollectionPartKind::Embedded(embeddable) => {
                embeddable.for_each_jdbc_type(offset, action)
            }
            CollectionPartKind::OneToMany { identifier, .. } => {
                identifier.for_each_jdbc_type(offset, action)
            }
            CollectionPartKind::ManyToMany { foreign_key, .. } => {
                foreign_key.for_each_jdbc_type(offset, action)
            }
        }
    }

    fn disassemble(&self, value: &Value, session: &dyn Session) -> Result<Value> {
        match &self.kind {
            CollectionPartKind::Basic(selectable) => {
                selectable.jdbc_mapping.to_relational_value(value)
            }
            CollectionPartKind::Embedded(embeddable) => embeddable.disassemble(value, session),
            CollectionPartKind::OneToMany { identifier, .. } => {
                let id = Self::entity_identifier(identifier, value)?;
                identifier.disassemble(&id, session)
            }
            CollectionPartKind::ManyToMany { foreign_key, .. } => {
                let key = foreign_key.key_part_value_from_target(value, session)?;
                foreign_key.disassemble(&key, session)
            }
        }
    }

    fn for_each_disassembled_jdbc_value(
        &self,
        value: &Value,
        offset: usize,
        action: &mut dyn FnMut(usize, &Value, &JdbcMapping),
    ) -> Result<usize> {
        match &self.kind {
            CollectionPartKind::Basic(selectable) => {
                action(offset, value, &selectable.jdbc_mapping);
                Ok(1)
            }
            CollectionPartKind::Embedded(embeddable) => {
                embeddable.for_each_disassembled_jdbc_value(value, offset, action)
            }
            CollectionPartKind::OneToMany { identifier, .. } => {
                identifier.for_each_disassembled_jdbc_value(value, offset, action)
            }
            CollectionPartKind::ManyToMany { foreign_key, .. } if value.is_null() => {
                Ok(visit_nulls(&**foreign_key, offset, action))
            }
            CollectionPartKind::ManyToMany { foreign_key, .. } => {
                foreign_key.for_each_disassembled_jdbc_value(value, offset, action)
            }
        }
    }
}

impl ModelPart for CollectionPart {
    fn part_name(&self) -> &str {
        self.nature.part_name()
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
            CollectionPartKind::Basic(selectable) => {
                action(offset, selectable);
                1
            }
            CollectionPartKind::Embedded(embeddable) => {
                embeddable.for_each_selectable(offset, action)
            }
            CollectionPartKind::OneToMany { identifier, .. } => {
                identifier.for_each_selectable(offset, action)
            }
            CollectionPartKind::ManyToMany { foreign_key, .. } => foreign_key
                .key
                .part
                .selectables
                .for_each_selectable(offset, action),
        }
    }
}
