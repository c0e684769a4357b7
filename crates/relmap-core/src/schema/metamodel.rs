use super::mapping::{
    AssociationKey, EmbeddableMappingType, EntityId, EntityMappingType, ForeignKeyDescriptor,
};
use crate::{stmt::Value, Error, Result};

use indexmap::IndexMap;
use std::sync::Arc;

/// The complete, immutable mapping metamodel.
///
/// A metamodel is built once and then shared by every session. Nothing in it
/// changes after [`Builder::build`](super::Builder::build) returns.
#[derive(Debug)]
pub struct Metamodel {
    /// Entities by name. The index of an entity is its [`EntityId`].
    pub entities: IndexMap<String, EntityMappingType>,

    /// Embeddable usages by role
    pub embeddables: IndexMap<String, Arc<EmbeddableMappingType>>,

    /// Physical foreign keys, each registered once
    pub foreign_keys: IndexMap<AssociationKey, Arc<ForeignKeyDescriptor>>,
}

impl Metamodel {
    #[track_caller]
    pub fn entity(&self, id: EntityId) -> &EntityMappingType {
        self.entities
            .get_index(id.0)
            .map(|(_, entity)| entity)
            .unwrap_or_else(|| panic!("invalid entity ID: {id:?}"))
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityMappingType> {
        self.entities.values()
    }

    pub fn entity_by_name(&self, name: &str) -> Result<&EntityMappingType> {
        self.entities
            .get(name)
            .ok_or_else(|| Error::unknown_entity_name(name))
    }

    pub fn find_entity_by_type_name(&self, type_name: &str) -> Option<&EntityMappingType> {
        self.entities
            .values()
            .find(|entity| entity.type_name == type_name)
    }

    /// The embeddable used at `role`, e.g. `Order.pk`.
    pub fn embeddable(&self, role: &str) -> Option<&Arc<EmbeddableMappingType>> {
        self.embeddables.get(role)
    }

    /// Every usage of the named embeddable.
    pub fn embeddables_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Arc<EmbeddableMappingType>> + 'a {
        self.embeddables
            .values()
            .filter(move |embeddable| embeddable.name == name)
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = &Arc<ForeignKeyDescriptor>> {
        self.foreign_keys.values()
    }

    pub fn foreign_key(&self, key: &AssociationKey) -> Option<&Arc<ForeignKeyDescriptor>> {
        self.foreign_keys.get(key)
    }

    pub fn root_of(&self, entity: &EntityMappingType) -> &EntityMappingType {
        self.entity(entity.root())
    }

    /// Direct subtypes of `entity`.
    pub fn sub_types_of<'a>(
        &'a self,
        entity: &'a EntityMappingType,
    ) -> impl Iterator<Item = &'a EntityMappingType> + 'a {
        entity.sub_types.iter().map(|id| self.entity(*id))
    }

    /// Resolves the entity of a row of `root`'s hierarchy from its
    /// relational discriminator value.
    pub fn resolve_discriminated_entity(
        &self,
        root: &EntityMappingType,
        value: &Value,
    ) -> Result<&EntityMappingType> {
        let Some(discriminator) = &root.discriminator else {
            return Err(Error::illegal_state(format!(
                "hierarchy of `{}` has no discriminator",
                root.name
            )));
        };

        let name = discriminator.resolve_entity_name(value)?;
        let entity = self.entity_by_name(name)?;

        if !root.is_type_or_super_type(entity) {
            return Err(Error::illegal_state(format!(
                "discriminator value {value} of `{}` resolves to `{name}`, outside the hierarchy",
                root.name
            )));
        }

        Ok(entity)
    }
}
