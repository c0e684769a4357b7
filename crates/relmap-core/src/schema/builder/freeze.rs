use super::{
    attribute::{attribute_mapping, AttributeDraft, Owner},
    BuildMetamodel, ResolvedAssociation,
};
use crate::{
    schema::{
        mapping::{
            AttributeKind, AttributeMapping, EntityMappingType, EntityVersionMapping,
            NaturalIdMapping,
        },
        source::EntitySource,
        Metamodel,
    },
    Error, Result,
};

use indexmap::IndexMap;
use std::sync::Arc;

type RootMappings = (Option<Arc<EntityVersionMapping>>, Option<Arc<NaturalIdMapping>>);

impl BuildMetamodel<'_> {
    /// Turns the drafts into the immutable metamodel. Subtypes share the
    /// attribute mappings of their supertypes.
    pub(super) fn freeze(mut self) -> Result<Metamodel> {
        let drafts = std::mem::take(&mut self.entities);

        let mut sub_types: IndexMap<String, Vec<_>> = IndexMap::new();
        for draft in drafts.values() {
            if let Some(super_name) = &draft.source.super_entity {
                sub_types.entry(super_name.clone()).or_default().push(draft.id);
            }
        }

        let mut entities: IndexMap<String, EntityMappingType> = IndexMap::new();
        let mut root_mappings: IndexMap<String, RootMappings> = IndexMap::new();

        for (name, draft) in drafts {
            let hierarchy = &self.hierarchies[&draft.root];
            let table = draft.mapped_table().to_string();
            let slots = hierarchy.identifier.slot_count();
            let owner = Owner::entity(&name, draft.role.clone(), &table, slots);

            let mut attributes = match &draft.source.super_entity {
                Some(super_name) => match entities.get(super_name) {
                    Some(parent) => parent.attributes.clone(),
                    None => {
                        return Err(Error::illegal_state(format!(
                            "`{name}` frozen before its super entity `{super_name}`"
                        )))
                    }
                },
                None => vec![],
            };

            for declared in draft.declared {
                let attribute = match declared {
                    AttributeDraft::Ready(attribute) => attribute,
                    AttributeDraft::Association { source, position } => {
                        let key = (name.clone(), source.name.clone());
                        let kind = match self.resolved.swap_remove(&key) {
                            Some(ResolvedAssociation::ToOne(to_one)) => {
                                AttributeKind::ToOne(to_one)
                            }
                            Some(ResolvedAssociation::Plural(plural)) => {
                                AttributeKind::Plural(plural)
                            }

                            None => {
                                return Err(Error::illegal_state(format!(
                                    "association `{name}.{}` was never resolved",
                                    source.name
                                )))
                            }
                        };
                        Arc::new(attribute_mapping(&owner, source, position, kind))
                    }
                };

                debug_assert_eq!(attribute.state_array_position, attributes.len());
                attributes.push(attribute);
            }

            let (version, natural_id) = if draft.super_types.is_empty() {
                let mappings = (
                    version_mapping(draft.source, &attributes)?,
                    natural_id_mapping(draft.source, &attributes)?,
                );
                root_mappings.insert(name.clone(), mappings.clone());
                mappings
            } else {
                root_mappings
                    .get(&draft.root)
                    .cloned()
                    .unwrap_or_default()
            };

            let discriminator_value = hierarchy.discriminator.as_ref().and_then(|discriminator| {
                discriminator
                    .converter
                    .details_for_entity_name(&name)
                    .ok()
                    .map(|details| details.value.clone())
            });

            log::trace!(
                "froze entity `{name}`; attributes={} discriminator={:?}",
                attributes.len(),
                discriminator_value
            );

            let entity = EntityMappingType {
                id: draft.id,
                type_name: draft.source.type_name.clone(),
                role: draft.role,
                is_abstract: draft.source.is_abstract,
                inheritance: hierarchy.inheritance,
                table_details: draft.table_details,
                identifier: hierarchy.identifier.clone(),
                discriminator: hierarchy.discriminator.clone(),
                discriminator_value,
                version,
                natural_id,
                attributes,
                inherited_attribute_count: draft.inherited,
                super_types: draft.super_types,
                sub_types: sub_types.swap_remove(&name).unwrap_or_default(),
                name: name.clone(),
            };

            entities.insert(name, entity);
        }

        log::debug!(
            "metamodel built; entities={} embeddables={} foreign keys={}",
            entities.len(),
            self.embeddables.len(),
            self.foreign_keys.len()
        );

        Ok(Metamodel {
            entities,
            embeddables: self.embeddables,
            foreign_keys: self.foreign_keys,
        })
    }
}

fn version_mapping(
    root: &EntitySource,
    attributes: &[Arc<AttributeMapping>],
) -> Result<Option<Arc<EntityVersionMapping>>> {
    let mut versions = root.attributes.iter().filter(|attribute| attribute.version);

    let Some(source) = versions.next() else {
        return Ok(None);
    };

    if let Some(other) = versions.next() {
        return Err(Error::invalid_mapping(
            &root.name,
            Some(other.name.as_str()),
            format!("`{}` is already the version attribute", source.name),
        ));
    }

    let attribute = attributes.iter().find(|a| a.name == source.name);

    match attribute {
        Some(attribute)
            if attribute
                .as_basic()
                .is_some_and(|basic| basic.jdbc_mapping().domain_ty.is_integral()) =>
        {
            Ok(Some(Arc::new(EntityVersionMapping {
                attribute: attribute.clone(),
            })))
        }
        _ => Err(Error::invalid_mapping(
            &root.name,
            Some(source.name.as_str()),
            "the version attribute must be a basic integer attribute",
        )),
    }
}

fn natural_id_mapping(
    root: &EntitySource,
    attributes: &[Arc<AttributeMapping>],
) -> Result<Option<Arc<NaturalIdMapping>>> {
    let mut natural_id = vec![];

    for source in root.natural_id_attributes() {
        match attributes.iter().find(|a| a.name == source.name) {
            Some(attribute) if !attribute.is_plural() => natural_id.push(attribute.clone()),
            _ => {
                return Err(Error::invalid_mapping(
                    &root.name,
                    Some(source.name.as_str()),
                    "natural id attributes must be single-valued state attributes",
                ))
            }
        }
    }

    if natural_id.is_empty() {
        return Ok(None);
    }

    Ok(Some(Arc::new(NaturalIdMapping {
        attributes: natural_id,
        mutable: root.natural_id_mutable,
    })))
}
