use super::{
    attribute::{AttributeDraft, Owner},
    BuildMetamodel,
};
use crate::{
    schema::{
        mapping::{
            EntityDiscriminatorMapping, EntityId, EntityIdentifierMapping, ModelPart,
            NavigableRole, TableDetails,
        },
        source::{AttributeNature, EntitySource, InheritanceType, Schema},
        Name,
    },
    Error, Result,
};

use std::sync::Arc;

/// Mappings shared by every entity of a hierarchy.
#[derive(Debug)]
pub(super) struct HierarchyDraft {
    pub(super) inheritance: InheritanceType,
    pub(super) identifier: Arc<EntityIdentifierMapping>,
    pub(super) discriminator: Option<Arc<EntityDiscriminatorMapping>>,
}

/// An entity as it stands after pass 1.
#[derive(Debug)]
pub(super) struct EntityDraft<'a> {
    pub(super) source: &'a EntitySource,
    pub(super) id: EntityId,

    /// Name of the hierarchy root
    pub(super) root: String,

    /// Supertypes, root first
    pub(super) super_types: Vec<EntityId>,

    pub(super) role: NavigableRole,
    pub(super) table_details: Vec<TableDetails>,

    /// Number of attributes declared by supertypes
    pub(super) inherited: usize,

    pub(super) declared: Vec<AttributeDraft<'a>>,
}

impl EntityDraft<'_> {
    pub(super) fn mapped_table(&self) -> &str {
        &self.table_details[self.table_details.len() - 1].name
    }

    pub(super) fn identifier_table(&self) -> &str {
        &self.table_details[0].name
    }
}

impl<'a> BuildMetamodel<'a> {
    /// Pass 1. Builds each hierarchy: tables, identifier, discriminator and
    /// the attributes that only need their own entity's columns.
    /// Associations are queued for pass 2.
    pub(super) fn build_hierarchies(&mut self) -> Result<()> {
        let source = self.source;

        for root in source.roots() {
            let mut members = vec![];
            collect_members(source, root, &mut members);
            self.build_hierarchy(root, &members)?;
        }

        Ok(())
    }

    fn build_hierarchy(
        &mut self,
        root: &'a EntitySource,
        members: &[&'a EntitySource],
    ) -> Result<()> {
        let inheritance = root.inheritance.unwrap_or_default();
        let root_table = self.entity_table_name(root);

        log::debug!(
            "building hierarchy of `{}`; inheritance={inheritance:?} entities={}",
            root.name,
            members.len()
        );

        let identifier = self.build_identifier(root, &root_table)?;
        let discriminator = self.build_discriminator(root, members, inheritance, &root_table)?;

        let mut key_columns = vec![];
        identifier.for_each_selectable(0, &mut |_, selectable| {
            key_columns.push(selectable.expression.clone())
        });

        let slots = identifier.slot_count();

        self.hierarchies.insert(
            root.name.clone(),
            HierarchyDraft {
                inheritance,
                identifier,
                discriminator,
            },
        );

        for &entity in members {
            self.build_entity(entity, inheritance, &key_columns, slots)?;
        }

        Ok(())
    }

    fn build_entity(
        &mut self,
        entity: &'a EntitySource,
        inheritance: InheritanceType,
        key_columns: &[String],
        slots: usize,
    ) -> Result<()> {
        let id = EntityId(self.entities.len());
        let role = NavigableRole::new(&entity.name);

        let (root, super_types, inherited, table_details) = match &entity.super_entity {
            None => {
                let table = TableDetails {
                    name: self.entity_table_name(entity),
                    key_columns: key_columns.to_vec(),
                    identifier_table: true,
                };
                (entity.name.clone(), vec![], 0, vec![table])
            }
            Some(super_name) => {
                let Some(parent) = self.entities.get(super_name) else {
                    return Err(Error::invalid_mapping(
                        &entity.name,
                        None,
                        format!("super entity `{super_name}` is not part of the hierarchy"),
                    ));
                };

                let mut super_types = parent.super_types.clone();
                super_types.push(parent.id);

                (
                    parent.root.clone(),
                    super_types,
                    parent.inherited + parent.declared.len(),
                    self.subtype_table_details(entity, parent, inheritance, key_columns)?,
                )
            }
        };

        let table = table_details[table_details.len() - 1].name.clone();
        let owner = Owner::entity(&entity.name, role.clone(), &table, slots);

        let mut declared = vec![];
        for (i, attribute) in entity.state_attributes().enumerate() {
            let position = inherited + i;

            let draft = match &attribute.nature {
                AttributeNature::Basic(_) | AttributeNature::Composite(_) => {
                    AttributeDraft::Ready(self.build_attribute(&owner, attribute, position)?)
                }
                _ => {
                    self.pending
                        .push((entity.name.clone(), attribute.name.clone()));
                    AttributeDraft::Association {
                        source: attribute,
                        position,
                    }
                }
            };

            declared.push(draft);
        }

        log::trace!(
            "built entity `{}`; tables={:?} inherited={inherited} declared={}",
            entity.name,
            table_details.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            declared.len()
        );

        self.entities.insert(
            entity.name.clone(),
            EntityDraft {
                source: entity,
                id,
                root,
                super_types,
                role,
                table_details,
                inherited,
                declared,
            },
        );

        Ok(())
    }

    fn subtype_table_details(
        &self,
        entity: &EntitySource,
        parent: &EntityDraft<'a>,
        inheritance: InheritanceType,
        key_columns: &[String],
    ) -> Result<Vec<TableDetails>> {
        match inheritance {
            InheritanceType::SingleTable => {
                if entity.table.is_some() {
                    return Err(Error::invalid_mapping(
                        &entity.name,
                        None,
                        "single-table subclass entities are stored in the root's table",
                    ));
                }

                Ok(parent.table_details.clone())
            }
            InheritanceType::Joined => {
                let columns = if entity.primary_key_join_columns.is_empty() {
                    key_columns.to_vec()
                } else if entity.primary_key_join_columns.len() == key_columns.len() {
                    entity
                        .primary_key_join_columns
                        .iter()
                        .map(|column| column.name.clone())
                        .collect()
                } else {
                    return Err(Error::invalid_mapping(
                        &entity.name,
                        None,
                        format!(
                            "{} primary key join columns given; the identifier has {} columns",
                            entity.primary_key_join_columns.len(),
                            key_columns.len()
                        ),
                    ));
                };

                let mut table_details = parent.table_details.clone();
                table_details.push(TableDetails {
                    name: self.entity_table_name(entity),
                    key_columns: columns,
                    identifier_table: false,
                });
                Ok(table_details)
            }
            InheritanceType::TablePerClass => Ok(vec![TableDetails {
                name: self.entity_table_name(entity),
                key_columns: key_columns.to_vec(),
                identifier_table: true,
            }]),
        }
    }

    /// The table of an entity: the declared one, or one named after the
    /// entity. Both get the configured prefix.
    pub(super) fn entity_table_name(&self, entity: &EntitySource) -> String {
        match &entity.table {
            Some(table) => {
                let name = self.prefix_table_name(&table.name);
                match &table.schema {
                    Some(schema) => format!("{schema}.{name}"),
                    None => name,
                }
            }
            None => self.prefix_table_name(&Name::new(&entity.name).snake_case()),
        }
    }
}

/// `entity` followed by its subtypes, depth first.
fn collect_members<'a>(
    source: &'a Schema,
    entity: &'a EntitySource,
    out: &mut Vec<&'a EntitySource>,
) {
    out.push(entity);
    for subtype in source.subtypes_of(&entity.name) {
        collect_members(source, subtype, out);
    }
}
