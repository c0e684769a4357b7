use super::{
    attribute::{AttributeDraft, Owner},
    AttributeKey, BuildMetamodel, EntityDraft,
};
use crate::{
    schema::{
        mapping::{
            AttributeMapping, Cardinality, CollectionPart, CollectionPartKind,
            CollectionPartNature, ForeignKeyDescriptor, ModelPart, Nature, NavigableRole,
            PluralAttribute, SelectableMapping, SelectableMappings, SelectablePath, Side, SidePart,
            SideSource, ToOneAttribute,
        },
        source::{
            AttributeNature, AttributeSource, BasicSource, CollectionClassification, ColumnSource,
            ElementSource, EntitySource, ForeignKeyTarget, PluralSource, ToOneSource,
        },
        Name,
    },
    Error, Result,
};

use std::sync::Arc;

/// The mapping of an association attribute, completed in pass 2.
#[derive(Debug)]
pub(super) enum ResolvedAssociation {
    ToOne(ToOneAttribute),
    Plural(PluralAttribute),
}

/// The referencing columns of a foreign key, before they are built.
struct KeyColumns<'b> {
    owner: &'b str,
    attribute: &'b str,
    table: String,
    role: NavigableRole,

    /// Prefix of implicit column names
    prefix: String,

    /// Explicit columns. Empty for implicit ones.
    columns: &'b [ColumnSource],

    nullable: bool,
    insertable: bool,
    updatable: bool,
}

impl<'a> BuildMetamodel<'a> {
    /// Pass 2. Resolves associations until no pending one makes progress.
    /// An inverse side waits until the owning side it is mapped by is
    /// resolved.
    pub(super) fn resolve_associations(&mut self) -> Result<()> {
        let mut pending = std::mem::take(&mut self.pending);
        let mut round = 0;

        while !pending.is_empty() {
            round += 1;
            log::trace!(
                "resolving associations; round={round} pending={}",
                pending.len()
            );

            let before = pending.len();
            let mut deferred = vec![];

            for key in pending {
                match self.resolve_association(&key)? {
                    Some(resolved) => {
                        self.resolved.insert(key, resolved);
                    }
                    None => deferred.push(key),
                }
            }

            if deferred.len() == before {
                let (entity, attribute) = &deferred[0];
                return Err(Error::invalid_mapping(
                    entity,
                    Some(attribute.as_str()),
                    "the mapped-by side of the association never resolved",
                ));
            }

            pending = deferred;
        }

        Ok(())
    }

    /// Returns `None` if the association waits on another one.
    fn resolve_association(&mut self, key: &AttributeKey) -> Result<Option<ResolvedAssociation>> {
        let entity = self.entities[&key.0].source;
        let Some(attribute) = entity.find_attribute(&key.1) else {
            return Err(Error::illegal_state(format!(
                "pending association `{}.{}` has no source",
                key.0, key.1
            )));
        };

        match &attribute.nature {
            AttributeNature::ManyToOne(to_one) => {
                self.resolve_to_one(entity, attribute, to_one, false)
            }
            AttributeNature::OneToOne(to_one) => {
                self.resolve_to_one(entity, attribute, to_one, true)
            }
            AttributeNature::Plural(plural) => self.resolve_plural(entity, attribute, plural),
            _ => Err(Error::illegal_state(format!(
                "`{}.{}` is not an association",
                key.0, key.1
            ))),
        }
    }

    fn resolve_to_one(
        &mut self,
        entity: &'a EntitySource,
        attribute: &'a AttributeSource,
        to_one: &'a ToOneSource,
        one_to_one: bool,
    ) -> Result<Option<ResolvedAssociation>> {
        let cardinality = if one_to_one {
            Cardinality::OneToOne
        } else if to_one.logical_one_to_one {
            Cardinality::LogicalOneToOne
        } else {
            Cardinality::ManyToOne
        };

        // Fails for unknown targets
        self.entity_draft(&entity.name, &attribute.name, &to_one.target)?;

        let role = NavigableRole::new(&entity.name).append(&attribute.name);

        if let ForeignKeyTarget::MappedBy(owning) = &to_one.fk_target {
            if !one_to_one {
                return Err(Error::invalid_mapping(
                    &entity.name,
                    Some(attribute.name.as_str()),
                    "only one-to-one associations can be mapped by another attribute",
                ));
            }

            let counterpart = self.counterpart(entity, attribute, &to_one.target, owning)?;
            match counterpart.1.nature.as_to_one() {
                Some(owning_source) if owning_source.mapped_by_attribute().is_none() => {}
                _ => {
                    return Err(Error::invalid_mapping(
                        &entity.name,
                        Some(attribute.name.as_str()),
                        format!(
                            "`{}.{owning}` is not an owning to-one association",
                            to_one.target
                        ),
                    ))
                }
            }

            let counterpart_key = (counterpart.0.to_string(), owning.clone());
            let Some(ResolvedAssociation::ToOne(owning_side)) = self.resolved.get(&counterpart_key)
            else {
                return Ok(None);
            };

            if !self.is_same_or_super_entity(&owning_side.associated_entity, &entity.name) {
                return Err(Error::invalid_mapping(
                    &entity.name,
                    Some(attribute.name.as_str()),
                    format!(
                        "`{}.{owning}` references `{}`",
                        to_one.target, owning_side.associated_entity
                    ),
                ));
            }

            let foreign_key = owning_side.foreign_key.clone();
            self.mark_bidirectional(&counterpart_key, &attribute.name);

            log::trace!(
                "{role} is the inverse of `{}.{owning}`; fk={}",
                to_one.target,
                foreign_key.association_key()
            );

            return Ok(Some(ResolvedAssociation::ToOne(ToOneAttribute {
                cardinality,
                associated_entity: to_one.target.clone(),
                foreign_key,
                side_nature: Nature::Target,
                not_found: to_one.not_found,
                bidirectional_attribute: Some(owning.clone()),
                nullable: true,
            })));
        }

        let target = self.target_side(entity, attribute, &to_one.target, &to_one.fk_target)?;
        let table = self.entities[&entity.name].mapped_table().to_string();

        let key = key_side(
            KeyColumns {
                owner: &entity.name,
                attribute: &attribute.name,
                table,
                role: role.clone(),
                prefix: Name::new(&attribute.name).snake_case(),
                columns: &to_one.join_columns,
                nullable: attribute.optional,
                insertable: attribute.insertable,
                updatable: attribute.updatable,
            },
            &target.part.selectables,
        )?;

        let foreign_key = self.register_foreign_key(
            entity,
            attribute,
            ForeignKeyDescriptor {
                role: role.append("{fk}"),
                key,
                target,
                has_constraint: to_one.constraint,
            },
        )?;

        Ok(Some(ResolvedAssociation::ToOne(ToOneAttribute {
            cardinality,
            associated_entity: to_one.target.clone(),
            foreign_key,
            side_nature: Nature::Key,
            not_found: to_one.not_found,
            bidirectional_attribute: None,
            nullable: attribute.optional,
        })))
    }

    fn resolve_plural(
        &mut self,
        entity: &'a EntitySource,
        attribute: &'a AttributeSource,
        plural: &'a PluralSource,
    ) -> Result<Option<ResolvedAssociation>> {
        let role = NavigableRole::new(&entity.name).append(&attribute.name);
        check_classification(entity, attribute, plural)?;

        let (collection_table, key_descriptor, element) = match (&plural.element, &plural.mapped_by)
        {
            (ElementSource::OneToMany(target), Some(owning)) => {
                self.entity_draft(&entity.name, &attribute.name, target)?;
                let counterpart = self.counterpart(entity, attribute, target, owning)?;

                match &counterpart.1.nature {
                    AttributeNature::ManyToOne(source) | AttributeNature::OneToOne(source)
                        if source.mapped_by_attribute().is_none() => {}
                    _ => {
                        return Err(Error::invalid_mapping(
                            &entity.name,
                            Some(attribute.name.as_str()),
                            format!("`{target}.{owning}` is not an owning to-one association"),
                        ))
                    }
                }

                let counterpart_key = (counterpart.0.to_string(), owning.clone());
                let Some(ResolvedAssociation::ToOne(owning_side)) =
                    self.resolved.get(&counterpart_key)
                else {
                    return Ok(None);
                };

                if !self.is_same_or_super_entity(&owning_side.associated_entity, &entity.name) {
                    return Err(Error::invalid_mapping(
                        &entity.name,
                        Some(attribute.name.as_str()),
                        format!(
                            "`{target}.{owning}` references `{}`",
                            owning_side.associated_entity
                        ),
                    ));
                }

                let key_descriptor = owning_side.foreign_key.clone();
                self.mark_bidirectional(&counterpart_key, &attribute.name);

                (
                    key_descriptor.key_table().to_string(),
                    key_descriptor,
                    self.one_to_many_element(entity, attribute, &role, target)?,
                )
            }
            (ElementSource::ManyToMany { target, .. }, Some(owning)) => {
                self.entity_draft(&entity.name, &attribute.name, target)?;
                let counterpart = self.counterpart(entity, attribute, target, owning)?;

                match &counterpart.1.nature {
                    AttributeNature::Plural(source)
                        if source.mapped_by.is_none()
                            && matches!(source.element, ElementSource::ManyToMany { .. }) => {}
                    _ => {
                        return Err(Error::invalid_mapping(
                            &entity.name,
                            Some(attribute.name.as_str()),
                            format!(
                                "`{target}.{owning}` is not an owning many-to-many association"
                            ),
                        ))
                    }
                }

                let counterpart_key = (counterpart.0.to_string(), owning.clone());
                let Some(ResolvedAssociation::Plural(owning_side)) =
                    self.resolved.get(&counterpart_key)
                else {
                    return Ok(None);
                };

                let CollectionPartKind::ManyToMany {
                    foreign_key: element_foreign_key,
                    ..
                } = &owning_side.element.kind
                else {
                    return Err(Error::illegal_state(format!(
                        "owning many-to-many `{target}.{owning}` has no element foreign key"
                    )));
                };

                // The owning side's element key references this entity and
                // its collection key references the elements.
                let element = CollectionPart {
                    nature: CollectionPartNature::Element,
                    role: role.append("{element}"),
                    kind: CollectionPartKind::ManyToMany {
                        entity: target.clone(),
                        foreign_key: owning_side.key_descriptor.clone(),
                    },
                };

                (
                    owning_side.collection_table.clone(),
                    element_foreign_key.clone(),
                    element,
                )
            }
            (_, Some(_)) => {
                return Err(Error::invalid_mapping(
                    &entity.name,
                    Some(attribute.name.as_str()),
                    "only entity-valued collections can be mapped by another attribute",
                ))
            }
            (element, None) => {
                let collection_table = match element {
                    ElementSource::OneToMany(target) => {
                        if plural.table.is_some() {
                            return Err(Error::invalid_mapping(
                                &entity.name,
                                Some(attribute.name.as_str()),
                                "one-to-many associations are keyed in the element table",
                            ));
                        }
                        self.entity_draft(&entity.name, &attribute.name, target)?
                            .mapped_table()
                            .to_string()
                    }
                    _ => match &plural.table {
                        Some(table) => {
                            let name = self.prefix_table_name(&table.name);
                            match &table.schema {
                                Some(schema) => format!("{schema}.{name}"),
                                None => name,
                            }
                        }
                        None => format!(
                            "{}_{}",
                            self.entities[&entity.name].mapped_table(),
                            Name::new(&attribute.name).snake_case()
                        ),
                    },
                };

                let owner_side = self.target_side(
                    entity,
                    attribute,
                    &entity.name,
                    &ForeignKeyTarget::PrimaryKey,
                )?;

                let key = key_side(
                    KeyColumns {
                        owner: &entity.name,
                        attribute: &attribute.name,
                        table: collection_table.clone(),
                        role: role.append("{key}"),
                        prefix: Name::new(&entity.name).snake_case(),
                        columns: &plural.key_columns,
                        nullable: matches!(element, ElementSource::OneToMany(_)),
                        insertable: true,
                        updatable: true,
                    },
                    &owner_side.part.selectables,
                )?;

                let key_descriptor = self.register_foreign_key(
                    entity,
                    attribute,
                    ForeignKeyDescriptor {
                        role: role.append("{fk}"),
                        key,
                        target: owner_side,
                        has_constraint: true,
                    },
                )?;

                let element =
                    self.owned_element(entity, attribute, &role, element, &collection_table)?;

                (collection_table, key_descriptor, element)
            }
        };

        let index = match &plural.index {
            Some(index) => {
                let suffix = match plural.classification {
                    CollectionClassification::Map => "key",
                    _ => "order",
                };
                Some(self.collection_basic_part(
                    entity,
                    attribute,
                    &role,
                    CollectionPartNature::Index,
                    index,
                    &collection_table,
                    suffix,
                )?)
            }
            None => None,
        };

        let identifier = match &plural.collection_id {
            Some(id) => Some(self.collection_basic_part(
                entity,
                attribute,
                &role,
                CollectionPartNature::Id,
                id,
                &collection_table,
                "id",
            )?),
            None => None,
        };

        log::trace!(
            "resolved collection {role}; table={collection_table} key={}",
            key_descriptor.association_key()
        );

        Ok(Some(ResolvedAssociation::Plural(PluralAttribute {
            classification: plural.classification,
            key_descriptor,
            element,
            index,
            identifier,
            collection_table,
            mapped_by: plural.mapped_by.clone(),
            order_by: plural.order_by.clone(),
        })))
    }

    /// The element part of a collection that owns its key.
    fn owned_element(
        &mut self,
        entity: &'a EntitySource,
        attribute: &'a AttributeSource,
        role: &NavigableRole,
        element: &'a ElementSource,
        collection_table: &str,
    ) -> Result<CollectionPart> {
        let element_role = role.append("{element}");

        let kind = match element {
            ElementSource::Basic(basic) => {
                let owner = Owner::entity(&entity.name, role.clone(), collection_table, 0);
                let column = Name::new(&attribute.name).snake_case();
                let mut selectable = self.basic_selectable(&owner, attribute, basic, &column)?;
                selectable.path = SelectablePath::new("{element}");
                CollectionPartKind::Basic(selectable)
            }
            ElementSource::Composite(name) => {
                let embeddable = self.find_embeddable(&entity.name, &attribute.name, name)?;
                let owner = Owner {
                    name: &embeddable.name,
                    role: element_role.clone(),
                    table: collection_table,
                    field_offset: 0,
                    identifier: false,
                    optional: true,
                    path: Some(SelectablePath::new("{element}")),
                };
                CollectionPartKind::Embedded(self.build_embeddable(embeddable, &owner)?)
            }
            ElementSource::OneToMany(target) => {
                return self.one_to_many_element(entity, attribute, role, target)
            }
            ElementSource::ManyToMany { target, columns } => {
                let target_side =
                    self.target_side(entity, attribute, target, &ForeignKeyTarget::PrimaryKey)?;

                let key = key_side(
                    KeyColumns {
                        owner: &entity.name,
                        attribute: &attribute.name,
                        table: collection_table.to_string(),
                        role: element_role.clone(),
                        prefix: Name::new(&attribute.name).snake_case(),
                        columns,
                        nullable: false,
                        insertable: true,
                        updatable: true,
                    },
                    &target_side.part.selectables,
                )?;

                let foreign_key = self.register_foreign_key(
                    entity,
                    attribute,
                    ForeignKeyDescriptor {
                        role: element_role.append("{fk}"),
                        key,
                        target: target_side,
                        has_constraint: true,
                    },
                )?;

                CollectionPartKind::ManyToMany {
                    entity: target.clone(),
                    foreign_key,
                }
            }
        };

        Ok(CollectionPart {
            nature: CollectionPartNature::Element,
            role: element_role,
            kind,
        })
    }

    fn one_to_many_element(
        &self,
        entity: &EntitySource,
        attribute: &AttributeSource,
        role: &NavigableRole,
        target: &str,
    ) -> Result<CollectionPart> {
        let draft = self.entity_draft(&entity.name, &attribute.name, target)?;

        Ok(CollectionPart {
            nature: CollectionPartNature::Element,
            role: role.append("{element}"),
            kind: CollectionPartKind::OneToMany {
                entity: target.to_string(),
                identifier: self.hierarchies[&draft.root].identifier.clone(),
            },
        })
    }

    /// A list index, map key or id-bag identifier column.
    #[allow(clippy::too_many_arguments)]
    fn collection_basic_part(
        &self,
        entity: &EntitySource,
        attribute: &AttributeSource,
        role: &NavigableRole,
        nature: CollectionPartNature,
        basic: &BasicSource,
        collection_table: &str,
        suffix: &str,
    ) -> Result<CollectionPart> {
        let owner = Owner::entity(&entity.name, role.clone(), collection_table, 0);
        let column = format!("{}_{suffix}", Name::new(&attribute.name).snake_case());

        let mut selectable = self.basic_selectable(&owner, attribute, basic, &column)?;
        selectable.nullable = false;
        selectable.path = SelectablePath::new(nature.part_name());

        Ok(CollectionPart {
            nature,
            role: role.append(nature.part_name()),
            kind: CollectionPartKind::Basic(selectable),
        })
    }

    /// The referenced side of a foreign key into `target_entity`.
    fn target_side(
        &self,
        entity: &EntitySource,
        attribute: &AttributeSource,
        target_entity: &str,
        fk_target: &ForeignKeyTarget,
    ) -> Result<Side> {
        let target = self.entity_draft(&entity.name, &attribute.name, target_entity)?;

        match fk_target {
            ForeignKeyTarget::PrimaryKey => {
                let identifier = self.hierarchies[&target.root].identifier.clone();
                let table = target.identifier_table().to_string();
                let selectables = collect_selectables(&*identifier)
                    .iter()
                    .map(|selectable| selectable.with_table(&table))
                    .collect();

                Ok(Side {
                    nature: Nature::Target,
                    table,
                    part: SidePart {
                        role: identifier.role.clone(),
                        selectables,
                        source: SideSource::Identifier(identifier),
                    },
                })
            }
            ForeignKeyTarget::Attribute(name) => {
                let Some(referenced) = self.find_ready_attribute(target, name) else {
                    return Err(Error::invalid_mapping(
                        &entity.name,
                        Some(attribute.name.as_str()),
                        format!("`{target_entity}` has no basic or embedded attribute `{name}`"),

                    ));
                };

                let selectables = collect_selectables(&*referenced);
                let table = selectables
                    .table()
                    .unwrap_or_else(|| target.mapped_table())
                    .to_string();

                Ok(Side {
                    nature: Nature::Target,
                    table,
                    part: SidePart {
                        role: referenced.role.clone(),
                        selectables,
                        source: SideSource::Attribute(referenced),
                    },
                })
            }
            ForeignKeyTarget::MappedBy(_) => Err(Error::illegal_state(format!(
                "`{}.{}` owns no foreign key",
                entity.name, attribute.name
            ))),
        }
    }

    /// Registers a foreign key, or returns the registered descriptor with an
    /// equal association key.
    fn register_foreign_key(
        &mut self,
        entity: &EntitySource,
        attribute: &AttributeSource,
        foreign_key: ForeignKeyDescriptor,
    ) -> Result<Arc<ForeignKeyDescriptor>> {
        let key = foreign_key.association_key();

        if let Some(existing) = self.foreign_keys.get(&key) {
            let same_target = existing.target_table() == foreign_key.target_table()
                && existing.target_selectables().column_names()
                    == foreign_key.target_selectables().column_names();

            if !same_target {
                return Err(Error::invalid_mapping(
                    &entity.name,
                    Some(attribute.name.as_str()),
                    format!(
                        "columns {key} already reference {}; {} references {}",
                        existing.target_table(),
                        foreign_key.role,
                        foreign_key.target_table()
                    ),
                ));
            }

            log::trace!(
                "foreign key {key} shared by {} and {}",
                existing.role, foreign_key.role
            );
            return Ok(existing.clone());
        }

        log::trace!(
            "registered foreign key {key} -> {}({}); role={}",
            foreign_key.target_table(),
            foreign_key.target_selectables().column_names().join(", "),
            foreign_key.role
        );

        let foreign_key = Arc::new(foreign_key);
        self.foreign_keys.insert(key, foreign_key.clone());
        Ok(foreign_key)
    }

    /// Records `inverse` as the other side of a resolved owning to-one.
    fn mark_bidirectional(&mut self, owning: &AttributeKey, inverse: &str) {
        if let Some(ResolvedAssociation::ToOne(owning_side)) = self.resolved.get_mut(owning) {
            owning_side.bidirectional_attribute = Some(inverse.to_string());
        }
    }

    fn entity_draft(
        &self,
        owner: &str,
        attribute: &str,
        name: &str,
    ) -> Result<&EntityDraft<'a>> {
        self.entities.get(name).ok_or_else(|| {
            Error::invalid_mapping(owner, Some(attribute), format!("unknown entity `{name}`"))
        })
    }

    /// The attribute `name` of `target_entity` or one of its supertypes,
    /// with the entity declaring it.
    fn counterpart(
        &self,
        entity: &EntitySource,
        attribute: &AttributeSource,
        target_entity: &str,
        name: &str,
    ) -> Result<(&'a str, &'a AttributeSource)> {
        let mut current = self.source.find_entity(target_entity);

        while let Some(candidate) = current {
            if let Some(found) = candidate.find_attribute(name) {
                return Ok((&candidate.name, found));
            }
            current = candidate
                .super_entity
                .as_deref()
                .and_then(|super_name| self.source.find_entity(super_name));
        }

        Err(Error::invalid_mapping(
            &entity.name,
            Some(attribute.name.as_str()),
            format!("mapped by unknown attribute `{target_entity}.{name}`"),
        ))
    }

    /// A basic or embedded attribute of `draft` or one of its supertypes.
    fn find_ready_attribute(
        &self,
        draft: &EntityDraft<'a>,
        name: &str,
    ) -> Option<Arc<AttributeMapping>> {
        let mut current = Some(draft);

        while let Some(draft) = current {
            for declared in &draft.declared {
                if let AttributeDraft::Ready(attribute) = declared {
                    if attribute.name == name {
                        return Some(attribute.clone());
                    }
                }
            }

            current = draft
                .source
                .super_entity
                .as_ref()
                .and_then(|super_name| self.entities.get(super_name));
        }

        None
    }

    /// Whether `ancestor` is `entity` or one of its supertypes.
    fn is_same_or_super_entity(&self, ancestor: &str, entity: &str) -> bool {
        let mut current = self.source.find_entity(entity);

        while let Some(candidate) = current {
            if candidate.name == ancestor {
                return true;
            }
            current = candidate
                .super_entity
                .as_deref()
                .and_then(|super_name| self.source.find_entity(super_name));
        }

        false
    }
}

fn check_classification(
    entity: &EntitySource,
    attribute: &AttributeSource,
    plural: &PluralSource,
) -> Result<()> {
    let classification = plural.classification;

    let problem = if classification.is_indexed() && plural.index.is_none() {
        Some("indexed collections need an index")
    } else if !classification.is_indexed() && plural.index.is_some() {
        Some("only lists and maps have an index")
    } else if (classification == CollectionClassification::IdBag)
        != plural.collection_id.is_some()
    {

        Some("id-bags, and only id-bags, have a collection id")
    } else {
        None
    };

    match problem {
        Some(problem) => Err(Error::invalid_mapping(
            &entity.name,
            Some(attribute.name.as_str()),
            problem,
        )),
        None => Ok(()),
    }
}

/// Builds the key side of a foreign key: one column per referenced column.
fn key_side(keys: KeyColumns<'_>, target: &SelectableMappings) -> Result<Side> {
    if !keys.columns.is_empty() && keys.columns.len() != target.len() {
        return Err(Error::invalid_mapping(
            keys.owner,
            Some(keys.attribute),
            format!(
                "{} join columns given; the referenced key has {} columns",
                keys.columns.len(),
                target.len()
            ),
        ));
    }

    let prefix = SelectablePath::new(keys.attribute);

    let selectables = target
        .iter()
        .enumerate()
        .map(|(i, referenced)| {
            let column = keys.columns.get(i);
            let name = match column {
                Some(column) => column.name.clone(),
                None => format!("{}_{}", keys.prefix, referenced.expression),
            };

            let mut selectable =
                SelectableMapping::column(&keys.table, name, referenced.jdbc_mapping.clone());
            selectable.nullable = column.and_then(|c| c.nullable).unwrap_or(keys.nullable);
            selectable.insertable = keys.insertable && column.map_or(true, |c| c.insertable);
            selectable.updatable = keys.updatable && column.map_or(true, |c| c.updatable);
            selectable.size = referenced.size;
            selectable.with_path_prefix(&prefix)
        })
        .collect();

    Ok(Side {
        nature: Nature::Key,
        table: keys.table,
        part: SidePart {
            role: keys.role,
            selectables,
            source: SideSource::KeyColumns,
        },
    })
}

fn collect_selectables(part: &dyn ModelPart) -> SelectableMappings {
    let mut selectables = vec![];
    part.for_each_selectable(0, &mut |_, selectable| selectables.push(selectable.clone()));
    SelectableMappings::new(selectables)
}
