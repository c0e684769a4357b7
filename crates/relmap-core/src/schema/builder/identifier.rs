use super::{attribute::Owner, BuildMetamodel};
use crate::{
    schema::{
        mapping::{
            AggregatedIdentifier, AttributeKind, AttributeMapping, BasicAttribute,
            EmbeddableMappingType, EntityIdentifierMapping, IdentifierNature, NavigableRole,
            NonAggregatedIdentifier, RecordFieldAccess, SimpleIdentifier,
        },
        source::{AttributeNature, EmbeddableSource, EntitySource, IdentifierSource},
        Name,
    },
    Error, Result,
};

use indexmap::IndexMap;
use std::sync::Arc;

impl<'a> BuildMetamodel<'a> {
    /// Builds the identifier of the hierarchy rooted at `root`. Its columns
    /// live in `table`.
    pub(super) fn build_identifier(
        &mut self,
        root: &'a EntitySource,
        table: &str,
    ) -> Result<Arc<EntityIdentifierMapping>> {
        let role = NavigableRole::new(&root.name);

        let (identifier_role, nature) = match root.identifier_source(self.source)? {
            IdentifierSource::Simple(simple) => {
                let attribute = simple.attribute;
                let AttributeNature::Basic(basic) = &attribute.nature else {
                    return Err(Error::invalid_mapping(
                        &root.name,
                        Some(attribute.name.as_str()),
                        "identifier attribute must be basic",
                    ));
                };

                let owner = Owner::identifier(&root.name, role.clone(), table);
                let column = Name::new(&attribute.name).snake_case();
                let id_role = role.append(&attribute.name);

                let nature = IdentifierNature::Simple(SimpleIdentifier {
                    attribute_name: attribute.name.clone(),
                    role: id_role.clone(),
                    selectable: self.basic_selectable(&owner, attribute, basic, &column)?,
                });
                (id_role, nature)
            }
            IdentifierSource::Aggregated(aggregated) => {
                let component = aggregated.identifier_attribute_source();
                let owner = Owner::identifier(&root.name, role.clone(), table)
                    .nested(component.attribute, &component.embeddable.name);
                let embeddable = self.build_embeddable(component.embeddable, &owner)?;

                if embeddable.is_polymorphic() {
                    return Err(Error::invalid_mapping(
                        &root.name,
                        Some(component.name()),
                        "identifier embeddables cannot be polymorphic",
                    ));
                }

                let nature = IdentifierNature::Aggregated(AggregatedIdentifier {
                    attribute_name: component.name().to_string(),
                    embeddable: embeddable.clone(),
                });
                (embeddable.role.clone(), nature)
            }
            IdentifierSource::NonAggregated(non_aggregated) => {
                // The `@Id` attributes are attributes of the entity itself and
                // occupy the leading instance fields.
                let owner = Owner::identifier(&root.name, role.clone(), table);
                let mut attributes = vec![];
                for (position, attribute) in non_aggregated.attributes.iter().enumerate() {
                    attributes.push(self.build_attribute(&owner, attribute, position)?);
                }

                let id_role = role.append("{id}");
                let virtual_embeddable = Arc::new(EmbeddableMappingType {
                    name: root.name.clone(),
                    type_name: root.type_name.clone(),
                    role: id_role.clone(),
                    attributes,
                    discriminator: None,
                    subtypes: IndexMap::new(),
                });
                self.embeddables
                    .insert(id_role.full_path().to_string(), virtual_embeddable.clone());

                let id_class = match non_aggregated.id_class {
                    Some(id_class) => Some(self.build_id_class(
                        root,
                        id_class,
                        &virtual_embeddable,
                        role.append("{id-class}"),
                    )?),
                    None => None,
                };

                let nature = IdentifierNature::NonAggregated(NonAggregatedIdentifier {
                    virtual_embeddable,
                    id_class,
                });
                (id_role, nature)
            }
        };

        log::trace!("built identifier of `{}` at {identifier_role}", root.name);

        Ok(Arc::new(EntityIdentifierMapping {
            role: identifier_role,
            entity_name: root.name.clone(),
            nature,
        }))
    }

    /// The id class of a non-aggregated identifier. Its attributes are
    /// ordered like the entity's `@Id` attributes and share their columns.
    fn build_id_class(
        &mut self,
        root: &EntitySource,
        id_class: &EmbeddableSource,
        virtual_embeddable: &EmbeddableMappingType,
        role: NavigableRole,
    ) -> Result<Arc<EmbeddableMappingType>> {
        if id_class.attributes.len() != virtual_embeddable.attributes.len() {
            return Err(Error::invalid_mapping(
                &root.name,
                None,
                format!(
                    "@IdClass `{}` has {} attributes; the entity has {} @Id attributes",
                    id_class.name,
                    id_class.attributes.len(),
                    virtual_embeddable.attributes.len()
                ),
            ));
        }

        let mut attributes = vec![];

        for (position, id_attribute) in virtual_embeddable.attributes.iter().enumerate() {
            let Some(source) = id_class.find_attribute(&id_attribute.name) else {
                return Err(Error::invalid_mapping(
                    &root.name,
                    Some(id_attribute.name.as_str()),
                    format!("no matching attribute in @IdClass `{}`", id_class.name),
                ));
            };

            let (AttributeNature::Basic(basic), Some(id_basic)) =
                (&source.nature, id_attribute.as_basic())
            else {
                return Err(Error::invalid_mapping(
                    &root.name,
                    Some(id_attribute.name.as_str()),
                    "@IdClass attributes must be basic",
                ));
            };

            if basic.ty != id_basic.selectable.jdbc_mapping.domain_ty {
                return Err(Error::invalid_mapping(
                    &root.name,
                    Some(id_attribute.name.as_str()),
                    format!(
                        "type `{}` differs from `{}` in @IdClass `{}`",
                        id_basic.selectable.jdbc_mapping.domain_ty.name(),
                        basic.ty.name(),
                        id_class.name
                    ),
                ));
            }

            attributes.push(Arc::new(AttributeMapping {
                name: id_attribute.name.clone(),
                state_array_position: position,
                fetchable_index: position,
                declaring_type: id_class.name.clone(),
                role: role.append(&id_attribute.name),
                property_access: Arc::new(RecordFieldAccess::new(position)),
                metadata: id_attribute.metadata,
                fetch: id_attribute.fetch,
                cascade: vec![],
                kind: AttributeKind::Basic(BasicAttribute {
                    selectable: id_basic.selectable.clone(),
                }),
            }));
        }

        let embeddable = Arc::new(EmbeddableMappingType {
            name: id_class.name.clone(),
            type_name: id_class.type_name.clone(),
            role: role.clone(),
            attributes,
            discriminator: None,
            subtypes: IndexMap::new(),
        });

        self.embeddables
            .insert(role.full_path().to_string(), embeddable.clone());

        Ok(embeddable)
    }
}
