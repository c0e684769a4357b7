use super::BuildMetamodel;
use crate::{
    schema::source::{EmbeddableSource, EntitySource},
    Error, Result,
};

use std::collections::HashSet;

impl BuildMetamodel<'_> {
    /// Checks the shape of the source tree: names, inheritance links and
    /// identifiers. Column-level problems are reported while building.
    pub(super) fn validate(&self) -> Result<()> {
        for entity in self.source.entities.values() {
            if self.source.embeddables.contains_key(&entity.name) {
                return Err(Error::invalid_mapping(
                    &entity.name,
                    None,
                    "mapped as both an entity and an embeddable",
                ));
            }

            self.validate_entity(entity)?;
        }

        for embeddable in self.source.embeddables.values() {
            self.validate_embeddable(embeddable)?;
        }

        Ok(())
    }

    fn validate_entity(&self, entity: &EntitySource) -> Result<()> {
        let chain = self.entity_chain(entity)?;

        // Attribute names are unique across the hierarchy chain
        let mut names = HashSet::new();
        for ancestor in chain.iter().rev() {
            for attribute in &ancestor.attributes {
                if !names.insert(&attribute.name[..]) {
                    return Err(Error::invalid_mapping(
                        &entity.name,
                        Some(attribute.name.as_str()),
                        "attribute declared twice in the hierarchy",
                    ));
                }
            }
        }

        if entity.is_root() {
            entity.identifier_source(self.source)?;
            return Ok(());
        }

        if entity.inheritance.is_some() {
            return Err(Error::invalid_mapping(
                &entity.name,
                None,
                "only the root of a hierarchy declares the inheritance strategy",
            ));
        }

        if entity.discriminator.is_some() {
            return Err(Error::invalid_mapping(
                &entity.name,
                None,
                "only the root of a hierarchy declares the discriminator",
            ));
        }

        if entity.id_class.is_some() {
            return Err(Error::invalid_mapping(
                &entity.name,
                None,
                "subclass entities inherit the identifier of the hierarchy root",
            ));
        }

        if let Some(attribute) = entity.identifier_attributes().next() {
            return Err(Error::invalid_mapping(
                &entity.name,
                Some(attribute.name.as_str()),
                "subclass entities inherit the identifier of the hierarchy root",
            ));
        }

        if let Some(attribute) = entity
            .attributes
            .iter()
            .find(|attribute| attribute.version || attribute.natural_id)
        {
            return Err(Error::invalid_mapping(
                &entity.name,
                Some(attribute.name.as_str()),
                "version and natural id attributes are declared on the hierarchy root",
            ));
        }

        Ok(())
    }

    /// The entity followed by its supertypes, ending with the root.
    pub(super) fn entity_chain<'s>(
        &'s self,
        entity: &'s EntitySource,
    ) -> Result<Vec<&'s EntitySource>> {
        let mut chain = vec![entity];
        let mut current = entity;

        while let Some(super_name) = &current.super_entity {
            let Some(super_entity) = self.source.find_entity(super_name) else {
                return Err(Error::invalid_mapping(
                    &current.name,
                    None,
                    format!("unknown super entity `{super_name}`"),
                ));
            };

            if chain.iter().any(|e| e.name == super_entity.name) {
                return Err(Error::invalid_mapping(
                    &entity.name,
                    None,
                    "cyclic inheritance",
                ));
            }

            chain.push(super_entity);
            current = super_entity;
        }

        Ok(chain)
    }

    fn validate_embeddable(&self, embeddable: &EmbeddableSource) -> Result<()> {
        let mut seen = vec![&embeddable.name[..]];
        let mut current = embeddable;

        while let Some(super_name) = &current.super_type {
            let Some(super_type) = self.source.find_embeddable(super_name) else {
                return Err(Error::invalid_mapping(
                    &current.name,
                    None,
                    format!("unknown super embeddable `{super_name}`"),
                ));
            };

            if seen.contains(&&super_type.name[..]) {
                return Err(Error::invalid_mapping(
                    &embeddable.name,
                    None,
                    "cyclic inheritance",
                ));
            }

            seen.push(&super_type.name);
            current = super_type;
        }

        if embeddable.super_type.is_some() && embeddable.discriminator.is_some() {
            return Err(Error::invalid_mapping(
                &embeddable.name,
                None,
                "only the root of an embeddable hierarchy declares the discriminator",
            ));
        }

        if let Some(attribute) = embeddable.attributes.iter().find(|a| a.is_id()) {
            return Err(Error::invalid_mapping(
                &embeddable.name,
                Some(attribute.name.as_str()),
                "embeddable attributes cannot be identifiers",
            ));
        }

        Ok(())
    }
}
