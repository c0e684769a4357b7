use super::{EmbeddableSource, EntitySource};

use indexmap::IndexMap;

/// The complete source tree: every entity and embeddable in scope, in
/// declaration order.
#[derive(Debug, Default, Clone)]
pub struct Schema {
    pub entities: IndexMap<String, EntitySource>,
    pub embeddables: IndexMap<String, EmbeddableSource>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity. A later entity with the same name replaces the earlier
    /// one, so front-ends must check for duplicates themselves.
    pub fn entity(mut self, entity: EntitySource) -> Self {
        self.entities.insert(entity.name.clone(), entity);
        self
    }

    pub fn embeddable(mut self, embeddable: EmbeddableSource) -> Self {
        self.embeddables.insert(embeddable.name.clone(), embeddable);
        self
    }

    pub fn find_entity(&self, name: &str) -> Option<&EntitySource> {
        self.entities.get(name)
    }

    pub fn find_embeddable(&self, name: &str) -> Option<&EmbeddableSource> {
        self.embeddables.get(name)
    }

    /// Entities that do not extend another entity.
    pub fn roots(&self) -> impl Iterator<Item = &EntitySource> {
        self.entities.values().filter(|entity| entity.is_root())
    }

    /// Direct subtypes of `name`, in declaration order.
    pub fn subtypes_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a EntitySource> {
        self.entities
            .values()
            .filter(move |entity| entity.super_entity.as_deref() == Some(name))
    }

    /// Direct subtypes of the embeddable `name`, in declaration order.
    pub fn embeddable_subtypes_of<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a EmbeddableSource> {
        self.embeddables
            .values()
            .filter(move |embeddable| embeddable.super_type.as_deref() == Some(name))
    }
}
