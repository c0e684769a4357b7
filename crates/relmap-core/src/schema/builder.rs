mod attribute;
mod discriminator;
mod foreign_key;
mod freeze;
mod hierarchy;
mod identifier;
mod validate;

use foreign_key::ResolvedAssociation;
use hierarchy::{EntityDraft, HierarchyDraft};

use super::{
    mapping::{AssociationKey, EmbeddableMappingType, ForeignKeyDescriptor},
    source, Metamodel,
};
use crate::Result;

use indexmap::IndexMap;
use std::sync::Arc;

/// Options of the metamodel build.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct BuilderConfig {
    /// If set, prefix all table names with this string
    pub table_name_prefix: Option<String>,

    /// Discriminator column of hierarchies that do not declare one
    pub implicit_discriminator_column: String,

    /// Length of string columns that do not declare one
    pub default_string_length: u32,

    /// Whether `Joined` hierarchies without a declared discriminator get one
    pub implicit_discriminators_for_joined: bool,
}

#[derive(Debug, Default)]
pub struct Builder {
    config: BuilderConfig,
}

/// An `(entity, attribute)` pair naming an attribute declaration.
type AttributeKey = (String, String);

/// Used to track state during the build process
struct BuildMetamodel<'a> {
    /// Build options
    config: &'a BuilderConfig,

    source: &'a source::Schema,

    /// Entities in build order: each hierarchy root in source order, followed
    /// by its subtypes depth first.
    entities: IndexMap<String, EntityDraft<'a>>,

    /// Per-hierarchy mappings, keyed by root entity name
    hierarchies: IndexMap<String, HierarchyDraft>,

    /// Embeddable usages by role
    embeddables: IndexMap<String, Arc<EmbeddableMappingType>>,

    /// Associations that need other entities' columns, in build order
    pending: Vec<AttributeKey>,

    /// Resolution context of pass 2
    resolved: IndexMap<AttributeKey, ResolvedAssociation>,

    /// Physical foreign keys. Associations with equal keys share one
    /// descriptor.
    foreign_keys: IndexMap<AssociationKey, Arc<ForeignKeyDescriptor>>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: BuilderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.config.table_name_prefix = Some(prefix.to_string());
        self
    }

    pub fn implicit_discriminator_column(&mut self, column: &str) -> &mut Self {
        self.config.implicit_discriminator_column = column.to_string();
        self
    }

    pub fn default_string_length(&mut self, length: u32) -> &mut Self {
        self.config.default_string_length = length;
        self
    }

    pub fn implicit_discriminators_for_joined(&mut self, enabled: bool) -> &mut Self {
        self.config.implicit_discriminators_for_joined = enabled;
        self
    }

    pub fn build(&self, source: source::Schema) -> Result<Metamodel> {
        let mut builder = BuildMetamodel {
            config: &self.config,
            source: &source,
            entities: IndexMap::new(),
            hierarchies: IndexMap::new(),
            embeddables: IndexMap::new(),
            pending: vec![],
            resolved: IndexMap::new(),
            foreign_keys: IndexMap::new(),
        };

        // Reject malformed source trees before anything is built
        builder.validate()?;

        log::debug!(
            "building metamodel; entities={} embeddables={}",
            source.entities.len(),
            source.embeddables.len()
        );

        // Pass 1: tables, identifiers, discriminators and every attribute
        // that only needs its own entity's columns.
        builder.build_hierarchies()?;

        log::debug!(
            "pass 1 complete; entities={} pending associations={}",
            builder.entities.len(),
            builder.pending.len()
        );

        // Pass 2: associations, which need the columns of other entities.
        builder.resolve_associations()?;
        builder.verify_discriminators()?;

        log::debug!(
            "pass 2 complete; foreign keys={}",
            builder.foreign_keys.len()
        );

        builder.freeze()
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            table_name_prefix: None,
            implicit_discriminator_column: "DTYPE".to_string(),
            default_string_length: 255,
            implicit_discriminators_for_joined: false,
        }
    }
}

impl BuildMetamodel<'_> {
    fn prefix_table_name(&self, name: &str) -> String {
        if let Some(prefix) = &self.config.table_name_prefix {
            format!("{prefix}{name}")
        } else {
            name.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_setters_update_config() {
        let mut builder = Builder::new();
        builder
            .table_name_prefix("app_")
            .implicit_discriminator_column("kind")
            .default_string_length(64)
            .implicit_discriminators_for_joined(true);

        assert_eq!(
            *builder.config(),
            BuilderConfig {
                table_name_prefix: Some("app_".to_string()),
                implicit_discriminator_column: "kind".to_string(),
                default_string_length: 64,
                implicit_discriminators_for_joined: true,
            }
        );
    }

    #[test]
    fn default_config() {
        let config = BuilderConfig::default();
        assert_eq!(config.implicit_discriminator_column, "DTYPE");
        assert_eq!(config.default_string_length, 255);
        assert!(config.table_name_prefix.is_none());
        assert!(!config.implicit_discriminators_for_joined);
    }
}
