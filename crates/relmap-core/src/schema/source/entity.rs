use super::{
    AttributeSource, ColumnSource, DiscriminatorMatch, DiscriminatorSource, IdMarker,
    IdentifierSource, Schema,
};
use crate::Result;

/// How an entity hierarchy is spread over tables.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InheritanceType {
    /// Every entity of the hierarchy shares the root's table.
    #[default]
    SingleTable,

    /// Each entity has a table holding its declared columns, joined to its
    /// supertype's table by primary key.
    Joined,

    /// Each concrete entity has a table holding all of its columns.
    TablePerClass,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSource {
    pub name: String,
    pub schema: Option<String>,
}

impl TableSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
        }
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct EntitySource {
    /// The entity name, unique in the source tree.
    pub name: String,

    /// Path of the Rust type backing the entity.
    pub type_name: String,

    /// Name of the entity this one extends.
    pub super_entity: Option<String>,

    pub is_abstract: bool,

    /// Explicit table. Entities without one get a table named after them.
    pub table: Option<TableSource>,

    /// Inheritance strategy. Only meaningful on hierarchy roots.
    pub inheritance: Option<InheritanceType>,

    /// Discriminator column or formula. Only meaningful on hierarchy roots.
    pub discriminator: Option<DiscriminatorSource>,

    /// This entity's discriminator value.
    pub discriminator_value: Option<DiscriminatorMatch>,

    /// Columns joining a `Joined` subclass table to its supertype's table.
    pub primary_key_join_columns: Vec<ColumnSource>,

    pub attributes: Vec<AttributeSource>,

    /// Embeddable used as the external identifier type of a non-aggregated
    /// composite identifier.
    pub id_class: Option<String>,

    /// Whether the natural id may change after insert.
    pub natural_id_mutable: bool,
}

impl EntitySource {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            type_name: name.clone(),
            name,
            super_entity: None,
            is_abstract: false,
            table: None,
            inheritance: None,
            discriminator: None,
            discriminator_value: None,
            primary_key_join_columns: vec![],
            attributes: vec![],
            id_class: None,
            natural_id_mutable: false,
        }
    }

    pub fn type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    pub fn extends(mut self, super_entity: impl Into<String>) -> Self {
        self.super_entity = Some(super_entity.into());
        self
    }

    pub fn abstract_entity(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn table(mut self, table: impl Into<TableSource>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn inheritance(mut self, inheritance: InheritanceType) -> Self {
        self.inheritance = Some(inheritance);
        self
    }

    pub fn discriminator(mut self, discriminator: DiscriminatorSource) -> Self {
        self.discriminator = Some(discriminator);
        self
    }

    pub fn discriminator_value(mut self, value: impl Into<DiscriminatorMatch>) -> Self {
        self.discriminator_value = Some(value.into());
        self
    }

    pub fn primary_key_join_column(mut self, column: ColumnSource) -> Self {
        self.primary_key_join_columns.push(column);
        self
    }

    pub fn attribute(mut self, attribute: AttributeSource) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn id_class(mut self, embeddable: impl Into<String>) -> Self {
        self.id_class = Some(embeddable.into());
        self
    }

    pub fn natural_id_mutable(mut self, mutable: bool) -> Self {
        self.natural_id_mutable = mutable;
        self
    }

    pub fn is_root(&self) -> bool {
        self.super_entity.is_none()
    }

    pub fn find_attribute(&self, name: &str) -> Option<&AttributeSource> {
        self.attributes.iter().find(|attribute| attribute.name == name)
    }

    /// Attributes marked `@Id` or `@EmbeddedId`, in declaration order.
    pub fn identifier_attributes(&self) -> impl Iterator<Item = &AttributeSource> {
        self.attributes
            .iter()
            .filter(|attribute| attribute.id != IdMarker::None)
    }

    /// Declared attributes that are not part of the identifier.
    pub fn state_attributes(&self) -> impl Iterator<Item = &AttributeSource> {
        self.attributes
            .iter()
            .filter(|attribute| attribute.id == IdMarker::None)
    }

    pub fn version_attribute(&self) -> Option<&AttributeSource> {
        self.attributes.iter().find(|attribute| attribute.version)
    }

    pub fn natural_id_attributes(&self) -> impl Iterator<Item = &AttributeSource> {
        self.attributes.iter().filter(|attribute| attribute.natural_id)
    }

    /// Resolves how this entity's identifier is shaped.
    pub fn identifier_source<'a>(&'a self, schema: &'a Schema) -> Result<IdentifierSource<'a>> {
        IdentifierSource::resolve(self, schema)
    }
}

impl From<&str> for TableSource {
    fn from(value: &str) -> Self {
        TableSource::new(value)
    }
}

impl From<String> for TableSource {
    fn from(value: String) -> Self {
        TableSource::new(value)
    }
}
