use super::{AttributeNature, AttributeSource, EmbeddableSource, EntitySource, IdMarker, Schema};
use crate::{Error, Result};

/// The shape of an entity identifier, as declared by its source.
#[derive(Debug, Clone)]
pub enum IdentifierSource<'a> {
    /// A single basic `@Id` attribute.
    Simple(SimpleIdentifierSource<'a>),

    /// A single embeddable-typed identifier attribute.
    Aggregated(AggregatedIdentifierSource<'a>),

    /// Several `@Id` attributes, optionally with an id class.
    NonAggregated(NonAggregatedIdentifierSource<'a>),
}

#[derive(Debug, Clone)]
pub struct SimpleIdentifierSource<'a> {
    pub attribute: &'a AttributeSource,
}

#[derive(Debug, Clone)]
pub struct AggregatedIdentifierSource<'a> {
    attribute: &'a AttributeSource,
    embeddable: &'a EmbeddableSource,
}

/// An embeddable-typed attribute together with the embeddable it refers to.
#[derive(Debug, Clone, Copy)]
pub struct ComponentAttributeSource<'a> {
    pub attribute: &'a AttributeSource,
    pub embeddable: &'a EmbeddableSource,
}

#[derive(Debug, Clone)]
pub struct NonAggregatedIdentifierSource<'a> {
    /// `@Id` attributes in declaration order
    pub attributes: Vec<&'a AttributeSource>,

    pub id_class: Option<&'a EmbeddableSource>,
}

impl<'a> IdentifierSource<'a> {
    pub(super) fn resolve(entity: &'a EntitySource, schema: &'a Schema) -> Result<Self> {
        let ids: Vec<_> = entity.identifier_attributes().collect();

        let has_embedded_id = ids.iter().any(|id| id.id == IdMarker::EmbeddedId);

        if has_embedded_id || (ids.len() == 1 && ids[0].nature.is_composite()) {
            return AggregatedIdentifierSource::resolve(entity, &ids, schema)
                .map(IdentifierSource::Aggregated);
        }

        match ids[..] {
            [] if entity.id_class.is_none() => Err(Error::invalid_mapping(
                &entity.name,
                None,
                "no identifier attribute",
            )),
            [id] if entity.id_class.is_none() => {
                if !id.nature.is_basic() {
                    return Err(Error::invalid_mapping(
                        &entity.name,
                        Some(id.name.as_str()),
                        "identifier attribute must be basic or embeddable",
                    ));
                }
                Ok(IdentifierSource::Simple(SimpleIdentifierSource { attribute: id }))
            }
            _ => NonAggregatedIdentifierSource::resolve(entity, ids, schema)
                .map(IdentifierSource::NonAggregated),
        }
    }

    pub fn is_simple(&self) -> bool {
        matches!(self, Self::Simple(_))
    }

    pub fn is_aggregated(&self) -> bool {
        matches!(self, Self::Aggregated(_))
    }

    pub fn is_non_aggregated(&self) -> bool {
        matches!(self, Self::NonAggregated(_))
    }

    /// The identifier attributes declared on the entity.
    pub fn attributes(&self) -> Vec<&'a AttributeSource> {
        match self {
            Self::Simple(simple) => vec![simple.attribute],
            Self::Aggregated(aggregated) => vec![aggregated.attribute],
            Self::NonAggregated(non_aggregated) => non_aggregated.attributes.clone(),
        }
    }
}

impl<'a> AggregatedIdentifierSource<'a> {
    fn resolve(
        entity: &'a EntitySource,
        ids: &[&'a AttributeSource],
        schema: &'a Schema,
    ) -> Result<Self> {
        let &[attribute] = ids else {
            return Err(Error::invalid_mapping(
                &entity.name,
                None,
                format!(
                    "expected exactly one @EmbeddedId attribute, found {} identifier attributes",
                    ids.len()
                ),
            ));
        };

        let AttributeNature::Composite(composite) = &attribute.nature else {
            return Err(Error::invalid_mapping(
                &entity.name,
                Some(attribute.name.as_str()),
                "@EmbeddedId attribute must reference an embeddable",
            ));
        };

        let Some(embeddable) = schema.find_embeddable(&composite.embeddable) else {
            return Err(Error::invalid_mapping(
                &entity.name,
                Some(attribute.name.as_str()),
                format!("unknown embeddable `{}`", composite.embeddable),
            ));
        };

        Ok(Self {
            attribute,
            embeddable,
        })
    }

    /// The `@EmbeddedId` attribute with its embeddable.
    pub fn identifier_attribute_source(&self) -> ComponentAttributeSource<'a> {
        ComponentAttributeSource {
            attribute: self.attribute,
            embeddable: self.embeddable,
        }
    }
}

impl<'a> ComponentAttributeSource<'a> {
    pub fn name(&self) -> &'a str {
        &self.attribute.name
    }

    /// The embeddable's attributes, in declaration order.
    pub fn attribute_sources(&self) -> &'a [AttributeSource] {
        &self.embeddable.attributes
    }
}

impl<'a> NonAggregatedIdentifierSource<'a> {
    fn resolve(
        entity: &'a EntitySource,
        attributes: Vec<&'a AttributeSource>,
        schema: &'a Schema,
    ) -> Result<Self> {
        if attributes.is_empty() {
            return Err(Error::invalid_mapping(
                &entity.name,
                None,
                "@IdClass declared without @Id attributes",
            ));
        }

        if let Some(attribute) = attributes.iter().find(|id| !id.nature.is_basic()) {
            return Err(Error::invalid_mapping(
                &entity.name,
                Some(attribute.name.as_str()),
                "attributes of a non-aggregated identifier must be basic",
            ));
        }

        let id_class = match &entity.id_class {
            Some(name) => match schema.find_embeddable(name) {
                Some(id_class) => Some(id_class),
                None => {
                    return Err(Error::invalid_mapping(
                        &entity.name,
                        None,
                        format!("unknown @IdClass `{name}`"),
                    ))
                }
            },
            None => None,
        };

        Ok(Self {
            attributes,
            id_class,
        })
    }
}
