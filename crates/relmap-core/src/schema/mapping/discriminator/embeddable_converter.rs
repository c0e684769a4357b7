use super::{DiscriminatorConverter, DiscriminatorValueDetails, DiscriminatorValueMap};
use crate::{schema::mapping::JdbcMapping, stmt::Value, Error, Result};

/// Discriminates the concrete types of a polymorphic embeddable.
#[derive(Debug)]
pub struct EmbeddableDiscriminatorConverter {
    embeddable: String,
    jdbc_mapping: JdbcMapping,
    values: DiscriminatorValueMap,
}

impl EmbeddableDiscriminatorConverter {
    pub fn new(
        embeddable: impl Into<String>,
        jdbc_mapping: JdbcMapping,
        details: impl IntoIterator<Item = DiscriminatorValueDetails>,
    ) -> Result<Self> {
        let embeddable = embeddable.into();
        let values = DiscriminatorValueMap::build(&embeddable, details)?;

        Ok(Self {
            embeddable,
            jdbc_mapping,
            values,
        })
    }

    /// Names of the concrete embeddables, in registration order.
    pub fn embeddable_names(&self) -> impl Iterator<Item = &str> {
        self.values
            .all()
            .iter()
            .map(|details| details.indicated_name.as_str())
    }
}

impl DiscriminatorConverter for EmbeddableDiscriminatorConverter {
    fn discriminator_name(&self) -> &str {
        &self.embeddable
    }

    fn jdbc_mapping(&self) -> &JdbcMapping {
        &self.jdbc_mapping
    }

    fn value_details(&self) -> &[DiscriminatorValueDetails] {
        self.values.all()
    }

    fn details_for_discriminator_value(&self, value: &Value) -> Result<&DiscriminatorValueDetails> {
        self.values
            .relational(value, &self.jdbc_mapping)
            .ok_or_else(|| Error::unknown_discriminator(value.clone(), &self.embeddable))
    }

    fn details_for_entity_name(&self, name: &str) -> Result<&DiscriminatorValueDetails> {
        self.values
            .by_name(name)
            .ok_or_else(|| Error::unknown_entity_name(name))
    }
}
