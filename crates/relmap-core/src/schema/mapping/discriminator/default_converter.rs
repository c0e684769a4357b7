use super::{
    DiscriminatorConverter, DiscriminatorValue, DiscriminatorValueDetails, DiscriminatorValueMap,
};
use crate::{schema::mapping::JdbcMapping, stmt::Value, Error, Result};

/// The implicit discriminator: each entity is discriminated by its entity
/// name.
#[derive(Debug)]
pub struct DefaultDiscriminatorConverter {
    hierarchy: String,
    jdbc_mapping: JdbcMapping,
    values: DiscriminatorValueMap,
}

impl DefaultDiscriminatorConverter {
    /// `entities` are `(entity name, type name)` pairs.
    pub fn new<'a>(
        hierarchy: impl Into<String>,
        jdbc_mapping: JdbcMapping,
        entities: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self> {
        let hierarchy = hierarchy.into();
        let values = DiscriminatorValueMap::build(
            &hierarchy,
            entities.into_iter().map(|(name, type_name)| {
                DiscriminatorValueDetails::new(
                    DiscriminatorValue::Literal(Value::from(name)),
                    name,
                    type_name,
                )
            }),
        )?;

        Ok(Self {
            hierarchy,
            jdbc_mapping,
            values,
        })
    }
}

impl DiscriminatorConverter for DefaultDiscriminatorConverter {
    fn discriminator_name(&self) -> &str {
        &self.hierarchy
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
            .ok_or_else(|| Error::unknown_discriminator(value.clone(), &self.hierarchy))
    }

    fn details_for_entity_name(&self, name: &str) -> Result<&DiscriminatorValueDetails> {
        self.values
            .by_name(name)
            .ok_or_else(|| Error::unknown_entity_name(name))
    }
}
