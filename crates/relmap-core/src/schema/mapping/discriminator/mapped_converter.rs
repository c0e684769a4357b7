use super::{
    DiscriminatorConverter, DiscriminatorValue, DiscriminatorValueDetails, DiscriminatorValueMap,
};
use crate::{
    schema::mapping::JdbcMapping,
    stmt::{Type, Value},
    Error, Result,
};

/// Explicitly mapped discriminator values of an entity hierarchy.
///
/// Besides literal values, an entity may be mapped to the `Null` or
/// `NotNull` sentinel. A relational value is resolved by, in order:
///
/// 1. the `Null` sentinel, for null values;
/// 2. an exact match;
/// 3. for enum constants, the constant converted to the relational type:
///    its name for strings, the first character of its name for characters,
///    its ordinal for integers;
/// 4. the `NotNull` sentinel.
#[derive(Debug)]
pub struct MappedDiscriminatorConverter {
    hierarchy: String,
    jdbc_mapping: JdbcMapping,
    values: DiscriminatorValueMap,
}

impl MappedDiscriminatorConverter {
    pub fn new(
        hierarchy: impl Into<String>,
        jdbc_mapping: JdbcMapping,
        details: impl IntoIterator<Item = DiscriminatorValueDetails>,
    ) -> Result<Self> {
        let hierarchy = hierarchy.into();
        let values = DiscriminatorValueMap::build(&hierarchy, details)?;

        Ok(Self {
            hierarchy,
            jdbc_mapping,
            values,
        })
    }

    pub fn null_details(&self) -> Option<&DiscriminatorValueDetails> {
        self.values.get(&DiscriminatorValue::Null)
    }

    pub fn not_null_details(&self) -> Option<&DiscriminatorValueDetails> {
        self.values.get(&DiscriminatorValue::NotNull)
    }

    /// Converts an enum constant to the form it takes in a column of the
    /// discriminator's relational type.
    fn enum_fallback(&self, value: &Value) -> Option<Value> {
        let Value::Enum(constant) = value else {
            return None;
        };

        match self.jdbc_mapping.relational_ty() {
            Type::String => Some(Value::String(constant.name.clone())),
            Type::Char => constant.first_char().map(Value::Char),
            ty if ty.is_integral() => {
                let ordinal = i64::try_from(constant.ordinal).ok()?;
                Value::from_i64(&ty, ordinal).ok()
            }
            _ => None,
        }
    }
}

impl DiscriminatorConverter for MappedDiscriminatorConverter {
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
        if value.is_null() {
            return self
                .null_details()
                .ok_or_else(|| Error::unknown_discriminator(Value::Null, &self.hierarchy));
        }

        if let Some(details) = self.values.relational(value, &self.jdbc_mapping) {
            return Ok(details);
        }

        if let Some(details) = self
            .enum_fallback(value)
            .and_then(|fallback| self.values.literal(&fallback))
        {
            return Ok(details);
        }

        self.not_null_details()
            .ok_or_else(|| Error::unknown_discriminator(value.clone(), &self.hierarchy))
    }

    fn details_for_entity_name(&self, name: &str) -> Result<&DiscriminatorValueDetails> {
        self.values
            .by_name(name)
            .ok_or_else(|| Error::unknown_entity_name(name))
    }
}
