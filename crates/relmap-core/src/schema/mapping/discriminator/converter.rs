use super::{DiscriminatorValue, DiscriminatorValueDetails};
use crate::{
    schema::mapping::JdbcMapping,
    stmt::Value,
    Error, Result,
};

use std::fmt;

/// Converts between a discriminator's domain form, the name of an entity or
/// embeddable, and its relational form.
///
/// Every registered value maps to exactly one name and back. Relational
/// values that map to nothing are an error.
pub trait DiscriminatorConverter: fmt::Debug + Send + Sync {
    /// Name of the entity or embeddable hierarchy.
    fn discriminator_name(&self) -> &str;

    fn jdbc_mapping(&self) -> &JdbcMapping;

    /// Registered values in registration order.
    fn value_details(&self) -> &[DiscriminatorValueDetails];

    /// Resolves a relational value read from the database.
    fn details_for_discriminator_value(&self, value: &Value) -> Result<&DiscriminatorValueDetails>;

    /// Finds the details for an entity or embeddable by name or type name.
    fn details_for_entity_name(&self, name: &str) -> Result<&DiscriminatorValueDetails>;

    /// The name indicated by a relational value.
    fn to_domain_value(&self, value: &Value) -> Result<&str> {
        self.details_for_discriminator_value(value)
            .map(DiscriminatorValueDetails::indicated_name)
    }

    /// The relational value for a domain value: an entity name, embeddable
    /// name or type name.
    fn to_relational_value(&self, value: &Value) -> Result<Value> {
        let name = match value {
            Value::Null => return Ok(Value::Null),
            Value::String(name) => name,
            other => {
                return Err(Error::illegal_argument(format!(
                    "discriminator of `{}` expects an entity or type name; got {other}",
                    self.discriminator_name()
                )))
            }
        };

        match &self.details_for_entity_name(name)?.value {
            DiscriminatorValue::Literal(value) => Ok(value.clone()),
            DiscriminatorValue::Null => Ok(Value::Null),
            DiscriminatorValue::NotNull => Err(Error::illegal_state(format!(
                "`{name}` is discriminated by any non-null value and has no value of its own"
            ))),
        }
    }
}
