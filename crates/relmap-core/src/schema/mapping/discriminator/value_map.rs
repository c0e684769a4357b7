use super::{DiscriminatorValue, DiscriminatorValueDetails};
use crate::{schema::mapping::JdbcMapping, stmt::Value, Error, Result};

use std::collections::HashMap;

/// Bidirectional index between discriminator values and type names.
#[derive(Debug, Default)]
pub(crate) struct DiscriminatorValueMap {
    details: Vec<DiscriminatorValueDetails>,
    by_value: HashMap<DiscriminatorValue, usize>,
    by_name: HashMap<String, usize>,
}

impl DiscriminatorValueMap {
    /// Fails if the value or either name is already registered.
    pub(crate) fn build(
        hierarchy: &str,
        details: impl IntoIterator<Item = DiscriminatorValueDetails>,
    ) -> Result<Self> {
        let mut map = Self::default();

        for details in details {
            let index = map.details.len();

            if let Some(existing) = map.by_value.get(&details.value) {
                return Err(Error::invalid_mapping(
                    hierarchy,
                    None,
                    format!(
                        "discriminator value {} is used by both `{}` and `{}`",
                        details.value,
                        map.details[*existing].indicated_name,
                        details.indicated_name
                    ),
                ));
            }

            for name in [&details.indicated_name, &details.type_name] {
                if let Some(existing) = map.by_name.get(name) {
                    if *existing != index {
                        return Err(Error::invalid_mapping(
                            hierarchy,
                            None,
                            format!("`{name}` has more than one discriminator value"),
                        ));
                    }
                }
                map.by_name.insert(name.clone(), index);
            }

            map.by_value.insert(details.value.clone(), index);
            map.details.push(details);
        }

        Ok(map)
    }

    pub(crate) fn all(&self) -> &[DiscriminatorValueDetails] {
        &self.details
    }

    pub(crate) fn get(&self, value: &DiscriminatorValue) -> Option<&DiscriminatorValueDetails> {
        self.by_value.get(value).map(|index| &self.details[*index])
    }

    pub(crate) fn literal(&self, value: &Value) -> Option<&DiscriminatorValueDetails> {
        self.get(&DiscriminatorValue::Literal(value.clone()))
    }

    /// Looks up a value read from a column mapped by `jdbc_mapping`, so an
    /// `I64` read from an `I32` column finds the registered `I32`.
    pub(crate) fn relational(
        &self,
        value: &Value,
        jdbc_mapping: &JdbcMapping,
    ) -> Option<&DiscriminatorValueDetails> {
        if let Some(details) = self.literal(value) {
            return Some(details);
        }

        let coerced = jdbc_mapping.coerce_relational(value).ok()?;
        self.literal(&coerced)
    }

    /// Looks up by entity (or embeddable) name or by type name.
    pub(crate) fn by_name(&self, name: &str) -> Option<&DiscriminatorValueDetails> {
        self.by_name.get(name).map(|index| &self.details[*index])
    }
}
