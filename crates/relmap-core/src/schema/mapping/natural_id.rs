use super::AttributeMapping;
use crate::{stmt::Value, Result};

use std::sync::Arc;

/// The natural identifier of an entity hierarchy.
#[derive(Debug)]
pub struct NaturalIdMapping {
    pub attributes: Vec<Arc<AttributeMapping>>,

    /// Whether the natural id may change after insert
    pub mutable: bool,
}

impl NaturalIdMapping {
    pub fn is_simple(&self) -> bool {
        self.attributes.len() == 1
    }

    /// Reads the natural id of an entity: the attribute value for a simple
    /// natural id, a record of values in attribute order otherwise.
    pub fn extract_natural_id(&self, entity: &Value) -> Result<Value> {
        if let [attribute] = &self.attributes[..] {
            return attribute.get_value(entity);
        }

        let values = self
            .attributes
            .iter()
            .map(|attribute| attribute.get_value(entity))
            .collect::<Result<Vec<_>>>()?;

        Ok(Value::record_from_vec(values))
    }
}
