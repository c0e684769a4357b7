use super::AttributeMapping;
use crate::{stmt::Value, Error, Result};

use std::sync::Arc;

/// The optimistic-locking version of an entity hierarchy. Versions are
/// integers starting at zero.
#[derive(Debug)]
pub struct EntityVersionMapping {
    pub attribute: Arc<AttributeMapping>,
}

impl EntityVersionMapping {
    pub fn seed(&self) -> Result<Value> {
        Value::from_i64(self.ty(), 0)
    }

    /// The version following `current`. A null version is seeded.
    pub fn next(&self, current: &Value) -> Result<Value> {
        if current.is_null() {
            return self.seed();
        }

        let Some(current) = current.to_i64() else {
            return Err(Error::type_conversion(current.clone(), self.ty().name()));
        };

        Value::from_i64(self.ty(), current.saturating_add(1))
    }

    pub fn version_value(&self, entity: &Value) -> Result<Value> {
        self.attribute.get_value(entity)
    }

    /// An entity with a null version has not been saved yet.
    pub fn is_unsaved(&self, entity: &Value) -> Result<bool> {
        Ok(self.version_value(entity)?.is_null())
    }

    fn ty(&self) -> &crate::stmt::Type {
        &self.attribute.expect_basic().jdbc_mapping().domain_ty
    }
}
