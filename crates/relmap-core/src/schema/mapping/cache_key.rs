use super::JdbcMapping;
use crate::stmt::Value;

use std::hash::{Hash, Hasher};

/// Accumulates disassembled values into a cache key.
#[derive(Debug, Default)]
pub struct CacheKeyBuilder {
    values: Vec<Value>,
    hash: u64,
}

/// A key combining relational values. Keys compare by value and hash by the
/// combined hash of each value's [`JdbcMapping`].
#[derive(Debug, Clone)]
pub struct CacheKey {
    values: Vec<Value>,
    hash: u64,
}

impl CacheKeyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a relational value.
    pub fn add_value(&mut self, value: &Value, jdbc_mapping: &JdbcMapping) {
        self.add_hash_code(jdbc_mapping.hash_relational(value));
        self.values.push(value.clone());
    }

    pub fn add_hash_code(&mut self, hash: u64) {
        self.hash = self.hash.wrapping_mul(37).wrapping_add(hash);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn build(self) -> CacheKey {
        CacheKey {
            values: self.values,
            hash: self.hash,
        }
    }
}

impl CacheKey {
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.values == other.values
    }
}

impl Eq for CacheKey {}

impl Hash for CacheKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}
