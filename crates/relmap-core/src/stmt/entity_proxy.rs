use super::Value;

/// An uninitialized, lazily loaded reference to an entity.
///
/// A proxy knows its entity name and identifier but none of the entity's
/// state. Reading anything beyond the identifier requires a
/// [`Session`](crate::schema::mapping::Session) to initialize it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityProxy {
    /// Name of the referenced entity
    pub entity: String,

    /// Identifier value of the referenced entity
    pub id: Box<Value>,
}

impl EntityProxy {
    pub fn new(entity: impl Into<String>, id: impl Into<Value>) -> Self {
        Self {
            entity: entity.into(),
            id: Box::new(id.into()),
        }
    }
}

impl From<EntityProxy> for Value {
    fn from(value: EntityProxy) -> Self {
        Self::Proxy(value)
    }
}
