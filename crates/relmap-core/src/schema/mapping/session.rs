use crate::{
    stmt::{EntityProxy, Value},
    Error, Result,
};

/// The part of a persistence session the metamodel needs.
///
/// Mapping operations never touch session state except through this trait,
/// and only to initialize lazy references.
pub trait Session {
    /// Loads the entity behind `proxy` and returns its state.
    fn initialize_proxy(&self, proxy: &EntityProxy) -> Result<Value>;
}

/// A session that cannot load anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedSession;

impl Session for DetachedSession {
    fn initialize_proxy(&self, proxy: &EntityProxy) -> Result<Value> {
        Err(Error::lazy_initialization(&proxy.entity, &proxy.id))
    }
}
