//! The mapping metamodel and the boot-time source tree it is built from.
//!
//! [`source`] is the resolved, declarative description of entities and
//! embeddables handed over by a front-end. [`Builder`] consumes it once and
//! produces an immutable [`Metamodel`] of [`mapping`] nodes that is shared by
//! every session.

mod builder;
pub use builder::{Builder, BuilderConfig};

pub mod mapping;

mod metamodel;
pub use metamodel::Metamodel;

mod name;
pub use name::Name;

pub mod source;

use crate::Result;

/// Builds a metamodel from `source` using the default configuration.
pub fn build(source: source::Schema) -> Result<Metamodel> {
    Builder::default().build(source)
}
