//! Dynamic values and their types.
//!
//! Domain objects are represented as [`Value`]s: entity instances and
//! embeddable values are [`ValueRecord`]s, collection values are lists and
//! lazy references are [`EntityProxy`]s.

mod entity_proxy;
pub use entity_proxy::EntityProxy;

mod ty;
pub use ty::Type;

mod ty_enum;
pub use ty_enum::TypeEnum;

mod value;
pub use value::Value;

mod value_enum;
pub use value_enum::ValueEnum;

mod value_record;
pub use value_record::ValueRecord;
