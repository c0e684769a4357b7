use crate::schema::mapping::EmbeddableMappingType;

use std::sync::Arc;

/// An attribute holding an embeddable value.
///
/// Each embedded attribute has its own embeddable mapping since the same
/// embeddable maps to different columns in different places.
#[derive(Debug)]
pub struct EmbeddedAttribute {
    pub embeddable: Arc<EmbeddableMappingType>,
}
