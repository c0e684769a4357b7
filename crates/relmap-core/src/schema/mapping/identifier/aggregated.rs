use crate::schema::mapping::EmbeddableMappingType;

use std::sync::Arc;

/// An identifier held by a single embeddable-typed attribute.
#[derive(Debug)]
pub struct AggregatedIdentifier {
    pub attribute_name: String,
    pub embeddable: Arc<EmbeddableMappingType>,
}
