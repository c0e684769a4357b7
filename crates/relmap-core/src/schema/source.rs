//! The resolved boot-time source tree.
//!
//! Everything here is plain data assembled with chainable constructors. The
//! metamodel builder reads it exactly once and never mutates it.

mod association;
pub use association::{
    CollectionClassification, ElementSource, ForeignKeyTarget, NotFoundAction, PluralSource,
    ToOneSource,
};

mod attribute;
pub use attribute::{
    AttributeNature, AttributeSource, BasicSource, CascadeStyle, CompositeSource, ConverterSource,
    FetchSource, FetchStyle, FetchTiming, IdMarker,
};

mod discriminator;
pub use discriminator::{DiscriminatorMatch, DiscriminatorSource};

mod embeddable;
pub use embeddable::EmbeddableSource;

mod entity;
pub use entity::{EntitySource, InheritanceType, TableSource};

mod identifier;
pub use identifier::{
    AggregatedIdentifierSource, ComponentAttributeSource, IdentifierSource,
    NonAggregatedIdentifierSource, SimpleIdentifierSource,
};

mod relational;
pub use relational::{ColumnSource, RelationalValueSource};

mod schema;
pub use schema::Schema;
