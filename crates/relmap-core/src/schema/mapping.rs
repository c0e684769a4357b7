//! The runtime mapping metamodel.
//!
//! Every addressable node of the domain graph is a [`ModelPart`]: it can
//! visit its columns ([`ModelPart::for_each_selectable`]) and flatten a
//! domain value into relational values in the same order
//! ([`Bindable::for_each_disassembled_jdbc_value`]). The order is fixed when
//! the metamodel is built and never changes afterwards.

mod attribute;
pub use attribute::{
    AttributeKind, AttributeMapping, AttributeMetadata, BasicAttribute, Cardinality,
    EmbeddedAttribute, FetchOptions, PluralAttribute, ToOneAttribute,
};

mod cache_key;
pub use cache_key::{CacheKey, CacheKeyBuilder};

mod collection_part;
pub use collection_part::{CollectionPart, CollectionPartKind, CollectionPartNature};

mod converter;
pub use converter::BasicValueConverter;

mod discriminator;
pub use discriminator::{
    DefaultDiscriminatorConverter, DiscriminatorConverter, DiscriminatorValue,
    DiscriminatorValueDetails, EmbeddableDiscriminatorConverter, EmbeddableDiscriminatorMapping,
    EntityDiscriminatorMapping, MappedDiscriminatorConverter,
};

mod embeddable;
pub use embeddable::EmbeddableMappingType;

mod entity;
pub use entity::{EntityId, EntityMappingType};

mod foreign_key;
pub use foreign_key::{AssociationKey, ForeignKeyDescriptor, Nature, Side, SidePart, SideSource};

mod identifier;
pub use identifier::{
    AggregatedIdentifier, EntityIdentifierMapping, IdentifierNature, IdentifierValueMapper,
    NonAggregatedIdentifier, SimpleIdentifier,
};

mod jdbc_mapping;
pub use jdbc_mapping::JdbcMapping;

mod jdbc_type;
pub use jdbc_type::JdbcType;

mod model_part;
pub use model_part::{Bindable, MappingType, ModelPart, ModelPartRef, ValueMapping};

mod natural_id;
pub use natural_id::NaturalIdMapping;

mod property_access;
pub use property_access::{ChainedPropertyAccess, PropertyAccess, RecordFieldAccess};

mod role;
pub use role::NavigableRole;

mod selectable;
pub use selectable::{ColumnSize, SelectableMapping, SelectableMappings, SelectablePath};

mod session;
pub use session::{DetachedSession, Session};

mod table_details;
pub use table_details::TableDetails;

mod version;
pub use version::EntityVersionMapping;
