mod converter;
pub use converter::DiscriminatorConverter;

mod default_converter;
pub use default_converter::DefaultDiscriminatorConverter;

mod embeddable_converter;
pub use embeddable_converter::EmbeddableDiscriminatorConverter;

mod mapped_converter;
pub use mapped_converter::MappedDiscriminatorConverter;

mod mapping;
pub use mapping::{EmbeddableDiscriminatorMapping, EntityDiscriminatorMapping};

mod value;
pub use value::{DiscriminatorValue, DiscriminatorValueDetails};

mod value_map;
use value_map::DiscriminatorValueMap;
