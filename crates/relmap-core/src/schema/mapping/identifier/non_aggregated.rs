use crate::{
    schema::mapping::{AttributeMapping, EmbeddableMappingType},
    stmt::{Value, ValueRecord},
    Error, Result,
};

use std::sync::Arc;

/// An identifier made of several `@Id` attributes of the entity.
#[derive(Debug)]
pub struct NonAggregatedIdentifier {
    /// The `@Id` attributes viewed as an embeddable, in declaration order.
    pub virtual_embeddable: Arc<EmbeddableMappingType>,

    /// The `@IdClass`, with attributes in the same order as the virtual
    /// embeddable.
    pub id_class: Option<Arc<EmbeddableMappingType>>,
}

impl NonAggregatedIdentifier {
    pub fn mapper(&self) -> IdentifierValueMapper<'_> {
        match &self.id_class {
            Some(id_class) => IdentifierValueMapper::IdClass(&**id_class),
            None => IdentifierValueMapper::Virtual(&*self.virtual_embeddable),
        }
    }

    /// The `@Id` attributes, in declaration order.
    pub fn attributes(&self) -> &[Arc<AttributeMapping>] {
        &self.virtual_embeddable.attributes
    }
}

/// Converts between the scattered `@Id` attribute values of an entity and
/// the external identifier value.
#[derive(Debug, Clone, Copy)]
pub enum IdentifierValueMapper<'a> {
    /// Identifier values are instances of the id class.
    IdClass(&'a EmbeddableMappingType),

    /// Identifier values are records of the `@Id` attribute values.
    Virtual(&'a EmbeddableMappingType),
}

impl<'a> IdentifierValueMapper<'a> {
    pub fn embeddable(&self) -> &'a EmbeddableMappingType {
        match *self {
            Self::IdClass(embeddable) | Self::Virtual(embeddable) => embeddable,
        }
    }

    pub fn is_id_class(&self) -> bool {
        matches!(self, Self::IdClass(_))
    }

    /// Identifier attributes in `@Id` declaration order.
    pub fn for_each_attribute(&self, mut action: impl FnMut(usize, &'a Arc<AttributeMapping>)) {
        for (i, attribute) in self.embeddable().attributes.iter().enumerate() {
            action(i, attribute);
        }
    }

    /// Collects the `@Id` attribute values of `entity` into an identifier
    /// value.
    pub fn get_identifier(&self, entity: &Value) -> Result<Value> {
        let embeddable = self.embeddable();
        let mut fields = Vec::with_capacity(embeddable.attributes.len());
        for attribute in &embeddable.attributes {
            fields.push(attribute.get_value(entity)?);
        }
        Ok(Value::record_from_vec(fields))
    }

    /// Spreads an identifier value over the `@Id` attributes of `entity`.
    pub fn set_identifier(&self, entity: &mut Value, id: Value) -> Result<()> {
        let embeddable = self.embeddable();

        let fields = match id {
            Value::Null => ValueRecord::nulls(embeddable.attributes.len()),
            Value::Record(record) if record.len() == embeddable.attributes.len() => record,
            other => {
                return Err(Error::illegal_argument(format!(
                    "identifier of type `{}` has {} parts; got {other}",
                    embeddable.name,
                    embeddable.attributes.len()
                )))
            }
        };

        for (attribute, value) in embeddable.attributes.iter().zip(fields) {
            attribute.set_value(entity, value)?;
        }
        Ok(())
    }
}
