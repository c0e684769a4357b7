use crate::{
    schema::{
        mapping::{
            model_part::visit_nulls, Bindable, CollectionPart, CollectionPartNature,
            ForeignKeyDescriptor, JdbcMapping, MappingType, ModelPart, SelectableMapping, Session,
            ValueMapping,
        },
        source::CollectionClassification,
    },
    stmt::Value,
    Error, Result,
};

use std::sync::Arc;

/// A collection-valued attribute.
///
/// Bound values are single collection entries: the element, or a
/// `(element, index)` record for indexed collections.
#[derive(Debug)]
pub struct PluralAttribute {
    pub classification: CollectionClassification,

    /// Foreign key from the collection table to the owner. The key side is
    /// the collection table.
    pub key_descriptor: Arc<ForeignKeyDescriptor>,

    pub element: CollectionPart,
    pub index: Option<CollectionPart>,

    /// Surrogate row identifier of an id-bag
    pub identifier: Option<CollectionPart>,

    /// Table holding the collection rows
    pub collection_table: String,

    /// The owning attribute of the element entity, for inverse collections
    pub mapped_by: Option<String>,

    pub order_by: Option<String>,
}

impl PluralAttribute {
    pub fn is_inverse(&self) -> bool {
        self.mapped_by.is_some()
    }

    pub fn is_indexed(&self) -> bool {
        self.index.is_some()
    }

    pub fn part(&self, nature: CollectionPartNature) -> Option<&CollectionPart> {
        match nature {
            CollectionPartNature::Element => Some(&self.element),
            CollectionPartNature::Index => self.index.as_ref(),
            CollectionPartNature::Id => self.identifier.as_ref(),
        }
    }

    /// Collection parts, element first.
    pub fn parts(&self) -> impl Iterator<Item = &CollectionPart> {
        std::iter::once(&self.element)
            .chain(self.index.as_ref())
            .chain(self.identifier.as_ref())
    }

    pub fn find_part(&self, name: &str) -> Option<&CollectionPart> {
        self.parts().find(|part| part.part_name() == name)
    }

    pub(super) fn mapped_type(&self) -> MappingType {
        MappingType::Collection(self.element.mapped_type().domain_type())
    }

    pub(super) fn for_each_jdbc_type(
        &self,
        offset: usize,
        action: &mut dyn FnMut(usize, &JdbcMapping),
    ) -> usize {
        let mut span = self.element.for_each_jdbc_type(offset, action);
        if let Some(index) = &self.index {
            span += index.for_each_jdbc_type(offset + span, action);
        }
        span
    }

    pub(super) fn for_each_selectable(
        &self,
        offset: usize,
        action: &mut dyn FnMut(usize, &SelectableMapping),
    ) -> usize {
        let mut span = self.element.for_each_selectable(offset, action);
        if let Some(index) = &self.index {
            span += index.for_each_selectable(offset + span, action);
        }
        span
    }

    pub(super) fn disassemble(&self, value: &Value, session: &dyn Session) -> Result<Value> {
        let Some(index) = &self.index else {
            return self.element.disassemble(value, session);
        };

        let (element, key) = self.split_entry(value)?;
        Ok(Value::record_from_vec(vec![
            self.element.disassemble(element, session)?,
            index.disassemble(key, session)?,
        ]))
    }

    pub(super) fn for_each_disassembled_jdbc_value(
        &self,
        value: &Value,
        offset: usize,
        action: &mut dyn FnMut(usize, &Value, &JdbcMapping),
    ) -> Result<usize> {
        let Some(index) = &self.index else {
            return self
                .element
                .for_each_disassembled_jdbc_value(value, offset, action);
        };

        if value.is_null() {
            let span = visit_nulls(&self.element, offset, action);
            return Ok(span + visit_nulls(index, offset + span, action));
        }

        let (element, key) = self.split_entry(value)?;
        let span = self
            .element
            .for_each_disassembled_jdbc_value(element, offset, action)?;
        let key_span = index.for_each_disassembled_jdbc_value(key, offset + span, action)?;
        Ok(span + key_span)

    }

    fn split_entry<'a>(&self, value: &'a Value) -> Result<(&'a Value, &'a Value)> {
        static NULL: Value = Value::Null;

        match value {
            Value::Null => Ok((&NULL, &NULL)),
            Value::Record(record) if record.len() == 2 => Ok((&record[0], &record[1])),
            _ => Err(Error::illegal_argument(format!(
                "entries of an indexed collection are (element, index) records; got {value}"
            ))),
        }
    }
}
