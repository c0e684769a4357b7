use super::{
    model_part::visit_nulls, AttributeMapping, Bindable, DiscriminatorConverter,
    EmbeddableDiscriminatorMapping, JdbcMapping, MappingType, ModelPart, NavigableRole,
    SelectableMapping, Session, ValueMapping,
};
use crate::{
    stmt::{Value, ValueRecord},
    Error, Result,
};

use indexmap::IndexMap;
use std::sync::Arc;

/// The mapping of one usage of an embeddable.
///
/// Values are records with one field per attribute. Polymorphic embeddables
/// carry the union of the attributes of every subtype, followed by a field
/// holding the concrete type name.
#[derive(Debug)]
pub struct EmbeddableMappingType {
    pub name: String,
    pub type_name: String,
    pub role: NavigableRole,
    pub attributes: Vec<Arc<AttributeMapping>>,
    pub discriminator: Option<Arc<EmbeddableDiscriminatorMapping>>,

    /// Concrete embeddable names with the positions of the attributes each
    /// of them has. Empty unless the embeddable is polymorphic.
    pub subtypes: IndexMap<String, Vec<usize>>,
}

impl EmbeddableMappingType {
    pub fn is_polymorphic(&self) -> bool {
        self.discriminator.is_some()
    }

    /// Number of fields of a value of this embeddable.
    pub fn value_len(&self) -> usize {
        self.attributes.len() + usize::from(self.is_polymorphic())
    }

    pub fn find_attribute(&self, name: &str) -> Option<&Arc<AttributeMapping>> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
    }

    pub fn attribute(&self, position: usize) -> &Arc<AttributeMapping> {
        &self.attributes[position]
    }

    /// A value with every attribute null.
    pub fn instantiate(&self) -> Value {
        ValueRecord::nulls(self.value_len()).into()
    }

    /// Builds a value of the concrete embeddable `type_name`.
    pub fn instantiate_subtype(&self, type_name: &str) -> Result<Value> {
        if !self.subtypes.contains_key(type_name) {
            return Err(Error::unknown_entity_name(type_name));
        }

        let mut record = ValueRecord::nulls(self.value_len());
        record[self.attributes.len()] = Value::from(type_name);
        Ok(record.into())
    }

    /// Concrete type name stored in a polymorphic value.
    pub fn concrete_type<'a>(&self, value: &'a Value) -> Option<&'a str> {
        if !self.is_polymorphic() {
            return None;
        }
        value
            .as_record()
            .and_then(|record| record.get(self.attributes.len()))
            .and_then(Value::as_str)
    }

    /// Resolves the concrete embeddable for a relational discriminator value.
    pub fn resolve_subtype(&self, discriminator: &Value) -> Result<&str> {
        match &self.discriminator {
            Some(mapping) => mapping.converter.to_domain_value(discriminator),
            None => Err(Error::illegal_state(format!(
                "embeddable `{}` is not polymorphic",
                self.name
            ))),
        }
    }

    /// Attributes a concrete subtype has. For non-polymorphic embeddables
    /// that is every attribute.
    pub fn subtype_attributes<'a>(
        &'a self,
        type_name: &str,
    ) -> impl Iterator<Item = &'a Arc<AttributeMapping>> + 'a {
        let positions = self.subtypes.get(type_name).cloned();
        self.attributes
            .iter()
            .enumerate()
            .filter(move |(i, _)| positions.as_ref().map_or(true, |p| p.contains(i)))
            .map(|(_, attribute)| attribute)
    }

    fn expect_fields<'a>(&self, value: &'a Value) -> Result<&'a ValueRecord> {
        match value {
            Value::Record(record) if record.len() == self.value_len() => Ok(record),
            _ => Err(Error::illegal_argument(format!(
                "expected a value of embeddable `{}` with {} fields; got {value}",
                self.name,
                self.value_len()
            ))),
        }
    }
}

impl ValueMapping for EmbeddableMappingType {
    fn mapped_type(&self) -> MappingType {
        MappingType::Embeddable(self.name.clone())
    }
}

impl Bindable for EmbeddableMappingType {
    fn for_each_jdbc_type(
        &self,
        offset: usize,
        action: &mut dyn FnMut(usize, &JdbcMapping),
    ) -> usize {
        let mut span = 0;
        for attribute in &self.attributes {
            span += attribute.for_each_jdbc_type(offset + span, action);
        }
        if let Some(discriminator) = &self.discriminator {
            span += discriminator.for_each_jdbc_type(offset + span, action);
        }
        span
    }

    fn disassemble(&self, value: &Value, session: &dyn Session) -> Result<Value> {
        let mut fields = Vec::with_capacity(self.value_len());

        if value.is_null() {
            for attribute in &self.attributes {
                fields.push(attribute.disassemble(&Value::Null, session)?);
            }
            if self.is_polymorphic() {
                fields.push(Value::Null);
            }
            return Ok(Value::record_from_vec(fields));
        }

        let record = self.expect_fields(value)?;

        for attribute in &self.attributes {
            let field = attribute.get_value(value)?;
            fields.push(attribute.disassemble(&field, session)?);
        }

        if let Some(discriminator) = &self.discriminator {
            let concrete = &record[self.attributes.len()];
            fields.push(discriminator.converter.to_relational_value(concrete)?);
        }

        Ok(Value::record_from_vec(fields))
    }

    fn for_each_disassembled_jdbc_value(
        &self,
        value: &Value,
        offset: usize,
        action: &mut dyn FnMut(usize, &Value, &JdbcMapping),
    ) -> Result<usize> {
        if value.is_null() {
            return Ok(visit_nulls(self, offset, action));
        }

        let record = self.expect_fields(value)?;

        let mut span = 0;
        for (attribute, field) in self.attributes.iter().zip(record.iter()) {
            span += attribute.for_each_disassembled_jdbc_value(field, offset + span, action)?;
        }

        if let Some(discriminator) = &self.discriminator {
            action(
                offset + span,
                &record[self.attributes.len()],
                &discriminator.selectable.jdbc_mapping,
            );
            span += 1;
        }

        Ok(span)
    }
}

impl ModelPart for EmbeddableMappingType {
    fn part_name(&self) -> &str {
        self.role.local_name()
    }

    fn navigable_role(&self) -> &NavigableRole {
        &self.role
    }

    fn for_each_selectable(
        &self,
        offset: usize,
        action: &mut dyn FnMut(usize, &SelectableMapping),
    ) -> usize {
        let mut span = 0;
        for attribute in &self.attributes {
            span += attribute.for_each_selectable(offset + span, action);
        }
        if let Some(discriminator) = &self.discriminator {
            action(offset + span, &discriminator.selectable);
            span += 1;
        }
        span
    }
}
