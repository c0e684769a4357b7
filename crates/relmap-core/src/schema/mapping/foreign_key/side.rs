use crate::{
    schema::mapping::{
        AttributeMapping, Bindable, EntityIdentifierMapping, MappingType, NavigableRole,
        SelectableMappings, Session, ValueMapping,
    },
    stmt::{Type, Value},
    Error, Result,
};

use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nature {
    /// The referencing side
    Key,

    /// The referenced side
    Target,
}

impl Nature {
    pub fn inverse(self) -> Self {
        match self {
            Self::Key => Self::Target,
            Self::Target => Self::Key,
        }
    }
}

/// One side of a foreign key.
#[derive(Debug)]
pub struct Side {
    pub nature: Nature,
    pub table: String,
    pub part: SidePart,
}

/// The columns of a side and the domain part they belong to.
#[derive(Debug)]
pub struct SidePart {
    pub role: NavigableRole,
    pub selectables: SelectableMappings,
    pub source: SideSource,
}

#[derive(Debug)]
pub enum SideSource {
    /// The referenced entity's identifier
    Identifier(Arc<EntityIdentifierMapping>),

    /// A basic or embedded attribute of the referenced entity
    Attribute(Arc<AttributeMapping>),

    /// Join columns that belong to no attribute
    KeyColumns,
}

impl SidePart {
    pub fn is_identifier(&self) -> bool {
        matches!(self.source, SideSource::Identifier(_))
    }

    pub(super) fn mapped_type(&self) -> MappingType {
        match &self.source {
            SideSource::Identifier(identifier) => identifier.mapped_type(),
            SideSource::Attribute(attribute) => attribute.mapped_type(),
            SideSource::KeyColumns => MappingType::Basic(Type::Record(
                self.selectables
                    .iter()
                    .map(|selectable| selectable.jdbc_mapping.domain_ty.clone())
                    .collect(),
            )),
        }
    }

    /// Converts a domain value of this side into its relational form.
    pub(super) fn disassemble(&self, value: &Value, session: &dyn Session) -> Result<Value> {
        match &self.source {
            SideSource::Identifier(identifier) => identifier.disassemble(value, session),
            SideSource::Attribute(attribute) => attribute.disassemble(value, session),
            SideSource::KeyColumns => {
                if value.is_null() {
                    return Ok(Value::Null);
                }

                let mut leaves = vec![];
                value.flatten_into(&mut leaves);

                if leaves.len() != self.selectables.len() {
                    return Err(Error::illegal_argument(format!(
                        "{} has {} columns; got {value}",
                        self.role,
                        self.selectables.len()
                    )));
                }

                let mut fields = leaves
                    .into_iter()
                    .zip(&self.selectables)
                    .map(|(leaf, selectable)| selectable.jdbc_mapping.to_relational_value(leaf))
                    .collect::<Result<Vec<_>>>()?;

                Ok(if fields.len() == 1 {
                    fields.swap_remove(0)
                } else {
                    Value::record_from_vec(fields)
                })
            }
        }
    }
}
