use crate::{
    schema::{
        mapping::{
            model_part::visit_nulls, Bindable, ForeignKeyDescriptor, JdbcMapping, Nature,
            SelectableMapping, SelectableMappings, Session,
        },
        source::NotFoundAction,
    },
    stmt::Value,
    Error, Result,
};

use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    ManyToOne,

    /// A many-to-one backed by a unique key
    LogicalOneToOne,

    OneToOne,
}

/// A reference to a single associated entity.
#[derive(Debug)]
pub struct ToOneAttribute {
    pub cardinality: Cardinality,

    /// Name of the associated entity
    pub associated_entity: String,

    /// Shared with the other side of a bidirectional association.
    pub foreign_key: Arc<ForeignKeyDescriptor>,

    /// Which side of `foreign_key` this attribute's table is on. Inverse
    /// one-to-one attributes are on the target side.
    pub side_nature: Nature,

    pub not_found: Option<NotFoundAction>,

    /// The attribute of the associated entity pointing back, if any.
    pub bidirectional_attribute: Option<String>,

    pub nullable: bool,
}

impl ToOneAttribute {
    /// Whether this is the inverse side of a one-to-one.
    pub fn is_mapped_by(&self) -> bool {
        self.side_nature == Nature::Target
    }

    /// The table holding the columns that identify the association from
    /// this attribute's point of view.
    pub fn identifying_columns_table(&self) -> &str {
        &self.foreign_key.side(self.side_nature).table
    }

    /// Whether the referenced columns are the associated entity's primary
    /// key.
    pub fn is_reference_to_primary_key(&self) -> bool {
        self.foreign_key
            .side(self.side_nature.inverse())
            .part
            .is_identifier()
    }

    /// Whether a join to the associated entity can be replaced by reading
    /// the foreign key columns.
    pub fn is_fk_optimization_allowed(&self) -> bool {
        self.side_nature == Nature::Key && self.not_found.is_none()
    }

    /// Columns of this attribute's table holding the foreign key.
    pub fn key_selectables(&self) -> Result<&SelectableMappings> {
        if self.is_mapped_by() {
            return Err(Error::unsupported(format!(
                "inverse one-to-one to `{}` owns no foreign key columns",
                self.associated_entity
            )));
        }
        Ok(&self.foreign_key.key.part.selectables)
    }

    /// Extracts the referenced key value from an associated entity instance.
    ///
    /// A proxy is only initialized if the key is not its identifier.
    pub fn key_value(&self, value: &Value, session: &dyn Session) -> Result<Value> {
        self.foreign_key.key_part_value_from_target(value, session)
    }

    pub(super) fn for_each_jdbc_type(
        &self,
        offset: usize,
        action: &mut dyn FnMut(usize, &JdbcMapping),
    ) -> usize {
        match self.side_nature {
            Nature::Key => self.foreign_key.for_each_jdbc_type(offset, action),
            Nature::Target => 0,
        }
    }

    pub(super) fn for_each_selectable(
        &self,
        offset: usize,
        action: &mut dyn FnMut(usize, &SelectableMapping),
    ) -> usize {
        match self.side_nature {
            Nature::Key => self
                .foreign_key
                .key
                .part
                .selectables
                .for_each_selectable(offset, action),
            Nature::Target => 0,
        }
    }

    pub(super) fn disassemble(&self, value: &Value, session: &dyn Session) -> Result<Value> {
        if self.is_mapped_by() {
            return Ok(Value::Null);
        }

        let key = self.key_value(value, session)?;
        self.foreign_key.disassemble(&key, session)
    }

    pub(super) fn for_each_disassembled_jdbc_value(
        &self,
        value: &Value,
        offset: usize,
        action: &mut dyn FnMut(usize, &Value, &JdbcMapping),
    ) -> Result<usize> {
        match self.side_nature {
            Nature::Key if value.is_null() => Ok(visit_nulls(&*self.foreign_key, offset, action)),
            Nature::Key => self
                .foreign_key
                .for_each_disassembled_jdbc_value(value, offset, action),
            Nature::Target => Ok(0),
        }
    }
}
