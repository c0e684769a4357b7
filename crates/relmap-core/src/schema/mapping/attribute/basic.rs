use crate::{
    schema::mapping::{JdbcMapping, MappingType, SelectableMapping, Session},
    stmt::Value,
    Result,
};

/// A single column or formula.
#[derive(Debug)]
pub struct BasicAttribute {
    pub selectable: SelectableMapping,
}

impl BasicAttribute {
    pub fn jdbc_mapping(&self) -> &JdbcMapping {
        &self.selectable.jdbc_mapping
    }

    pub(super) fn mapped_type(&self) -> MappingType {
        MappingType::Basic(self.selectable.jdbc_mapping.domain_ty.clone())
    }

    pub(super) fn for_each_jdbc_type(
        &self,
        offset: usize,
        action: &mut dyn FnMut(usize, &JdbcMapping),
    ) -> usize {
        action(offset, &self.selectable.jdbc_mapping);
        1
    }

    pub(super) fn disassemble(&self, value: &Value, _session: &dyn Session) -> Result<Value> {
        self.selectable.jdbc_mapping.to_relational_value(value)
    }

    pub(super) fn for_each_disassembled_jdbc_value(
        &self,
        value: &Value,
        offset: usize,
        action: &mut dyn FnMut(usize, &Value, &JdbcMapping),
    ) -> Result<usize> {
        action(offset, value, &self.selectable.jdbc_mapping);
        Ok(1)
    }
}
