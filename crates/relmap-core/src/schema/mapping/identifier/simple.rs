use crate::{
    schema::mapping::{
        Bindable, JdbcMapping, MappingType, ModelPart, NavigableRole, SelectableMapping, Session,
        ValueMapping,
    },
    stmt::Value,
    Result,
};

/// A single basic `@Id` attribute.
#[derive(Debug)]
pub struct SimpleIdentifier {
    pub attribute_name: String,
    pub role: NavigableRole,
    pub selectable: SelectableMapping,
}

impl ValueMapping for SimpleIdentifier {
    fn mapped_type(&self) -> MappingType {
        MappingType::Basic(self.selectable.jdbc_mapping.domain_ty.clone())
    }
}

impl Bindable for SimpleIdentifier {
    fn for_each_jdbc_type(
        &self,
        offset: usize,
        action: &mut dyn FnMut(usize, &JdbcMapping),
    ) -> usize {
        action(offset, &self.selectable.jdbc_mapping);
        1
    }

    fn disassemble(&self, value: &Value, _session: &dyn Session) -> Result<Value> {
        self.selectable.jdbc_mapping.to_relational_value(value)
    }

    fn for_each_disassembled_jdbc_value(
        &self,
        value: &Value,
        offset: usize,
        action: &mut dyn FnMut(usize, &Value, &JdbcMapping),
    ) -> Result<usize> {
        action(offset, value, &self.selectable.jdbc_mapping);
        Ok(1)
    }
}

impl ModelPart for SimpleIdentifier {
    fn part_name(&self) -> &str {
        &self.attribute_name
    }

    fn navigable_role(&self) -> &NavigableRole {
        &self.role
    }

    fn for_each_selectable(
        &self,
        offset: usize,
        action: &mut dyn FnMut(usize, &SelectableMapping),
    ) -> usize {
        action(offset, &self.selectable);
        1
    }
}
