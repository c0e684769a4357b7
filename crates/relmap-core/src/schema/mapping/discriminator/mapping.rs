use super::{DiscriminatorConverter, EmbeddableDiscriminatorConverter};
use crate::{
    schema::mapping::{
        Bindable, JdbcMapping, MappingType, ModelPart, NavigableRole, SelectableMapping, Session,
        ValueMapping,
    },
    stmt::Value,
    Result,
};

/// The discriminator of an entity hierarchy, shared by every entity in it.
///
/// Bound values are entity names; they are converted to the column value by
/// the converter.
#[derive(Debug)]
pub struct EntityDiscriminatorMapping {
    pub role: NavigableRole,
    pub selectable: SelectableMapping,
    pub converter: Box<dyn DiscriminatorConverter>,

    /// Restrict queries on the root by discriminator
    pub forced: bool,
}

impl EntityDiscriminatorMapping {
    /// A formula discriminator has no column of its own.
    pub fn has_physical_column(&self) -> bool {
        !self.selectable.formula
    }

    pub fn is_forced(&self) -> bool {
        self.forced
    }

    /// Resolves the entity a row belongs to.
    pub fn resolve_entity_name(&self, relational: &Value) -> Result<&str> {
        self.converter.to_domain_value(relational)
    }
}

impl ValueMapping for EntityDiscriminatorMapping {
    fn mapped_type(&self) -> MappingType {
        MappingType::Basic(self.selectable.jdbc_mapping.domain_ty.clone())
    }
}

impl Bindable for EntityDiscriminatorMapping {
    fn for_each_jdbc_type(
        &self,
        offset: usize,
        action: &mut dyn FnMut(usize, &JdbcMapping),
    ) -> usize {
        action(offset, &self.selectable.jdbc_mapping);
        1
    }

    fn disassemble(&self, value: &Value, _session: &dyn Session) -> Result<Value> {
        self.converter.to_relational_value(value)
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

impl ModelPart for EntityDiscriminatorMapping {
    fn part_name(&self) -> &str {
        "{discriminator}"
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

/// The discriminator column of a polymorphic embeddable.
#[derive(Debug)]
pub struct EmbeddableDiscriminatorMapping {
    pub role: NavigableRole,
    pub selectable: SelectableMapping,
    pub converter: EmbeddableDiscriminatorConverter,
}

impl ValueMapping for EmbeddableDiscriminatorMapping {
    fn mapped_type(&self) -> MappingType {
        MappingType::Basic(self.selectable.jdbc_mapping.domain_ty.clone())
    }
}

impl Bindable for EmbeddableDiscriminatorMapping {
    fn for_each_jdbc_type(
        &self,
        offset: usize,
        action: &mut dyn FnMut(usize, &JdbcMapping),
    ) -> usize {
        action(offset, &self.selectable.jdbc_mapping);
        1
    }

    fn disassemble(&self, value: &Value, _session: &dyn Session) -> Result<Value> {
        self.converter.to_relational_value(value)
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

impl ModelPart for EmbeddableDiscriminatorMapping {
    fn part_name(&self) -> &str {
        "{discriminator}"
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
