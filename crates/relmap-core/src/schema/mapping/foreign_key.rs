mod association_key;
pub use association_key::AssociationKey;

mod side;
pub use side::{Nature, Side, SidePart, SideSource};

use super::{
    model_part::visit_nulls, Bindable, JdbcMapping, MappingType, ModelPart, NavigableRole,
    SelectableMapping, SelectableMappings, Session, ValueMapping,
};
use crate::{stmt::Value, Error, Result};

/// A foreign key between two tables.
///
/// The key side holds the referencing columns, the target side the
/// referenced ones. Both directions of a bidirectional association share one
/// descriptor.
#[derive(Debug)]
pub struct ForeignKeyDescriptor {
    pub role: NavigableRole,
    pub key: Side,
    pub target: Side,

    /// Whether a physical constraint backs the key
    pub has_constraint: bool,
}

impl ForeignKeyDescriptor {
    pub fn side(&self, nature: Nature) -> &Side {
        match nature {
            Nature::Key => &self.key,
            Nature::Target => &self.target,
        }
    }

    pub fn key_table(&self) -> &str {
        &self.key.table
    }

    pub fn target_table(&self) -> &str {
        &self.target.table
    }

    pub fn key_selectables(&self) -> &SelectableMappings {
        &self.key.part.selectables
    }

    pub fn target_selectables(&self) -> &SelectableMappings {
        &self.target.part.selectables
    }

    /// Identifies the physical foreign key: the key table and key columns.
    pub fn association_key(&self) -> AssociationKey {
        self.association_key_from_side(Nature::Key)
    }

    pub fn association_key_from_side(&self, nature: Nature) -> AssociationKey {
        let side = self.side(nature);
        AssociationKey::new(
            side.table.clone(),
            side.part
                .selectables
                .column_names()
                .into_iter()
                .map(String::from)
                .collect(),
        )
    }

    /// Whether the key is a single column.
    pub fn is_simple(&self) -> bool {
        self.key.part.selectables.len() == 1
    }

    /// Whether the target columns are the referenced entity's identifier.
    pub fn is_reference_to_primary_key(&self) -> bool {
        self.target.part.is_identifier()
    }

    /// Extracts the value of the target side from an instance of the
    /// referenced entity.
    ///
    /// The identifier of a proxy is known without initializing it. Any other
    /// target attribute needs the proxy loaded through `session`.
    pub fn key_part_value_from_target(
        &self,
        target: &Value,
        session: &dyn Session,
    ) -> Result<Value> {
        if target.is_null() {
            return Ok(Value::Null);
        }

        match &self.target.part.source {
            SideSource::Identifier(identifier) => identifier.get_identifier(target),
            SideSource::Attribute(attribute) => match target {
                Value::Proxy(proxy) => {
                    log::trace!(
                        "initializing proxy {target} to read `{}` for {}",
                        attribute.name,
                        self.role
                    );
                    let loaded = session.initialize_proxy(proxy)?;
                    attribute.get_value(&loaded)
                }
                _ => attribute.get_value(target),
            },
            SideSource::KeyColumns => Err(Error::illegal_state(format!(
                "target side of {} has no domain attribute",
                self.role
            ))),
        }
    }
}

impl ValueMapping for ForeignKeyDescriptor {
    fn mapped_type(&self) -> MappingType {
        self.target.part.mapped_type()
    }
}

impl Bindable for ForeignKeyDescriptor {
    fn for_each_jdbc_type(
        &self,
        offset: usize,
        action: &mut dyn FnMut(usize, &JdbcMapping),
    ) -> usize {
        self.key.part.selectables.for_each_selectable(offset, &mut |i, selectable| {
            action(i, &selectable.jdbc_mapping)
        })
    }

    /// `value` is a value of the target side, e.g. the referenced identifier.
    fn disassemble(&self, value: &Value, session: &dyn Session) -> Result<Value> {
        self.target.part.disassemble(value, session)
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

        let mut leaves = vec![];
        value.flatten_into(&mut leaves);

        let selectables = &self.key.part.selectables;
        if leaves.len() != selectables.len() {
            return Err(Error::illegal_argument(format!(
                "{} binds {} values; got {value}",
                self.role,
                selectables.len()
            )));
        }

        for (i, (leaf, selectable)) in leaves.into_iter().zip(selectables).enumerate() {
            action(offset + i, leaf, &selectable.jdbc_mapping);
        }

        Ok(selectables.len())
    }
}

impl ModelPart for ForeignKeyDescriptor {
    fn part_name(&self) -> &str {
        "{fk}"
    }

    fn navigable_role(&self) -> &NavigableRole {
        &self.role
    }

    fn for_each_selectable(
        &self,
        offset: usize,
        action: &mut dyn FnMut(usize, &SelectableMapping),
    ) -> usize {
        self.key.part.selectables.for_each_selectable(offset, action)
    }
}
