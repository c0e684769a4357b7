use super::{
    AttributeMapping, ChainedPropertyAccess, DiscriminatorValue, EntityDiscriminatorMapping,
    EntityIdentifierMapping, EntityVersionMapping, ModelPart, ModelPartRef, NaturalIdMapping,
    NavigableRole, PropertyAccess, Session, TableDetails, ValueMapping,
};
use crate::{
    schema::{source::InheritanceType, Metamodel},
    stmt::{Value, ValueRecord},
    Error, Result,
};

use std::sync::Arc;

/// Identifies an entity within a [`Metamodel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub usize);

/// The mapping of one entity of a hierarchy.
///
/// Instances are records: the identifier fields come first (see
/// [`EntityIdentifierMapping::slot_count`]), followed by one field per
/// attribute in state array order.
#[derive(Debug)]
pub struct EntityMappingType {
    pub id: EntityId,

    /// The entity name
    pub name: String,

    /// Path of the Rust type backing the entity
    pub type_name: String,

    pub role: NavigableRole,

    pub is_abstract: bool,

    /// Inheritance strategy of the hierarchy
    pub inheritance: InheritanceType,

    /// Tables the entity's state is spread over, starting with the table
    /// holding the identifier and ending with the table holding the columns
    /// declared by this entity.
    pub table_details: Vec<TableDetails>,

    /// Shared by every entity of the hierarchy.
    pub identifier: Arc<EntityIdentifierMapping>,

    /// Shared by every entity of the hierarchy.
    pub discriminator: Option<Arc<EntityDiscriminatorMapping>>,

    /// This entity's discriminator value. `None` for abstract entities
    /// without one and for hierarchies without a discriminator.
    pub discriminator_value: Option<DiscriminatorValue>,

    pub version: Option<Arc<EntityVersionMapping>>,

    pub natural_id: Option<Arc<NaturalIdMapping>>,

    /// Every attribute, inherited ones first. The index of an attribute is
    /// its state array position.
    pub attributes: Vec<Arc<AttributeMapping>>,

    /// Number of leading `attributes` declared by supertypes
    pub inherited_attribute_count: usize,

    /// Supertypes, starting with the hierarchy root
    pub super_types: Vec<EntityId>,

    /// Direct subtypes, in declaration order
    pub sub_types: Vec<EntityId>,
}

impl EntityMappingType {
    pub fn is_root(&self) -> bool {
        self.super_types.is_empty()
    }

    pub fn root(&self) -> EntityId {
        self.super_types.first().copied().unwrap_or(self.id)
    }

    pub fn super_type(&self) -> Option<EntityId> {
        self.super_types.last().copied()
    }

    /// Whether this entity is `other` or one of its supertypes.
    pub fn is_type_or_super_type(&self, other: &EntityMappingType) -> bool {
        self.id == other.id || other.super_types.contains(&self.id)
    }

    pub fn attribute_mappings(&self) -> &[Arc<AttributeMapping>] {
        &self.attributes
    }

    /// Attributes declared on this entity, excluding inherited ones.
    pub fn declared_attribute_mappings(&self) -> &[Arc<AttributeMapping>] {
        &self.attributes[self.inherited_attribute_count..]
    }

    pub fn attribute(&self, position: usize) -> &Arc<AttributeMapping> {
        &self.attributes[position]
    }

    pub fn find_attribute_mapping(&self, name: &str) -> Option<&Arc<AttributeMapping>> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
    }

    /// Resolves a dotted path of attribute names, descending into embedded
    /// attributes. The returned accessor reads the attribute from an
    /// instance of this entity.
    pub fn resolve_attribute_path(
        &self,
        path: &str,
    ) -> Option<(&Arc<AttributeMapping>, ChainedPropertyAccess)> {
        let mut names = path.split('.');
        let mut attribute = self.find_attribute_mapping(names.next()?)?;
        let mut steps: Vec<Arc<dyn PropertyAccess>> = vec![attribute.property_access.clone()];

        for name in names {
            attribute = attribute.as_embedded()?.embeddable.find_attribute(name)?;
            steps.push(attribute.property_access.clone());
        }

        Some((attribute, ChainedPropertyAccess::new(steps)))
    }

    /// Finds a sub-part by name.
    ///
    /// `{id}` and the identifier attribute names resolve to the identifier,
    /// `{discriminator}` to the discriminator. Attributes only declared on a
    /// subtype are found by walking the subtypes, or only those of `treat`
    /// when a narrowing target is given. Without `treat`, subtypes declaring
    /// the name with different types make the name ambiguous.
    pub fn find_sub_part<'a>(
        &'a self,
        metamodel: &'a Metamodel,
        name: &str,
        treat: Option<&EntityMappingType>,
    ) -> Result<Option<ModelPartRef<'a>>> {
        if let Some(part) = self.find_own_sub_part(name) {
            return Ok(Some(part));
        }

        match treat {
            Some(target) if self.is_type_or_super_type(target) => {
                let target = metamodel.entity(target.id);
                Ok(target.find_own_sub_part(name))
            }
            Some(_) => Ok(None),
            None => self.find_sub_type_part(metamodel, name),
        }
    }

    fn find_sub_type_part<'a>(
        &'a self,
        metamodel: &'a Metamodel,
        name: &str,
    ) -> Result<Option<ModelPartRef<'a>>> {
        let mut found: Option<ModelPartRef<'a>> = None;

        for id in &self.sub_types {
            let Some(part) = metamodel.entity(*id).find_sub_part(metamodel, name, None)? else {
                continue;
            };

            match found {
                Some(existing) if existing.mapped_type() != part.mapped_type() => {
                    return Err(Error::illegal_argument(format!(
                        "`{name}` is ambiguous for `{}`; `{}` and `{}` map it to different types",
                        self.name,
                        existing.navigable_role().full_path(),
                        part.navigable_role().full_path()
                    )));
                }
                Some(_) => {}
                None => found = Some(part),
            }
        }

        Ok(found)
    }

    fn find_own_sub_part(&self, name: &str) -> Option<ModelPartRef<'_>> {
        if name == "{id}" {
            return Some(ModelPartRef::Identifier(&self.identifier));
        }

        if name == "{discriminator}" {
            return self
                .discriminator
                .as_deref()
                .map(ModelPartRef::Discriminator);
        }

        if self.identifier.is_non_aggregated() {
            if let Some(attribute) = self.identifier.find_sub_part(name) {
                return Some(ModelPartRef::Attribute(attribute));
            }
        } else if self.identifier.attribute_names().contains(&name) {
            return Some(ModelPartRef::Identifier(&self.identifier));
        }

        self.find_attribute_mapping(name)
            .map(|attribute| ModelPartRef::Attribute(attribute))
    }

    /// Visits the tables of this entity, identifier table first.
    pub fn for_each_table_details(&self, mut action: impl FnMut(&TableDetails)) {
        for table in &self.table_details {
            action(table);
        }
    }

    /// The table holding the columns declared by this entity.
    pub fn mapped_table_details(&self) -> &TableDetails {
        self.table_details
            .last()
            .expect("entity mapping without tables")
    }

    /// The table holding the identifier columns.
    pub fn identifier_table_details(&self) -> &TableDetails {
        self.table_details
            .first()
            .expect("entity mapping without tables")
    }

    /// Number of fields of an instance.
    pub fn instance_len(&self) -> usize {
        self.identifier.slot_count() + self.attributes.len()
    }

    /// A new instance with a null identifier and null state.
    pub fn instantiate(&self) -> Value {
        ValueRecord::nulls(self.instance_len()).into()
    }

    /// Reads the state array of an instance: one value per attribute, in
    /// state array order.
    pub fn extract_state(&self, instance: &Value) -> Result<Vec<Value>> {
        self.expect_instance(instance)?;
        self.attributes
            .iter()
            .map(|attribute| attribute.get_value(instance))
            .collect()
    }

    /// State array positions whose values differ between two states of the
    /// same entity, compared in their relational form.
    pub fn find_dirty(
        &self,
        old: &[Value],
        new: &[Value],
        session: &dyn Session,
    ) -> Result<Vec<usize>> {
        if old.len() != self.attributes.len() || new.len() != self.attributes.len() {
            return Err(Error::illegal_argument(format!(
                "state of `{}` has {} values; got {} and {}",
                self.name,
                self.attributes.len(),
                old.len(),
                new.len()
            )));
        }

        let mut dirty = vec![];
        for (position, attribute) in self.attributes.iter().enumerate() {
            if attribute.is_dirty(&old[position], &new[position], session)? {
                dirty.push(position);
            }
        }
        Ok(dirty)
    }

    /// The relational discriminator value written for this entity.
    pub fn discriminator_relational_value(&self) -> Result<Option<Value>> {
        match &self.discriminator {
            Some(discriminator) => discriminator
                .converter
                .to_relational_value(&Value::from(&self.name[..]))
                .map(Some),
            None => Ok(None),
        }
    }

    fn expect_instance(&self, instance: &Value) -> Result<()> {
        match instance {
            Value::Record(record) if record.len() == self.instance_len() => Ok(()),
            Value::Proxy(proxy) => Err(Error::lazy_initialization(&proxy.entity, &proxy.id)),
            _ => Err(Error::illegal_argument(format!(
                "expected an instance of `{}` with {} fields; got {instance}",
                self.name,
                self.instance_len()
            ))),
        }
    }
}
