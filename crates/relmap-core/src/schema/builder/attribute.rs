use super::BuildMetamodel;
use crate::{
    schema::{
        mapping::{
            AttributeKind, AttributeMapping, AttributeMetadata, BasicAttribute, BasicValueConverter,
            ColumnSize, EmbeddableMappingType, EmbeddedAttribute, FetchOptions, JdbcMapping,
            NavigableRole, RecordFieldAccess, SelectableMapping, SelectablePath,
        },
        source::{
            AttributeNature, AttributeSource, BasicSource, ConverterSource, EmbeddableSource,
            FetchTiming, RelationalValueSource,
        },
        Name,
    },
    stmt::Type,
    Error, Result,
};

use indexmap::IndexMap;
use std::sync::Arc;

/// An attribute of an entity as it stands after pass 1.
#[derive(Debug)]
pub(super) enum AttributeDraft<'a> {
    /// Basic and embedded attributes are complete after pass 1
    Ready(Arc<AttributeMapping>),

    /// To-one and plural attributes are completed in pass 2
    Association {
        source: &'a AttributeSource,
        position: usize,
    },
}

/// The entity or embeddable usage whose attributes are being built.
#[derive(Debug, Clone)]
pub(super) struct Owner<'b> {
    /// Name of the declaring entity or embeddable
    pub(super) name: &'b str,

    pub(super) role: NavigableRole,

    /// Table holding the owner's columns
    pub(super) table: &'b str,

    /// Instance field of the owner's first attribute
    pub(super) field_offset: usize,

    /// Whether the attributes make up an identifier
    pub(super) identifier: bool,

    /// False once any enclosing attribute is required
    pub(super) optional: bool,

    /// Path of the enclosing embedded attributes
    pub(super) path: Option<SelectablePath>,
}

impl<'b> Owner<'b> {
    pub(super) fn entity(
        name: &'b str,
        role: NavigableRole,
        table: &'b str,
        field_offset: usize,
    ) -> Self {
        Self {
            name,
            role,
            table,
            field_offset,
            identifier: false,
            optional: true,
            path: None,
        }
    }

    pub(super) fn identifier(name: &'b str, role: NavigableRole, table: &'b str) -> Self {
        Self {
            identifier: true,
            optional: false,
            ..Self::entity(name, role, table, 0)
        }
    }

    /// The owner of the attributes of an embeddable reached through
    /// `attribute`.
    pub(super) fn nested(&self, attribute: &AttributeSource, embeddable: &'b str) -> Owner<'b> {
        let path = match &self.path {
            Some(path) => path.append(&attribute.name),
            None => SelectablePath::new(&attribute.name),
        };

        Owner {
            name: embeddable,
            role: self.role.append(&attribute.name),
            table: self.table,
            field_offset: 0,
            identifier: self.identifier,
            optional: self.optional && attribute.optional,
            path: Some(path),
        }
    }
}

impl<'a> BuildMetamodel<'a> {
    /// Builds a basic or embedded attribute.
    pub(super) fn build_attribute(
        &mut self,
        owner: &Owner<'_>,
        source: &AttributeSource,
        position: usize,
    ) -> Result<Arc<AttributeMapping>> {
        let kind = match &source.nature {
            AttributeNature::Basic(basic) => {
                let column = Name::new(&source.name).snake_case();
                AttributeKind::Basic(BasicAttribute {
                    selectable: self.basic_selectable(owner, source, basic, &column)?,
                })
            }
            AttributeNature::Composite(composite) => {
                let embeddable =
                    self.find_embeddable(owner.name, &source.name, &composite.embeddable)?;
                let nested = owner.nested(source, &embeddable.name);
                AttributeKind::Embedded(EmbeddedAttribute {
                    embeddable: self.build_embeddable(embeddable, &nested)?,
                })
            }
            _ => {
                return Err(Error::invalid_mapping(
                    owner.name,
                    Some(source.name.as_str()),
                    "associations inside embeddables are not supported",
                ))
            }
        };

        Ok(Arc::new(attribute_mapping(owner, source, position, kind)))
    }

    /// The column or formula of a basic value owned by `owner`.
    pub(super) fn basic_selectable(
        &self,
        owner: &Owner<'_>,
        attribute: &AttributeSource,
        basic: &BasicSource,
        default_column: &str,
    ) -> Result<SelectableMapping> {
        let size = basic
            .value
            .as_ref()
            .and_then(RelationalValueSource::as_column)
            .map(|column| column.size)
            .unwrap_or_default();

        let jdbc_mapping = self.jdbc_mapping(
            owner.name,
            Some(&attribute.name),
            &basic.ty,
            basic.converter,
            &size,
        )?;

        let mut selectable = match &basic.value {
            Some(RelationalValueSource::DerivedValue(formula)) => {
                SelectableMapping::formula(owner.table, formula, jdbc_mapping)
            }
            Some(RelationalValueSource::Column(column)) => {
                let mut selectable =
                    SelectableMapping::column(owner.table, &column.name, jdbc_mapping);
                selectable.nullable = column
                    .nullable
                    .unwrap_or(attribute.optional && owner.optional);
                selectable.insertable = attribute.insertable && column.insertable;
                selectable.updatable = attribute.updatable && column.updatable;
                selectable.size = column.size;
                selectable.custom_read = column.read.clone();
                selectable.custom_write = column.write.clone();
                selectable
            }
            None => {
                let mut selectable =
                    SelectableMapping::column(owner.table, default_column, jdbc_mapping);
                selectable.nullable = attribute.optional && owner.optional;
                selectable.insertable = attribute.insertable;
                selectable.updatable = attribute.updatable;
                selectable
            }
        };

        if owner.identifier {
            selectable.nullable = false;
            selectable.updatable = false;
        }

        if let Some(path) = &owner.path {
            selectable = selectable.with_path_prefix(path);
        }

        Ok(selectable)
    }

    pub(super) fn jdbc_mapping(
        &self,
        owner: &str,
        attribute: Option<&str>,
        ty: &Type,
        converter: Option<ConverterSource>,
        size: &ColumnSize,
    ) -> Result<JdbcMapping> {
        let converter = value_converter(owner, attribute, ty, converter)?;

        JdbcMapping::basic(ty, converter, size, self.config.default_string_length).map_err(|err| {
            err.context(Error::invalid_mapping(
                owner,
                attribute,
                format!("cannot map `{}` to a column", ty.name()),
            ))
        })
    }

    pub(super) fn find_embeddable(
        &self,
        owner: &str,
        attribute: &str,
        name: &str,
    ) -> Result<&'a EmbeddableSource> {
        self.source.find_embeddable(name).ok_or_else(|| {
            Error::invalid_mapping(
                owner,
                Some(attribute),
                format!("unknown embeddable `{name}`"),
            )
        })
    }

    /// Builds one usage of an embeddable and registers it under its role.
    ///
    /// A polymorphic embeddable carries the attributes of the root followed
    /// by those of every subtype, depth first. Columns of attributes that
    /// only some subtypes have are nullable.
    pub(super) fn build_embeddable(
        &mut self,
        source: &'a EmbeddableSource,
        owner: &Owner<'_>,
    ) -> Result<Arc<EmbeddableMappingType>> {
        if source.super_type.is_some() {
            return Err(Error::invalid_mapping(
                &source.name,
                None,
                "embeddable subtypes are used through the root of their hierarchy",
            ));
        }

        let mut members = vec![];
        self.collect_embeddable_members(source, &mut members);
        let polymorphic = members.len() > 1 || source.discriminator.is_some();

        let mut attributes: Vec<Arc<AttributeMapping>> = vec![];
        let mut declared_by = vec![];

        for (index, member) in members.iter().enumerate() {
            for attribute in &member.attributes {
                if attributes.iter().any(|a| a.name == attribute.name) {
                    return Err(Error::invalid_mapping(
                        &source.name,
                        Some(attribute.name.as_str()),
                        "declared by more than one type of the embeddable hierarchy",
                    ));
                }

                let position = attributes.len();
                let mapping = if index == 0 {
                    self.build_attribute(owner, attribute, position)?
                } else {
                    let mut attribute = attribute.clone();
                    attribute.optional = true;
                    self.build_attribute(owner, &attribute, position)?
                };

                attributes.push(mapping);
                declared_by.push(index);
            }
        }

        let mut subtypes = IndexMap::new();
        let mut discriminator = None;

        if polymorphic {
            for member in &members {
                let lineage = embeddable_lineage(&members, member);
                let positions = declared_by
                    .iter()
                    .enumerate()
                    .filter(|(_, index)| lineage.contains(&members[**index].name.as_str()))
                    .map(|(position, _)| position)
                    .collect();
                subtypes.insert(member.name.clone(), positions);
            }

            discriminator = Some(Arc::new(
                self.build_embeddable_discriminator(source, &members, owner)?,
            ));
        }

        let embeddable = Arc::new(EmbeddableMappingType {
            name: source.name.clone(),
            type_name: source.type_name.clone(),
            role: owner.role.clone(),
            attributes,
            discriminator,
            subtypes,
        });

        log::trace!(
            "built embeddable `{}` at {}; attributes={} polymorphic={polymorphic}",
            source.name,
            owner.role,
            embeddable.attributes.len()
        );

        self.embeddables
            .insert(owner.role.full_path().to_string(), embeddable.clone());

        Ok(embeddable)
    }

    /// `embeddable` followed by its subtypes, depth first.
    fn collect_embeddable_members(
        &self,
        embeddable: &'a EmbeddableSource,
        out: &mut Vec<&'a EmbeddableSource>,
    ) {
        out.push(embeddable);
        for subtype in self.source.embeddable_subtypes_of(&embeddable.name) {
            self.collect_embeddable_members(subtype, out);
        }
    }
}

/// Names of `member` and its supertypes within `members`.
fn embeddable_lineage<'m>(
    members: &[&'m EmbeddableSource],
    member: &'m EmbeddableSource,
) -> Vec<&'m str> {

    let mut lineage = vec![member.name.as_str()];
    let mut current = member;

    while let Some(super_type) = &current.super_type {
        match members.iter().find(|m| m.name == *super_type) {
            Some(parent) => {
                lineage.push(&parent.name);
                current = parent;
            }
            None => break,
        }
    }

    lineage
}

fn value_converter(
    owner: &str,
    attribute: Option<&str>,
    ty: &Type,
    converter: Option<ConverterSource>,
) -> Result<Option<BasicValueConverter>> {
    let Some(converter) = converter else {
        return Ok(None);
    };

    let converter = match (converter, ty) {
        (ConverterSource::EnumOrdinal, Type::Enum(ty)) => {
            BasicValueConverter::EnumOrdinal(ty.clone())
        }

        (ConverterSource::EnumName, Type::Enum(ty)) => BasicValueConverter::EnumName(ty.clone()),
        (ConverterSource::YesNo, Type::Bool) => BasicValueConverter::YesNo,
        (ConverterSource::TrueFalse, Type::Bool) => BasicValueConverter::TrueFalse,
        (ConverterSource::NumericBoolean, Type::Bool) => BasicValueConverter::NumericBoolean,
        (converter, ty) => {
            return Err(Error::invalid_mapping(
                owner,
                attribute,
                format!("converter {converter:?} does not apply to `{}`", ty.name()),
            ))
        }
    };

    Ok(Some(converter))
}

/// Wraps a built attribute kind with the attribute's common metadata.
pub(super) fn attribute_mapping(
    owner: &Owner<'_>,
    source: &AttributeSource,
    position: usize,
    kind: AttributeKind,
) -> AttributeMapping {
    AttributeMapping {
        name: source.name.clone(),
        state_array_position: position,
        fetchable_index: position,
        declaring_type: owner.name.to_string(),
        role: owner.role.append(&source.name),
        property_access: Arc::new(RecordFieldAccess::new(owner.field_offset + position)),
        metadata: AttributeMetadata {
            nullable: source.optional && !owner.identifier,
            insertable: source.insertable,
            updatable: source.updatable && !owner.identifier,
            optimistic_locked: source.optimistic_lock,
            lazy: source.fetch.timing == FetchTiming::Delayed,
        },
        fetch: FetchOptions {
            timing: source.fetch.timing,
            style: source.fetch.style,
        },
        cascade: source.cascade.clone(),
        kind,
    }
}
