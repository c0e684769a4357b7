use super::{attribute::Owner, BuildMetamodel};
use crate::{
    schema::{
        mapping::{
            DefaultDiscriminatorConverter, DiscriminatorConverter, DiscriminatorValue,
            DiscriminatorValueDetails, EmbeddableDiscriminatorConverter,
            EmbeddableDiscriminatorMapping, EntityDiscriminatorMapping, JdbcMapping,
            MappedDiscriminatorConverter, NavigableRole, SelectableMapping,
        },
        source::{
            DiscriminatorMatch, DiscriminatorSource, EmbeddableSource, EntitySource,
            InheritanceType, RelationalValueSource,
        },
    },
    stmt::Value,
    Error, Result,
};

use std::sync::Arc;

impl<'a> BuildMetamodel<'a> {
    /// Builds the discriminator of a hierarchy, if it needs one. `members`
    /// are the root followed by its subtypes.
    pub(super) fn build_discriminator(
        &self,
        root: &'a EntitySource,
        members: &[&'a EntitySource],
        inheritance: InheritanceType,
        table: &str,
    ) -> Result<Option<Arc<EntityDiscriminatorMapping>>> {
        let implicit = match inheritance {
            InheritanceType::SingleTable => members.len() > 1,
            InheritanceType::Joined => {
                self.config.implicit_discriminators_for_joined && members.len() > 1
            }
            InheritanceType::TablePerClass => false,
        };

        if root.discriminator.is_none() && !implicit {
            if let Some(entity) = members.iter().find(|e| e.discriminator_value.is_some()) {
                log::warn!(
                    "discriminator value of `{}` ignored; the hierarchy of `{}` has no discriminator",
                    entity.name,
                    root.name
                );
            }
            return Ok(None);
        }

        if members.len() == 1 {
            log::warn!(
                "`{}` declares a discriminator but has no subclass entities",
                root.name
            );
        }

        let source = match &root.discriminator {
            Some(source) => source.clone(),
            None => DiscriminatorSource::column(self.config.implicit_discriminator_column.as_str()),
        };

        let jdbc_mapping = self.discriminator_jdbc_mapping(&root.name, &source)?;
        let relational_ty = jdbc_mapping.relational_ty();
        let explicit = members.iter().any(|e| e.discriminator_value.is_some());

        let converter: Box<dyn DiscriminatorConverter> =
            if !explicit && relational_ty.is_string() && jdbc_mapping.converter.is_none() {
                Box::new(DefaultDiscriminatorConverter::new(
                    &root.name,
                    jdbc_mapping.clone(),
                    members.iter().map(|&e| (e.name.as_str(), e.type_name.as_str())),
                )?)
            } else {
                let mut details = vec![];

                for &entity in members {
                    let value = match &entity.discriminator_value {
                        Some(DiscriminatorMatch::Value(value)) => DiscriminatorValue::Literal(
                            self.discriminator_literal(&entity.name, &jdbc_mapping, value)?,
                        ),
                        Some(DiscriminatorMatch::Null) => DiscriminatorValue::Null,
                        Some(DiscriminatorMatch::NotNull) => DiscriminatorValue::NotNull,
                        None if relational_ty.is_string() => {
                            DiscriminatorValue::Literal(Value::from(entity.name.as_str()))
                        }
                        None if entity.is_abstract => continue,
                        None => {
                            return Err(Error::invalid_mapping(
                                &entity.name,
                                None,
                                format!(
                                    "discriminator of type `{}` needs an explicit value",
                                    relational_ty.name()
                                ),
                            ))
                        }
                    };

                    details.push(DiscriminatorValueDetails::new(
                        value,
                        &entity.name,
                        &entity.type_name,
                    ));
                }

                Box::new(MappedDiscriminatorConverter::new(
                    &root.name,
                    jdbc_mapping.clone(),
                    details,
                )?)
            };

        let nullable = converter
            .value_details()
            .iter()
            .any(|details| details.value == DiscriminatorValue::Null);

        let selectable = discriminator_selectable(&source, table, jdbc_mapping, nullable);

        log::trace!(
            "registered discriminator `{}` of `{}`; values=[{}]",
            selectable.expression,
            root.name,
            converter
                .value_details()
                .iter()
                .map(|details| format!("{}={}", details.indicated_name, details.value))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Some(Arc::new(EntityDiscriminatorMapping {
            role: NavigableRole::new(&root.name).append("{discriminator}"),
            selectable,
            converter,
            forced: source.forced,
        })))
    }

    /// Builds the discriminator of a polymorphic embeddable. Embeddable
    /// types are matched by literal values only.
    pub(super) fn build_embeddable_discriminator(
        &self,
        root: &EmbeddableSource,
        members: &[&'a EmbeddableSource],
        owner: &Owner<'_>,
    ) -> Result<EmbeddableDiscriminatorMapping> {
        let source = match &root.discriminator {
            Some(source) => source.clone(),
            None => DiscriminatorSource::column(self.config.implicit_discriminator_column.as_str()),
        };

        let jdbc_mapping = self.discriminator_jdbc_mapping(&root.name, &source)?;
        let relational_ty = jdbc_mapping.relational_ty();

        let mut details = vec![];
        for &member in members {
            let value = match &member.discriminator_value {
                Some(DiscriminatorMatch::Value(value)) => {
                    self.discriminator_literal(&member.name, &jdbc_mapping, value)?
                }
                None if relational_ty.is_string() => Value::from(member.name.as_str()),
                Some(_) => {
                    return Err(Error::invalid_mapping(
                        &member.name,
                        None,
                        "embeddable discriminators take literal values only",
                    ))
                }
                None => {
                    return Err(Error::invalid_mapping(
                        &member.name,
                        None,
                        format!(
                            "discriminator of type `{}` needs an explicit value",
                            relational_ty.name()
                        ),
                    ))
                }
            };

            details.push(DiscriminatorValueDetails::new(
                DiscriminatorValue::Literal(value),
                &member.name,
                &member.type_name,
            ));
        }

        let converter =
            EmbeddableDiscriminatorConverter::new(&root.name, jdbc_mapping.clone(), details)?;

        let mut selectable =
            discriminator_selectable(&source, owner.table, jdbc_mapping, owner.optional);
        if let Some(path) = &owner.path {
            selectable = selectable.with_path_prefix(path);
        }

        Ok(EmbeddableDiscriminatorMapping {
            role: owner.role.append("{discriminator}"),
            selectable,
            converter,
        })
    }

    fn discriminator_jdbc_mapping(
        &self,
        owner: &str,
        source: &DiscriminatorSource,
    ) -> Result<JdbcMapping> {
        let size = source
            .value
            .as_column()
            .map(|column| column.size)
            .unwrap_or_default();

        self.jdbc_mapping(owner, None, &source.ty, source.converter, &size)
    }

    /// Coerces a declared discriminator value to the relational type.
    /// Strings are parsed into integers and characters; domain values go
    /// through the converter.
    pub(super) fn discriminator_literal(
        &self,
        owner: &str,
        jdbc_mapping: &JdbcMapping,
        value: &Value,
    ) -> Result<Value> {
        let ty = jdbc_mapping.relational_ty();

        let literal = match value {
            value if value.is_a(&ty) => Some(value.clone()),
            Value::String(s) if ty.is_integral() => s
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(|v| Value::from_i64(&ty, v).ok()),
            Value::String(s) if ty.is_char() => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Value::Char(c)),
                    _ => None,
                }
            }
            value if ty.is_integral() && value.to_i64().is_some() => value
                .to_i64()
                .and_then(|v| Value::from_i64(&ty, v).ok()),
            value if value.is_a(&jdbc_mapping.domain_ty) => {
                jdbc_mapping.to_relational_value(value).ok()
            }
            _ => None,
        };

        literal.ok_or_else(|| {
            Error::invalid_mapping(
                owner,
                None,
                format!("discriminator value {value} is not a valid `{}`", ty.name()),
            )
        })
    }

    /// Checks that every registered entity name converts to its relational
    /// value and back.
    pub(super) fn verify_discriminators(&self) -> Result<()> {
        for (root, hierarchy) in &self.hierarchies {
            let Some(discriminator) = &hierarchy.discriminator else {
                continue;
            };
            let converter = &discriminator.converter;

            for details in converter.value_details() {
                // Matches any value and has none of its own
                if details.value == DiscriminatorValue::NotNull {
                    continue;
                }

                let relational =
                    converter.to_relational_value(&Value::from(details.indicated_name.as_str()))?;
                let resolved = converter.to_domain_value(&relational)?;

                if resolved != details.indicated_name {
                    return Err(Error::invalid_mapping(
                        root,
                        None,
                        format!(
                            "discriminator value {} of `{}` resolves to `{resolved}`",
                            details.value, details.indicated_name
                        ),
                    ));
                }
            }
        }

        Ok(())
    }
}

fn discriminator_selectable(
    source: &DiscriminatorSource,
    table: &str,
    jdbc_mapping: JdbcMapping,
    nullable: bool,
) -> SelectableMapping {
    match &source.value {
        RelationalValueSource::Column(column) => {
            let mut selectable = SelectableMapping::column(table, &column.name, jdbc_mapping);
            selectable.nullable = column.nullable.unwrap_or(nullable);
            selectable.insertable = source.insertable && column.insertable;
            selectable.updatable = false;
            selectable.size = column.size;
            selectable.custom_read = column.read.clone();
            selectable.custom_write = column.write.clone();
            selectable
        }
        RelationalValueSource::DerivedValue(formula) => {
            SelectableMapping::formula(table, formula, jdbc_mapping)
        }
    }
}
