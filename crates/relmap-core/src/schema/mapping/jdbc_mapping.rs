use super::{BasicValueConverter, ColumnSize, JdbcType};
use crate::{
    stmt::{Type, TypeEnum, Value},
    Error, Result,
};

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

/// Binds one relational value to a domain type.
///
/// Values on the domain side have `domain_ty`. Values on the relational side
/// have the converter's relational type, or `domain_ty` when there is no
/// converter, and are stored in a column of `jdbc_ty`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JdbcMapping {
    pub domain_ty: Type,
    pub jdbc_ty: JdbcType,
    pub converter: Option<BasicValueConverter>,
}

impl JdbcMapping {
    pub fn new(domain_ty: Type, jdbc_ty: JdbcType) -> Self {
        Self {
            domain_ty,
            jdbc_ty,
            converter: None,
        }
    }

    /// Builds the mapping of a basic value. Enums without an explicit
    /// converter are stored by ordinal.
    pub fn basic(
        domain_ty: &Type,
        converter: Option<BasicValueConverter>,
        size: &ColumnSize,
        default_string_length: u32,
    ) -> Result<Self> {
        let converter = match (converter, domain_ty) {
            (Some(converter), _) => Some(converter),
            (None, Type::Enum(ty)) => Some(BasicValueConverter::EnumOrdinal(ty.clone())),
            (None, _) => None,
        };

        let relational_ty = match &converter {
            Some(converter) => converter.relational_type(),
            None => domain_ty.clone(),
        };

        let jdbc_ty = JdbcType::from_domain(&relational_ty, size, default_string_length)?;

        Ok(Self {
            domain_ty: domain_ty.clone(),
            jdbc_ty,
            converter,
        })
    }

    /// Type of the values bound to and extracted from JDBC.
    pub fn relational_ty(&self) -> Type {
        match &self.converter {
            Some(converter) => converter.relational_type(),
            None => self.domain_ty.clone(),
        }
    }

    /// The enum behind the domain type, if any.
    pub fn domain_enum(&self) -> Option<&TypeEnum> {
        self.domain_ty.as_enum()
    }

    pub fn to_relational_value(&self, value: &Value) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        match &self.converter {
            Some(converter) => converter.to_relational(value),
            None => self.coerce(value, &self.domain_ty),
        }
    }

    pub fn to_domain_value(&self, value: &Value) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        match &self.converter {
            Some(converter) => {
                let relational = self.coerce(value, &converter.relational_type())?;
                converter.to_domain(&relational)
            }
            None => self.coerce(value, &self.domain_ty),
        }
    }

    /// `value` as a value of the relational type. Integers of another width
    /// are converted when they fit.
    pub fn coerce_relational(&self, value: &Value) -> Result<Value> {
        self.coerce(value, &self.relational_ty())
    }

    /// Accepts values of the expected type and integers of any width that
    /// fit in it.
    fn coerce(&self, value: &Value, ty: &Type) -> Result<Value> {
        if value.is_a(ty) {
            return Ok(value.clone());
        }

        match value.to_i64() {
            Some(v) if ty.is_integral() => Value::from_i64(ty, v),
            _ => Err(Error::type_conversion(value.clone(), ty.name())),
        }
    }

    /// Renders a domain value as an ANSI SQL literal.
    pub fn format_literal(&self, value: &Value) -> Result<String> {
        let relational = self.to_relational_value(value)?;

        let mut out = String::new();
        match &relational {
            Value::Null => out.push_str("null"),
            Value::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            Value::I8(v) => out.push_str(&v.to_string()),
            Value::I16(v) => out.push_str(&v.to_string()),
            Value::I32(v) => out.push_str(&v.to_string()),
            Value::I64(v) => out.push_str(&v.to_string()),
            Value::Char(v) => {
                out.push('\'');
                push_escaped(&mut out, *v);
                out.push('\'');
            }
            Value::String(v) => {
                out.push('\'');
                for ch in v.chars() {
                    push_escaped(&mut out, ch);
                }
                out.push('\'');
            }
            Value::Bytes(bytes) => {
                out.push_str("X'");
                for byte in bytes {
                    out.push_str(&format!("{byte:02X}"));
                }
                out.push('\'');
            }
            _ => return Err(Error::type_conversion(relational, "literal")),
        }

        Ok(out)
    }

    /// Compares two domain values by their relational form.
    pub fn are_equal(&self, a: &Value, b: &Value) -> bool {
        match (self.to_relational_value(a), self.to_relational_value(b)) {
            (Ok(a), Ok(b)) => a == b,
            _ => a == b,
        }
    }

    /// Hashes a relational value consistently with [`JdbcMapping::are_equal`].
    pub fn hash_relational(&self, value: &Value) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }
}

fn push_escaped(out: &mut String, ch: char) {
    if ch == '\'' {
        out.push('\'');
    }
    out.push(ch);
}
