use super::ColumnSize;
use crate::{stmt::Type, Result};

use std::fmt;

/// Relational storage type of a single column.
///
/// This is the ANSI-level vocabulary only. Rendering it for a particular
/// database is the job of a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JdbcType {
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,

    /// Fixed length character string
    Char(u32),

    /// Character string with a maximum length
    VarChar(u32),

    /// Unbounded character string
    Text,

    Binary,
}

impl JdbcType {
    /// Picks the storage type for a domain type.
    ///
    /// `ty` must already be the relational type, i.e. the output of any
    /// value converter.
    pub fn from_domain(ty: &Type, size: &ColumnSize, default_string_length: u32) -> Result<Self> {
        Ok(match ty {
            Type::Bool => Self::Boolean,
            Type::I8 => Self::TinyInt,
            Type::I16 => Self::SmallInt,
            Type::I32 => Self::Integer,
            Type::I64 => Self::BigInt,
            Type::Char => Self::Char(1),
            Type::String => match size.length {
                Some(0) => Self::Text,
                Some(length) => Self::VarChar(length),
                None => Self::VarChar(default_string_length),
            },
            Type::Bytes => Self::Binary,
            _ => crate::bail!(
                "type `{}` has no single-column relational representation",
                ty.name()
            ),
        })
    }

    /// The type of values read from and written to a column of this type.
    pub fn value_type(&self) -> Type {
        match self {
            Self::Boolean => Type::Bool,
            Self::TinyInt => Type::I8,
            Self::SmallInt => Type::I16,
            Self::Integer => Type::I32,
            Self::BigInt => Type::I64,
            Self::Char(1) => Type::Char,
            Self::Char(_) | Self::VarChar(_) | Self::Text => Type::String,
            Self::Binary => Type::Bytes,
        }
    }

    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            Self::TinyInt | Self::SmallInt | Self::Integer | Self::BigInt
        )
    }

    pub fn is_character(&self) -> bool {
        matches!(self, Self::Char(_) | Self::VarChar(_) | Self::Text)
    }
}

impl fmt::Display for JdbcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => f.write_str("boolean"),
            Self::TinyInt => f.write_str("tinyint"),
            Self::SmallInt => f.write_str("smallint"),
            Self::Integer => f.write_str("integer"),
            Self::BigInt => f.write_str("bigint"),
            Self::Char(length) => write!(f, "char({length})"),
            Self::VarChar(length) => write!(f, "varchar({length})"),
            Self::Text => f.write_str("text"),
            Self::Binary => f.write_str("binary"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_use_declared_or_default_length() {
        let declared = ColumnSize {
            length: Some(40),
            ..ColumnSize::default()
        };
        assert_eq!(
            JdbcType::from_domain(&Type::String, &declared, 255).unwrap(),
            JdbcType::VarChar(40)
        );
        assert_eq!(
            JdbcType::from_domain(&Type::String, &ColumnSize::default(), 255).unwrap(),
            JdbcType::VarChar(255)
        );
    }

    #[test]
    fn composite_types_are_rejected() {
        let ty = Type::Record(vec![Type::I32, Type::I32]);
        assert!(JdbcType::from_domain(&ty, &ColumnSize::default(), 255).is_err());
    }
}
