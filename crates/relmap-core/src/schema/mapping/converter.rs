use crate::{
    stmt::{Type, TypeEnum, Value, ValueEnum},
    Error, Result,
};

/// Converts a basic value between its domain form and the form stored in
/// the column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BasicValueConverter {
    /// Enum constant stored as its ordinal
    EnumOrdinal(TypeEnum),

    /// Enum constant stored as its name
    EnumName(TypeEnum),

    /// `'Y'` / `'N'`
    YesNo,

    /// `'T'` / `'F'`
    TrueFalse,

    /// `1` / `0`
    NumericBoolean,
}

impl BasicValueConverter {
    pub fn domain_type(&self) -> Type {
        match self {
            Self::EnumOrdinal(ty) | Self::EnumName(ty) => Type::Enum(ty.clone()),
            Self::YesNo | Self::TrueFalse | Self::NumericBoolean => Type::Bool,
        }
    }

    pub fn relational_type(&self) -> Type {
        match self {
            Self::EnumOrdinal(_) | Self::NumericBoolean => Type::I32,
            Self::EnumName(_) => Type::String,
            Self::YesNo | Self::TrueFalse => Type::Char,
        }
    }

    /// Null passes through unchanged.
    pub fn to_relational(&self, value: &Value) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        match (self, value) {
            (Self::EnumOrdinal(ty), Value::Enum(constant)) if constant.ty == ty.name => {
                Ok(Value::I32(constant.ordinal.try_into()?))
            }
            (Self::EnumName(ty), Value::Enum(constant)) if constant.ty == ty.name => {
                Ok(Value::String(constant.name.clone()))
            }
            (Self::YesNo, Value::Bool(v)) => Ok(Value::Char(if *v { 'Y' } else { 'N' })),
            (Self::TrueFalse, Value::Bool(v)) => Ok(Value::Char(if *v { 'T' } else { 'F' })),
            (Self::NumericBoolean, Value::Bool(v)) => Ok(Value::I32(i32::from(*v))),
            _ => Err(Error::type_conversion(
                value.clone(),
                self.relational_type().name(),
            )),
        }
    }

    /// Null passes through unchanged.
    pub fn to_domain(&self, value: &Value) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        let converted = match self {
            Self::EnumOrdinal(ty) => value
                .to_i64()
                .and_then(|ordinal| usize::try_from(ordinal).ok())
                .and_then(|ordinal| ValueEnum::from_ordinal(ty, ordinal))
                .map(Value::Enum),
            Self::EnumName(ty) => value
                .as_str()
                .and_then(|name| ValueEnum::from_name(ty, name))
                .map(Value::Enum),
            Self::YesNo => match value {
                Value::Char('Y') => Some(Value::Bool(true)),
                Value::Char('N') => Some(Value::Bool(false)),
                _ => None,
            },
            Self::TrueFalse => match value {
                Value::Char('T') => Some(Value::Bool(true)),
                Value::Char('F') => Some(Value::Bool(false)),
                _ => None,
            },
            Self::NumericBoolean => match value.to_i64() {
                Some(1) => Some(Value::Bool(true)),
                Some(0) => Some(Value::Bool(false)),
                _ => None,
            },
        };

        converted.ok_or_else(|| Error::type_conversion(value.clone(), self.domain_type().name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind() -> TypeEnum {
        TypeEnum::new("Kind", ["RETAIL", "WHOLESALE"])
    }

    #[test]
    fn enum_ordinal() {
        let converter = BasicValueConverter::EnumOrdinal(kind());
        let wholesale = Value::Enum(ValueEnum::from_name(&kind(), "WHOLESALE").unwrap());

        assert_eq!(converter.to_relational(&wholesale).unwrap(), Value::I32(1));
        assert_eq!(converter.to_domain(&Value::I32(1)).unwrap(), wholesale);
        assert!(converter.to_domain(&Value::I32(7)).is_err());
    }

    #[test]
    fn enum_name() {
        let converter = BasicValueConverter::EnumName(kind());
        let retail = Value::Enum(ValueEnum::from_name(&kind(), "RETAIL").unwrap());

        assert_eq!(
            converter.to_relational(&retail).unwrap(),
            Value::from("RETAIL")
        );
        assert_eq!(converter.to_domain(&Value::from("RETAIL")).unwrap(), retail);
    }

    #[test]
    fn booleans() {
        assert_eq!(
            BasicValueConverter::YesNo
                .to_relational(&Value::Bool(true))
                .unwrap(),
            Value::Char('Y')
        );
        assert_eq!(
            BasicValueConverter::TrueFalse
                .to_domain(&Value::Char('F'))
                .unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            BasicValueConverter::NumericBoolean
                .to_relational(&Value::Bool(true))
                .unwrap(),
            Value::I32(1)
        );
        assert!(BasicValueConverter::YesNo
            .to_relational(&Value::I32(1))
            .unwrap_err()
            .is_type_conversion());
    }

    #[test]
    fn null_passes_through() {
        let converter = BasicValueConverter::EnumName(kind());
        assert_eq!(converter.to_relational(&Value::Null).unwrap(), Value::Null);
        assert_eq!(converter.to_domain(&Value::Null).unwrap(), Value::Null);
    }
}
