use super::*;
use crate::{Error, Result};

use std::fmt;

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Null value
    #[default]
    Null,

    /// Boolean value
    Bool(bool),

    /// Signed 8-bit integer
    I8(i8),

    /// Signed 16-bit integer
    I16(i16),

    /// Signed 32-bit integer
    I32(i32),

    /// Signed 64-bit integer
    I64(i64),

    /// A single character
    Char(char),

    /// String value
    String(String),

    /// Opaque bytes
    Bytes(Vec<u8>),

    /// A constant of an enumerated type
    Enum(ValueEnum),

    /// Record value: entity state or embeddable value
    Record(ValueRecord),

    /// A list of values of the same type
    List(Vec<Value>),

    /// An uninitialized lazy entity reference
    Proxy(EntityProxy),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    pub const fn is_proxy(&self) -> bool {
        matches!(self, Self::Proxy(_))
    }

    pub fn record_from_vec(fields: Vec<Self>) -> Self {
        ValueRecord::from_vec(fields).into()
    }

    pub fn list_from_vec(items: Vec<Self>) -> Self {
        Self::List(items)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(&**v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&ValueRecord> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut ValueRecord> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_proxy(&self) -> Option<&EntityProxy> {
        match self {
            Self::Proxy(proxy) => Some(proxy),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_record(&self) -> &ValueRecord {
        match self {
            Self::Record(record) => record,
            _ => panic!("expected record; actual={self:#?}"),
        }
    }

    pub fn into_record(self) -> Result<ValueRecord> {
        match self {
            Self::Record(record) => Ok(record),
            other => Err(Error::type_conversion(other, "Record")),
        }
    }

    /// Returns the value as an `i64` if it is any integer variant.
    pub fn to_i64(&self) -> Option<i64> {
        match *self {
            Self::I8(v) => Some(v.into()),
            Self::I16(v) => Some(v.into()),
            Self::I32(v) => Some(v.into()),
            Self::I64(v) => Some(v),
            _ => None,
        }
    }

    /// Builds an integer value of type `ty` from an `i64`.
    pub fn from_i64(ty: &Type, v: i64) -> Result<Self> {
        Ok(match ty {
            Type::I8 => Self::I8(v.try_into()?),
            Type::I16 => Self::I16(v.try_into()?),
            Type::I32 => Self::I32(v.try_into()?),
            Type::I64 => Self::I64(v),
            _ => return Err(Error::type_conversion(Self::I64(v), ty.name())),
        })
    }

    /// Returns `true` if the value, or any value nested in it, is null.
    pub fn has_null(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Record(record) => record.iter().any(Value::has_null),
            _ => false,
        }
    }

    /// Appends the scalar leaves of the value to `out`, depth first. Records
    /// are flattened, everything else is a leaf.
    pub fn flatten_into<'a>(&'a self, out: &mut Vec<&'a Value>) {
        match self {
            Self::Record(record) => {
                for field in record {
                    field.flatten_into(out);
                }
            }
            leaf => out.push(leaf),
        }
    }

    pub fn is_a(&self, ty: &Type) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(_) => ty.is_bool(),
            Self::I8(_) => matches!(ty, Type::I8),
            Self::I16(_) => matches!(ty, Type::I16),
            Self::I32(_) => matches!(ty, Type::I32),
            Self::I64(_) => matches!(ty, Type::I64),
            Self::Char(_) => ty.is_char(),
            Self::String(_) => ty.is_string(),
            Self::Bytes(_) => matches!(ty, Type::Bytes),
            Self::Enum(value) => match ty {
                Type::Enum(ty) => {
                    ty.name == value.ty && ty.variant(value.ordinal) == Some(&value.name[..])
                }
                _ => false,
            },
            Self::Record(value) => match ty {
                Type::Record(fields) if value.len() == fields.len() => value
                    .iter()
                    .zip(fields.iter())
                    .all(|(value, ty)| value.is_a(ty)),
                Type::Entity(_) | Type::Embeddable(_) => true,
                _ => false,
            },
            Self::List(items) => match ty {
                Type::List(ty) => items.iter().all(|item| item.is_a(ty)),
                _ => false,
            },
            Self::Proxy(proxy) => match ty {
                Type::Entity(name) => *name == proxy.entity,
                _ => false,
            },
        }
    }

    /// The type of the value, as far as it can be told from the value alone.
    pub fn infer_ty(&self) -> Type {
        match self {
            Self::Null => Type::Null,
            Self::Bool(_) => Type::Bool,
            Self::I8(_) => Type::I8,
            Self::I16(_) => Type::I16,
            Self::I32(_) => Type::I32,
            Self::I64(_) => Type::I64,
            Self::Char(_) => Type::Char,
            Self::String(_) => Type::String,
            Self::Bytes(_) => Type::Bytes,
            Self::Enum(value) => Type::Enum(TypeEnum {
                name: value.ty.clone(),
                variants: vec![],
            }),
            Self::Record(record) => Type::Record(record.iter().map(Value::infer_ty).collect()),
            Self::List(items) => {
                Type::list(items.first().map(Value::infer_ty).unwrap_or(Type::Null))
            }

            Self::Proxy(proxy) => Type::Entity(proxy.entity.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::I8(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{v:?}"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            Self::Enum(v) => write!(f, "{}::{}", v.ty, v.name),
            Self::Record(record) => {
                f.write_str("(")?;
                for (i, field) in record.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{field}")?;
                }
                f.write_str(")")
            }
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Proxy(proxy) => write!(f, "{}#{}", proxy.entity, proxy.id),
        }
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<i8> for Value {
    fn from(src: i8) -> Self {
        Self::I8(src)
    }
}

impl From<i16> for Value {
    fn from(src: i16) -> Self {
        Self::I16(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Self {
        Self::I32(src)
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::I64(src)
    }
}

impl From<char> for Value {
    fn from(src: char) -> Self {
        Self::Char(src)
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<ValueEnum> for Value {
    fn from(src: ValueEnum) -> Self {
        Self::Enum(src)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(src: Option<T>) -> Self {
        match src {
            Some(value) => value.into(),
            None => Self::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_nested_records() {
        let value = Value::record_from_vec(vec![
            Value::from("Steve"),
            Value::record_from_vec(vec![Value::from(1_i32), Value::from(2_i32)]),
            Value::Null,
        ]);

        let mut leaves = vec![];
        value.flatten_into(&mut leaves);
        assert_eq!(
            leaves,
            [
                &Value::from("Steve"),
                &Value::I32(1),
                &Value::I32(2),
                &Value::Null
            ]
        );
    }

    #[test]
    fn integers_round_trip_through_i64() {
        assert_eq!(Value::I16(7).to_i64(), Some(7));
        assert_eq!(Value::from_i64(&Type::I16, 7).unwrap(), Value::I16(7));
        assert!(Value::from_i64(&Type::I8, 1000).is_err());
        assert!(Value::from_i64(&Type::String, 1).is_err());
    }

    #[test]
    fn enum_values_check_their_type() {
        let ty = TypeEnum::new("Kind", ["RETAIL", "WHOLESALE"]);
        let value = Value::from(ValueEnum::from_name(&ty, "WHOLESALE").unwrap());
        assert!(value.is_a(&Type::Enum(ty.clone())));
        assert!(!Value::from(ValueEnum {
            ty: "Kind".into(),
            ordinal: 0,
            name: "WHOLESALE".into(),
        })
        .is_a(&Type::Enum(ty)));
    }

    #[test]
    fn display() {
        let value = Value::record_from_vec(vec![Value::from("a"), Value::I64(3), Value::Null]);
        assert_eq!(value.to_string(), "(\"a\", 3, null)");
        assert_eq!(
            Value::from(EntityProxy::new("Customer", 7_i64)).to_string(),
            "Customer#7"
        );
    }
}
