//! Scalar values bound to generated statements.

use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

/// A scalar value carried by filter specs, partial-update specs and
/// [`GeneratedQuery`](super::GeneratedQuery) parameter lists.
///
/// Unlike a boxed `dyn ToSql`, values can be compared and printed, which
/// keeps the builders testable without a database.
///
/// When bound, integers narrow to `int2`/`int4` or widen to `float4`/`float8`
/// to match the parameter type the server inferred. A value that does not
/// fit fails the bind instead of being truncated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }
}

fn bind<T: ToSql>(
    value: &T,
    kind: &'static str,
    ty: &Type,
    out: &mut BytesMut,
) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
    if !T::accepts(ty) {
        return Err(format!("cannot bind a {kind} value to a parameter of type {ty}").into());
    }
    value.to_sql(ty, out)
}

impl ToSql for SqlValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        let kind = self.kind();
        match self {
            Self::Null => Ok(IsNull::Yes),
            Self::Bool(v) => bind(v, kind, ty, out),
            Self::Int(v) => {
                if *ty == Type::INT2 {
                    bind(&i16::try_from(*v)?, kind, ty, out)
                } else if *ty == Type::INT4 {
                    bind(&i32::try_from(*v)?, kind, ty, out)
                } else if *ty == Type::FLOAT4 {
                    bind(&(*v as f32), kind, ty, out)
                } else if *ty == Type::FLOAT8 {
                    bind(&(*v as f64), kind, ty, out)
                } else {
                    bind(v, kind, ty, out)
                }
            }
            Self::Float(v) => {
                if *ty == Type::FLOAT4 {
                    bind(&(*v as f32), kind, ty, out)
                } else {
                    bind(v, kind, ty, out)
                }
            }
            Self::Text(v) => bind(v, kind, ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        <bool as ToSql>::accepts(ty)
            || <i16 as ToSql>::accepts(ty)
            || <i32 as ToSql>::accepts(ty)
            || <i64 as ToSql>::accepts(ty)
            || <f32 as ToSql>::accepts(ty)
            || <f64 as ToSql>::accepts(ty)
            || <String as ToSql>::accepts(ty)
    }

    to_sql_checked!();
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i16> for SqlValue {
    fn from(v: i16) -> Self {
        Self::Int(v.into())
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for SqlValue {
    fn from(v: f32) -> Self {
        Self::Float(v.into())
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
