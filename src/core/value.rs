use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use uuid::Uuid;

use crate::core::{Result, SchemaError};

/// A single cell value held by a row.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Single(f32),
    Double(f64),
    Decimal(Decimal),
    Text(String),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    Guid(Uuid),
    Bytes(Vec<u8>),
}

impl Value {
    pub fn compare(&self, other: &Value) -> Result<Ordering> {
        match (self, other) {
            // NULL sorts before everything
            (Value::Null, Value::Null) => Ok(Ordering::Equal),
            (Value::Null, _) => Ok(Ordering::Less),
            (_, Value::Null) => Ok(Ordering::Greater),

            (Value::Boolean(a), Value::Boolean(b)) => Ok(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Ok(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Ok(a.cmp(b)),
            (Value::Time(a), Value::Time(b)) => Ok(a.cmp(b)),
            (Value::Guid(a), Value::Guid(b)) => Ok(a.cmp(b)),
            (Value::Bytes(a), Value::Bytes(b)) => Ok(a.cmp(b)),
            (Value::Decimal(a), Value::Decimal(b)) => Ok(a.cmp(b)),

            // Integers of any width compare exactly
            (a, b) if a.is_integer() && b.is_integer() => {
                Ok(a.as_i64().cmp(&b.as_i64()))
            }

            // Remaining numeric mixes go through f64
            (a, b) if a.is_numeric() && b.is_numeric() => {
                match (a.as_f64(), b.as_f64()) {
                    (Some(x), Some(y)) => match (x.is_nan(), y.is_nan()) {
                        (true, true) => Ok(Ordering::Equal),
                        (true, false) => Ok(Ordering::Greater),
                        (false, true) => Ok(Ordering::Less),
                        (false, false) => Ok(x.partial_cmp(&y).unwrap_or(Ordering::Equal)),
                    },
                    _ => Err(self.incompatible(other)),
                }
            }

            _ => Err(self.incompatible(other)),
        }
    }

    fn incompatible(&self, other: &Value) -> SchemaError {
        SchemaError::TypeMismatch(format!(
            "Cannot compare incompatible types: {} and {}",
            self.type_name(),
            other.type_name()
        ))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Boolean(_) => "BOOLEAN",
            Self::Int16(_) => "INT16",
            Self::Int32(_) => "INT32",
            Self::Int64(_) => "INT64",
            Self::Single(_) => "SINGLE",
            Self::Double(_) => "DOUBLE",
            Self::Decimal(_) => "DECIMAL",
            Self::Text(_) => "TEXT",
            Self::DateTime(_) => "DATETIME",
            Self::Time(_) => "TIME",
            Self::Guid(_) => "GUID",
            Self::Bytes(_) => "BYTES",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int16(i) => Some(*i as i64),
            Self::Int32(i) => Some(*i as i64),
            Self::Int64(i) => Some(*i),
            Self::Boolean(b) => Some(*b as i64),
            Self::Decimal(d) if d.fract().is_zero() => d.to_i64(),
            Self::Single(f) => float_to_i64(*f as f64),
            Self::Double(f) => float_to_i64(*f),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int16(i) => Some(*i as f64),
            Self::Int32(i) => Some(*i as f64),
            Self::Int64(i) => Some(*i as f64),
            Self::Single(f) => Some(*f as f64),
            Self::Double(f) => Some(*f),
            Self::Decimal(d) => d.to_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Int16(_) | Self::Int32(_) | Self::Int64(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Int16(_)
                | Self::Int32(_)
                | Self::Int64(_)
                | Self::Single(_)
                | Self::Double(_)
                | Self::Decimal(_)
        )
    }
}

fn float_to_i64(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Null, _) | (_, Self::Null) => false,
            (Self::Single(a), Self::Single(b)) if a.is_nan() && b.is_nan() => true,
            (Self::Double(a), Self::Double(b)) if a.is_nan() && b.is_nan() => true,
            _ => matches!(self.compare(other), Ok(Ordering::Equal)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Int16(i) => write!(f, "{}", i),
            Self::Int32(i) => write!(f, "{}", i),
            Self::Int64(i) => write!(f, "{}", i),
            Self::Single(x) => write!(f, "{}", x),
            Self::Double(x) => write!(f, "{}", x),
            Self::Decimal(d) => write!(f, "{}", d),
            Self::Text(s) => write!(f, "{}", s),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            Self::Time(t) => write!(f, "{}", t.format("%H:%M:%S%.f")),
            Self::Guid(g) => write!(f, "{}", g),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Self::Int16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Single(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::DateTime(v)
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Self::Time(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Self::Guid(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
