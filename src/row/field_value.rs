use std::cmp::Ordering;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::{DataReader, FormatProvider, Row};
use crate::core::{FieldFlags, FieldType, Result, SchemaError, Value};
use crate::schema::Field;

lazy_static::lazy_static! {
    static ref INVARIANT: FormatProvider = FormatProvider::invariant();
}

static NULL: Value = Value::Null;

/// Token kind of a JSON value, named the way row deserialization reports it.
pub fn token_kind(token: &JsonValue) -> &'static str {
    match token {
        JsonValue::Null => "Null",
        JsonValue::Bool(_) => "Boolean",
        JsonValue::Number(n) if n.is_f64() => "Float",
        JsonValue::Number(_) => "Integer",
        JsonValue::String(_) => "String",
        JsonValue::Array(_) => "StartArray",
        JsonValue::Object(_) => "StartObject",
    }
}

pub(crate) fn unexpected_token(token: &JsonValue) -> SchemaError {
    SchemaError::Deserialization(token_kind(token).to_string())
}

impl Field {
    /// Current value of this field in `row`; `Null` for an unregistered field.
    pub fn as_object<'r>(&self, row: &'r Row) -> &'r Value {
        self.index().and_then(|i| row.get(i)).unwrap_or(&NULL)
    }

    /// Convert `value` to this field's kind and write it, marking the field
    /// assigned. String values are trimmed according to the field flags.
    pub fn set_object(&self, row: &mut Row, value: impl Into<Value>) -> Result<()> {
        let index = self.require_index()?;
        let value = self.convert_value(&value.into(), &INVARIANT)?;
        row.store(index, self.apply_trim(value))
    }

    pub fn is_null(&self, row: &Row) -> bool {
        self.as_object(row).is_null()
    }

    /// Rust type a value of this field materializes as.
    pub fn value_type(&self) -> &'static str {
        self.field_type().value_type()
    }

    /// Writes the default value into a freshly created row.
    pub fn on_row_initialization(&self, row: &mut Row) -> Result<()> {
        if self.default_value().is_null() {
            return Ok(());
        }
        let index = self.require_index()?;
        let value = self.convert_value(self.default_value(), &INVARIANT)?;
        row.store(index, value)
    }

    pub fn copy(&self, source: &Row, target: &mut Row) -> Result<()> {
        let index = self.require_index()?;
        let value = source.get(index).cloned().ok_or_else(|| {
            SchemaError::TypeMismatch(format!(
                "source row has no slot for field '{}'",
                self.name()
            ))
        })?;
        target.store(index, value)
    }

    /// Like [`copy`](Self::copy), but the target is left unassigned.
    pub fn copy_no_assignment(&self, source: &Row, target: &mut Row) -> Result<()> {
        self.copy(source, target)?;
        target.clear_assignment(self.require_index()?);
        Ok(())
    }

    /// Read `column` of the reader's current record into this field.
    pub fn get_from_reader(
        &self,
        reader: &dyn DataReader,
        column: usize,
        row: &mut Row,
    ) -> Result<()> {
        let index = self.require_index()?;
        let value = if reader.is_null(column)? {
            Value::Null
        } else {
            self.convert_value(&reader.get_value(column)?, &INVARIANT)?
        };
        row.store(index, value)
    }

    /// Order two rows by this field's value, nulls first.
    pub fn index_compare(&self, row1: &Row, row2: &Row) -> Ordering {
        // Stored values always have this field's kind, so they compare.
        self.as_object(row1)
            .compare(self.as_object(row2))
            .unwrap_or(Ordering::Equal)
    }

    pub fn value_to_json(&self, row: &Row) -> JsonValue {
        match self.as_object(row) {
            Value::Null => JsonValue::Null,
            Value::Boolean(b) => JsonValue::Bool(*b),
            Value::Int16(i) => JsonValue::from(*i),
            Value::Int32(i) => JsonValue::from(*i),
            Value::Int64(i) => JsonValue::from(*i),
            Value::Single(f) => float_to_json(*f as f64),
            Value::Double(f) => float_to_json(*f),
            // JSON numbers go through f64 on read, which drops decimal digits.
            Value::Decimal(d) => JsonValue::String(d.normalize().to_string()),
            Value::Text(s) => JsonValue::String(s.clone()),
            other @ (Value::DateTime(_) | Value::Time(_) | Value::Guid(_)) => {
                JsonValue::String(other.to_string())
            }
            Value::Bytes(b) => JsonValue::String(BASE64.encode(b)),
        }
    }

    /// Read this field's value from a JSON token.
    ///
    /// Arrays and objects are never valid. Strings are parsed into the
    /// field's kind; numbers and booleans are accepted where the kind can
    /// hold them.
    pub fn value_from_json(&self, token: &JsonValue, row: &mut Row) -> Result<()> {
        let index = self.require_index()?;
        let kind = self.field_type();

        let value = match token {
            JsonValue::Null => Value::Null,
            JsonValue::Array(_) | JsonValue::Object(_) => return Err(unexpected_token(token)),
            JsonValue::String(s) => match kind {
                FieldType::String => Value::Text(s.clone()),
                FieldType::Stream => Value::Bytes(
                    BASE64
                        .decode(s)
                        .map_err(|e| SchemaError::Conversion(e.to_string()))?,
                ),
                _ => self.convert_value(&Value::Text(s.clone()), &INVARIANT)?,
            },
            JsonValue::Bool(b) => match kind {
                FieldType::Boolean => Value::Boolean(*b),
                FieldType::String => Value::Text(b.to_string()),
                _ => return Err(unexpected_token(token)),
            },
            JsonValue::Number(n) => match kind {
                FieldType::String => Value::Text(n.to_string()),
                FieldType::Decimal => Value::Decimal(
                    Decimal::from_str(&n.to_string())
                        .or_else(|_| Decimal::from_scientific(&n.to_string()))
                        .map_err(|e| SchemaError::Conversion(e.to_string()))?,
                ),
                FieldType::Boolean => match n.as_i64() {
                    Some(i) => Value::Boolean(i != 0),
                    None => return Err(unexpected_token(token)),
                },
                k if k.is_numeric() => {
                    let raw = match n.as_i64() {
                        Some(i) => Value::Int64(i),
                        None => Value::Double(n.as_f64().unwrap_or(f64::NAN)),
                    };
                    self.convert_value(&raw, &INVARIANT)?
                }
                _ => return Err(unexpected_token(token)),
            },
        };

        row.store(index, self.apply_trim(value))
    }

    /// Convert any value to this field's kind, parsing text with `provider`.
    pub fn convert_value(&self, source: &Value, provider: &FormatProvider) -> Result<Value> {
        if source.is_null() {
            return Ok(Value::Null);
        }

        let kind = self.field_type();
        match kind {
            FieldType::Boolean => to_bool(source).map(Value::Boolean),
            FieldType::Int16 => {
                let n = to_i64(source, provider)?;
                i16::try_from(n).map(Value::Int16).map_err(|_| overflow(n, kind))
            }
            FieldType::Int32 => {
                let n = to_i64(source, provider)?;
                i32::try_from(n).map(Value::Int32).map_err(|_| overflow(n, kind))
            }
            FieldType::Int64 => to_i64(source, provider).map(Value::Int64),
            FieldType::Single => to_f64(source, provider).map(|f| Value::Single(f as f32)),
            FieldType::Double => to_f64(source, provider).map(Value::Double),
            FieldType::Decimal => to_decimal(source, provider).map(Value::Decimal),
            FieldType::String => match source {
                Value::Text(s) => Ok(Value::Text(s.clone())),
                Value::Bytes(_) => Err(cannot_convert(source, kind)),
                other => Ok(Value::Text(other.to_string())),
            },
            FieldType::DateTime => to_date_time(source, provider).map(Value::DateTime),
            FieldType::Time => to_time(source, provider).map(Value::Time),
            FieldType::Guid => match source {
                Value::Guid(g) => Ok(Value::Guid(*g)),
                Value::Text(s) => Uuid::parse_str(s.trim())
                    .map(Value::Guid)
                    .map_err(|e| SchemaError::Conversion(e.to_string())),
                Value::Bytes(b) => Uuid::from_slice(b)
                    .map(Value::Guid)
                    .map_err(|e| SchemaError::Conversion(e.to_string())),
                _ => Err(cannot_convert(source, kind)),
            },
            FieldType::Stream => match source {
                Value::Bytes(b) => Ok(Value::Bytes(b.clone())),
                Value::Text(s) => BASE64
                    .decode(s.trim())
                    .map(Value::Bytes)
                    .map_err(|e| SchemaError::Conversion(e.to_string())),
                Value::Guid(g) => Ok(Value::Bytes(g.as_bytes().to_vec())),
                _ => Err(cannot_convert(source, kind)),
            },
        }
    }

    /// Check `NOT_NULL` and, for strings with a size, the maximum length.
    pub fn validate(&self, row: &Row) -> Result<()> {
        let value = self.as_object(row);
        if value.is_null() {
            if self.flags().contains(FieldFlags::NOT_NULL) {
                return Err(SchemaError::Validation(format!(
                    "Field '{}' cannot be NULL",
                    self.name()
                )));
            }
            return Ok(());
        }

        if let Value::Text(s) = value {
            let len = s.chars().count();
            if self.size() > 0 && len > self.size() {
                return Err(SchemaError::Validation(format!(
                    "Field '{}' is {} characters long, maximum is {}",
                    self.name(),
                    len,
                    self.size()
                )));
            }
        }

        Ok(())
    }

    fn apply_trim(&self, value: Value) -> Value {
        if self.field_type() != FieldType::String {
            return value;
        }

        let flags = self.flags();
        if flags.contains(FieldFlags::TRIM_TO_EMPTY) {
            return match value {
                Value::Null => Value::Text(String::new()),
                Value::Text(s) => Value::Text(s.trim().to_string()),
                other => other,
            };
        }

        if flags.contains(FieldFlags::TRIM) {
            if let Value::Text(s) = &value {
                let trimmed = s.trim();
                return if trimmed.is_empty() {
                    Value::Null
                } else {
                    Value::Text(trimmed.to_string())
                };
            }
        }

        value
    }
}

fn float_to_json(f: f64) -> JsonValue {
    serde_json::Number::from_f64(f)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

fn cannot_convert(source: &Value, kind: FieldType) -> SchemaError {
    SchemaError::Conversion(format!(
        "cannot convert {} to {}",
        source.type_name(),
        kind
    ))
}

fn overflow(n: i64, kind: FieldType) -> SchemaError {
    SchemaError::Conversion(format!("{} is out of range for {}", n, kind))
}

fn to_bool(source: &Value) -> Result<bool> {
    match source {
        Value::Boolean(b) => Ok(*b),
        Value::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(cannot_convert(source, FieldType::Boolean)),
        },
        other => other
            .as_i64()
            .map(|i| i != 0)
            .ok_or_else(|| cannot_convert(source, FieldType::Boolean)),
    }
}

fn to_i64(source: &Value, provider: &FormatProvider) -> Result<i64> {
    match source {
        Value::Text(s) => {
            let normalized = provider.normalize_number(s);
            normalized
                .parse::<i64>()
                .ok()
                .or_else(|| {
                    Decimal::from_str(&normalized)
                        .ok()
                        .and_then(|d| Value::Decimal(d).as_i64())
                })
                .ok_or_else(|| SchemaError::Conversion(format!("'{}' is not an integer", s)))
        }
        other => other
            .as_i64()
            .ok_or_else(|| cannot_convert(source, FieldType::Int64)),
    }
}

fn to_f64(source: &Value, provider: &FormatProvider) -> Result<f64> {
    match source {
        Value::Text(s) => provider
            .normalize_number(s)
            .parse::<f64>()
            .map_err(|_| SchemaError::Conversion(format!("'{}' is not a number", s))),
        Value::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
        other => other
            .as_f64()
            .ok_or_else(|| cannot_convert(source, FieldType::Double)),
    }
}

fn to_decimal(source: &Value, provider: &FormatProvider) -> Result<Decimal> {
    match source {
        Value::Decimal(d) => Ok(*d),
        Value::Text(s) => {
            let normalized = provider.normalize_number(s);
            Decimal::from_str(&normalized)
                .or_else(|_| Decimal::from_scientific(&normalized))
                .map_err(|_| SchemaError::Conversion(format!("'{}' is not a decimal", s)))
        }
        Value::Single(f) => Decimal::try_from(*f)
            .map_err(|e| SchemaError::Conversion(e.to_string())),
        Value::Double(f) => Decimal::try_from(*f)
            .map_err(|e| SchemaError::Conversion(e.to_string())),
        other => other
            .as_i64()
            .map(Decimal::from)
            .ok_or_else(|| cannot_convert(source, FieldType::Decimal)),
    }
}

fn to_date_time(source: &Value, provider: &FormatProvider) -> Result<NaiveDateTime> {
    match source {
        Value::DateTime(dt) => Ok(*dt),
        Value::Text(s) => {
            let s = s.trim();
            for format in &provider.date_time_formats {
                if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                    return Ok(dt);
                }
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Ok(dt.naive_utc());
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .ok_or_else(|| SchemaError::Conversion(format!("'{}' is not a date", s)))
        }
        _ => Err(cannot_convert(source, FieldType::DateTime)),
    }
}

fn to_time(source: &Value, provider: &FormatProvider) -> Result<NaiveTime> {
    match source {
        Value::Time(t) => Ok(*t),
        Value::DateTime(dt) => Ok(dt.time()),
        Value::Text(s) => {
            let s = s.trim();
            provider
                .time_formats
                .iter()
                .find_map(|format| NaiveTime::parse_from_str(s, format).ok())
                .ok_or_else(|| SchemaError::Conversion(format!("'{}' is not a time", s)))
        }
        other => other
            .as_i64()
            .and_then(|secs| u32::try_from(secs).ok())
            .and_then(|secs| NaiveTime::from_num_seconds_from_midnight_opt(secs, 0))
            .ok_or_else(|| cannot_convert(source, FieldType::Time)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RowFields;

    fn schema(kind: FieldType, flags: FieldFlags) -> RowFields {
        let mut fields = RowFields::new("TestRow", "Tests");
        fields.add(Field::new(kind, "Value").with_flags(flags)).unwrap();
        fields
    }

    #[test]
    fn test_int_narrowing_overflow() {
        let fields = schema(FieldType::Int16, FieldFlags::DEFAULT);
        let field = fields.by_name("Value").unwrap();
        let err = field
            .convert_value(&Value::Int64(70_000), &INVARIANT)
            .unwrap_err();
        assert!(matches!(err, SchemaError::Conversion(_)));
    }

    #[test]
    fn test_culture_decimal() {
        let fields = schema(FieldType::Decimal, FieldFlags::DEFAULT);
        let field = fields.by_name("Value").unwrap();
        let provider = FormatProvider::invariant()
            .decimal_separator(',')
            .group_separator('.');

        let value = field
            .convert_value(&Value::Text("1.234,50".into()), &provider)
            .unwrap();
        assert_eq!(value, Value::Decimal(Decimal::new(123450, 2)));
    }

    #[test]
    fn test_trim_to_null() {
        let fields = schema(FieldType::String, FieldFlags::DEFAULT);
        let field = fields.by_name("Value").unwrap();
        let mut row = fields.new_row().unwrap();

        field.set_object(&mut row, "   ").unwrap();
        assert!(field.is_null(&row));

        field.set_object(&mut row, "  x ").unwrap();
        assert_eq!(field.as_object(&row), &Value::Text("x".into()));
    }

    #[test]
    fn test_trim_to_empty() {
        let fields = schema(FieldType::String, FieldFlags::DEFAULT | FieldFlags::TRIM_TO_EMPTY);
        let field = fields.by_name("Value").unwrap();
        let mut row = fields.new_row().unwrap();

        field.set_object(&mut row, Value::Null).unwrap();
        assert_eq!(field.as_object(&row), &Value::Text(String::new()));
    }

    #[test]
    fn test_token_kinds() {
        assert_eq!(token_kind(&serde_json::json!([1])), "StartArray");
        assert_eq!(token_kind(&serde_json::json!({})), "StartObject");
        assert_eq!(token_kind(&serde_json::json!(1)), "Integer");
        assert_eq!(token_kind(&serde_json::json!(1.5)), "Float");
    }

    #[test]
    fn test_time_from_text() {
        let fields = schema(FieldType::Time, FieldFlags::DEFAULT);
        let field = fields.by_name("Value").unwrap();
        let value = field
            .convert_value(&Value::Text("08:30".into()), &INVARIANT)
            .unwrap();
        assert_eq!(value, Value::Time(NaiveTime::from_hms_opt(8, 30, 0).unwrap()));
    }
}
