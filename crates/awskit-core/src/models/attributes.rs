/// DynamoDB attribute mapping
use crate::constants::{TICKS_PER_SECOND, UNIX_EPOCH_TICKS};
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// A DynamoDB item
pub type Item = HashMap<String, AttributeValue>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("expected a JSON object")]
    NotAnObject,

    #[error("field '{field}' has unsupported type {kind}")]
    UnsupportedType { field: String, kind: &'static str },

    #[error("missing field '{0}'")]
    MissingField(String),

    #[error("field '{field}' is not {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },

    #[error("field '{field}' holds an invalid value: {value}")]
    InvalidValue { field: String, value: String },

    #[error("timestamp {0} is outside the tick range")]
    TickOverflow(String),
}

/// A single mapped value
///
/// Text maps to `S`, numbers to `N` (decimal string), booleans to `BOOL` and
/// timestamps to `N` holding a tick count: 100 nanoseconds counted from
/// 0001-01-01T00:00:00Z.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeScalar {
    Text(String),
    Number(String),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

impl TryFrom<AttributeScalar> for AttributeValue {
    type Error = MappingError;

    fn try_from(scalar: AttributeScalar) -> Result<Self, Self::Error> {
        Ok(match scalar {
            AttributeScalar::Text(s) => AttributeValue::S(s),
            AttributeScalar::Number(n) => AttributeValue::N(n),
            AttributeScalar::Bool(b) => AttributeValue::Bool(b),
            AttributeScalar::Timestamp(ts) => {
                let ticks =
                    to_ticks(ts).ok_or_else(|| MappingError::TickOverflow(ts.to_rfc3339()))?;
                AttributeValue::N(ticks.to_string())
            }
        })
    }
}

impl From<String> for AttributeScalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for AttributeScalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<&String> for AttributeScalar {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<bool> for AttributeScalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DateTime<Utc>> for AttributeScalar {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

macro_rules! numeric_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for AttributeScalar {
                fn from(value: $t) -> Self {
                    Self::Number(value.to_string())
                }
            }
        )*
    };
}

numeric_scalar!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, usize, isize, f32, f64);

/// Converts a timestamp to its tick count, `None` when it does not fit in an `i64`
pub fn to_ticks(ts: DateTime<Utc>) -> Option<i64> {
    ts.timestamp()
        .checked_mul(TICKS_PER_SECOND)?
        .checked_add(UNIX_EPOCH_TICKS)?
        .checked_add(i64::from(ts.timestamp_subsec_nanos() / 100))
}

/// Converts a tick count back to a timestamp, `None` when out of range
pub fn from_ticks(ticks: i64) -> Option<DateTime<Utc>> {
    let relative = ticks.checked_sub(UNIX_EPOCH_TICKS)?;
    let secs = relative.div_euclid(TICKS_PER_SECOND);
    let nanos = (relative.rem_euclid(TICKS_PER_SECOND) * 100) as u32;
    DateTime::from_timestamp(secs, nanos)
}

/// Builds an [`Item`] one field at a time
///
/// The first value that cannot be mapped is kept and returned by [`build`](Self::build).
#[derive(Debug, Default, Clone)]
pub struct ItemBuilder {
    item: Item,
    error: Option<MappingError>,
}

impl ItemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: &str, value: impl Into<AttributeScalar>) -> Self {
        if self.error.is_some() {
            return self;
        }
        match AttributeValue::try_from(value.into()) {
            Ok(av) => {
                self.item.insert(name.to_string(), av);
            }
            Err(e) => {
                self.error = Some(MappingError::InvalidValue {
                    field: name.to_string(),
                    value: e.to_string(),
                });
            }
        }
        self
    }

    /// Sets the field only when `value` is `Some`
    pub fn set_opt<V: Into<AttributeScalar>>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(name, v),
            None => self,
        }
    }

    pub fn build(self) -> Result<Item, MappingError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.item),
        }
    }
}

/// A type with an explicit mapping to and from a DynamoDB item
pub trait Record: Sized {
    /// Partition key attribute name
    const PARTITION_KEY: &'static str;
    /// Sort key attribute name, if the table has one
    const SORT_KEY: Option<&'static str> = None;

    fn to_item(&self) -> Result<Item, MappingError>;
    fn from_item(item: &Item) -> Result<Self, MappingError>;

    /// The key attributes of this record
    fn key(&self) -> Result<Item, MappingError> {
        let mut item = self.to_item()?;
        item.retain(|name, _| {
            name == Self::PARTITION_KEY || Some(name.as_str()) == Self::SORT_KEY
        });
        Ok(item)
    }
}

fn field<'a>(item: &'a Item, name: &str) -> Result<&'a AttributeValue, MappingError> {
    item.get(name)
        .ok_or_else(|| MappingError::MissingField(name.to_string()))
}

pub fn get_string(item: &Item, name: &str) -> Result<String, MappingError> {
    field(item, name)?
        .as_s()
        .cloned()
        .map_err(|_| MappingError::TypeMismatch {
            field: name.to_string(),
            expected: "a string",
        })
}

pub fn get_optional_string(item: &Item, name: &str) -> Result<Option<String>, MappingError> {
    match item.get(name) {
        None | Some(AttributeValue::Null(_)) => Ok(None),
        Some(_) => get_string(item, name).map(Some),
    }
}

pub fn get_number<T: FromStr>(item: &Item, name: &str) -> Result<T, MappingError> {
    let raw = field(item, name)?
        .as_n()
        .map_err(|_| MappingError::TypeMismatch {
            field: name.to_string(),
            expected: "a number",
        })?;
    raw.parse::<T>().map_err(|_| MappingError::InvalidValue {
        field: name.to_string(),
        value: raw.clone(),
    })
}

pub fn get_bool(item: &Item, name: &str) -> Result<bool, MappingError> {
    field(item, name)?
        .as_bool()
        .copied()
        .map_err(|_| MappingError::TypeMismatch {
            field: name.to_string(),
            expected: "a boolean",
        })
}

pub fn get_timestamp(item: &Item, name: &str) -> Result<DateTime<Utc>, MappingError> {
    let ticks: i64 = get_number(item, name)?;
    from_ticks(ticks).ok_or_else(|| MappingError::InvalidValue {
        field: name.to_string(),
        value: ticks.to_string(),
    })
}

/// Maps a flat JSON object to an [`Item`].
///
/// Strings, numbers and booleans map to `S`, `N` and `BOOL`. Any other value
/// (null, array, nested object) is rejected; nothing is silently dropped.
pub fn item_from_json(value: &Value) -> Result<Item, MappingError> {
    let object = value.as_object().ok_or(MappingError::NotAnObject)?;

    object
        .iter()
        .map(|(name, v)| {
            let scalar = match v {
                Value::String(s) => AttributeScalar::Text(s.clone()),
                Value::Number(n) => AttributeScalar::Number(n.to_string()),
                Value::Bool(b) => AttributeScalar::Bool(*b),
                other => {
                    return Err(MappingError::UnsupportedType {
                        field: name.clone(),
                        kind: json_kind(other),
                    });
                }
            };
            Ok((name.clone(), AttributeValue::try_from(scalar)?))
        })
        .collect()
}

/// Maps an [`Item`] back to JSON, for handlers that return raw items
pub fn item_to_json(item: &Item) -> Value {
    Value::Object(
        item.iter()
            .map(|(k, v)| (k.clone(), attribute_value_to_json(v)))
            .collect(),
    )
}

/// Converts a single attribute to JSON; set and binary attributes become `null`
pub fn attribute_value_to_json(av: &AttributeValue) -> Value {
    match av {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => {
            if let Ok(i) = n.parse::<i64>() {
                Value::Number(i.into())
            } else if let Some(f) = n.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
                Value::Number(f)
            } else {
                Value::String(n.clone())
            }
        }
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::M(m) => Value::Object(
            m.iter()
                .map(|(k, v)| (k.clone(), attribute_value_to_json(v)))
                .collect(),
        ),
        AttributeValue::L(l) => Value::Array(l.iter().map(attribute_value_to_json).collect()),
        _ => Value::Null,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
