use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::url::UrlBuf;

pub type Dict<K = Arc<str>, V = Value> = BTreeMap<K, V>;

/// Represents any valid site data or metadata value.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Arc<str>),
    Array(Arc<Vec<Value>>),
    Dict(Arc<Dict>),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(&**s),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(v) => Some(&**v),
            _ => None,
        }
    }

    pub fn into_str(self) -> Result<Arc<str>, Value> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(self),
        }
    }

    pub fn into_vec(self) -> Result<Arc<Vec<Value>>, Value> {
        match self {
            Value::Array(v) => Ok(v),
            _ => Err(self),
        }
    }

    pub fn into_dict(self) -> Result<Arc<Dict>, Value> {
        match self {
            Value::Dict(v) => Ok(v),
            _ => Err(self),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Dict(_) => "dict",
        }
    }
}

macro_rules! impl_from_primitive {
    ($($T:ty),+ => $kind:ident) => ($(
        impl From<$T> for Value {
            fn from(value: $T) -> Self {
                Value::$kind(value.into())
            }
        }
    )+)
}

impl_from_primitive!(bool => Bool);
impl_from_primitive!(i8, i16, i32, i64, u8, u16, u32 => Int);
impl_from_primitive!(f32, f64 => Float);
impl_from_primitive!(&str, String, Arc<str>, Cow<'_, str> => String);
impl_from_primitive!(Arc<Vec<Value>> => Array);
impl_from_primitive!(Arc<Dict> => Dict);

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Int(value as i64)
    }
}

impl From<UrlBuf> for Value {
    fn from(value: UrlBuf) -> Self {
        Value::String(value.into())
    }
}

impl<T> From<Option<T>> for Value where Value: From<T> {
    fn from(value: Option<T>) -> Self {
        value.map(Value::from).unwrap_or(Value::Null)
    }
}

impl<T> From<Vec<T>> for Value where Value: From<T> {
    fn from(value: Vec<T>) -> Self {
        value.into_iter()
            .map(Value::from)
            .collect()
    }
}

impl<K, V> From<Dict<K, V>> for Value where Arc<str>: From<K>, Value: From<V> {
    fn from(value: Dict<K, V>) -> Self {
        let dict = value.into_iter()
            .map(|(k, v)| (<Arc<str>>::from(k), Value::from(v)))
            .collect::<Dict>();

        Value::Dict(Arc::new(dict))
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        let vec = iter.into_iter().collect::<Vec<Value>>();
        Value::Array(Arc::new(vec))
    }
}

macro_rules! impl_try_from_value {
    ($($T:ty),+ => |$v:ident| $e:expr) => ($(
        impl TryFrom<Value> for $T {
            type Error = Value;

            fn try_from($v: Value) -> Result<Self, Self::Error> {
                (|| $e)()
            }
        }
    )+)
}

impl_try_from_value!(bool => |v| v.as_bool().ok_or(v));
impl_try_from_value!(i64 => |v| v.as_int().ok_or(v));
impl_try_from_value!(Arc<str> => |v| v.into_str());
impl_try_from_value!(String => |v| v.into_str().map(|s| s.to_string()));
impl_try_from_value!(Arc<Dict> => |v| v.into_dict());
impl_try_from_value!(Arc<Vec<Value>> => |v| v.into_vec());

impl_try_from_value!(usize => |v| {
    v.as_int().and_then(|i| usize::try_from(i).ok()).ok_or(v)
});

impl<T: TryFrom<Value, Error = Value>> TryFrom<Value> for Vec<T> {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let arc = value.into_vec()?;
        match Arc::try_unwrap(arc) {
            Ok(vec) => vec.into_iter().map(|v| v.try_into()).collect(),
            Err(arc) => arc.iter().cloned().map(|v| v.try_into()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict;

    #[test]
    fn untagged_deserialization_from_toml() {
        let value: Value = toml::from_str(r#"
            path = "/learn/program"
            to = "/program/"
            weight = 3
            draft = false
        "#).unwrap();

        let dict = value.as_dict().unwrap();
        assert_eq!(dict.get("path").and_then(Value::as_str), Some("/learn/program"));
        assert_eq!(dict.get("weight").and_then(Value::as_int), Some(3));
        assert_eq!(dict.get("draft").and_then(Value::as_bool), Some(false));
    }

    #[test]
    fn untagged_deserialization_from_json() {
        let value: Value = serde_json::from_str(r#"[{"path": "/a/"}, {"path": "/b/"}]"#).unwrap();
        let slice = value.as_slice().unwrap();
        assert_eq!(slice.len(), 2);
        assert_eq!(slice[1].as_dict().unwrap().get("path").and_then(Value::as_str), Some("/b/"));
    }

    #[test]
    fn dict_macro_converts_keys_and_values() {
        let dict: Dict = dict!["name" => "value", "n" => 7];
        assert_eq!(dict.get("name").and_then(Value::as_str), Some("value"));
        assert_eq!(dict.get("n").and_then(Value::as_int), Some(7));
    }

    #[test]
    fn typed_conversion_round_trip() {
        let value = Value::from("hello");
        let string: Arc<str> = value.try_into().unwrap();
        assert_eq!(&*string, "hello");

        let value = Value::from(vec![Value::from(1), Value::from(2)]);
        let ints: Vec<i64> = value.try_into().unwrap();
        assert_eq!(ints, vec![1, 2]);
    }
}
