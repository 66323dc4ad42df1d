//! Navigable, read-only view over decoded JSON response bodies.
//!
//! Every Confluence response is converted into a [`Bunch`]: objects keep their
//! keys in the order the server sent them, arrays keep their order, and
//! scalars pass through unchanged. Fields are reached with [`Bunch::get`],
//! indexing (`page["version"]["number"]`) or dotted paths
//! (`page.path("version.number")`).

use std::fmt;
use std::ops::Index;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

use crate::error::{Error, Result};

static NULL: Bunch = Bunch::Null;

/// Recursive JSON structure returned by every client operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Bunch {
  #[default]
  Null,
  Bool(bool),
  Number(Number),
  String(String),
  Array(Vec<Bunch>),
  Object(IndexMap<String, Bunch>),
}

impl Bunch {
  /// Look up a key on an object. Returns `None` for non-objects.
  pub fn get(&self, key: &str) -> Option<&Bunch> {
    match self {
      Self::Object(map) => map.get(key),
      _ => None,
    }
  }

  /// Look up a position in an array. Returns `None` for non-arrays.
  pub fn get_index(&self, index: usize) -> Option<&Bunch> {
    match self {
      Self::Array(items) => items.get(index),
      _ => None,
    }
  }

  /// Follow a dotted path such as `version.number` or `results.0.id`.
  ///
  /// Numeric segments index into arrays; all other segments are object keys.
  pub fn path(&self, path: &str) -> Option<&Bunch> {
    path.split('.').try_fold(self, |node, segment| match node {
      Self::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
      _ => node.get(segment),
    })
  }

  /// Like [`Bunch::path`], but a missing (or `null`) field is an error naming
  /// the path.
  pub fn require(&self, path: &str) -> Result<&Bunch> {
    match self.path(path) {
      Some(Self::Null) | None => Err(Error::MissingField(path.to_string())),
      Some(value) => Ok(value),
    }
  }

  /// Required string field.
  pub fn require_str(&self, path: &str) -> Result<&str> {
    self
      .require(path)?
      .as_str()
      .ok_or_else(|| Error::MissingField(path.to_string()))
  }

  /// Required integer field.
  pub fn require_i64(&self, path: &str) -> Result<i64> {
    self
      .require(path)?
      .as_i64()
      .ok_or_else(|| Error::MissingField(path.to_string()))
  }

  /// Required identifier field, accepted either as a string or a number.
  pub fn require_id(&self, path: &str) -> Result<String> {
    self
      .require(path)?
      .as_id()
      .ok_or_else(|| Error::MissingField(path.to_string()))
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Self::String(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_i64(&self) -> Option<i64> {
    match self {
      Self::Number(n) => n.as_i64(),
      _ => None,
    }
  }

  pub fn as_u64(&self) -> Option<u64> {
    match self {
      Self::Number(n) => n.as_u64(),
      _ => None,
    }
  }

  pub fn as_f64(&self) -> Option<f64> {
    match self {
      Self::Number(n) => n.as_f64(),
      _ => None,
    }
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Self::Bool(b) => Some(*b),
      _ => None,
    }
  }

  pub fn as_array(&self) -> Option<&[Bunch]> {
    match self {
      Self::Array(items) => Some(items),
      _ => None,
    }
  }

  pub fn as_object(&self) -> Option<&IndexMap<String, Bunch>> {
    match self {
      Self::Object(map) => Some(map),
      _ => None,
    }
  }

  /// Render an identifier as text. Confluence v2 sends ids as strings, but
  /// callers sometimes build page references with numeric ids.
  pub fn as_id(&self) -> Option<String> {
    match self {
      Self::String(s) => Some(s.clone()),
      Self::Number(n) => Some(n.to_string()),
      _ => None,
    }
  }

  pub fn is_null(&self) -> bool {
    matches!(self, Self::Null)
  }

  /// Object keys in server order. Empty for non-objects.
  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.as_object().into_iter().flat_map(|map| map.keys().map(String::as_str))
  }

  /// Number of elements for arrays and objects, zero for scalars.
  pub fn len(&self) -> usize {
    match self {
      Self::Array(items) => items.len(),
      Self::Object(map) => map.len(),
      _ => 0,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Convert into a typed structure.
  pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T> {
    Ok(serde_json::from_value(self.to_value())?)
  }

  /// Rebuild a plain `serde_json::Value`.
  pub fn to_value(&self) -> Value {
    match self {
      Self::Null => Value::Null,
      Self::Bool(b) => Value::Bool(*b),
      Self::Number(n) => Value::Number(n.clone()),
      Self::String(s) => Value::String(s.clone()),
      Self::Array(items) => Value::Array(items.iter().map(Bunch::to_value).collect()),
      Self::Object(map) => Value::Object(map.iter().map(|(k, v)| (k.clone(), v.to_value())).collect()),
    }
  }
}

impl From<Value> for Bunch {
  fn from(value: Value) -> Self {
    match value {
      Value::Null => Self::Null,
      Value::Bool(b) => Self::Bool(b),
      Value::Number(n) => Self::Number(n),
      Value::String(s) => Self::String(s),
      Value::Array(items) => Self::Array(items.into_iter().map(Bunch::from).collect()),
      Value::Object(map) => Self::Object(map.into_iter().map(|(k, v)| (k, Bunch::from(v))).collect()),
    }
  }
}

impl From<Bunch> for Value {
  fn from(bunch: Bunch) -> Self {
    match bunch {
      Bunch::Null => Value::Null,
      Bunch::Bool(b) => Value::Bool(b),
      Bunch::Number(n) => Value::Number(n),
      Bunch::String(s) => Value::String(s),
      Bunch::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
      Bunch::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()),
    }
  }
}

impl Index<&str> for Bunch {
  type Output = Bunch;

  /// Missing keys yield `Bunch::Null`, mirroring `serde_json::Value`.
  fn index(&self, key: &str) -> &Bunch {
    self.get(key).unwrap_or(&NULL)
  }
}

impl Index<usize> for Bunch {
  type Output = Bunch;

  fn index(&self, index: usize) -> &Bunch {
    self.get_index(index).unwrap_or(&NULL)
  }
}

impl Serialize for Bunch {
  fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    match self {
      Self::Null => serializer.serialize_unit(),
      Self::Bool(b) => serializer.serialize_bool(*b),
      Self::Number(n) => n.serialize(serializer),
      Self::String(s) => serializer.serialize_str(s),
      Self::Array(items) => items.serialize(serializer),
      Self::Object(map) => map.serialize(serializer),
    }
  }
}

impl<'de> Deserialize<'de> for Bunch {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
    Value::deserialize(deserializer).map(Bunch::from)
  }
}

impl fmt::Display for Bunch {
  /// Compact JSON rendering.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let rendered = serde_json::to_string(self).map_err(|_| fmt::Error)?;
    f.write_str(&rendered)
  }
}
