//! Order-preserving configuration mapping produced by YAML and JSON reads.
//!
//! # Dual access (for beginners)
//!
//! Pipeline stages read settings like `config.data_ingestion.root_dir`.  In
//! Rust there is no runtime attribute lookup, so [`ConfigBox`] offers two
//! equivalent styles instead:
//!
//! - **Key style**: `cfg["data_ingestion"]` or `cfg.get("data_ingestion")`
//!   returns the raw [`serde_json::Value`].
//! - **Attribute style**: `cfg.path("data_ingestion.root_dir")` walks nested
//!   mappings, and `cfg.get_box("data_ingestion")?` hands back the nested
//!   mapping as its own `ConfigBox`.
//!
//! The typed getters (`get_str`, `get_i64`, …) accept either a plain key or a
//! dotted path and fail with [`UtilsError::TypeMismatch`] when the stored
//! value has a different shape.  When the schema is known up front,
//! [`ConfigBox::to_typed`] deserializes the whole mapping into a struct.
//!
//! A `ConfigBox` is built fresh on every read and the library never mutates
//! it afterwards.

use std::ops::Index;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, UtilsError};

static NULL: Value = Value::Null;

/// A parsed YAML or JSON document whose top level is a mapping.
///
/// # Examples
///
/// ```rust
/// use mlproject_core::ConfigBox;
///
/// let cfg = ConfigBox::from_yaml_str("model:\n  name: elasticnet\n  alpha: 0.2\n").unwrap();
/// assert_eq!(cfg.get_str("model.name").unwrap(), "elasticnet");
/// assert_eq!(cfg["model"]["alpha"], 0.2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigBox {
    entries: Map<String, Value>,
}

impl ConfigBox {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON value.  `null` becomes an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns [`UtilsError::ValueConversion`] if `value` is neither an object
    /// nor `null`.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            Value::Null => Ok(Self::new()),
            other => Err(UtilsError::ValueConversion(format!(
                "expected a mapping at the top level, found {}",
                value_kind(&other)
            ))),
        }
    }

    /// Wraps a YAML value, converting it to the JSON data model.
    ///
    /// Scalar keys (numbers, booleans) become strings.  Sequence or mapping
    /// keys have no JSON equivalent and are rejected, as are `.nan` and
    /// `.inf` scalars.
    ///
    /// # Errors
    ///
    /// Returns [`UtilsError::ValueConversion`] when the value cannot be
    /// represented as a string-keyed mapping of JSON values.
    pub fn from_yaml_value(value: serde_yaml::Value) -> Result<Self> {
        if let Some(at) = non_finite_yaml(&value, "") {
            return Err(UtilsError::ValueConversion(format!(
                "non-finite float at `{at}` has no JSON representation"
            )));
        }
        let json = serde_json::to_value(&value)
            .map_err(|e| UtilsError::ValueConversion(e.to_string()))?;
        Self::from_value(json)
    }

    /// Parses YAML text.  Blank input yields an empty mapping.
    ///
    /// # Errors
    ///
    /// [`UtilsError::ValueConversion`] for non-mapping documents, or
    /// [`UtilsError::Yaml`] (with an empty path) for syntax errors.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Self::parse_yaml(text, Path::new(""))
    }

    /// YAML parse whose syntax errors name `origin`.
    pub(crate) fn parse_yaml(text: &str, origin: &Path) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::new());
        }
        let value: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|source| UtilsError::Yaml {
                path: origin.to_path_buf(),
                source,
            })?;
        Self::from_yaml_value(value)
    }

    /// Parses JSON text.
    ///
    /// # Errors
    ///
    /// [`UtilsError::ValueConversion`] for non-mapping documents, or
    /// [`UtilsError::Json`] (with an empty path) for syntax errors.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::parse_json(text, Path::new(""))
    }

    /// JSON parse whose syntax errors name `origin`.
    pub(crate) fn parse_json(text: &str, origin: &Path) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|source| UtilsError::Json {
            path: origin.to_path_buf(),
            source,
        })?;
        Self::from_value(value)
    }

    // ── Key-style access ─────────────────────────────────────────────────────

    /// Returns the value stored under the top-level `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top-level keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Top-level entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.entries
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.entries)
    }

    // ── Attribute-style access ───────────────────────────────────────────────

    /// Walks a dotted path such as `"training.params.alpha"`.
    ///
    /// Segments index into nested mappings; a numeric segment also indexes
    /// into a list (`"stages.0.name"`).
    pub fn path(&self, dotted: &str) -> Option<&Value> {
        let mut segments = dotted.split('.');
        let mut current = self.entries.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Exact key first, then dotted path.
    fn lookup(&self, key: &str) -> Result<&Value> {
        self.entries
            .get(key)
            .or_else(|| self.path(key))
            .ok_or_else(|| UtilsError::MissingKey(key.to_string()))
    }

    // ── Typed getters ────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// [`UtilsError::MissingKey`] or [`UtilsError::TypeMismatch`].
    pub fn get_str(&self, key: &str) -> Result<&str> {
        let value = self.lookup(key)?;
        value.as_str().ok_or_else(|| mismatch(key, "a string", value))
    }

    /// # Errors
    ///
    /// [`UtilsError::MissingKey`] or [`UtilsError::TypeMismatch`].
    pub fn get_i64(&self, key: &str) -> Result<i64> {
        let value = self.lookup(key)?;
        value.as_i64().ok_or_else(|| mismatch(key, "an integer", value))
    }

    /// Integers are accepted and widened.
    ///
    /// # Errors
    ///
    /// [`UtilsError::MissingKey`] or [`UtilsError::TypeMismatch`].
    pub fn get_f64(&self, key: &str) -> Result<f64> {
        let value = self.lookup(key)?;
        value.as_f64().ok_or_else(|| mismatch(key, "a number", value))
    }

    /// # Errors
    ///
    /// [`UtilsError::MissingKey`] or [`UtilsError::TypeMismatch`].
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        let value = self.lookup(key)?;
        value.as_bool().ok_or_else(|| mismatch(key, "a boolean", value))
    }

    /// # Errors
    ///
    /// [`UtilsError::MissingKey`] or [`UtilsError::TypeMismatch`].
    pub fn get_list(&self, key: &str) -> Result<&[Value]> {
        let value = self.lookup(key)?;
        value
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| mismatch(key, "a list", value))
    }

    /// Returns the nested mapping under `key` as its own `ConfigBox`.
    ///
    /// # Errors
    ///
    /// [`UtilsError::MissingKey`] or [`UtilsError::TypeMismatch`].
    pub fn get_box(&self, key: &str) -> Result<ConfigBox> {
        let value = self.lookup(key)?;
        match value {
            Value::Object(map) => Ok(ConfigBox {
                entries: map.clone(),
            }),
            other => Err(mismatch(key, "a mapping", other)),
        }
    }

    /// Deserializes the whole mapping into a caller-defined schema.
    ///
    /// # Errors
    ///
    /// Returns [`UtilsError::ValueConversion`] when the mapping does not fit `T`.
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.entries.clone()))
            .map_err(|e| UtilsError::ValueConversion(e.to_string()))
    }
}

impl Index<&str> for ConfigBox {
    type Output = Value;

    /// Missing keys index to `null`, matching `serde_json::Value`.
    fn index(&self, key: &str) -> &Value {
        self.entries.get(key).unwrap_or(&NULL)
    }
}

impl From<Map<String, Value>> for ConfigBox {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

/// Human-readable name of a value's JSON type, used in error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_f64() => "a float",
        Value::Number(_) => "an integer",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

/// Dotted location of the first NaN or infinity in a YAML tree.
fn non_finite_yaml(value: &serde_yaml::Value, at: &str) -> Option<String> {
    use serde_yaml::Value as Yaml;

    let child = |segment: String| {
        if at.is_empty() {
            segment
        } else {
            format!("{at}.{segment}")
        }
    };
    match value {
        Yaml::Number(n) if n.is_nan() || n.is_infinite() => Some(at.to_string()),
        Yaml::Sequence(items) => items
            .iter()
            .enumerate()
            .find_map(|(i, item)| non_finite_yaml(item, &child(i.to_string()))),
        Yaml::Mapping(entries) => entries.iter().find_map(|(key, item)| {
            let segment = match key {
                Yaml::String(s) => s.clone(),
                Yaml::Number(n) => n.to_string(),
                Yaml::Bool(b) => b.to_string(),
                other => format!("{other:?}"),
            };
            non_finite_yaml(item, &child(segment))
        }),
        Yaml::Tagged(tagged) => non_finite_yaml(&tagged.value, at),
        _ => None,
    }
}

fn mismatch(key: &str, expected: &'static str, found: &Value) -> UtilsError {
    UtilsError::TypeMismatch {
        param: key.to_string(),
        expected,
        found: value_kind(found).to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
