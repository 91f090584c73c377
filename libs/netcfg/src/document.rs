//! JSON-backed configuration documents.

use std::collections::BTreeSet;
use std::fmt::Display;
use std::str::FromStr;

use netres_events::{ConfigClass, ConfigSubject};
use serde_json::{Map, Value};

use crate::ConfigError;

/// A typed view over a configuration document.
pub trait NetworkConfig: Sized {
    /// The configuration class this view reads.
    const CLASS: ConfigClass;

    /// Builds the view for a subject from its JSON document.
    fn from_node(subject: &ConfigSubject, node: Value) -> Result<Self, ConfigError>;

    /// Returns the underlying document.
    fn node(&self) -> Value;

    /// Returns true if every checked field has the expected shape.
    fn is_valid(&self) -> bool;
}

/// State of a single field when read with a parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Field<T> {
    Absent,
    Present(T),
    Malformed,
}

impl<T> Field<T> {
    pub(crate) fn into_option(self) -> Option<T> {
        match self {
            Field::Present(value) => Some(value),
            Field::Absent | Field::Malformed => None,
        }
    }

    pub(crate) fn is_malformed(&self) -> bool {
        matches!(self, Field::Malformed)
    }
}

/// Mutable JSON object shared by the typed views.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct ConfigNode(Map<String, Value>);

impl ConfigNode {
    pub(crate) fn from_value(class: &ConfigClass, value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(object) => Ok(Self(object)),
            _ => Err(ConfigError::NotAnObject {
                class: class.clone(),
            }),
        }
    }

    pub(crate) fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// True if no keys other than `allowed` are present.
    pub(crate) fn has_only_fields(&self, allowed: &[&str]) -> bool {
        self.0.keys().all(|key| allowed.contains(&key.as_str()))
    }

    pub(crate) fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub(crate) fn set(&mut self, field: &str, value: Value) {
        self.0.insert(field.to_string(), value);
    }

    pub(crate) fn remove(&mut self, field: &str) {
        self.0.remove(field);
    }

    /// Reads a string field through `FromStr`.
    pub(crate) fn parsed<T: FromStr>(&self, field: &str) -> Field<T> {
        match self.0.get(field) {
            None => Field::Absent,
            Some(Value::String(s)) => s.parse().map_or(Field::Malformed, Field::Present),
            Some(_) => Field::Malformed,
        }
    }

    /// Reads an array of strings through `FromStr`. Any bad element makes the
    /// whole field malformed.
    pub(crate) fn parsed_set<T: FromStr + Ord>(&self, field: &str) -> Field<BTreeSet<T>> {
        let Some(value) = self.0.get(field) else {
            return Field::Absent;
        };
        let Value::Array(items) = value else {
            return Field::Malformed;
        };

        let parsed: Option<BTreeSet<T>> = items
            .iter()
            .map(|item| item.as_str().and_then(|s| s.parse().ok()))
            .collect();
        parsed.map_or(Field::Malformed, Field::Present)
    }

    pub(crate) fn set_strings<I>(&mut self, field: &str, items: I)
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let values = items
            .into_iter()
            .map(|item| Value::String(item.to_string()))
            .collect();
        self.set(field, Value::Array(values));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netres_id::MacAddress;
    use serde_json::json;

    fn node(value: Value) -> ConfigNode {
        ConfigNode::from_value(&ConfigClass::new("test"), value).unwrap()
    }

    #[test]
    fn test_rejects_non_object() {
        let result = ConfigNode::from_value(&ConfigClass::new("test"), json!([1, 2]));
        assert!(matches!(result, Err(ConfigError::NotAnObject { .. })));
    }

    #[test]
    fn test_has_only_fields() {
        let n = node(json!({"a": 1, "b": 2}));
        assert!(n.has_only_fields(&["a", "b", "c"]));
        assert!(!n.has_only_fields(&["a"]));
    }

    #[test]
    fn test_parsed_set_states() {
        let n = node(json!({
            "good": ["00:00:00:00:00:01", "00:00:00:00:00:02"],
            "bad": ["00:00:00:00:00:01", "nope"],
            "scalar": "00:00:00:00:00:01",
        }));

        let good: Field<BTreeSet<MacAddress>> = n.parsed_set("good");
        assert!(matches!(good, Field::Present(ref set) if set.len() == 2));
        assert!(n.parsed_set::<MacAddress>("bad").is_malformed());
        assert!(n.parsed_set::<MacAddress>("scalar").is_malformed());
        assert_eq!(n.parsed_set::<MacAddress>("missing"), Field::Absent);
    }
}
