//! `PropertyValue` sidecar reading and writing.
//!
//! Fields without a first-class schema.org slot travel as named
//! `PropertyValue`s. Structured payloads (author, sources, conversion
//! metadata) are JSON-encoded into the string `value`.

use rustc_hash::FxHashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::error::{ConversionError, Result};
use crate::model::PropertyValue;
use crate::vocab::properties::CUSTOM_PREFIX;

/// Name-indexed view over a property list.
///
/// When a name repeats, the first occurrence wins.
#[derive(Debug, Default)]
pub struct PropertyIndex<'a> {
    by_name: FxHashMap<&'a str, &'a Value>,
    custom: Vec<(&'a str, &'a Value)>,
}

impl<'a> PropertyIndex<'a> {
    pub fn new(props: &'a [PropertyValue]) -> Self {
        let mut by_name =
            FxHashMap::with_capacity_and_hasher(props.len(), Default::default());
        let mut custom = Vec::new();
        for pv in props {
            if by_name.contains_key(pv.name.as_str()) {
                continue;
            }
            by_name.insert(pv.name.as_str(), &pv.value);
            if let Some(key) = pv.name.strip_prefix(CUSTOM_PREFIX) {
                custom.push((key, &pv.value));
            }
        }
        Self { by_name, custom }
    }

    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.by_name.get(name).copied()
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn get_str(&self, name: &str) -> Option<&'a str> {
        self.get(name)?.as_str()
    }

    /// Decodes a JSON-encoded payload.
    ///
    /// Returns `None` when the property is absent or does not decode; the
    /// latter is logged and otherwise ignored.
    pub fn get_json<T: DeserializeOwned>(&self, name: &str, owner: &str) -> Option<T> {
        let value = self.get(name)?;
        let decoded = match value {
            Value::String(s) => serde_json::from_str(s),
            // Tolerate payloads that were stored as structured JSON.
            other => serde_json::from_value(other.clone()),
        };
        match decoded {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(property = name, owner, error = %e, "dropping malformed sidecar property");
                None
            }
        }
    }

    /// `custom_`-prefixed entries with the prefix stripped, in document order.
    pub fn custom(&self) -> &[(&'a str, &'a Value)] {
        &self.custom
    }
}

/// Encodes `payload` as a JSON string property.
pub fn json_property<T: Serialize + ?Sized>(name: &str, payload: &T) -> Result<PropertyValue> {
    let encoded =
        serde_json::to_string(payload).map_err(|e| ConversionError::json("sidecar property", e))?;
    Ok(PropertyValue::new(name, encoded))
}

/// Builds the name of a custom metadata property.
pub fn custom_name(key: &str) -> String {
    let mut name = String::with_capacity(CUSTOM_PREFIX.len() + key.len());
    name.push_str(CUSTOM_PREFIX);
    name.push_str(key);
    name
}

/// Renders a custom value as the string stored in the internal map.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::Agent;

    #[test]
    fn test_index_lookup_and_custom() {
        let props = vec![
            PropertyValue::new("finished", true),
            PropertyValue::new("custom_difficulty", "hard"),
            PropertyValue::new("custom_origin", "curated"),
            PropertyValue::new("finished", false),
        ];
        let index = PropertyIndex::new(&props);

        assert_eq!(index.get_bool("finished"), Some(true));
        assert_eq!(index.custom().len(), 2);
        assert_eq!(index.custom()[0].0, "difficulty");
        assert!(index.get("missing").is_none());
    }

    #[test]
    fn test_json_payload_roundtrip() {
        let author = Agent::person("Ada Lovelace");
        let props = vec![json_property("author", &author).unwrap()];
        assert!(props[0].value.is_string());

        let index = PropertyIndex::new(&props);
        let decoded: Option<Agent> = index.get_json("author", "q1");
        assert_eq!(decoded, Some(author));
    }

    #[test]
    fn test_malformed_payload_is_dropped() {
        let props = vec![PropertyValue::new("author", "{not json")];
        let index = PropertyIndex::new(&props);
        let decoded: Option<Agent> = index.get_json("author", "q1");
        assert!(decoded.is_none());
    }

    #[test]
    fn test_structured_payload_tolerated() {
        let props = vec![PropertyValue::new("author", json!({ "name": "Grace" }))];
        let index = PropertyIndex::new(&props);
        let decoded: Option<Agent> = index.get_json("author", "q1");
        assert_eq!(decoded, Some(Agent::person("Grace")));
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&json!("x")), "x");
        assert_eq!(value_to_string(&json!(3)), "3");
        assert_eq!(value_to_string(&json!(true)), "true");
    }
}
