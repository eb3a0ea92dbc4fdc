//! Cheap format detection for parsed JSON.
//!
//! The guards never fail; they only look at the few fields that identify
//! each format, so they can route arbitrary input before conversion.

use serde_json::Value;

use crate::vocab::{INTERNAL_FORMAT_VERSION, types};

/// Which checkpoint format a JSON value is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointFormat {
    /// Flat v2.0 checkpoint (`version` + `checkpoint` map).
    Internal,
    /// schema.org JSON-LD `DataFeed`.
    External,
}

/// True if `value` looks like an external JSON-LD document.
pub fn looks_like_external(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    let typed = obj.get("@type").and_then(Value::as_str) == Some(types::DATA_FEED);
    let has_context = matches!(obj.get("@context"), Some(Value::Object(_) | Value::String(_) | Value::Array(_)));
    let has_items = obj
        .get("dataFeedElement")
        .or_else(|| obj.get("hasPart"))
        .is_some_and(Value::is_array);
    typed && has_context && has_items
}

/// True if `value` looks like an internal v2.0 checkpoint.
pub fn looks_like_internal(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    if obj.contains_key("@type") || obj.contains_key("@context") {
        return false;
    }
    obj.get("version").and_then(Value::as_str) == Some(INTERNAL_FORMAT_VERSION)
        && obj.get("checkpoint").is_some_and(Value::is_object)
}

/// Classifies `value`, or returns `None` if it matches neither format.
pub fn detect_format(value: &Value) -> Option<CheckpointFormat> {
    if looks_like_external(value) {
        Some(CheckpointFormat::External)
    } else if looks_like_internal(value) {
        Some(CheckpointFormat::Internal)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_internal() {
        let v = json!({ "version": "2.0", "global_rubric": null, "checkpoint": {} });
        assert!(looks_like_internal(&v));
        assert!(!looks_like_external(&v));
        assert_eq!(detect_format(&v), Some(CheckpointFormat::Internal));
    }

    #[test]
    fn test_external() {
        let v = json!({
            "@context": { "@vocab": "http://schema.org/" },
            "@type": "DataFeed",
            "version": "2.0",
            "dataFeedElement": []
        });
        assert!(looks_like_external(&v));
        assert!(!looks_like_internal(&v));
        assert_eq!(detect_format(&v), Some(CheckpointFormat::External));
    }

    #[test]
    fn test_overlapping_shapes_rejected() {
        // Internal-looking fields on a JSON-LD node.
        let hybrid = json!({ "@type": "DataFeed", "version": "2.0", "checkpoint": {} });
        assert!(!looks_like_internal(&hybrid));
        assert!(!looks_like_external(&hybrid));

        let legacy = json!({ "version": "1.0", "checkpoint": {} });
        assert!(!looks_like_internal(&legacy));

        let no_map = json!({ "version": "2.0", "checkpoint": [] });
        assert!(!looks_like_internal(&no_map));

        let no_items = json!({ "@context": {}, "@type": "DataFeed", "dataFeedElement": {} });
        assert!(!looks_like_external(&no_items));
    }

    #[test]
    fn test_non_objects() {
        for v in [json!(null), json!("2.0"), json!([]), json!(42)] {
            assert_eq!(detect_format(&v), None);
        }
    }
}
