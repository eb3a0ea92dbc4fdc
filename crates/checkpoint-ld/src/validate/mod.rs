//! Structural validation of external JSON-LD documents.
//!
//! Validation works on raw JSON so that a document loaded from disk can be
//! checked before any typed decoding is attempted, and so that every
//! problem is reported in one pass instead of stopping at the first.
//!
//! Checks:
//! - root `@type` is `DataFeed` and `@context` is present
//! - exactly one item list (`dataFeedElement` or `hasPart`) is present and
//!   is an array
//! - each item is a `DataFeedItem` wrapping a `Question` with question,
//!   answer and template text, and a `SoftwareSourceCode` template
//! - each rating has the `Rating` tag, a non-empty name, numeric bounds
//!   with `worstRating < bestRating`, and a recognized `additionalType`
//!   placed at the matching scope
//! - `PropertyValue` names are strings and unique per owning object

use rustc_hash::FxHashSet;
use serde_json::{Map, Value};

use crate::codec::item::is_question_scope_tag;
use crate::error::{ConversionError, Result};
use crate::model::DataFeed;
use crate::vocab::{additional_types, types};

/// Scope a rating is found at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RatingSite {
    Dataset,
    Question,
}

/// Accumulates violations with their JSON path.
#[derive(Debug, Default)]
struct Violations {
    found: Vec<String>,
}

impl Violations {
    fn push(&mut self, path: &str, message: impl AsRef<str>) {
        self.found.push(format!("{path}: {}", message.as_ref()));
    }

    fn into_result(self) -> Result<()> {
        if self.found.is_empty() {
            Ok(())
        } else {
            Err(ConversionError::Validation {
                violations: self.found,
            })
        }
    }
}

fn type_tag(obj: &Map<String, Value>) -> Option<&str> {
    obj.get("@type").and_then(Value::as_str)
}

fn expect_type(obj: &Map<String, Value>, expected: &str, path: &str, out: &mut Violations) {
    match type_tag(obj) {
        Some(tag) if tag == expected => {}
        Some(tag) => out.push(path, format!("expected @type {expected:?}, found {tag:?}")),
        None => out.push(path, format!("missing @type (expected {expected:?})")),
    }
}

fn expect_text(obj: &Map<String, Value>, path: &str, what: &str, out: &mut Violations) {
    match obj.get("text") {
        Some(Value::String(_)) => {}
        Some(_) => out.push(path, format!("{what} text must be a string")),
        None => out.push(path, format!("missing {what} text")),
    }
}

/// Looks up a nested object, reporting absence or a wrong shape.
fn child_object<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    path: &str,
    out: &mut Violations,
) -> Option<&'a Map<String, Value>> {
    match obj.get(key) {
        Some(Value::Object(child)) => Some(child),
        Some(_) => {
            out.push(path, format!("`{key}` must be an object"));
            None
        }
        None => {
            out.push(path, format!("missing `{key}`"));
            None
        }
    }
}

fn check_properties(obj: &Map<String, Value>, path: &str, out: &mut Violations) {
    let Some(raw) = obj.get("additionalProperty") else {
        return;
    };
    let Some(props) = raw.as_array() else {
        out.push(path, "additionalProperty must be an array");
        return;
    };
    let mut seen = FxHashSet::with_capacity_and_hasher(props.len(), Default::default());
    for (i, prop) in props.iter().enumerate() {
        let prop_path = format!("{path}.additionalProperty[{i}]");
        let Some(prop) = prop.as_object() else {
            out.push(&prop_path, "must be an object");
            continue;
        };
        expect_type(prop, types::PROPERTY_VALUE, &prop_path, out);
        match prop.get("name").and_then(Value::as_str) {
            Some(name) => {
                if !seen.insert(name) {
                    out.push(&prop_path, format!("duplicate property name {name:?}"));
                }
            }
            None => out.push(&prop_path, "name must be a string"),
        }
    }
}

fn check_rating(rating: &Value, site: RatingSite, path: &str, out: &mut Violations) {
    let Some(rating) = rating.as_object() else {
        out.push(path, "rating must be an object");
        return;
    };
    expect_type(rating, types::RATING, path, out);

    match rating.get("name").and_then(Value::as_str) {
        Some(name) if !name.trim().is_empty() => {}
        _ => out.push(path, "rating name must be a non-empty string"),
    }

    let best = rating.get("bestRating").and_then(Value::as_f64);
    let worst = rating.get("worstRating").and_then(Value::as_f64);
    if best.is_none() {
        out.push(path, "bestRating must be a number");
    }
    if worst.is_none() {
        out.push(path, "worstRating must be a number");
    }
    if let (Some(best), Some(worst)) = (best, worst) {
        if worst >= best {
            out.push(
                path,
                format!("worstRating ({worst}) must be less than bestRating ({best})"),
            );
        }
    }

    match rating.get("additionalType").and_then(Value::as_str) {
        Some(tag) if additional_types::ALL.contains(&tag) => {
            let question_tag = is_question_scope_tag(tag);
            match site {
                RatingSite::Dataset if question_tag => {
                    out.push(path, format!("{tag} is not allowed at dataset level"));
                }
                RatingSite::Question if !question_tag => {
                    out.push(path, format!("{tag} is not allowed inside a question"));
                }
                _ => {}
            }
        }
        Some(tag) => out.push(path, format!("unrecognized additionalType {tag:?}")),
        None => out.push(path, "missing additionalType"),
    }

    check_properties(rating, path, out);
}

fn check_ratings(obj: &Map<String, Value>, site: RatingSite, path: &str, out: &mut Violations) {
    let Some(raw) = obj.get("rating") else {
        return;
    };
    let Some(ratings) = raw.as_array() else {
        out.push(path, "rating must be an array");
        return;
    };
    for (i, rating) in ratings.iter().enumerate() {
        check_rating(rating, site, &format!("{path}.rating[{i}]"), out);
    }
}

fn check_question(question: &Map<String, Value>, path: &str, out: &mut Violations) {
    expect_type(question, types::QUESTION, path, out);
    expect_text(question, path, "question", out);

    let answer_path = format!("{path}.acceptedAnswer");
    if let Some(answer) = child_object(question, "acceptedAnswer", path, out) {
        expect_type(answer, types::ANSWER, &answer_path, out);
        expect_text(answer, &answer_path, "answer", out);
    }

    let code_path = format!("{path}.hasPart");
    if let Some(code) = child_object(question, "hasPart", path, out) {
        expect_type(code, types::SOFTWARE_SOURCE_CODE, &code_path, out);
        expect_text(code, &code_path, "template", out);
    }

    check_ratings(question, RatingSite::Question, path, out);
    check_properties(question, path, out);
}

fn check_item(item: &Value, path: &str, out: &mut Violations) {
    let Some(item) = item.as_object() else {
        out.push(path, "item must be an object");
        return;
    };
    expect_type(item, types::DATA_FEED_ITEM, path, out);
    let question_path = format!("{path}.item");
    if let Some(question) = child_object(item, "item", path, out) {
        check_question(question, &question_path, out);
    }
}

/// Validates a raw JSON document, reporting every violation found.
pub fn validate(doc: &Value) -> Result<()> {
    let mut out = Violations::default();
    let Some(root) = doc.as_object() else {
        out.push("$", "document must be a JSON object");
        return out.into_result();
    };

    expect_type(root, types::DATA_FEED, "$", &mut out);
    if !root.contains_key("@context") {
        out.push("$", "missing @context");
    }

    let (key, elements) = match (root.get("dataFeedElement"), root.get("hasPart")) {
        (Some(v), Some(_)) => {
            out.push("$", "both `dataFeedElement` and `hasPart` present");
            ("dataFeedElement", Some(v))
        }
        (Some(v), None) => ("dataFeedElement", Some(v)),
        (None, Some(v)) => ("hasPart", Some(v)),
        (None, None) => ("dataFeedElement", None),
    };
    match elements {
        Some(Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                check_item(item, &format!("$.{key}[{i}]"), &mut out);
            }
        }
        Some(_) => out.push("$", format!("`{key}` must be an array")),
        None => out.push("$", "missing `dataFeedElement`"),
    }

    check_ratings(root, RatingSite::Dataset, "$", &mut out);
    check_properties(root, "$", &mut out);

    out.into_result()
}

/// Validates a typed document.
pub fn validate_document(doc: &DataFeed) -> Result<()> {
    let value = serde_json::to_value(doc).map_err(|e| ConversionError::json("document", e))?;
    validate(&value)
}
