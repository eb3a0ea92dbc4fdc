//! External schema.org JSON-LD document types.
//!
//! Type tags are kept as plain strings so a document loaded from disk with
//! a wrong tag still deserializes; the validator reports such documents.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::model::checkpoint::Agent;
use crate::vocab::{schema_org_context, types};

/// A creator or publisher: a full agent record, or just a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgentRef {
    Name(String),
    Agent(Agent),
}

impl AgentRef {
    /// Normalizes to an [`Agent`], wrapping a bare name as a person.
    pub fn into_agent(self) -> Agent {
        match self {
            AgentRef::Name(name) => Agent::person(name),
            AgentRef::Agent(agent) => agent,
        }
    }
}

/// A schema.org `PropertyValue` used as a key/value sidecar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyValue {
    #[serde(rename = "@type")]
    pub type_tag: String,
    pub name: String,
    pub value: Value,
}

impl PropertyValue {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            type_tag: types::PROPERTY_VALUE.to_string(),
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Largest magnitude at which every integer is exact in an `f64`.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Writes whole-number bounds as JSON integers (`1`, not `1.0`).
fn serialize_bound<S: Serializer>(bound: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match *bound {
        Some(b) if b.fract() == 0.0 && b.abs() <= MAX_EXACT_INTEGER => {
            serializer.serialize_some(&(b as i64))
        }
        Some(b) => serializer.serialize_some(&b),
        None => serializer.serialize_none(),
    }
}

/// A schema.org `Rating` encoding one rubric trait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    #[serde(rename = "@type")]
    pub type_tag: String,
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, serialize_with = "serialize_bound")]
    pub best_rating: Option<f64>,
    #[serde(default, serialize_with = "serialize_bound")]
    pub worst_rating: Option<f64>,
    #[serde(default)]
    pub additional_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_property: Option<Vec<PropertyValue>>,
}

/// The template attached to a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareSourceCode {
    #[serde(rename = "@type")]
    pub type_tag: String,
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub programming_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_repository: Option<String>,
}

/// The accepted answer of a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(rename = "@type")]
    pub type_tag: String,
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
}

/// A benchmark question with its answer, template, ratings and sidecar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "@type")]
    pub type_tag: String,
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    pub accepted_answer: Answer,
    pub has_part: SoftwareSourceCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Vec<Rating>>,
    #[serde(default)]
    pub additional_property: Vec<PropertyValue>,
}

/// Feed wrapper around one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFeedItem {
    #[serde(rename = "@type")]
    pub type_tag: String,
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<String>,
    pub item: Question,
}

/// Root of the external document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFeed {
    #[serde(rename = "@context")]
    pub context: Value,
    #[serde(rename = "@type")]
    pub type_tag: String,
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<AgentRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<AgentRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Vec<Rating>>,
    #[serde(alias = "hasPart")]
    pub data_feed_element: Vec<DataFeedItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_property: Option<Vec<PropertyValue>>,
}

impl DataFeed {
    /// Creates an empty feed with the standard context and type tag.
    pub fn new() -> Self {
        Self {
            context: schema_org_context(),
            type_tag: types::DATA_FEED.to_string(),
            id: None,
            name: None,
            description: None,
            version: None,
            license: None,
            keywords: None,
            creator: None,
            publisher: None,
            date_created: None,
            date_modified: None,
            rating: None,
            data_feed_element: Vec::new(),
            additional_property: None,
        }
    }

    /// Total number of ratings, dataset-level and per question.
    pub fn rating_count(&self) -> usize {
        let global = self.rating.as_ref().map_or(0, Vec::len);
        let per_question: usize = self
            .data_feed_element
            .iter()
            .map(|e| e.item.rating.as_ref().map_or(0, Vec::len))
            .sum();
        global + per_question
    }
}

impl Default for DataFeed {
    fn default() -> Self {
        Self::new()
    }
}
