//! Internal v2.0 checkpoint representation.
//!
//! This is the editing-side source of truth. The converter only ever reads
//! or produces snapshots of it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::rubric::Rubric;
use crate::vocab::{INTERNAL_FORMAT_VERSION, types};

/// Whether an [`Agent`] is a person or an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AgentType {
    #[default]
    Person,
    Organization,
}

/// A schema.org `Person` or `Organization`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    #[serde(rename = "@type", default)]
    pub agent_type: AgentType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Agent {
    /// Creates a person with only a name.
    pub fn person(name: impl Into<String>) -> Self {
        Self {
            agent_type: AgentType::Person,
            name: name.into(),
            email: None,
            affiliation: None,
            url: None,
        }
    }

    /// Creates an organization with only a name.
    pub fn organization(name: impl Into<String>) -> Self {
        Self {
            agent_type: AgentType::Organization,
            ..Self::person(name)
        }
    }
}

fn creative_work() -> String {
    types::CREATIVE_WORK.to_string()
}

/// A cited source (`CreativeWork`, `ScholarlyArticle`, `WebPage`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDocument {
    #[serde(rename = "@type", default = "creative_work")]
    pub source_type: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

/// One benchmark question with its answer, template and annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointItem {
    pub question: String,
    pub raw_answer: String,
    #[serde(default)]
    pub original_answer_template: String,
    pub answer_template: String,
    #[serde(default)]
    pub last_modified: String,
    #[serde(default)]
    pub finished: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_rubric: Option<Rubric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Agent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_metadata: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<SourceDocument>>,
}

/// Dataset-level descriptive metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
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
    pub creator: Option<Agent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Agent>,
    #[serde(rename = "dateCreated", default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
    #[serde(rename = "dateModified", default, skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_properties: Option<BTreeMap<String, Value>>,
}

impl DatasetMetadata {
    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self == &DatasetMetadata::default()
    }
}

fn internal_version() -> String {
    INTERNAL_FORMAT_VERSION.to_string()
}

/// A complete v2.0 checkpoint snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedCheckpoint {
    #[serde(default = "internal_version")]
    pub version: String,
    #[serde(default)]
    pub global_rubric: Option<Rubric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_metadata: Option<DatasetMetadata>,
    pub checkpoint: BTreeMap<String, CheckpointItem>,
}

impl UnifiedCheckpoint {
    /// Creates an empty checkpoint with no rubric and no metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of questions.
    pub fn len(&self) -> usize {
        self.checkpoint.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoint.is_empty()
    }
}

impl Default for UnifiedCheckpoint {
    fn default() -> Self {
        Self {
            version: internal_version(),
            global_rubric: None,
            dataset_metadata: None,
            checkpoint: BTreeMap::new(),
        }
    }
}
