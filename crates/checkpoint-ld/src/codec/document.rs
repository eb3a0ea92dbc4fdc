//! Checkpoint <-> `DataFeed` document conversion.
//!
//! Export timestamp policy:
//! - `dateCreated` already present on the dataset metadata is kept as is;
//!   otherwise it is set to the export instant.
//! - `dateModified` is refreshed to the export instant, except for a pure
//!   format conversion (`is_creation = false`) where an existing value is
//!   kept verbatim.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::codec::item::{feed_entry_to_item, item_to_feed_entry, ratings_to_rubric, rubric_to_ratings};
use crate::codec::property::{PropertyIndex, custom_name, json_property};
use crate::detect::{CheckpointFormat, detect_format};
use crate::error::{ConversionError, Result};
use crate::model::{AgentRef, DataFeed, DatasetMetadata, PropertyValue, TraitScope, UnifiedCheckpoint};
use crate::util::datetime::now_rfc3339;
use crate::validate::{validate, validate_document};
use crate::vocab::properties::CONVERSION_METADATA;
use crate::vocab::{DEFAULT_PROGRAMMING_LANGUAGE, INTERNAL_FORMAT_VERSION};

/// Options controlling an export.
///
/// Deserializes from camelCase keys with every field optional, so callers
/// can keep it in their own settings files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConversionOptions {
    /// Emit stable `@id`s (question ids survive the round trip only if set).
    pub preserve_ids: bool,
    /// Attach the `conversion_metadata` property to the document.
    pub include_metadata: bool,
    /// Run the structural validator on the produced document.
    pub validate_output: bool,
    /// Edit-driven export: refresh `dateModified`. Set to false for a pure
    /// format conversion that must keep the stored value.
    pub is_creation: bool,
    /// Language tag written on every answer template.
    pub programming_language: String,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            preserve_ids: true,
            include_metadata: true,
            validate_output: true,
            is_creation: true,
            programming_language: DEFAULT_PROGRAMMING_LANGUAGE.to_string(),
        }
    }
}

impl ConversionOptions {
    /// Creates default options (edit-driven export, ids, metadata, validation).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for a pure format conversion that preserves
    /// `dateModified`.
    pub fn format_conversion() -> Self {
        Self {
            is_creation: false,
            ..Self::default()
        }
    }
}

/// Provenance record attached to exported documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionMetadata {
    pub original_format: String,
    pub exported_at: String,
    pub total_questions: usize,
    pub total_ratings: usize,
    #[serde(default)]
    pub converter_version: String,
}

impl ConversionMetadata {
    /// Reads the record from a document, if present and well-formed.
    pub fn from_document(doc: &DataFeed) -> Option<Self> {
        let props = doc.additional_property.as_deref()?;
        PropertyIndex::new(props).get_json(CONVERSION_METADATA, "document")
    }
}

fn dataset_properties(metadata: Option<&DatasetMetadata>) -> Vec<PropertyValue> {
    let Some(custom) = metadata.and_then(|m| m.custom_properties.as_ref()) else {
        return Vec::new();
    };
    custom
        .iter()
        .map(|(key, value)| PropertyValue::new(custom_name(key), value.clone()))
        .collect()
}

/// Exports a checkpoint, reading the system clock for timestamps.
pub fn to_document(checkpoint: &UnifiedCheckpoint, options: &ConversionOptions) -> Result<DataFeed> {
    to_document_at(checkpoint, options, &now_rfc3339())
}

/// Exports a checkpoint using `now` as the export instant.
pub fn to_document_at(
    checkpoint: &UnifiedCheckpoint,
    options: &ConversionOptions,
    now: &str,
) -> Result<DataFeed> {
    if checkpoint.version != INTERNAL_FORMAT_VERSION {
        return Err(ConversionError::UnsupportedVersion {
            found: checkpoint.version.clone(),
        });
    }

    let metadata = checkpoint.dataset_metadata.as_ref();
    let mut doc = DataFeed::new();

    if let Some(md) = metadata {
        doc.name = md.name.clone();
        doc.description = md.description.clone();
        doc.version = md.version.clone();
        doc.license = md.license.clone();
        doc.keywords = md.keywords.clone();
        doc.creator = md.creator.clone().map(AgentRef::Agent);
        doc.publisher = md.publisher.clone().map(AgentRef::Agent);
    }

    doc.date_created = Some(
        metadata
            .and_then(|m| m.date_created.clone())
            .unwrap_or_else(|| now.to_string()),
    );
    doc.date_modified = Some(match metadata.and_then(|m| m.date_modified.as_ref()) {
        Some(existing) if !options.is_creation => existing.clone(),
        _ => now.to_string(),
    });

    if let Some(rubric) = &checkpoint.global_rubric {
        doc.rating = Some(rubric_to_ratings(rubric, TraitScope::Global, options)?);
    }

    doc.data_feed_element = checkpoint
        .checkpoint
        .iter()
        .map(|(id, item)| item_to_feed_entry(id, item, options))
        .collect::<Result<Vec<_>>>()?;

    let mut props = dataset_properties(metadata);
    if options.include_metadata {
        let record = ConversionMetadata {
            original_format: INTERNAL_FORMAT_VERSION.to_string(),
            exported_at: now.to_string(),
            total_questions: doc.data_feed_element.len(),
            total_ratings: doc.rating_count(),
            converter_version: crate::VERSION.to_string(),
        };
        props.push(json_property(CONVERSION_METADATA, &record)?);
    }
    if !props.is_empty() {
        doc.additional_property = Some(props);
    }

    if options.validate_output {
        validate_document(&doc)?;
    }

    debug!(
        questions = doc.data_feed_element.len(),
        ratings = doc.rating_count(),
        "exported checkpoint"
    );
    Ok(doc)
}

/// Imports a document back into a checkpoint.
///
/// Dataset metadata is present in the result only if the document carries
/// at least one metadata field.
pub fn from_document(doc: &DataFeed) -> Result<UnifiedCheckpoint> {
    let props = doc.additional_property.as_deref().unwrap_or(&[]);
    let index = PropertyIndex::new(props);

    let custom_properties = if index.custom().is_empty() {
        None
    } else {
        Some(
            index
                .custom()
                .iter()
                .map(|(key, value)| (key.to_string(), (*value).clone()))
                .collect::<BTreeMap<String, Value>>(),
        )
    };

    let metadata = DatasetMetadata {
        name: doc.name.clone(),
        description: doc.description.clone(),
        version: doc.version.clone(),
        license: doc.license.clone(),
        keywords: doc.keywords.clone(),
        creator: doc.creator.clone().map(AgentRef::into_agent),
        publisher: doc.publisher.clone().map(AgentRef::into_agent),
        date_created: doc.date_created.clone(),
        date_modified: doc.date_modified.clone(),
        custom_properties,
    };

    let global_rubric = match &doc.rating {
        Some(ratings) => Some(ratings_to_rubric(ratings, TraitScope::Global, "dataset level")?),
        None => None,
    };

    let mut checkpoint = BTreeMap::new();
    for (index, entry) in doc.data_feed_element.iter().enumerate() {
        let (id, item) = feed_entry_to_item(entry, index)?;
        if checkpoint.contains_key(&id) {
            return Err(ConversionError::DuplicateQuestionId { id });
        }
        checkpoint.insert(id, item);
    }

    debug!(questions = checkpoint.len(), "imported document");

    Ok(UnifiedCheckpoint {
        version: INTERNAL_FORMAT_VERSION.to_string(),
        global_rubric,
        dataset_metadata: (!metadata.is_empty()).then_some(metadata),
        checkpoint,
    })
}

/// Parses an external document from JSON text.
pub fn parse_document(json: &str) -> Result<DataFeed> {
    serde_json::from_str(json).map_err(|e| ConversionError::json("document", e))
}

/// Parses an internal checkpoint from JSON text.
pub fn parse_checkpoint(json: &str) -> Result<UnifiedCheckpoint> {
    serde_json::from_str(json).map_err(|e| ConversionError::json("checkpoint", e))
}

/// Loads a checkpoint from parsed JSON in either format.
///
/// External documents are validated before import. Input matching neither
/// format fails with [`ConversionError::UnrecognizedFormat`].
pub fn load_checkpoint(value: Value) -> Result<UnifiedCheckpoint> {
    match detect_format(&value) {
        Some(CheckpointFormat::Internal) => {
            serde_json::from_value(value).map_err(|e| ConversionError::json("checkpoint", e))
        }
        Some(CheckpointFormat::External) => {
            validate(&value)?;
            let doc: DataFeed =
                serde_json::from_value(value).map_err(|e| ConversionError::json("document", e))?;
            from_document(&doc)
        }
        None => Err(ConversionError::UnrecognizedFormat),
    }
}
