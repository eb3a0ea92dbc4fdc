//! Checkpoint item <-> `DataFeedItem` conversion.
//!
//! One internal item maps to one feed wrapper holding a `Question` with its
//! `Answer`, `SoftwareSourceCode` template, question-specific `Rating`s and
//! a `PropertyValue` sidecar for everything without a schema.org slot.

use std::collections::BTreeMap;

use tracing::debug;

use crate::codec::document::ConversionOptions;
use crate::codec::property::{PropertyIndex, custom_name, json_property, value_to_string};
use crate::codec::rating::{rating_to_trait, trait_to_rating};
use crate::error::{ConversionError, Result};
use crate::model::id::{derive_id, feed_item_id, strip_id_prefix};
use crate::model::{
    Agent, Answer, CheckpointItem, DataFeedItem, PropertyValue, Question, Rating, Rubric,
    SoftwareSourceCode, SourceDocument, TraitScope,
};
use crate::vocab::properties::{
    AUTHOR, CUSTOM_PREFIX, FINISHED, ORIGINAL_ANSWER_TEMPLATE, SOURCES,
};
use crate::vocab::{CODE_REPOSITORY, POSITIONAL_ID_PREFIX, additional_types, types};

/// Encodes every trait of `rubric` as a rating tagged for `scope`.
pub(crate) fn rubric_to_ratings(
    rubric: &Rubric,
    scope: TraitScope,
    options: &ConversionOptions,
) -> Result<Vec<Rating>> {
    rubric
        .iter()
        .map(|t| {
            let mut rating = trait_to_rating(t, scope)?;
            if !options.preserve_ids {
                rating.id = None;
            }
            Ok(rating)
        })
        .collect()
}

/// Decodes ratings into a rubric, rejecting any tagged for another scope.
pub(crate) fn ratings_to_rubric(
    ratings: &[Rating],
    expected: TraitScope,
    location: &'static str,
) -> Result<Rubric> {
    let mut rubric = Rubric::new();
    for rating in ratings {
        let (scope, decoded) = rating_to_trait(rating)?;
        if scope != expected {
            return Err(ConversionError::ScopeMismatch {
                rating: rating.name.clone(),
                additional_type: rating.additional_type.clone(),
                location,
            });
        }
        rubric.push(decoded);
    }
    Ok(rubric)
}

fn item_properties(item: &CheckpointItem) -> Result<Vec<PropertyValue>> {
    let custom_len = item.custom_metadata.as_ref().map_or(0, BTreeMap::len);
    let mut props = Vec::with_capacity(4 + custom_len);

    props.push(PropertyValue::new(FINISHED, item.finished));
    props.push(PropertyValue::new(
        ORIGINAL_ANSWER_TEMPLATE,
        item.original_answer_template.as_str(),
    ));
    if let Some(author) = &item.author {
        props.push(json_property(AUTHOR, author)?);
    }
    if let Some(sources) = &item.sources {
        props.push(json_property(SOURCES, sources)?);
    }
    if let Some(custom) = &item.custom_metadata {
        for (key, value) in custom {
            props.push(PropertyValue::new(custom_name(key), value.as_str()));
        }
    }
    Ok(props)
}

/// Encodes one checkpoint item as a feed entry.
///
/// Only the item's own rubric is emitted; global traits belong to the
/// document.
pub fn item_to_feed_entry(
    question_id: &str,
    item: &CheckpointItem,
    options: &ConversionOptions,
) -> Result<DataFeedItem> {
    let rating = match &item.question_rubric {
        Some(rubric) => Some(rubric_to_ratings(rubric, TraitScope::QuestionSpecific, options)?),
        None => None,
    };

    let ids = options.preserve_ids;
    let question = Question {
        type_tag: types::QUESTION.to_string(),
        id: ids.then(|| derive_id("question", &item.question)),
        text: item.question.clone(),
        accepted_answer: Answer {
            type_tag: types::ANSWER.to_string(),
            id: ids.then(|| derive_id("answer", &item.raw_answer)),
            text: item.raw_answer.clone(),
        },
        has_part: SoftwareSourceCode {
            type_tag: types::SOFTWARE_SOURCE_CODE.to_string(),
            id: ids.then(|| derive_id("template", &item.answer_template)),
            name: None,
            text: item.answer_template.clone(),
            programming_language: Some(options.programming_language.clone()),
            code_repository: Some(CODE_REPOSITORY.to_string()),
        },
        keywords: item.keywords.clone(),
        rating,
        additional_property: item_properties(item)?,
    };

    Ok(DataFeedItem {
        type_tag: types::DATA_FEED_ITEM.to_string(),
        id: ids.then(|| feed_item_id(question_id)),
        date_created: item.date_created.clone(),
        date_modified: (!item.last_modified.is_empty()).then(|| item.last_modified.clone()),
        item: question,
    })
}

/// Recovers the question id of the entry at `index`.
///
/// Only an absent `@id` falls back to the positional placeholder; an empty
/// question id is still a question id.
pub fn feed_entry_question_id(entry: &DataFeedItem, index: usize) -> String {
    match entry.id.as_deref() {
        Some(id) => strip_id_prefix(id).to_string(),
        None => format!("{POSITIONAL_ID_PREFIX}{index}"),
    }
}

fn is_system_property(name: &str) -> bool {
    matches!(name, FINISHED | ORIGINAL_ANSWER_TEMPLATE | AUTHOR | SOURCES)
        || name.starts_with(CUSTOM_PREFIX)
}

/// Decodes one feed entry back into its question id and checkpoint item.
///
/// Malformed `author`/`sources` payloads are dropped rather than failing
/// the import.
pub fn feed_entry_to_item(entry: &DataFeedItem, index: usize) -> Result<(String, CheckpointItem)> {
    let question_id = feed_entry_question_id(entry, index);
    let question = &entry.item;
    let props = PropertyIndex::new(&question.additional_property);

    for pv in &question.additional_property {
        if !is_system_property(&pv.name) {
            debug!(question = %question_id, property = %pv.name, "ignoring unknown question property");
        }
    }

    let question_rubric = match &question.rating {
        Some(ratings) => Some(ratings_to_rubric(
            ratings,
            TraitScope::QuestionSpecific,
            "question level",
        )?),
        None => None,
    };

    let custom_metadata = if props.custom().is_empty() {
        None
    } else {
        Some(
            props
                .custom()
                .iter()
                .map(|(key, value)| (key.to_string(), value_to_string(value)))
                .collect::<BTreeMap<_, _>>(),
        )
    };

    let item = CheckpointItem {
        question: question.text.clone(),
        raw_answer: question.accepted_answer.text.clone(),
        original_answer_template: props
            .get_str(ORIGINAL_ANSWER_TEMPLATE)
            .unwrap_or_default()
            .to_string(),
        answer_template: question.has_part.text.clone(),
        last_modified: entry.date_modified.clone().unwrap_or_default(),
        finished: props.get_bool(FINISHED).unwrap_or(false),
        question_rubric,
        date_created: entry.date_created.clone(),
        author: props.get_json::<Agent>(AUTHOR, &question_id),
        keywords: question.keywords.clone(),
        custom_metadata,
        sources: props.get_json::<Vec<SourceDocument>>(SOURCES, &question_id),
    };

    Ok((question_id, item))
}

/// True if `tag` belongs on a question rather than the dataset.
pub(crate) fn is_question_scope_tag(tag: &str) -> bool {
    matches!(
        tag,
        additional_types::QUESTION_RUBRIC_TRAIT
            | additional_types::QUESTION_REGEX_TRAIT
            | additional_types::QUESTION_METRIC_TRAIT
            | additional_types::QUESTION_CALLABLE_TRAIT
    )
}
