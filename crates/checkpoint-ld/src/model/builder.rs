//! Builder API for ergonomic checkpoint construction.
//!
//! # Example
//!
//! ```rust
//! use checkpoint_ld::model::builder::CheckpointBuilder;
//! use checkpoint_ld::LlmRubricTrait;
//!
//! let checkpoint = CheckpointBuilder::new()
//!     .name("Capitals")
//!     .global_trait(LlmRubricTrait::boolean("concise"))
//!     .item("q1", |q| q
//!         .question("What is the capital of France?")
//!         .raw_answer("Paris")
//!         .template("class Answer(BaseAnswer):\n    capital: str\n")
//!         .finished(true)
//!     )
//!     .build();
//!
//! assert_eq!(checkpoint.len(), 1);
//! ```

use std::collections::BTreeMap;

use crate::model::checkpoint::{
    Agent, CheckpointItem, DatasetMetadata, SourceDocument, UnifiedCheckpoint,
};
use crate::model::rubric::{Rubric, RubricTrait};

/// Builder for a [`UnifiedCheckpoint`].
#[derive(Debug, Clone, Default)]
pub struct CheckpointBuilder {
    checkpoint: UnifiedCheckpoint,
}

impl CheckpointBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn metadata(&mut self) -> &mut DatasetMetadata {
        self.checkpoint.dataset_metadata.get_or_insert_with(DatasetMetadata::default)
    }

    /// Sets the dataset name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.metadata().name = Some(name.into());
        self
    }

    /// Sets the dataset description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.metadata().description = Some(description.into());
        self
    }

    /// Replaces the dataset metadata wholesale.
    pub fn dataset_metadata(mut self, metadata: DatasetMetadata) -> Self {
        self.checkpoint.dataset_metadata = Some(metadata);
        self
    }

    /// Sets an empty global rubric (present, zero traits).
    pub fn empty_global_rubric(mut self) -> Self {
        self.checkpoint.global_rubric = Some(Rubric::new());
        self
    }

    /// Appends a trait to the global rubric, creating it if needed.
    pub fn global_trait(mut self, t: impl Into<RubricTrait>) -> Self {
        self.checkpoint
            .global_rubric
            .get_or_insert_with(Rubric::new)
            .push(t);
        self
    }

    /// Adds a question built by `f` under `id`.
    pub fn item<F>(mut self, id: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(ItemBuilder) -> ItemBuilder,
    {
        let item = f(ItemBuilder::new()).build();
        self.checkpoint.checkpoint.insert(id.into(), item);
        self
    }

    /// Inserts an already-built item.
    pub fn insert(mut self, id: impl Into<String>, item: CheckpointItem) -> Self {
        self.checkpoint.checkpoint.insert(id.into(), item);
        self
    }

    pub fn build(self) -> UnifiedCheckpoint {
        self.checkpoint
    }
}

/// Builder for a single [`CheckpointItem`].
#[derive(Debug, Clone)]
pub struct ItemBuilder {
    item: CheckpointItem,
}

impl Default for ItemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemBuilder {
    pub fn new() -> Self {
        Self {
            item: CheckpointItem {
                question: String::new(),
                raw_answer: String::new(),
                original_answer_template: String::new(),
                answer_template: String::new(),
                last_modified: String::new(),
                finished: false,
                question_rubric: None,
                date_created: None,
                author: None,
                keywords: None,
                custom_metadata: None,
                sources: None,
            },
        }
    }

    pub fn question(mut self, text: impl Into<String>) -> Self {
        self.item.question = text.into();
        self
    }

    pub fn raw_answer(mut self, text: impl Into<String>) -> Self {
        self.item.raw_answer = text.into();
        self
    }

    /// Sets the current template; also sets the original if none was given.
    pub fn template(mut self, source: impl Into<String>) -> Self {
        let source = source.into();
        if self.item.original_answer_template.is_empty() {
            self.item.original_answer_template = source.clone();
        }
        self.item.answer_template = source;
        self
    }

    /// Sets the pre-edit template.
    pub fn original_template(mut self, source: impl Into<String>) -> Self {
        self.item.original_answer_template = source.into();
        self
    }

    pub fn finished(mut self, finished: bool) -> Self {
        self.item.finished = finished;
        self
    }

    pub fn last_modified(mut self, timestamp: impl Into<String>) -> Self {
        self.item.last_modified = timestamp.into();
        self
    }

    pub fn date_created(mut self, timestamp: impl Into<String>) -> Self {
        self.item.date_created = Some(timestamp.into());
        self
    }

    /// Appends a trait to the question rubric, creating it if needed.
    pub fn rubric_trait(mut self, t: impl Into<RubricTrait>) -> Self {
        self.item.question_rubric.get_or_insert_with(Rubric::new).push(t);
        self
    }

    pub fn author(mut self, author: Agent) -> Self {
        self.item.author = Some(author);
        self
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.item.keywords.get_or_insert_with(Vec::new).push(keyword.into());
        self
    }

    pub fn source(mut self, source: SourceDocument) -> Self {
        self.item.sources.get_or_insert_with(Vec::new).push(source);
        self
    }

    pub fn custom(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.item
            .custom_metadata
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> CheckpointItem {
        self.item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::rubric::{LlmRubricTrait, RegexTrait};

    #[test]
    fn test_builder_basic() {
        let cp = CheckpointBuilder::new()
            .name("Demo")
            .global_trait(LlmRubricTrait::boolean("concise"))
            .item("q1", |q| {
                q.question("2+2?")
                    .raw_answer("4")
                    .template("class Answer: ...")
                    .rubric_trait(RegexTrait::new("digits", r"\d+"))
                    .custom("difficulty", "easy")
            })
            .build();

        assert_eq!(cp.version, "2.0");
        assert_eq!(cp.dataset_metadata.as_ref().unwrap().name.as_deref(), Some("Demo"));
        assert_eq!(cp.global_rubric.as_ref().unwrap().len(), 1);

        let item = &cp.checkpoint["q1"];
        assert_eq!(item.original_answer_template, "class Answer: ...");
        assert_eq!(item.question_rubric.as_ref().unwrap().len(), 1);
        assert_eq!(item.custom_metadata.as_ref().unwrap()["difficulty"], "easy");
    }

    #[test]
    fn test_original_template_not_overwritten() {
        let item = ItemBuilder::new()
            .original_template("v1")
            .template("v2")
            .build();
        assert_eq!(item.original_answer_template, "v1");
        assert_eq!(item.answer_template, "v2");
    }
}
