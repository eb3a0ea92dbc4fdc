//! Data model types for checkpoint conversion.
//!
//! - Internal v2.0 checkpoint (the editing-side source of truth)
//! - Rubrics and their trait families
//! - External schema.org JSON-LD document
//! - Deterministic identifiers
//! - Builders (ergonomic construction)

pub mod builder;
pub mod checkpoint;
pub mod id;
pub mod jsonld;
pub mod rubric;

pub use builder::{CheckpointBuilder, ItemBuilder};
pub use checkpoint::{
    Agent, AgentType, CheckpointItem, DatasetMetadata, SourceDocument, UnifiedCheckpoint,
};
pub use id::{derive_id, feed_item_id, rating_id, slugify, strip_id_prefix};
pub use jsonld::{
    AgentRef, Answer, DataFeed, DataFeedItem, PropertyValue, Question, Rating, SoftwareSourceCode,
};
pub use rubric::{
    CallableTrait, EvaluationMode, LlmRubricTrait, MetricRubricTrait, RegexTrait, Rubric,
    RubricTrait, TraitFamily, TraitKind, TraitScope,
};
