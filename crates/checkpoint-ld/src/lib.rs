//! Checkpoint conversion between the flat v2.0 benchmark format and
//! schema.org JSON-LD.
//!
//! This crate converts benchmark checkpoints (questions, answer templates,
//! rubrics, provenance and custom metadata) to and from an interoperable
//! `DataFeed` document, validates documents structurally, and detects which
//! of the two formats a parsed JSON value is in.
//!
//! # Quick Start
//!
//! ```rust
//! use checkpoint_ld::{CheckpointBuilder, ConversionOptions, LlmRubricTrait};
//! use checkpoint_ld::{from_document, to_document};
//!
//! let checkpoint = CheckpointBuilder::new()
//!     .global_trait(LlmRubricTrait::boolean("concise"))
//!     .item("q1", |q| q
//!         .question("What is the capital of France?")
//!         .raw_answer("Paris")
//!         .template("class Answer(BaseAnswer):\n    capital: str\n")
//!         .rubric_trait(LlmRubricTrait::score("accuracy", -10.0, 10.0))
//!     )
//!     .build();
//!
//! // Export to JSON-LD (validated before it is returned)
//! let doc = to_document(&checkpoint, &ConversionOptions::default()).unwrap();
//! assert_eq!(doc.data_feed_element.len(), 1);
//!
//! // Import back
//! let restored = from_document(&doc).unwrap();
//! assert_eq!(restored.checkpoint, checkpoint.checkpoint);
//! ```
//!
//! # Modules
//!
//! - [`model`]: Internal checkpoint, rubric and JSON-LD document types
//! - [`codec`]: Export/import between the two forms
//! - [`validate`]: Structural validation of external documents
//! - [`detect`]: Format detection for parsed JSON
//! - [`vocab`]: Wire vocabulary (type tags, property names, `@context`)
//! - [`error`]: Error type
//!
//! # Purity
//!
//! Every operation is a synchronous function of its input. Nothing is
//! cached between calls, so independent conversions can run on any number
//! of threads without coordination.

pub mod codec;
pub mod detect;
pub mod error;
pub mod model;
pub mod util;
pub mod validate;
pub mod vocab;

// Re-export commonly used types at crate root
pub use codec::{
    ConversionMetadata, ConversionOptions, from_document, load_checkpoint, parse_checkpoint,
    parse_document, rating_to_trait, to_document, to_document_at, trait_to_rating,
};
pub use detect::{CheckpointFormat, detect_format, looks_like_external, looks_like_internal};
pub use error::{ConversionError, ErrorKind, Result};
pub use model::id::derive_id;
pub use model::{
    Agent, AgentType, CallableTrait, CheckpointBuilder, CheckpointItem, DataFeed, DataFeedItem,
    DatasetMetadata, EvaluationMode, ItemBuilder, LlmRubricTrait, MetricRubricTrait, Rating,
    RegexTrait, Rubric, RubricTrait, SourceDocument, TraitKind, TraitScope, UnifiedCheckpoint,
};
pub use validate::{validate, validate_document};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Internal checkpoint format version this crate reads and writes.
pub const FORMAT_VERSION: &str = vocab::INTERNAL_FORMAT_VERSION;
