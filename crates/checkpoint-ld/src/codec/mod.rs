//! Conversion between the internal checkpoint and the JSON-LD document.
//!
//! Layered bottom-up: [`rating`] (trait <-> `Rating`), [`property`]
//! (sidecar slots), [`item`] (question <-> `DataFeedItem`) and
//! [`document`] (checkpoint <-> `DataFeed`).

pub mod document;
pub mod item;
pub mod property;
pub mod rating;

pub use document::{
    ConversionMetadata, ConversionOptions, from_document, load_checkpoint, parse_checkpoint,
    parse_document, to_document, to_document_at,
};
pub use item::{feed_entry_to_item, item_to_feed_entry};
pub use rating::{rating_to_trait, trait_to_rating, validate_score_range};
