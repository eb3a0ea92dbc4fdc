//! Utility modules.

pub mod datetime;

pub use datetime::{format_epoch_millis, now_rfc3339};
