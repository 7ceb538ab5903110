//! Converts Tiled TMX maps into a compact big-endian binary map format.
//!
//! The usual entry point is [`export::export_file`]. Callers that already have
//! a [`model::TileMap`] can use [`export::encode`] directly.

pub mod classify;
pub mod encode;
pub mod error;
pub mod export;
pub mod model;
pub mod schema;
pub mod source;

pub use error::{ExportError, Result};
pub use export::{export_file, ExportSummary};
pub use schema::SchemaConfig;
