//! Markup and plain-text codecs for pad documents.
//!
//! Documents are converted to and from [`TaggedChar`] sequences: one entry per
//! character, carrying the codes of the formats and structure applied to it.

pub mod parser;
pub mod plain;
pub mod sanitize;
pub mod serializer;
pub mod tables;
pub mod tagged;

pub use parser::{parse, Parser};
pub use sanitize::sanitize_markup;
pub use serializer::{serialize, Serializer};
pub use tables::{FormatTag, ListKind, MarkupTables};
pub use tagged::{glyphs, Tag, TaggedChar, HEADING_MARKER};
