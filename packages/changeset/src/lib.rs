//! # Texpad Changesets
//!
//! Delta encoding between tagged-character documents in the pad's compact
//! changeset format, plus the pieces a host needs around it: the attribute
//! pool, the op lexer, the attributed-text reader and a reference applier.
//!
//! ```text
//! disk text ─→ parser ─→ tagged chars ─┐
//!                                      ├─→ encode ─→ Changeset ─→ pad
//! pad text + attribs ─→ decode ────────┘
//! ```

pub mod apply;
pub mod changeset;
pub mod encoder;
pub mod error;
pub mod ops;
pub mod pool;
pub mod radix;
pub mod reader;

pub use apply::AttributedText;
pub use changeset::Changeset;
pub use encoder::{diff_spans, encode, encode_replace, Span, SpanKind, PLACEHOLDER};
pub use error::{ChangesetError, ChangesetResult};
pub use ops::{push_run, Op, OpIter, OpKind};
pub use pool::{Attribute, AttributePool, MemoryAttributePool};
pub use reader::decode;
