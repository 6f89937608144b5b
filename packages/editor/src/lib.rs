//! # Texpad Editor
//!
//! Pad-side document handling for Texpad projects.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: markup / plain text ⇄ tagged chars  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ changeset: tagged chars → pad changesets    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: pads + shared pool                  │
//! │  - Sync disk text into pads                 │
//! │  - Render pads back to disk text            │
//! │  - Copy pads, targeted value replacement    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use texpad_editor::{SyncOptions, Workspace};
//!
//! let mut workspace = Workspace::new(SyncOptions::default());
//! workspace.sync_from_disk(path, &contents, false)?;
//! let text = workspace.render_for_disk(path)?;
//! ```

mod document;
mod errors;
mod workspace;

pub use document::{DocumentFormat, PadDocument};
pub use errors::EditorError;
pub use workspace::{SyncOptions, Workspace};

// Re-export common types for convenience
pub use texpad_changeset::{AttributePool, Changeset, MemoryAttributePool};
pub use texpad_parser::TaggedChar;
