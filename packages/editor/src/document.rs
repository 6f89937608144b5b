//! # Pad Document
//!
//! In-memory pad: attributed text plus a revision counter. Every change is
//! expressed as a changeset and applied with the pad host's semantics, so
//! the document always holds exactly what a real pad would.
//!
//! ## Sync
//!
//! ```text
//! disk text → parse (markup or plain) → tagged chars ─┐
//!                                                     ├→ encode → apply
//! pad content → decode ───────────────→ tagged chars ─┘
//! ```

use crate::EditorError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use texpad_changeset::{encode, encode_replace, AttributePool, AttributedText, Changeset};
use texpad_parser::{parse, plain, serialize, TaggedChar};
use tracing::debug;

/// How a file's text maps to tagged characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentFormat {
    Markup,
    Plain,
}

impl DocumentFormat {
    /// Markup for paths ending in one of `markup_extensions`, plain otherwise
    pub fn for_path(path: &Path, markup_extensions: &[String]) -> Self {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if markup_extensions.iter().any(|ext| name.ends_with(ext.as_str())) {
            DocumentFormat::Markup
        } else {
            DocumentFormat::Plain
        }
    }

    pub fn parse(self, text: &str) -> Vec<TaggedChar> {
        match self {
            DocumentFormat::Markup => parse(text),
            DocumentFormat::Plain => plain::to_tagged(text),
        }
    }

    pub fn render(self, chars: &[TaggedChar]) -> String {
        match self {
            DocumentFormat::Markup => serialize(chars),
            DocumentFormat::Plain => plain::to_text(chars),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PadDocument {
    pub path: PathBuf,
    pub content: AttributedText,
    /// Number of changesets applied so far
    pub revision: u64,
}

impl PadDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            content: AttributedText::default(),
            revision: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.content.text
    }

    pub fn tagged_chars<P: AttributePool + ?Sized>(
        &self,
        pool: &P,
    ) -> Result<Vec<TaggedChar>, EditorError> {
        Ok(self.content.tagged_chars(pool)?)
    }

    /// Apply a changeset, returning the new revision
    pub fn apply<P: AttributePool + ?Sized>(
        &mut self,
        changeset: &Changeset,
        pool: &P,
    ) -> Result<u64, EditorError> {
        self.content = self.content.apply(changeset, pool)?;
        self.revision += 1;
        debug!(
            path = %self.path.display(),
            revision = self.revision,
            changeset = %changeset,
            "Applied changeset"
        );
        Ok(self.revision)
    }

    /// Move the pad to `to` (or append it), returning whether anything changed
    pub fn set_tagged<P: AttributePool + ?Sized>(
        &mut self,
        to: Vec<TaggedChar>,
        append: bool,
        pool: &mut P,
    ) -> Result<bool, EditorError> {
        let from = self.tagged_chars(&*pool)?;
        let to = if append {
            let mut combined = from.clone();
            combined.extend(to);
            combined
        } else {
            to
        };

        match encode(&from, &to, pool)? {
            Some(changeset) => {
                self.apply(&changeset, &*pool)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn set_markup<P: AttributePool + ?Sized>(
        &mut self,
        markup: &str,
        append: bool,
        pool: &mut P,
    ) -> Result<bool, EditorError> {
        self.set_tagged(parse(markup), append, pool)
    }

    pub fn set_plain_text<P: AttributePool + ?Sized>(
        &mut self,
        text: &str,
        append: bool,
        pool: &mut P,
    ) -> Result<bool, EditorError> {
        self.set_tagged(plain::to_tagged(text), append, pool)
    }

    /// Make this pad's content match `other`'s
    pub fn copy_from<P: AttributePool + ?Sized>(
        &mut self,
        other: &PadDocument,
        pool: &mut P,
    ) -> Result<bool, EditorError> {
        let to = other.tagged_chars(&*pool)?;
        self.set_tagged(to, false, pool)
    }

    /// Replace `len` characters of the pad text at `start` with unformatted text
    pub fn replace_range<P: AttributePool + ?Sized>(
        &mut self,
        start: usize,
        len: usize,
        replacement: &str,
        pool: &P,
    ) -> Result<u64, EditorError> {
        let changeset = encode_replace(&self.content.text, start, len, replacement)?;
        self.apply(&changeset, pool)
    }

    pub fn export<P: AttributePool + ?Sized>(
        &self,
        format: DocumentFormat,
        pool: &P,
    ) -> Result<String, EditorError> {
        Ok(format.render(&self.tagged_chars(pool)?))
    }
}
