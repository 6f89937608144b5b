//! # Project Workspace
//!
//! All pads of a project keyed by file path, sharing one attribute pool.
//! The workspace is where disk files and pads meet: file text is synced into
//! the matching pad, and pads are rendered back to file text, with the codec
//! picked from the path's extension.
//!
//! The workspace is a plain owned value; hosts that share it across threads
//! wrap it in their own lock.

use crate::{DocumentFormat, EditorError, PadDocument};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use texpad_changeset::MemoryAttributePool;
use texpad_parser::sanitize_markup;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOptions {
    /// Paths ending in one of these use the markup codec
    pub markup_extensions: Vec<String>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            markup_extensions: vec![".tex".to_string(), ".txt".to_string()],
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pool: MemoryAttributePool,
    pads: BTreeMap<PathBuf, PadDocument>,
    #[serde(skip)]
    options: SyncOptions,
}

impl Workspace {
    pub fn new(options: SyncOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Restore a workspace snapshot written by [`Workspace::to_json`]
    pub fn from_json(json: &str, options: SyncOptions) -> Result<Self, EditorError> {
        let mut workspace: Workspace = serde_json::from_str(json)?;
        workspace.options = options;
        Ok(workspace)
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    pub fn pool(&self) -> &MemoryAttributePool {
        &self.pool
    }

    pub fn pad(&self, path: &Path) -> Option<&PadDocument> {
        self.pads.get(path)
    }

    pub fn pads(&self) -> impl Iterator<Item = &PadDocument> {
        self.pads.values()
    }

    pub fn format_for(&self, path: &Path) -> DocumentFormat {
        DocumentFormat::for_path(path, &self.options.markup_extensions)
    }

    /// Bring the pad for `path` in line with `contents`, creating it if needed.
    ///
    /// With `append` the parsed contents are added after the pad's current
    /// content instead of replacing it. Returns whether the pad changed.
    #[instrument(skip_all, fields(path = %path.display(), append = append))]
    pub fn sync_from_disk(
        &mut self,
        path: &Path,
        contents: &str,
        append: bool,
    ) -> Result<bool, EditorError> {
        let format = self.format_for(path);
        let pad = self
            .pads
            .entry(path.to_path_buf())
            .or_insert_with(|| PadDocument::new(path));

        let changed = pad.set_tagged(format.parse(contents), append, &mut self.pool)?;
        if changed {
            info!(revision = pad.revision, ?format, "Synced file into pad");
        } else {
            debug!("Pad already up to date");
        }
        Ok(changed)
    }

    /// Read `path` from disk and sync it
    pub fn sync_file(&mut self, path: &Path, append: bool) -> Result<bool, EditorError> {
        let contents = std::fs::read_to_string(path)?;
        self.sync_from_disk(path, &contents, append)
    }

    /// File text for the pad at `path`
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn render_for_disk(&self, path: &Path) -> Result<String, EditorError> {
        let pad = self
            .pads
            .get(path)
            .ok_or_else(|| EditorError::PadNotFound(path.to_path_buf()))?;
        pad.export(self.format_for(path), &self.pool)
    }

    /// Make the pad at `to` a copy of the pad at `from`
    pub fn copy_pad(&mut self, from: &Path, to: &Path) -> Result<bool, EditorError> {
        let source = self
            .pads
            .get(from)
            .cloned()
            .ok_or_else(|| EditorError::PadNotFound(from.to_path_buf()))?;
        let target = self
            .pads
            .entry(to.to_path_buf())
            .or_insert_with(|| PadDocument::new(to));
        target.copy_from(&source, &mut self.pool)
    }

    /// Replace a span of a pad's text with a brace-balanced value
    pub fn replace_value(
        &mut self,
        path: &Path,
        start: usize,
        len: usize,
        value: &str,
    ) -> Result<u64, EditorError> {
        let pad = self
            .pads
            .get_mut(path)
            .ok_or_else(|| EditorError::PadNotFound(path.to_path_buf()))?;
        pad.replace_range(start, len, &sanitize_markup(value), &self.pool)
    }
}
