//! In-place file rewriting with per-file outcomes.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, warn};

use crate::core::rules::{MarkerPatch, PatchOutcome};
use crate::io::discover::display_path;

/// What a rewrite function decided for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    Changed { content: String, detail: String },
    Unchanged { reason: String },
}

/// Per-file result of a patch command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileChange {
    Changed { detail: String },
    Unchanged { reason: String },
    Failed { error: String },
}

impl FileChange {
    pub fn is_changed(&self) -> bool {
        matches!(self, FileChange::Changed { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FileChange::Failed { .. })
    }
}

/// A [`FileChange`] tagged with the root-relative file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub file: String,
    #[serde(flatten)]
    pub change: FileChange,
}

impl FileReport {
    /// Fold an I/O error into a `Failed` entry so the batch can continue.
    pub fn from_result(root: &Path, path: &Path, result: Result<FileChange>) -> Self {
        let file = display_path(root, path);
        let change = match result {
            Ok(change) => change,
            Err(err) => {
                warn!(file = %file, error = %format!("{err:#}"), "patch failed");
                FileChange::Failed {
                    error: format!("{err:#}"),
                }
            }
        };
        Self { file, change }
    }
}

/// Read `path`, let `rewrite` decide, and write back only on change.
pub fn rewrite_in_place<F>(path: &Path, rewrite: F) -> Result<FileChange>
where
    F: FnOnce(&str) -> Rewrite,
{
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    match rewrite(&contents) {
        Rewrite::Changed { content, detail } => {
            fs::write(path, content).with_context(|| format!("write {}", path.display()))?;
            debug!(path = %path.display(), detail = %detail, "file patched");
            Ok(FileChange::Changed { detail })
        }
        Rewrite::Unchanged { reason } => {
            debug!(path = %path.display(), reason = %reason, "file unchanged");
            Ok(FileChange::Unchanged { reason })
        }
    }
}

/// Apply a marker-gated patch to a file in place.
pub fn patch_file(path: &Path, patch: &MarkerPatch) -> Result<FileChange> {
    rewrite_in_place(path, |contents| match patch.apply(contents) {
        PatchOutcome::Changed { content, anchor } => Rewrite::Changed {
            content,
            detail: format!("inserted at {anchor}"),
        },
        PatchOutcome::AlreadyApplied => Rewrite::Unchanged {
            reason: "already present".to_string(),
        },
        PatchOutcome::NoAnchor => Rewrite::Unchanged {
            reason: "no anchor found".to_string(),
        },
    })
}

/// Wrap a counting rewrite (`(new_content, changes)`) as a [`Rewrite`].
pub fn counted(updated: (String, usize), noun: &str) -> Rewrite {
    match updated {
        (_, 0) => Rewrite::Unchanged {
            reason: format!("no {noun} to update"),
        },
        (content, count) => Rewrite::Changed {
            content,
            detail: format!("{count} {noun} updated"),
        },
    }
}
