//! Locating site files relative to an explicit root.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;
use walkdir::WalkDir;

use crate::io::config::FontsConfig;

/// `*.html` files directly in `root`, sorted by name.
pub fn html_pages(root: &Path) -> Result<Vec<PathBuf>> {
    files_in(root, 1, &["html"])
}

/// Stylesheets to scan for `@font-face`: top-level files of each css dir plus
/// everything under the vendor dirs. Missing directories are skipped.
pub fn stylesheets(root: &Path, fonts: &FontsConfig) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for dir in &fonts.css_dirs {
        found.extend(files_in(&root.join(dir), 1, &["css"])?);
    }
    for dir in &fonts.vendor_dirs {
        found.extend(files_in(&root.join(dir), usize::MAX, &["css"])?);
    }
    Ok(found)
}

/// Every file under `root` whose extension is one of `extensions`
/// (case-insensitive), sorted by path.
pub fn files_with_extensions(root: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    files_in(root, usize::MAX, extensions)
}

/// `path` relative to `root` for display, falling back to the full path.
pub fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn files_in(dir: &Path, max_depth: usize, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "skipping missing directory");
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(max_depth) {
        let entry = entry.with_context(|| format!("walk {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|want| ext.eq_ignore_ascii_case(want)));
        if matches {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}
