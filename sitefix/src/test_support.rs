//! Test-only helpers for building throwaway site roots.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

pub const VIEWPORT_TAG: &str =
    r#"<meta name="viewport" content="width=device-width, initial-scale=1, shrink-to-fit=no">"#;

pub const BOOTSTRAP_LINK: &str =
    r#"<link href="vendor/bootstrap/css/bootstrap.min.css" rel="stylesheet">"#;

/// A temporary site root that is removed on drop.
pub struct TestSite {
    dir: TempDir,
}

impl TestSite {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir().context("create temp site")?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, contents: impl AsRef<[u8]>) -> Result<PathBuf> {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    pub fn read(&self, rel: &str) -> Result<String> {
        let path = self.dir.path().join(rel);
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))
    }
}

/// A minimal page: charset, viewport, blocking bootstrap, one Google Font.
pub fn sample_page(title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"utf-8\">\n    {VIEWPORT_TAG}\n    <title>{title}</title>\n    {BOOTSTRAP_LINK}\n    <link href=\"https://fonts.googleapis.com/css?family=Roboto:400,700\" rel=\"stylesheet\">\n</head>\n<body>\n    <h1>{title}</h1>\n</body>\n</html>\n"
    )
}
