//! `sitefix security`: inject security meta headers and script into pages.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::core::security::{meta_patch, script_patch};
use crate::io::config::SecurityConfig;
use crate::io::discover::html_pages;
use crate::io::patch_file::{FileChange, FileReport, patch_file};

/// Outcome of both security patches for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSecurity {
    pub file: String,
    pub headers: FileChange,
    pub script: FileChange,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SecuritySummary {
    pub pages: Vec<PageSecurity>,
}

impl SecuritySummary {
    pub fn headers_added(&self) -> usize {
        self.pages.iter().filter(|p| p.headers.is_changed()).count()
    }

    pub fn scripts_added(&self) -> usize {
        self.pages.iter().filter(|p| p.script.is_changed()).count()
    }
}

/// Patch every top-level HTML page under `root`.
///
/// A page that cannot be read or written is recorded as failed and the
/// remaining pages are still processed.
pub fn apply_security(root: &Path, cfg: &SecurityConfig) -> Result<SecuritySummary> {
    let pages = html_pages(root).context("list html pages")?;
    let meta_rule = meta_patch(&cfg.marker, &cfg.headers);
    let script_rule = script_patch(&cfg.script_marker, &cfg.script_src);
    info!(pages = pages.len(), "applying security headers");

    let mut summary = SecuritySummary::default();
    for path in pages {
        let headers = FileReport::from_result(root, &path, patch_file(&path, &meta_rule));
        let script = FileReport::from_result(root, &path, patch_file(&path, &script_rule));
        summary.pages.push(PageSecurity {
            file: headers.file,
            headers: headers.change,
            script: script.change,
        });
    }
    Ok(summary)
}
