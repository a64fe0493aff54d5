//! `sitefix defer-css`: make configured stylesheets non render-blocking.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::core::css_defer::defer_stylesheets;
use crate::io::config::CssConfig;
use crate::io::discover::html_pages;
use crate::io::patch_file::{FileReport, counted, rewrite_in_place};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeferSummary {
    pub pages: Vec<FileReport>,
}

impl DeferSummary {
    pub fn changed(&self) -> usize {
        self.pages.iter().filter(|p| p.change.is_changed()).count()
    }
}

pub fn apply_defer_css(root: &Path, cfg: &CssConfig) -> Result<DeferSummary> {
    let pages = html_pages(root).context("list html pages")?;
    info!(pages = pages.len(), needles = ?cfg.deferred, "deferring stylesheets");
    let pages = pages
        .iter()
        .map(|path| {
            let result = rewrite_in_place(path, |contents| {
                counted(defer_stylesheets(contents, &cfg.deferred), "stylesheet links")
            });
            FileReport::from_result(root, path, result)
        })
        .collect();
    Ok(DeferSummary { pages })
}
