//! `sitefix fonts`: add `font-display` to web fonts.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::core::fonts::{add_display_swap, add_font_display};
use crate::io::config::FontsConfig;
use crate::io::discover::{html_pages, stylesheets};
use crate::io::patch_file::{FileReport, counted, rewrite_in_place};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FontsSummary {
    /// `@font-face` rewrites, one entry per stylesheet.
    pub stylesheets: Vec<FileReport>,
    /// Google Fonts link rewrites, one entry per page.
    pub pages: Vec<FileReport>,
}

impl FontsSummary {
    pub fn stylesheets_changed(&self) -> usize {
        self.stylesheets.iter().filter(|r| r.change.is_changed()).count()
    }

    pub fn pages_changed(&self) -> usize {
        self.pages.iter().filter(|r| r.change.is_changed()).count()
    }
}

pub fn apply_font_display(root: &Path, cfg: &FontsConfig) -> Result<FontsSummary> {
    let css = stylesheets(root, cfg).context("list stylesheets")?;
    let pages = html_pages(root).context("list html pages")?;
    info!(stylesheets = css.len(), pages = pages.len(), "adding font-display");

    let stylesheets = css
        .iter()
        .map(|path| {
            let result = rewrite_in_place(path, |contents| {
                counted(add_font_display(contents, &cfg.display), "@font-face rules")
            });
            FileReport::from_result(root, path, result)
        })
        .collect();
    let pages = pages
        .iter()
        .map(|path| {
            let result = rewrite_in_place(path, |contents| {
                counted(add_display_swap(contents), "Google Fonts links")
            });
            FileReport::from_result(root, path, result)
        })
        .collect();
    Ok(FontsSummary { stylesheets, pages })
}
