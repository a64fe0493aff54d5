//! Font display audit: `@font-face` rules and Google Fonts links.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use sitefix::core::fonts::{FontFace, GoogleFontLink, font_faces, google_font_links};
use sitefix::core::scan::{Check, NamedCheck, ScanSummary, percentage};
use sitefix::io::config::FontsConfig;
use sitefix::io::discover::{display_path, html_pages, stylesheets};
use sitefix::io::scan::scan_paths;

/// Label of the scanner check for pages loading Google Fonts with `display=swap`.
pub const SWAP_CHECK: &str = "google fonts display=swap";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFonts<T> {
    pub file: String,
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FontAudit {
    pub stylesheets: Vec<FileFonts<FontFace>>,
    pub pages: Vec<FileFonts<GoogleFontLink>>,
    /// Per-page check: Google Fonts present and `display=swap` present.
    pub swap_scan: ScanSummary,
}

impl FontAudit {
    /// `(optimized, total)` over `@font-face` rules.
    pub fn font_face_totals(&self) -> (usize, usize) {
        let faces = self.stylesheets.iter().flat_map(|s| &s.items);
        faces.fold((0, 0), |(ok, total), face| {
            (ok + usize::from(face.has_display()), total + 1)
        })
    }

    /// `(optimized, total)` over Google Fonts links.
    pub fn google_totals(&self) -> (usize, usize) {
        let links = self.pages.iter().flat_map(|p| &p.items);
        links.fold((0, 0), |(ok, total), link| {
            (ok + usize::from(link.has_display_swap), total + 1)
        })
    }

    /// Share of all font declarations that avoid invisible text while loading.
    pub fn overall_percentage(&self) -> Option<f64> {
        let (faces_ok, faces) = self.font_face_totals();
        let (links_ok, links) = self.google_totals();
        percentage(faces_ok + links_ok, faces + links)
    }

    pub fn pending(&self) -> usize {
        let (faces_ok, faces) = self.font_face_totals();
        let (links_ok, links) = self.google_totals();
        (faces - faces_ok) + (links - links_ok)
    }
}

pub fn audit_fonts(root: &Path, cfg: &FontsConfig) -> Result<FontAudit> {
    let css = stylesheets(root, cfg).context("list stylesheets")?;
    let pages = html_pages(root).context("list html pages")?;

    let stylesheets = css
        .iter()
        .map(|path| read_items(root, path, font_faces))
        .collect();
    let page_fonts = pages
        .iter()
        .map(|path| read_items(root, path, google_font_links))
        .collect();
    let checks = vec![NamedCheck::new(
        SWAP_CHECK,
        Check::all(vec![
            Check::contains("fonts.googleapis.com"),
            Check::contains("display=swap"),
        ]),
    )];
    Ok(FontAudit {
        stylesheets,
        pages: page_fonts,
        swap_scan: scan_paths(root, &pages, &checks),
    })
}

fn read_items<T>(root: &Path, path: &Path, parse: fn(&str) -> Vec<T>) -> FileFonts<T> {
    let file = display_path(root, path);
    match fs::read_to_string(path) {
        Ok(contents) => FileFonts {
            file,
            items: parse(&contents),
            error: None,
        },
        Err(err) => FileFonts {
            file,
            items: Vec::new(),
            error: Some(err.to_string()),
        },
    }
}
