//! Audit command implementations.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use sitefix::io::config::SiteConfig;
use tracing::info;

use crate::cache::{CacheAudit, audit_cache};
use crate::css::{CssAudit, audit_css};
use crate::fonts::{FontAudit, audit_fonts};
use crate::images::{ImagesAudit, audit_images};
use crate::report;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audit {
    Css,
    Fonts,
    Cache,
    Images,
    All,
}

/// Every report in one document, for `all --json`.
#[derive(Debug, Serialize)]
pub struct FullAudit {
    pub css: CssAudit,
    pub fonts: FontAudit,
    pub cache: CacheAudit,
    pub images: ImagesAudit,
}

fn json<T: Serialize>(value: &T) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value).context("serialize audit")?;
    out.push('\n');
    Ok(out)
}

/// Run one audit (or all of them) and return the rendered output.
pub fn run_audit(root: &Path, cfg: &SiteConfig, audit: Audit, as_json: bool) -> Result<String> {
    info!(root = %root.display(), ?audit, as_json, "running audit");
    match audit {
        Audit::Css => {
            let result = audit_css(root, &cfg.css)?;
            if as_json { json(&result) } else { Ok(report::render_css(&result)) }
        }
        Audit::Fonts => {
            let result = audit_fonts(root, &cfg.fonts)?;
            if as_json { json(&result) } else { Ok(report::render_fonts(&result)) }
        }
        Audit::Cache => {
            let result = audit_cache(root, &cfg.cache)?;
            if as_json { json(&result) } else { Ok(report::render_cache(&result)) }
        }
        Audit::Images => {
            let result = audit_images(root, &cfg.images);
            if as_json { json(&result) } else { Ok(report::render_images(&result)) }
        }
        Audit::All => {
            let full = FullAudit {
                css: audit_css(root, &cfg.css)?,
                fonts: audit_fonts(root, &cfg.fonts)?,
                cache: audit_cache(root, &cfg.cache)?,
                images: audit_images(root, &cfg.images),
            };
            if as_json {
                return json(&full);
            }
            Ok([
                report::render_css(&full.css),
                report::render_fonts(&full.fonts),
                report::render_cache(&full.cache),
                report::render_images(&full.images),
            ]
            .join("\n"))
        }
    }
}
