//! Render-blocking stylesheet audit.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use sitefix::core::css_defer::{LinkInventory, StylesheetStatus, classify, inventory};
use sitefix::io::config::CssConfig;
use sitefix::io::discover::{display_path, html_pages};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageCss {
    pub file: String,
    /// Status per configured stylesheet needle, in config order.
    pub statuses: Vec<(String, StylesheetStatus)>,
    pub links: LinkInventory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageCss {
    pub fn is_optimized(&self) -> bool {
        self.error.is_none()
            && !self.statuses.is_empty()
            && self
                .statuses
                .iter()
                .all(|(_, status)| *status == StylesheetStatus::Optimized)
    }

    pub fn needs_deferral(&self) -> bool {
        self.statuses
            .iter()
            .any(|(_, status)| *status == StylesheetStatus::Blocking)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CssAudit {
    pub pages: Vec<PageCss>,
}

impl CssAudit {
    pub fn optimized(&self) -> Vec<&str> {
        self.pages
            .iter()
            .filter(|p| p.is_optimized())
            .map(|p| p.file.as_str())
            .collect()
    }

    pub fn needs_deferral(&self) -> Vec<&str> {
        self.pages
            .iter()
            .filter(|p| p.needs_deferral())
            .map(|p| p.file.as_str())
            .collect()
    }

    pub fn total_blocking(&self) -> usize {
        self.pages.iter().map(|p| p.links.blocking.len()).sum()
    }

    pub fn total_preloaded(&self) -> usize {
        self.pages.iter().map(|p| p.links.preloaded).sum()
    }
}

pub fn audit_css(root: &Path, cfg: &CssConfig) -> Result<CssAudit> {
    let pages = html_pages(root)
        .context("list html pages")?
        .iter()
        .map(|path| {
            let file = display_path(root, path);
            match fs::read_to_string(path) {
                Ok(contents) => PageCss {
                    file,
                    statuses: cfg
                        .deferred
                        .iter()
                        .map(|needle| (needle.clone(), classify(&contents, needle)))
                        .collect(),
                    links: inventory(&contents),
                    error: None,
                },
                Err(err) => {
                    warn!(file = %file, error = %err, "unreadable page");
                    PageCss {
                        file,
                        statuses: Vec::new(),
                        links: LinkInventory::default(),
                        error: Some(err.to_string()),
                    }
                }
            }
        })
        .collect();
    Ok(CssAudit { pages })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitefix::defer_css::apply_defer_css;
    use sitefix::test_support::{TestSite, sample_page};

    #[test]
    fn reports_blocking_then_optimized() {
        let site = TestSite::new().expect("site");
        site.write("index.html", sample_page("Home")).expect("write");
        site.write("plain.html", "<html><head></head></html>").expect("write");
        let cfg = CssConfig::default();

        let before = audit_css(site.path(), &cfg).expect("audit");
        assert_eq!(before.needs_deferral(), vec!["index.html"]);
        assert!(before.optimized().is_empty());
        assert_eq!(before.total_blocking(), 2);
        assert_eq!(before.pages[1].statuses[0].1, StylesheetStatus::NotFound);

        apply_defer_css(site.path(), &cfg).expect("defer");
        let after = audit_css(site.path(), &cfg).expect("audit");
        assert_eq!(after.optimized(), vec!["index.html"]);
        assert!(after.needs_deferral().is_empty());
        assert_eq!(after.total_preloaded(), 1);
    }
}
