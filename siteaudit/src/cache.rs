//! Cache policy audit: `.htaccess` directives and cacheable assets.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;
use sitefix::core::scan::{Check, FileScan, NamedCheck, scan_text};
use sitefix::io::config::CacheConfig;
use sitefix::io::discover::{display_path, files_with_extensions};
use tracing::{debug, warn};

/// Asset categories and the extensions that belong to them.
pub const CATEGORIES: &[(&str, &[&str])] = &[
    ("Images", &["jpg", "jpeg", "png", "webp", "svg", "gif"]),
    ("CSS", &["css"]),
    ("JavaScript", &["js"]),
    ("Fonts", &["woff", "woff2", "ttf", "otf", "eot"]),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LargeFile {
    pub file: String,
    pub bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryUsage {
    pub category: String,
    pub files: usize,
    pub bytes: u64,
    /// Files at or above the configured size threshold.
    pub large: Vec<LargeFile>,
    /// Walk or stat failures; the affected files are left out of the totals.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheAudit {
    pub htaccess: String,
    /// `None` when the `.htaccess` file is missing.
    pub directives: Option<FileScan>,
    /// Only collected once every directive is present.
    pub resources: Option<Vec<CategoryUsage>>,
}

impl CacheAudit {
    pub fn config_ok(&self) -> bool {
        self.directives
            .as_ref()
            .is_some_and(|scan| scan.error.is_none() && scan.results.iter().all(|(_, ok)| *ok))
    }

    pub fn total_files(&self) -> usize {
        self.resources.iter().flatten().map(|c| c.files).sum()
    }

    pub fn total_bytes(&self) -> u64 {
        self.resources.iter().flatten().map(|c| c.bytes).sum()
    }
}

pub fn audit_cache(root: &Path, cfg: &CacheConfig) -> Result<CacheAudit> {
    let path = root.join(&cfg.htaccess);
    let htaccess = display_path(root, &path);
    if !path.exists() {
        debug!(path = %path.display(), "no .htaccess");
        return Ok(CacheAudit {
            htaccess,
            directives: None,
            resources: None,
        });
    }

    let checks: Vec<NamedCheck> = cfg
        .directives
        .iter()
        .map(|directive| NamedCheck::new(directive.clone(), Check::contains(directive.clone())))
        .collect();
    let directives = match fs::read_to_string(&path) {
        Ok(contents) => scan_text(htaccess.clone(), &contents, &checks),
        Err(err) => FileScan::unreadable(htaccess.clone(), err.to_string()),
    };

    let mut audit = CacheAudit {
        htaccess,
        directives: Some(directives),
        resources: None,
    };
    if audit.config_ok() {
        audit.resources = Some(inventory(root, cfg.large_file_bytes));
    }
    Ok(audit)
}

fn inventory(root: &Path, large_file_bytes: u64) -> Vec<CategoryUsage> {
    CATEGORIES
        .iter()
        .map(|(category, extensions)| match files_with_extensions(root, extensions) {
            Ok(paths) => tally(root, category, &paths, large_file_bytes),
            Err(err) => {
                warn!(category, error = %format!("{err:#}"), "asset walk failed");
                let mut usage = tally(root, category, &[], large_file_bytes);
                usage.errors.push(format!("{err:#}"));
                usage
            }
        })
        .collect()
}

fn tally(root: &Path, category: &str, paths: &[PathBuf], large_file_bytes: u64) -> CategoryUsage {
    let mut usage = CategoryUsage {
        category: category.to_string(),
        files: 0,
        bytes: 0,
        large: Vec::new(),
        errors: Vec::new(),
    };
    for path in paths {
        let file = display_path(root, path);
        let bytes = match fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(err) => {
                warn!(file = %file, error = %err, "stat failed");
                usage.errors.push(format!("stat {file}: {err}"));
                continue;
            }
        };
        usage.files += 1;
        usage.bytes += bytes;
        if bytes >= large_file_bytes {
            usage.large.push(LargeFile { file, bytes });
        }
    }
    usage
}
