//! Site configuration stored in `sitefix.toml` at the site root.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::security::{MetaHeader, default_headers, render_meta_block, render_script_block};

/// Default config file name, looked up in the site root.
pub const CONFIG_FILE: &str = "sitefix.toml";

/// Site configuration (TOML).
///
/// Every field has a default, so an absent file or a partial file behaves
/// like the stock settings for the site.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiteConfig {
    pub security: SecurityConfig,
    pub css: CssConfig,
    pub fonts: FontsConfig,
    pub images: ImagesConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SecurityConfig {
    /// Substring proving the meta headers were already injected.
    pub marker: String,
    /// Substring proving the security script was already injected.
    pub script_marker: String,
    pub script_src: String,
    pub headers: Vec<MetaHeader>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            marker: "X-Frame-Options".to_string(),
            script_marker: "security-headers.js".to_string(),
            script_src: "assets/js/security-headers.js".to_string(),
            headers: default_headers(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CssConfig {
    /// Stylesheets whose href contains one of these are deferred.
    pub deferred: Vec<String>,
}

impl Default for CssConfig {
    fn default() -> Self {
        Self {
            deferred: vec!["bootstrap".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FontsConfig {
    /// Value written into `font-display`.
    pub display: String,
    /// Directories whose top-level `*.css` files are scanned.
    pub css_dirs: Vec<PathBuf>,
    /// Directories scanned recursively for `*.css`.
    pub vendor_dirs: Vec<PathBuf>,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            display: "swap".to_string(),
            css_dirs: vec![PathBuf::from("assets/css")],
            vendor_dirs: vec![PathBuf::from("vendor")],
        }
    }
}

/// Target encoding for re-encoded images.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Webp,
    Jpeg,
}

/// One image to re-encode, paths relative to the site root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub quality: u8,
}

impl ImageJob {
    fn slide(n: u8, quality: u8) -> Self {
        Self {
            input: PathBuf::from(format!("assets/images/slide_{n:02}.jpg")),
            output: PathBuf::from(format!("assets/images/slide_{n:02}.webp")),
            quality,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ImagesConfig {
    pub max_width: u32,
    pub format: OutputFormat,
    /// Stylesheet expected to reference every job output.
    pub stylesheet: PathBuf,
    pub jobs: Vec<ImageJob>,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            max_width: 1200,
            format: OutputFormat::Webp,
            stylesheet: PathBuf::from("assets/css/templatemo-finance-business.css"),
            // The first slide is the LCP element, so it keeps more quality.
            jobs: vec![
                ImageJob::slide(1, 85),
                ImageJob::slide(2, 80),
                ImageJob::slide(3, 80),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    pub htaccess: PathBuf,
    /// Directives that must all appear in the `.htaccess` file.
    pub directives: Vec<String>,
    /// Resources at least this large are listed individually.
    pub large_file_bytes: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            htaccess: PathBuf::from(".htaccess"),
            directives: [
                "ExpiresActive On",
                "image/jpeg",
                "image/webp",
                "text/css",
                "application/javascript",
                "font/woff2",
                "Cache-Control",
                "max-age=31536000",
                "immutable",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            large_file_bytes: 50_000,
        }
    }
}

impl SiteConfig {
    pub fn validate(&self) -> Result<()> {
        if self.security.marker.trim().is_empty() {
            return Err(anyhow!("security.marker must not be empty"));
        }
        if self.security.script_marker.trim().is_empty() {
            return Err(anyhow!("security.script_marker must not be empty"));
        }
        if self.security.headers.is_empty() {
            return Err(anyhow!("security.headers must be a non-empty array"));
        }
        // Each marker must occur in its own insertion.
        if !render_meta_block(&self.security.headers).contains(&self.security.marker) {
            return Err(anyhow!(
                "security.marker {:?} does not appear in the rendered security.headers",
                self.security.marker
            ));
        }
        if !render_script_block(&self.security.script_src).contains(&self.security.script_marker) {
            return Err(anyhow!(
                "security.script_marker {:?} does not appear in security.script_src {:?}",
                self.security.script_marker,
                self.security.script_src
            ));
        }
        if self.css.deferred.iter().any(|needle| needle.trim().is_empty()) {
            return Err(anyhow!("css.deferred entries must not be empty"));
        }
        if self.fonts.display.trim().is_empty() {
            return Err(anyhow!("fonts.display must not be empty"));
        }
        if self.images.max_width == 0 {
            return Err(anyhow!("images.max_width must be > 0"));
        }
        for job in &self.images.jobs {
            if !(1..=100).contains(&job.quality) {
                return Err(anyhow!(
                    "images.jobs quality for {} must be within 1..=100 (got {})",
                    job.input.display(),
                    job.quality
                ));
            }
        }
        Ok(())
    }
}

/// Resolve the config path: explicit override, else `<root>/sitefix.toml`.
pub fn config_path(root: &Path, explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => root.join(CONFIG_FILE),
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `SiteConfig::default()`.
pub fn load_config(path: &Path) -> Result<SiteConfig> {
    if !path.exists() {
        let cfg = SiteConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: SiteConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &SiteConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, SiteConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE);
        fs::write(
            &path,
            "[images]\nmax_width = 800\nformat = \"jpeg\"\n\n[css]\ndeferred = [\"bootstrap\", \"owl\"]\n",
        )
        .expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.images.max_width, 800);
        assert_eq!(cfg.images.format, OutputFormat::Jpeg);
        assert_eq!(cfg.images.jobs, ImagesConfig::default().jobs);
        assert_eq!(cfg.css.deferred, vec!["bootstrap", "owl"]);
        assert_eq!(cfg.security, SecurityConfig::default());
    }

    #[test]
    fn rejects_out_of_range_quality() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE);
        fs::write(
            &path,
            "[[images.jobs]]\ninput = \"a.png\"\noutput = \"a.webp\"\nquality = 0\n",
        )
        .expect("write");
        let err = load_config(&path).expect_err("quality 0 must fail");
        assert!(err.to_string().contains("1..=100"));
    }

    #[test]
    fn rejects_marker_missing_from_insertion() {
        let mut cfg = SiteConfig::default();
        cfg.security.headers = vec![MetaHeader::new("Referrer-Policy", "no-referrer")];
        let err = cfg.validate().expect_err("marker absent from headers");
        assert!(err.to_string().contains("security.marker"));

        let mut cfg = SiteConfig::default();
        cfg.security.script_src = "assets/js/hardening.js".to_string();
        let err = cfg.validate().expect_err("script marker absent from src");
        assert!(err.to_string().contains("security.script_marker"));
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE);
        write_config(&path, &SiteConfig::default()).expect("write");
        assert_eq!(load_config(&path).expect("load"), SiteConfig::default());
    }

    #[test]
    fn explicit_path_overrides_root() {
        let root = Path::new("/site");
        assert_eq!(config_path(root, None), PathBuf::from("/site/sitefix.toml"));
        let explicit = Path::new("/etc/custom.toml");
        assert_eq!(config_path(root, Some(explicit)), explicit);
    }
}
