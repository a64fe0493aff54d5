//! Image optimization audit: outputs on disk, stylesheet references, savings.

use std::fs;
use std::path::Path;

use serde::Serialize;
use sitefix::core::resize::reduction_percent;
use sitefix::core::scan::{Check, FileScan, NamedCheck, scan_text};
use sitefix::io::config::ImagesConfig;
use sitefix::io::discover::display_path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputFile {
    pub file: String,
    /// `None` when the output does not exist.
    pub bytes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Saving {
    pub input: String,
    pub original_bytes: u64,
    pub output_bytes: u64,
}

impl Saving {
    pub fn reduction_percent(&self) -> f64 {
        reduction_percent(self.original_bytes, self.output_bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImagesAudit {
    pub outputs: Vec<OutputFile>,
    pub stylesheet: String,
    /// One check per output file name; `None` when the stylesheet is missing.
    pub references: Option<FileScan>,
    /// Jobs whose input and output both exist.
    pub savings: Vec<Saving>,
}

impl ImagesAudit {
    pub fn original_bytes(&self) -> u64 {
        self.savings.iter().map(|s| s.original_bytes).sum()
    }

    pub fn output_bytes(&self) -> u64 {
        self.savings.iter().map(|s| s.output_bytes).sum()
    }

    pub fn total_reduction_percent(&self) -> Option<f64> {
        let original = self.original_bytes();
        (original > 0).then(|| reduction_percent(original, self.output_bytes()))
    }
}

fn file_size(path: &Path) -> Option<u64> {
    fs::metadata(path).ok().filter(|m| m.is_file()).map(|m| m.len())
}

pub fn audit_images(root: &Path, cfg: &ImagesConfig) -> ImagesAudit {
    let outputs = cfg
        .jobs
        .iter()
        .map(|job| OutputFile {
            file: job.output.display().to_string(),
            bytes: file_size(&root.join(&job.output)),
        })
        .collect();

    let stylesheet_path = root.join(&cfg.stylesheet);
    let stylesheet = display_path(root, &stylesheet_path);
    let checks: Vec<NamedCheck> = cfg
        .jobs
        .iter()
        .filter_map(|job| job.output.file_name())
        .map(|name| {
            let name = name.to_string_lossy().to_string();
            NamedCheck::new(name.clone(), Check::contains(name))
        })
        .collect();
    let references = if stylesheet_path.exists() {
        Some(match fs::read_to_string(&stylesheet_path) {
            Ok(contents) => scan_text(stylesheet.clone(), &contents, &checks),
            Err(err) => FileScan::unreadable(stylesheet.clone(), err.to_string()),
        })
    } else {
        None
    };

    let savings = cfg
        .jobs
        .iter()
        .filter_map(|job| {
            let original_bytes = file_size(&root.join(&job.input))?;
            let output_bytes = file_size(&root.join(&job.output))?;
            Some(Saving {
                input: job.input.display().to_string(),
                original_bytes,
                output_bytes,
            })
        })
        .collect();

    ImagesAudit {
        outputs,
        stylesheet,
        references,
        savings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitefix::test_support::TestSite;

    #[test]
    fn audits_outputs_references_and_savings() {
        let site = TestSite::new().expect("site");
        let cfg = ImagesConfig::default();
        site.write("assets/images/slide_01.jpg", vec![0_u8; 4000])
            .expect("write");
        site.write("assets/images/slide_01.webp", vec![0_u8; 1000])
            .expect("write");
        site.write("assets/images/slide_02.jpg", vec![0_u8; 10])
            .expect("write");
        site.write(
            "assets/css/templatemo-finance-business.css",
            ".slide-1 { background: url(../images/slide_01.webp); }",
        )
        .expect("write");

        let audit = audit_images(site.path(), &cfg);
        assert_eq!(audit.outputs[0].bytes, Some(1000));
        assert_eq!(audit.outputs[1].bytes, None);

        let refs = audit.references.as_ref().expect("stylesheet scanned");
        assert!(refs.passed("slide_01.webp"));
        assert!(!refs.passed("slide_02.webp"));

        assert_eq!(audit.savings.len(), 1);
        assert_eq!(audit.savings[0].reduction_percent(), 75.0);
        assert_eq!(audit.total_reduction_percent(), Some(75.0));
    }

    #[test]
    fn missing_stylesheet_has_no_references() {
        let site = TestSite::new().expect("site");
        let audit = audit_images(site.path(), &ImagesConfig::default());
        assert!(audit.references.is_none());
        assert!(audit.savings.is_empty());
        assert_eq!(audit.total_reduction_percent(), None);
    }
}
