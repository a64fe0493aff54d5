//! `sitefix images`: re-encode the configured images.

use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::core::resize::reduction_percent;
use crate::io::config::ImagesConfig;
use crate::io::image::{EncodeReport, reencode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImageOutcome {
    Encoded(EncodeReport),
    /// The input file does not exist; the job was skipped.
    Missing,
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageResult {
    pub input: String,
    pub output: String,
    pub quality: u8,
    pub outcome: ImageOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImagesSummary {
    pub results: Vec<ImageResult>,
}

impl ImagesSummary {
    fn encoded(&self) -> impl Iterator<Item = &EncodeReport> {
        self.results.iter().filter_map(|r| match &r.outcome {
            ImageOutcome::Encoded(report) => Some(report),
            _ => None,
        })
    }

    pub fn original_bytes(&self) -> u64 {
        self.encoded().map(|r| r.original_bytes).sum()
    }

    pub fn output_bytes(&self) -> u64 {
        self.encoded().map(|r| r.output_bytes).sum()
    }

    /// Overall reduction across encoded images, `None` if nothing was encoded.
    pub fn total_reduction_percent(&self) -> Option<f64> {
        let original = self.original_bytes();
        (original > 0).then(|| reduction_percent(original, self.output_bytes()))
    }
}

/// Run every configured job. Missing inputs and codec errors are recorded
/// per job; the remaining jobs still run.
pub fn optimize_images(root: &Path, cfg: &ImagesConfig) -> ImagesSummary {
    info!(jobs = cfg.jobs.len(), max_width = cfg.max_width, "optimizing images");
    let results = cfg
        .jobs
        .iter()
        .map(|job| {
            let input = root.join(&job.input);
            let output = root.join(&job.output);
            let outcome = if !input.exists() {
                ImageOutcome::Missing
            } else {
                match reencode(&input, &output, job.quality, cfg.max_width, cfg.format) {
                    Ok(report) => ImageOutcome::Encoded(report),
                    Err(err) => {
                        warn!(input = %input.display(), error = %format!("{err:#}"), "re-encode failed");
                        ImageOutcome::Failed {
                            error: format!("{err:#}"),
                        }
                    }
                }
            };
            ImageResult {
                input: job.input.display().to_string(),
                output: job.output.display().to_string(),
                quality: job.quality,
                outcome,
            }
        })
        .collect();
    ImagesSummary { results }
}
