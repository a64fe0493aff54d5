//! Image re-encoding: decode, optionally downscale, encode, write.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use serde::Serialize;
use tracing::debug;

use crate::core::resize::{fit_width, reduction_percent};
use crate::io::config::OutputFormat;

/// Sizes before and after one re-encode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodeReport {
    pub original_dimensions: (u32, u32),
    /// Set when the image was wider than the limit and got downscaled.
    pub resized_to: Option<(u32, u32)>,
    pub original_bytes: u64,
    pub output_bytes: u64,
}

impl EncodeReport {
    pub fn reduction_percent(&self) -> f64 {
        reduction_percent(self.original_bytes, self.output_bytes)
    }
}

/// Re-encode `input` into `output` at `quality` (1..=100).
///
/// Images wider than `max_width` are downscaled with Lanczos3, keeping the
/// aspect ratio. Alpha and palette images are flattened to RGB first.
pub fn reencode(
    input: &Path,
    output: &Path,
    quality: u8,
    max_width: u32,
    format: OutputFormat,
) -> Result<EncodeReport> {
    if !(1..=100).contains(&quality) {
        return Err(anyhow!("quality must be within 1..=100 (got {quality})"));
    }
    let original_bytes = fs::metadata(input)
        .with_context(|| format!("stat {}", input.display()))?
        .len();
    let img = image::open(input).with_context(|| format!("decode {}", input.display()))?;
    let original_dimensions = (img.width(), img.height());

    let (width, height) = fit_width(img.width(), img.height(), max_width);
    let (img, resized_to) = if (width, height) != original_dimensions {
        debug!(path = %input.display(), width, height, "downscaling");
        (
            img.resize_exact(width, height, FilterType::Lanczos3),
            Some((width, height)),
        )
    } else {
        (img, None)
    };

    let bytes = encode(&img, quality, format)
        .with_context(|| format!("encode {}", input.display()))?;
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    fs::write(output, &bytes).with_context(|| format!("write {}", output.display()))?;

    Ok(EncodeReport {
        original_dimensions,
        resized_to,
        original_bytes,
        output_bytes: bytes.len() as u64,
    })
}

fn encode(img: &DynamicImage, quality: u8, format: OutputFormat) -> Result<Vec<u8>> {
    let rgb = img.to_rgb8();
    match format {
        OutputFormat::Webp => {
            let encoded = webp::Encoder::from_rgb(rgb.as_raw(), rgb.width(), rgb.height())
                .encode(f32::from(quality));
            Ok(encoded.to_vec())
        }
        OutputFormat::Jpeg => {
            let mut buf = Vec::new();
            {
                let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
                encoder.encode_image(&rgb).context("jpeg encoder")?;
            }
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestSite;
    use image::{Rgba, RgbaImage};

    /// Noisy RGBA image so lossless PNG is comfortably larger than lossy output.
    fn write_png(site: &TestSite, rel: &str, width: u32, height: u32) -> std::path::PathBuf {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            let v = (x.wrapping_mul(7919) ^ y.wrapping_mul(104_729)) as u8;
            Rgba([v, v.wrapping_add(85), v.wrapping_mul(3), 200])
        });
        let path = site.path().join(rel);
        img.save(&path).expect("save png");
        path
    }

    #[test]
    fn downscales_wide_images_to_max_width() {
        let site = TestSite::new().expect("site");
        let input = write_png(&site, "wide.png", 300, 151);
        let output = site.path().join("out/wide.webp");

        let report = reencode(&input, &output, 80, 100, OutputFormat::Webp).expect("reencode");
        assert_eq!(report.original_dimensions, (300, 151));
        let (w, h) = report.resized_to.expect("resized");
        assert_eq!(w, 100);
        assert!((f64::from(h) - 151.0 / 3.0).abs() <= 0.5);

        let decoded = image::open(&output).expect("decode output");
        assert_eq!((decoded.width(), decoded.height()), (w, h));
        assert_eq!(report.output_bytes, fs::metadata(&output).expect("stat").len());
        assert_ne!(report.output_bytes, report.original_bytes);
    }

    #[test]
    fn narrow_images_keep_dimensions() {
        let site = TestSite::new().expect("site");
        let input = write_png(&site, "small.png", 64, 32);
        let output = site.path().join("small.jpg");

        let report = reencode(&input, &output, 70, 1200, OutputFormat::Jpeg).expect("reencode");
        assert_eq!(report.resized_to, None);
        let decoded = image::open(&output).expect("decode output");
        assert_eq!((decoded.width(), decoded.height()), (64, 32));
    }

    #[test]
    fn undecodable_input_is_an_error() {
        let site = TestSite::new().expect("site");
        let input = site.write("broken.jpg", "not an image").expect("write");
        let output = site.path().join("broken.webp");
        let err = reencode(&input, &output, 80, 1200, OutputFormat::Webp).expect_err("decode");
        assert!(format!("{err:#}").contains("decode"));
        assert!(!output.exists());
    }

    #[test]
    fn rejects_zero_quality() {
        let site = TestSite::new().expect("site");
        let input = write_png(&site, "q.png", 8, 8);
        let err = reencode(&input, &site.path().join("q.webp"), 0, 1200, OutputFormat::Webp)
            .expect_err("quality");
        assert!(err.to_string().contains("1..=100"));
    }
}
