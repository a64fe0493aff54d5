//! Console report rendering for the patch commands.
//!
//! Reports are built as strings so tests can assert on them; `main` prints
//! them to stdout.

use crate::core::resize::format_kb;
use crate::defer_css::DeferSummary;
use crate::fonts::FontsSummary;
use crate::images::{ImageOutcome, ImagesSummary};
use crate::io::config::SecurityConfig;
use crate::io::patch_file::{FileChange, FileReport};
use crate::security::SecuritySummary;

/// Line-oriented report buffer with emoji section headers.
#[derive(Debug, Default)]
pub struct Report {
    buf: String,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Title line underlined with `=`; preceded by a blank line unless first.
    pub fn header(&mut self, title: &str) {
        if !self.buf.is_empty() {
            self.buf.push('\n');
        }
        self.line(title);
        self.line("=".repeat(60));
    }

    pub fn line(&mut self, text: impl AsRef<str>) {
        self.buf.push_str(text.as_ref());
        self.buf.push('\n');
    }

    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

/// Status glyph and text for one file change.
pub fn change_line(change: &FileChange) -> String {
    match change {
        FileChange::Changed { detail } => format!("✅ {detail}"),
        FileChange::Unchanged { reason } => format!("✓ unchanged ({reason})"),
        FileChange::Failed { error } => format!("❌ {error}"),
    }
}

fn file_reports(report: &mut Report, files: &[FileReport]) {
    for file in files {
        report.line(format!("  📄 {}: {}", file.file, change_line(&file.change)));
    }
}

fn failed(files: &[FileReport]) -> usize {
    files.iter().filter(|f| f.change.is_failed()).count()
}

pub fn render_security(summary: &SecuritySummary, cfg: &SecurityConfig) -> String {
    let mut report = Report::new();
    report.header("🔒 APPLYING SECURITY HEADERS TO HTML PAGES");
    for page in &summary.pages {
        report.line(format!("📄 {}", page.file));
        report.line(format!("  meta tags: {}", change_line(&page.headers)));
        report.line(format!("  script:    {}", change_line(&page.script)));
    }

    report.header("📊 SUMMARY");
    report.line(format!("✅ Meta tags added to {} files", summary.headers_added()));
    report.line(format!("✅ Scripts added to {} files", summary.scripts_added()));
    report.line(format!("📁 Total files processed: {}", summary.pages.len()));

    report.header("🛡️ SECURITY HEADERS");
    for header in &cfg.headers {
        report.line(format!("✅ {}: {}", header.name, header.content));
    }
    report.line(format!("✅ Script: {}", cfg.script_src));
    report.finish()
}

pub fn render_defer(summary: &DeferSummary) -> String {
    let mut report = Report::new();
    report.header("🎨 DEFERRING RENDER-BLOCKING STYLESHEETS");
    file_reports(&mut report, &summary.pages);
    report.blank();
    report.line(format!(
        "✅ {}/{} pages updated",
        summary.changed(),
        summary.pages.len()
    ));
    let failures = failed(&summary.pages);
    if failures > 0 {
        report.line(format!("❌ {failures} pages failed"));
    }
    report.finish()
}

pub fn render_fonts(summary: &FontsSummary) -> String {
    let mut report = Report::new();
    report.header("🔤 ADDING FONT-DISPLAY TO @font-face RULES");
    if summary.stylesheets.is_empty() {
        report.line("  ❓ No stylesheets found");
    }
    file_reports(&mut report, &summary.stylesheets);

    report.header("🌐 ADDING display=swap TO GOOGLE FONTS");
    file_reports(&mut report, &summary.pages);

    report.header("📊 SUMMARY");
    report.line(format!(
        "📝 Stylesheets updated: {}/{}",
        summary.stylesheets_changed(),
        summary.stylesheets.len()
    ));
    report.line(format!(
        "🌐 Pages updated: {}/{}",
        summary.pages_changed(),
        summary.pages.len()
    ));
    report.finish()
}

pub fn render_images(summary: &ImagesSummary) -> String {
    let mut report = Report::new();
    report.header("🔥 OPTIMIZING IMAGES");
    for result in &summary.results {
        match &result.outcome {
            ImageOutcome::Missing => {
                report.line(format!("⚠️ Not found: {}", result.input));
            }
            ImageOutcome::Failed { error } => {
                report.line(format!("❌ Error processing {}: {error}", result.input));
            }
            ImageOutcome::Encoded(encoded) => {
                let (w, h) = encoded.original_dimensions;
                report.line(format!("Processing {} ({w}x{h})", result.input));
                if let Some((rw, rh)) = encoded.resized_to {
                    report.line(format!("Resized to: {rw}x{rh}"));
                }
                report.line(format!("Saved as: {} (quality {})", result.output, result.quality));
                report.line(format!("Original size: {}", format_kb(encoded.original_bytes)));
                report.line(format!("Optimized size: {}", format_kb(encoded.output_bytes)));
                report.line(format!("Reduction: {:.1}%", encoded.reduction_percent()));
                report.line("-".repeat(50));
            }
        }
    }

    if let Some(total) = summary.total_reduction_percent() {
        let original = summary.original_bytes();
        let optimized = summary.output_bytes();
        report.header("🎯 TOTAL");
        report.line(format!("Original total: {}", format_kb(original)));
        report.line(format!("Optimized total: {}", format_kb(optimized)));
        report.line(format!("Total reduction: {total:.1}%"));
        report.line(format!(
            "Saved: {}",
            format_kb(original.saturating_sub(optimized))
        ));
    }
    report.finish()
}
