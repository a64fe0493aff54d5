//! Text rendering for audit results.

use sitefix::core::css_defer::StylesheetStatus;
use sitefix::core::resize::format_kb;
use sitefix::render::Report;

use crate::cache::CacheAudit;
use crate::css::CssAudit;
use crate::fonts::{FontAudit, SWAP_CHECK};
use crate::images::ImagesAudit;

fn status_line(needle: &str, status: StylesheetStatus) -> String {
    match status {
        StylesheetStatus::Optimized => {
            format!("  ✅ {needle} optimized (preload + noscript fallback)")
        }
        StylesheetStatus::PreloadOnly => {
            format!("  ⚠️  {needle} preloaded but without noscript fallback")
        }
        StylesheetStatus::Blocking => format!("  ❌ {needle} render-blocking (needs deferral)"),
        StylesheetStatus::NotFound => format!("  ❓ {needle} not found or non-standard setup"),
    }
}

fn glyph(ok: bool) -> &'static str {
    if ok { "✅" } else { "❌" }
}

pub fn render_css(audit: &CssAudit) -> String {
    let mut report = Report::new();
    report.header("🎯 RENDER-BLOCKING CSS");
    for page in &audit.pages {
        report.line(format!("📄 {}:", page.file));
        if let Some(error) = &page.error {
            report.line(format!("  ❌ unreadable: {error}"));
            continue;
        }
        for (needle, status) in &page.statuses {
            report.line(status_line(needle, *status));
        }
        report.line(format!(
            "  🔗 Blocking stylesheets: {}",
            page.links.blocking.len()
        ));
        report.line(format!("  ⚡ Preloaded stylesheets: {}", page.links.preloaded));
        for href in &page.links.blocking {
            report.line(format!("    - {href}"));
        }
    }

    let optimized = audit.optimized();
    let pending = audit.needs_deferral();
    report.header("✨ CSS SUMMARY");
    report.line(format!(
        "✅ {}/{} pages optimized",
        optimized.len(),
        audit.pages.len()
    ));
    report.line(format!("❌ Pages needing deferral: {}", pending.len()));
    if pending.is_empty() {
        report.line("🎉 Every page defers its render-blocking stylesheets");
    } else {
        for file in pending {
            report.line(format!("  • {file}"));
        }
    }
    report.line(format!("🔗 Total render-blocking CSS: {}", audit.total_blocking()));
    report.line(format!("⚡ Total preloaded CSS: {}", audit.total_preloaded()));
    report.finish()
}

pub fn render_fonts(audit: &FontAudit) -> String {
    let mut report = Report::new();
    report.header("🔤 @font-face DECLARATIONS");
    for sheet in &audit.stylesheets {
        report.line(format!("📄 {}:", sheet.file));
        if let Some(error) = &sheet.error {
            report.line(format!("  ❌ unreadable: {error}"));
        }
        for face in &sheet.items {
            let display = face
                .display
                .as_ref()
                .map(|value| format!(" (display: {value})"))
                .unwrap_or_default();
            report.line(format!("  {} {}{display}", glyph(face.has_display()), face.family));
        }
    }

    report.header("🌐 GOOGLE FONTS");
    for page in &audit.pages {
        report.line(format!("📄 {}:", page.file));
        if let Some(error) = &page.error {
            report.line(format!("  ❌ unreadable: {error}"));
            continue;
        }
        if page.items.is_empty() {
            report.line("  ➖ no Google Fonts links");
        }
        for link in &page.items {
            let note = if link.has_display_swap {
                "(display=swap)"
            } else {
                "(needs display=swap)"
            };
            report.line(format!("  {} Google Fonts {note}", glyph(link.has_display_swap)));
        }
    }

    report.header("🔎 PAGES WITH display=swap");
    for file in &audit.swap_scan.files {
        match &file.error {
            Some(error) => report.line(format!("❌ {}: unreadable: {error}", file.file)),
            None => report.line(format!("{} {}", glyph(file.passed(SWAP_CHECK)), file.file)),
        }
    }
    let unreadable = audit.swap_scan.unreadable().count();
    if unreadable > 0 {
        report.line(format!("⚠️  {unreadable} pages could not be read"));
    }

    let (faces_ok, faces) = audit.font_face_totals();
    let (links_ok, links) = audit.google_totals();
    report.header("✨ FONT SUMMARY");
    report.line(format!("📝 @font-face rules with font-display: {faces_ok}/{faces}"));
    report.line(format!("🌐 Google Fonts links with display=swap: {links_ok}/{links}"));
    let (swap_ok, scanned) = audit
        .swap_scan
        .per_check
        .get(SWAP_CHECK)
        .copied()
        .unwrap_or_default();
    let swap_pct = audit
        .swap_scan
        .percentage(SWAP_CHECK)
        .map(|pct| format!(" ({pct:.1}%)"))
        .unwrap_or_default();
    report.line(format!(
        "📄 Pages loading Google Fonts with display=swap: {swap_ok}/{scanned}{swap_pct}"
    ));
    match audit.overall_percentage() {
        Some(pct) => {
            report.line(format!("🎯 Optimized overall: {pct:.1}%"));
            if audit.pending() == 0 {
                report.line("🎉 Every font declaration sets a display strategy");
            } else {
                report.line(format!("🔧 Pending: {}", audit.pending()));
            }
        }
        None => report.line("❓ No font declarations found"),
    }
    report.finish()
}

pub fn render_cache(audit: &CacheAudit) -> String {
    let mut report = Report::new();
    report.header("🔍 CACHE CONFIGURATION");
    let Some(scan) = &audit.directives else {
        report.line(format!("❌ {} not found", audit.htaccess));
        return report.finish();
    };
    if let Some(error) = &scan.error {
        report.line(format!("❌ {} unreadable: {error}", audit.htaccess));
        return report.finish();
    }
    for (directive, ok) in &scan.results {
        if *ok {
            report.line(format!("✅ {directive}"));
        } else {
            report.line(format!("❌ {directive} not found"));
        }
    }

    let Some(resources) = &audit.resources else {
        report.blank();
        report.line(format!("❌ Some directives are missing. Review {}", audit.htaccess));
        return report.finish();
    };
    report.header("📁 CACHEABLE RESOURCES");
    for category in resources {
        report.line(format!("{}:", category.category));
        for large in &category.large {
            report.line(format!("  📄 {}: {}", large.file, format_kb(large.bytes)));
        }
        for error in &category.errors {
            report.line(format!("  ❌ {error}"));
        }
        if category.files > 0 {
            report.line(format!(
                "  📊 {} files, {}",
                category.files,
                format_kb(category.bytes)
            ));
        }
    }
    report.header("🎯 TOTAL");
    report.line(format!("📁 {} cacheable files", audit.total_files()));
    report.line(format!("💾 {} of static resources", format_kb(audit.total_bytes())));
    report.finish()
}

pub fn render_images(audit: &ImagesAudit) -> String {
    let mut report = Report::new();
    report.header("🔍 OPTIMIZED IMAGE FILES");
    for output in &audit.outputs {
        match output.bytes {
            Some(bytes) => report.line(format!("✅ {}: {}", output.file, format_kb(bytes))),
            None => report.line(format!("❌ {}: not found", output.file)),
        }
    }

    report.header("🎨 STYLESHEET REFERENCES");
    match &audit.references {
        None => report.line(format!("❌ Stylesheet not found: {}", audit.stylesheet)),
        Some(scan) => {
            if let Some(error) = &scan.error {
                report.line(format!("❌ {} unreadable: {error}", audit.stylesheet));
            }
            for (name, ok) in &scan.results {
                if *ok {
                    report.line(format!("✅ {name}: referenced in {}", audit.stylesheet));
                } else {
                    report.line(format!("❌ {name}: not referenced in {}", audit.stylesheet));
                }
            }
        }
    }

    report.header("💰 SAVINGS");
    for saving in &audit.savings {
        report.line(format!(
            "{}: {} → {} ({:+.1}%)",
            saving.input,
            format_kb(saving.original_bytes),
            format_kb(saving.output_bytes),
            -saving.reduction_percent()
        ));
    }
    if let Some(total) = audit.total_reduction_percent() {
        let original = audit.original_bytes();
        let optimized = audit.output_bytes();
        report.blank();
        report.line(format!("Original: {}", format_kb(original)));
        report.line(format!("Optimized: {}", format_kb(optimized)));
        report.line(format!(
            "Total saved: {} ({total:.1}%)",
            format_kb(original.saturating_sub(optimized))
        ));
    }
    report.finish()
}
