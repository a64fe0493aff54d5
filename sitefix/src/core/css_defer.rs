//! Render-blocking stylesheet detection and preload rewriting.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

static STYLESHEET_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<link[^>]*rel="stylesheet"[^>]*>"#).unwrap());
static PRELOAD_STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<link[^>]*rel="preload"[^>]*as="style"[^>]*>"#).unwrap());
static HREF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"href="([^"]+)""#).unwrap());

const PRELOAD_ATTRS: &str =
    r#"rel="preload" as="style" onload="this.onload=null;this.rel='stylesheet'""#;

/// How a page loads a given stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StylesheetStatus {
    /// Preloaded with a `<noscript>` fallback.
    Optimized,
    /// Preloaded, but no `<noscript>` fallback for script-less browsers.
    PreloadOnly,
    /// Plain `rel="stylesheet"` link that blocks first paint.
    Blocking,
    /// Not referenced, or referenced in a shape we don't recognize.
    NotFound,
}

/// Classify how `content` loads the stylesheet identified by `needle`.
pub fn classify(content: &str, needle: &str) -> StylesheetStatus {
    let mentions = content.contains(needle);
    let has_preload =
        content.contains(r#"rel="preload""#) && mentions && content.contains(r#"as="style""#);
    let has_noscript = content.contains("<noscript>") && mentions;
    if has_preload && has_noscript {
        return StylesheetStatus::Optimized;
    }
    if has_preload {
        return StylesheetStatus::PreloadOnly;
    }
    let blocking = Regex::new(&format!(
        r#"<link[^>]+href[^>]*{}[^>]*rel="stylesheet""#,
        regex::escape(needle)
    ));
    match blocking {
        Ok(re) if re.is_match(content) => StylesheetStatus::Blocking,
        _ => StylesheetStatus::NotFound,
    }
}

/// Stylesheet links found in one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkInventory {
    /// `href` of every plain `rel="stylesheet"` link, in document order.
    pub blocking: Vec<String>,
    /// Number of `rel="preload" as="style"` links.
    pub preloaded: usize,
}

pub fn inventory(content: &str) -> LinkInventory {
    let blocking = STYLESHEET_LINK_RE
        .find_iter(content)
        .map(|link| href_of(link.as_str()).unwrap_or_default().to_string())
        .collect();
    let preloaded = PRELOAD_STYLE_RE.find_iter(content).count();
    LinkInventory {
        blocking,
        preloaded,
    }
}

fn href_of(tag: &str) -> Option<&str> {
    HREF_RE
        .captures(tag)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Rewrite blocking stylesheet links whose href contains any of `needles`.
///
/// Each link becomes a `rel="preload"` link that swaps itself to a stylesheet
/// on load, followed by the original tag inside `<noscript>`. Links whose href
/// is already preloaded are left alone, so a second pass is a no-op.
/// Returns the new content and the number of links rewritten.
pub fn defer_stylesheets(content: &str, needles: &[String]) -> (String, usize) {
    let preloaded: BTreeSet<String> = PRELOAD_STYLE_RE
        .find_iter(content)
        .filter_map(|link| href_of(link.as_str()).map(str::to_string))
        .collect();

    let mut rewritten = 0;
    let updated = STYLESHEET_LINK_RE.replace_all(content, |caps: &Captures<'_>| {
        let tag = &caps[0];
        let Some(href) = href_of(tag) else {
            return tag.to_string();
        };
        if preloaded.contains(href) || !needles.iter().any(|needle| href.contains(needle.as_str()))
        {
            return tag.to_string();
        }
        rewritten += 1;
        let preload = tag.replacen(r#"rel="stylesheet""#, PRELOAD_ATTRS, 1);
        format!("{preload}\n    <noscript>{tag}</noscript>")
    });
    (updated.into_owned(), rewritten)
}
