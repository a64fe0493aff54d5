//! Security `<meta http-equiv>` block and security script patches.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::rules::{AnchorRule, MarkerPatch};

static VIEWPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<meta name="viewport"[^>]*>"#).unwrap());
static CHARSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<meta charset="[^"]*">"#).unwrap());
static HEAD_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<head>").unwrap());
static HEAD_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</head>").unwrap());

/// One `<meta http-equiv="name" content="content">` header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetaHeader {
    pub name: String,
    pub content: String,
}

impl MetaHeader {
    pub fn new(name: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            content: content.to_string(),
        }
    }
}

/// Headers injected by default, strongest first.
pub fn default_headers() -> Vec<MetaHeader> {
    vec![
        MetaHeader::new("X-Frame-Options", "SAMEORIGIN"),
        MetaHeader::new("X-Content-Type-Options", "nosniff"),
        MetaHeader::new("Referrer-Policy", "strict-origin-when-cross-origin"),
        MetaHeader::new(
            "Permissions-Policy",
            "geolocation=(), microphone=(), camera=()",
        ),
        MetaHeader::new(
            "Content-Security-Policy",
            "default-src 'self'; \
             script-src 'self' 'unsafe-inline' https://code.jquery.com https://cdn.jsdelivr.net; \
             style-src 'self' 'unsafe-inline' https://cdn.jsdelivr.net https://fonts.googleapis.com; \
             font-src 'self' https://fonts.gstatic.com; \
             img-src 'self' data: https:; \
             connect-src 'self';",
        ),
    ]
}

/// Render the header block inserted after the head anchor.
pub fn render_meta_block(headers: &[MetaHeader]) -> String {
    let mut block = String::from("\n    <!-- Security Headers -->\n");
    for header in headers {
        block.push_str(&format!(
            "    <meta http-equiv=\"{}\" content=\"{}\">\n",
            header.name, header.content
        ));
    }
    block.push_str("    ");
    block
}

/// Render the script tag inserted before `</head>`.
pub fn render_script_block(src: &str) -> String {
    format!(
        "\n    <!-- Security Headers Script -->\n    <script src=\"{src}\" defer></script>\n"
    )
}

/// Meta header patch: after viewport, else after charset, else after `<head>`.
pub fn meta_patch(marker: &str, headers: &[MetaHeader]) -> MarkerPatch {
    MarkerPatch::new(
        marker,
        render_meta_block(headers),
        vec![
            AnchorRule::after("viewport", VIEWPORT_RE.clone()),
            AnchorRule::after("charset", CHARSET_RE.clone()),
            AnchorRule::after("head", HEAD_OPEN_RE.clone()),
        ],
    )
}

/// Script patch: before `</head>`.
pub fn script_patch(marker: &str, src: &str) -> MarkerPatch {
    MarkerPatch::new(
        marker,
        render_script_block(src),
        vec![AnchorRule::before("head-close", HEAD_CLOSE_RE.clone())],
    )
}
