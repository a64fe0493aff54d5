//! `@font-face` and Google Fonts `font-display` handling.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

static FONT_FACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@font-face\s*\{([^}]*)\}").unwrap());
static FAMILY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"font-family:\s*['"]([^'"]+)['"]"#).unwrap());
static DISPLAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"font-display:\s*([^;]+)").unwrap());
static GOOGLE_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<link[^>]*fonts\.googleapis\.com[^>]*>").unwrap());
static GOOGLE_HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href="([^"]*fonts\.googleapis\.com[^"]*)""#).unwrap());

const UNKNOWN_FAMILY: &str = "Unknown";

/// A Google Fonts link that loads CSS, as opposed to `preconnect` or
/// `dns-prefetch` hints to the same host.
fn loads_font_css(tag: &str) -> bool {
    tag.contains(r#"rel="stylesheet""#)
        || GOOGLE_HREF_RE
            .captures(tag)
            .is_some_and(|caps| caps[1].contains("fonts.googleapis.com/css"))
}

/// One `@font-face` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontFace {
    pub family: String,
    pub display: Option<String>,
}

impl FontFace {
    pub fn has_display(&self) -> bool {
        self.display.is_some()
    }
}

pub fn font_faces(css: &str) -> Vec<FontFace> {
    FONT_FACE_RE
        .captures_iter(css)
        .map(|caps| {
            let body = &caps[1];
            let family = FAMILY_RE
                .captures(body)
                .map(|m| m[1].to_string())
                .unwrap_or_else(|| UNKNOWN_FAMILY.to_string());
            let display = DISPLAY_RE.captures(body).map(|m| m[1].trim().to_string());
            FontFace { family, display }
        })
        .collect()
}

/// Add `font-display: <value>;` to every `@font-face` block lacking one.
///
/// Returns the new stylesheet and the number of blocks changed.
pub fn add_font_display(css: &str, value: &str) -> (String, usize) {
    let mut added = 0;
    let updated = FONT_FACE_RE.replace_all(css, |caps: &Captures<'_>| {
        let body = &caps[1];
        if DISPLAY_RE.is_match(body) {
            return caps[0].to_string();
        }
        added += 1;
        let trimmed = body.trim_end();
        let separator = if trimmed.is_empty() || trimmed.ends_with(';') { "" } else { ";" };
        let indent = block_indent(body);
        format!("@font-face {{{trimmed}{separator}\n{indent}font-display: {value};\n}}")
    });
    (updated.into_owned(), added)
}

fn block_indent(body: &str) -> &str {
    body.lines()
        .map(|line| &line[..line.len() - line.trim_start().len()])
        .find(|indent| !indent.is_empty())
        .unwrap_or("  ")
}

/// A `<link>` to Google Fonts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoogleFontLink {
    pub tag: String,
    pub has_display_swap: bool,
}

pub fn google_font_links(html: &str) -> Vec<GoogleFontLink> {
    GOOGLE_LINK_RE
        .find_iter(html)
        .filter(|link| loads_font_css(link.as_str()))
        .map(|link| GoogleFontLink {
            tag: link.as_str().to_string(),
            has_display_swap: link.as_str().contains("display=swap"),
        })
        .collect()
}

/// Append `display=swap` to every Google Fonts href lacking it.
///
/// Returns the new document and the number of links changed.
pub fn add_display_swap(html: &str) -> (String, usize) {
    let mut added = 0;
    let updated = GOOGLE_LINK_RE.replace_all(html, |link: &Captures<'_>| {
        let tag = &link[0];
        if tag.contains("display=swap") || !loads_font_css(tag) {
            return tag.to_string();
        }
        let Some(href) = GOOGLE_HREF_RE.captures(tag).map(|caps| caps[1].to_string()) else {
            return tag.to_string();
        };
        added += 1;
        let joiner = if href.contains('?') { "&" } else { "?" };
        tag.replacen(&href, &format!("{href}{joiner}display=swap"), 1)
    });
    (updated.into_owned(), added)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FONT_AWESOME: &str = "@font-face {\n  font-family: 'FontAwesome';\n  src: url('../fonts/fontawesome-webfont.woff2') format('woff2');\n}\n";
    const FLATICON: &str = "@font-face {\n    font-family: \"Flaticon\";\n    src: url(\"../fonts/Flaticon.woff\");\n    font-display: swap;\n}\n";

    #[test]
    fn parses_family_and_display() {
        let css = format!("{FONT_AWESOME}{FLATICON}");
        let faces = font_faces(&css);
        assert_eq!(
            faces,
            vec![
                FontFace {
                    family: "FontAwesome".to_string(),
                    display: None,
                },
                FontFace {
                    family: "Flaticon".to_string(),
                    display: Some("swap".to_string()),
                },
            ]
        );
    }

    #[test]
    fn unnamed_face_is_unknown() {
        let faces = font_faces("@font-face { src: url(a.woff); }");
        assert_eq!(faces[0].family, "Unknown");
    }

    #[test]
    fn adds_display_only_where_missing() {
        let css = format!("{FONT_AWESOME}{FLATICON}");
        let (updated, added) = add_font_display(&css, "swap");
        assert_eq!(added, 1);
        assert!(font_faces(&updated).iter().all(FontFace::has_display));
        assert!(updated.contains("format('woff2');\n  font-display: swap;\n}"));
        assert!(updated.ends_with(FLATICON));
    }

    #[test]
    fn adds_separator_after_unterminated_declaration() {
        let (updated, _) = add_font_display("@font-face{font-family:'A'}", "swap");
        assert_eq!(updated, "@font-face {font-family:'A';\n  font-display: swap;\n}");
    }

    #[test]
    fn font_display_is_idempotent() {
        let (once, _) = add_font_display(FONT_AWESOME, "swap");
        let (twice, added) = add_font_display(&once, "swap");
        assert_eq!(added, 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn google_links_report_display_swap() {
        let html = r#"<link href="https://fonts.googleapis.com/css?family=Roboto&display=swap" rel="stylesheet">
<link href="https://fonts.googleapis.com/css2?family=Inter" rel="stylesheet">"#;
        let links = google_font_links(html);
        assert_eq!(links.len(), 2);
        assert!(links[0].has_display_swap);
        assert!(!links[1].has_display_swap);
    }

    #[test]
    fn appends_display_swap_to_query() {
        let html = r#"<link href="https://fonts.googleapis.com/css2?family=Inter" rel="stylesheet">"#;
        let (updated, added) = add_display_swap(html);
        assert_eq!(added, 1);
        assert_eq!(
            updated,
            r#"<link href="https://fonts.googleapis.com/css2?family=Inter&display=swap" rel="stylesheet">"#
        );
        assert_eq!(add_display_swap(&updated), (updated.clone(), 0));
    }

    #[test]
    fn preconnect_hints_are_left_alone() {
        let preconnect = r#"<link rel="preconnect" href="https://fonts.googleapis.com">"#;
        let prefetch = r#"<link rel="dns-prefetch" href="//fonts.googleapis.com">"#;
        let sheet = r#"<link href="https://fonts.googleapis.com/css?family=Roboto" rel="stylesheet">"#;
        let html = format!("{preconnect}\n{prefetch}\n{sheet}");
        let (updated, added) = add_display_swap(&html);
        assert_eq!(added, 1);
        assert!(updated.starts_with(&format!("{preconnect}\n{prefetch}\n")));
        assert!(updated.contains("css?family=Roboto&display=swap"));
        assert_eq!(google_font_links(&html).len(), 1);
    }

    #[test]
    fn starts_query_when_href_has_none() {
        let html = r#"<link rel="stylesheet" href="https://fonts.googleapis.com/icon">"#;
        let (updated, _) = add_display_swap(html);
        assert!(updated.contains("https://fonts.googleapis.com/icon?display=swap"));
    }
}
