//! Whole-site tests: every patch applied to one site, then re-applied.

use sitefix::core::css_defer::{StylesheetStatus, classify};
use sitefix::core::fonts::{font_faces, google_font_links};
use sitefix::defer_css::apply_defer_css;
use sitefix::fonts::apply_font_display;
use sitefix::io::config::{SiteConfig, load_config, write_config};
use sitefix::security::apply_security;
use sitefix::test_support::{TestSite, sample_page};

const VENDOR_CSS: &str = "@font-face{font-family:\"Glyphs\";src:url(glyphs.woff)}\n.a{color:red}\n";

fn build_site() -> TestSite {
    let site = TestSite::new().expect("site");
    for name in ["index", "about", "contact"] {
        site.write(&format!("{name}.html"), sample_page(name))
            .expect("write page");
    }
    site.write(
        "assets/css/fontawesome.css",
        "@font-face {\n  font-family: 'FontAwesome';\n  src: url('../fonts/fa.woff2');\n}\n",
    )
    .expect("write css");
    site.write("vendor/glyphs/glyphs.css", VENDOR_CSS)
        .expect("write vendor css");
    site
}

fn snapshot(site: &TestSite) -> Vec<String> {
    [
        "index.html",
        "about.html",
        "contact.html",
        "assets/css/fontawesome.css",
        "vendor/glyphs/glyphs.css",
    ]
    .iter()
    .map(|rel| site.read(rel).expect("read"))
    .collect()
}

#[test]
fn all_patches_apply_once_and_then_hold() {
    let site = build_site();
    write_config(&site.path().join("sitefix.toml"), &SiteConfig::default()).expect("config");
    let cfg = load_config(&site.path().join("sitefix.toml")).expect("load");

    let security = apply_security(site.path(), &cfg.security).expect("security");
    let fonts = apply_font_display(site.path(), &cfg.fonts).expect("fonts");
    let deferred = apply_defer_css(site.path(), &cfg.css).expect("defer");
    assert_eq!(security.headers_added(), 3);
    assert_eq!(fonts.stylesheets_changed(), 2);
    assert_eq!(fonts.pages_changed(), 3);
    assert_eq!(deferred.changed(), 3);

    for page in ["index.html", "about.html", "contact.html"] {
        let html = site.read(page).expect("read");
        assert_eq!(classify(&html, "bootstrap"), StylesheetStatus::Optimized);
        assert!(google_font_links(&html).iter().all(|l| l.has_display_swap));
        assert_eq!(html.matches("<!-- Security Headers -->").count(), 1);
    }
    let vendor = site.read("vendor/glyphs/glyphs.css").expect("read");
    assert_eq!(font_faces(&vendor)[0].display.as_deref(), Some("swap"));
    assert!(vendor.ends_with(".a{color:red}\n"));

    let before = snapshot(&site);
    let security = apply_security(site.path(), &cfg.security).expect("security");
    let fonts = apply_font_display(site.path(), &cfg.fonts).expect("fonts");
    let deferred = apply_defer_css(site.path(), &cfg.css).expect("defer");
    assert_eq!(security.headers_added() + security.scripts_added(), 0);
    assert_eq!(fonts.stylesheets_changed() + fonts.pages_changed(), 0);
    assert_eq!(deferred.changed(), 0);
    assert_eq!(snapshot(&site), before);
}
