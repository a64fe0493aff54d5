//! CLI tests for `sitefix security`.
//!
//! Spawns the binary against a temp site and checks the page contents and
//! exit codes across repeated runs.

use std::process::Command;

use sitefix::exit_codes;
use sitefix::test_support::{TestSite, VIEWPORT_TAG};

fn page() -> String {
    format!("<html>\n<head>\n    {VIEWPORT_TAG}\n    <title>Home</title>\n</head>\n<body></body>\n</html>\n")
}

#[test]
fn security_inserts_block_after_viewport_then_is_stable() {
    let site = TestSite::new().expect("site");
    site.write("index.html", page()).expect("write");

    let first = Command::new(env!("CARGO_BIN_EXE_sitefix"))
        .args(["--root"])
        .arg(site.path())
        .arg("security")
        .output()
        .expect("sitefix security");
    assert_eq!(first.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8_lossy(&first.stdout);
    assert!(stdout.contains("Meta tags added to 1 files"));

    let patched = site.read("index.html").expect("read");
    assert!(patched.contains(&format!("{VIEWPORT_TAG}\n    <!-- Security Headers -->")));
    assert!(patched.contains(r#"<meta http-equiv="X-Frame-Options" content="SAMEORIGIN">"#));

    let second = Command::new(env!("CARGO_BIN_EXE_sitefix"))
        .arg("--root")
        .arg(site.path())
        .arg("security")
        .output()
        .expect("sitefix security");
    assert_eq!(second.status.code(), Some(exit_codes::OK));
    assert!(String::from_utf8_lossy(&second.stdout).contains("Meta tags added to 0 files"));
    assert_eq!(site.read("index.html").expect("read"), patched);
}

#[test]
fn unreadable_page_still_exits_ok() {
    let site = TestSite::new().expect("site");
    site.write("broken.html", [0xff_u8, 0xfe, 0xfd]).expect("write");
    site.write("index.html", page()).expect("write");

    let output = Command::new(env!("CARGO_BIN_EXE_sitefix"))
        .arg("--root")
        .arg(site.path())
        .arg("security")
        .output()
        .expect("sitefix security");
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(String::from_utf8_lossy(&output.stdout).contains("❌"));
    assert!(site.read("index.html").expect("read").contains("X-Frame-Options"));
}

#[test]
fn invalid_config_exits_invalid() {
    let site = TestSite::new().expect("site");
    site.write("sitefix.toml", "[images]\nmax_width = 0\n").expect("write");

    let status = Command::new(env!("CARGO_BIN_EXE_sitefix"))
        .arg("--root")
        .arg(site.path())
        .arg("images")
        .status()
        .expect("sitefix images");
    assert_eq!(status.code(), Some(exit_codes::INVALID));
}

#[test]
fn missing_root_exits_invalid() {
    let site = TestSite::new().expect("site");
    let status = Command::new(env!("CARGO_BIN_EXE_sitefix"))
        .arg("--root")
        .arg(site.path().join("nope"))
        .arg("fonts")
        .status()
        .expect("sitefix fonts");
    assert_eq!(status.code(), Some(exit_codes::INVALID));
}
