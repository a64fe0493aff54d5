//! Idempotent maintenance patches for a static website.
//!
//! Every patch follows the same shape: apply a transformation to a document
//! only when its marker is absent, using the first matching rule from an
//! ordered rule list. The crate keeps a strict split:
//!
//! - **[`core`]**: Pure text logic (anchor rules, scanners, font and stylesheet
//!   rewrites, resize math). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config, file discovery, in-place
//!   patching, image encoding).
//!
//! The command modules ([`security`], [`fonts`], [`defer_css`], [`images`])
//! combine both to implement the `sitefix` CLI. All of them take the site root
//! explicitly; nothing here changes the process working directory.

pub mod core;
pub mod defer_css;
pub mod exit_codes;
pub mod fonts;
pub mod images;
pub mod io;
pub mod logging;
pub mod render;
pub mod security;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
