//! Deterministic, pure logic shared by the patch and audit commands.
//!
//! Core modules must be free of I/O side effects. They operate on document
//! text held in memory and return deterministic outputs suitable for tests.

pub mod css_defer;
pub mod fonts;
pub mod resize;
pub mod rules;
pub mod scan;
pub mod security;
