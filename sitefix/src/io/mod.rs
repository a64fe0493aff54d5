//! I/O helpers for the site commands.

pub mod config;
pub mod discover;
pub mod image;
pub mod patch_file;
pub mod scan;
