//! Running [`NamedCheck`]s over files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::core::scan::{FileScan, NamedCheck, ScanSummary, scan_text};
use crate::io::discover::display_path;

/// Scan every file; unreadable files are listed with their error.
pub fn scan_paths(root: &Path, paths: &[PathBuf], checks: &[NamedCheck]) -> ScanSummary {
    let files = paths
        .iter()
        .map(|path| {
            let name = display_path(root, path);
            match fs::read_to_string(path) {
                Ok(contents) => scan_text(name, &contents, checks),
                Err(err) => {
                    warn!(file = %name, error = %err, "scan skipped unreadable file");
                    FileScan::unreadable(name, err.to_string())
                }
            }
        })
        .collect();
    ScanSummary::from_files(files)
}
