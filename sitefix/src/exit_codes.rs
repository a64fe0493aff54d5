//! Stable exit codes for the site maintenance CLIs.

/// Command ran to completion. Per-file failures are printed, not signaled.
pub const OK: i32 = 0;
/// Command could not start: invalid config, missing site root, bad arguments.
pub const INVALID: i32 = 1;
