//! Read-only substring/regex checks over a set of documents.

use std::collections::BTreeMap;

use regex::Regex;
use serde::Serialize;

/// A predicate over document text.
#[derive(Debug, Clone)]
pub enum Check {
    Contains(String),
    Matches(Regex),
    /// Holds when every inner check holds.
    All(Vec<Check>),
}

impl Check {
    pub fn contains(needle: impl Into<String>) -> Self {
        Check::Contains(needle.into())
    }

    pub fn matches(pattern: Regex) -> Self {
        Check::Matches(pattern)
    }

    pub fn all(checks: Vec<Check>) -> Self {
        Check::All(checks)
    }

    pub fn holds(&self, content: &str) -> bool {
        match self {
            Check::Contains(needle) => content.contains(needle.as_str()),
            Check::Matches(pattern) => pattern.is_match(content),
            Check::All(checks) => checks.iter().all(|check| check.holds(content)),
        }
    }
}

/// A check with the label used in reports.
#[derive(Debug, Clone)]
pub struct NamedCheck {
    pub label: String,
    pub check: Check,
}

impl NamedCheck {
    pub fn new(label: impl Into<String>, check: Check) -> Self {
        Self {
            label: label.into(),
            check,
        }
    }
}

/// Per-file check results, in check order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileScan {
    pub file: String,
    pub results: Vec<(String, bool)>,
    /// Set when the file could not be read; `results` is then empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileScan {
    pub fn unreadable(file: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            results: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn passed(&self, label: &str) -> bool {
        self.results
            .iter()
            .any(|(name, passed)| name == label && *passed)
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|(_, passed)| *passed).count()
    }
}

pub fn scan_text(file: impl Into<String>, content: &str, checks: &[NamedCheck]) -> FileScan {
    FileScan {
        file: file.into(),
        results: checks
            .iter()
            .map(|named| (named.label.clone(), named.check.holds(content)))
            .collect(),
        error: None,
    }
}

/// Aggregated results: every scanned file plus `(passed, total)` per check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub files: Vec<FileScan>,
    pub per_check: BTreeMap<String, (usize, usize)>,
}

impl ScanSummary {
    pub fn from_files(files: Vec<FileScan>) -> Self {
        let mut per_check: BTreeMap<String, (usize, usize)> = BTreeMap::new();
        for file in &files {
            for (label, passed) in &file.results {
                let entry = per_check.entry(label.clone()).or_insert((0, 0));
                if *passed {
                    entry.0 += 1;
                }
                entry.1 += 1;
            }
        }
        Self { files, per_check }
    }

    /// Number of files in which `label` held.
    pub fn passed(&self, label: &str) -> usize {
        self.per_check.get(label).map_or(0, |(passed, _)| *passed)
    }

    pub fn percentage(&self, label: &str) -> Option<f64> {
        let (passed, total) = self.per_check.get(label).copied()?;
        percentage(passed, total)
    }

    pub fn unreadable(&self) -> impl Iterator<Item = &FileScan> {
        self.files.iter().filter(|file| file.error.is_some())
    }
}

/// `passed / total` as a percentage, `None` when there is nothing to count.
pub fn percentage(passed: usize, total: usize) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some(passed as f64 / total as f64 * 100.0)
}
