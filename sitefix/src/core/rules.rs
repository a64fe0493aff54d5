//! Marker-gated insertion driven by an ordered list of anchor rules.

use regex::Regex;

/// Where the insertion lands relative to the anchor match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    After,
    Before,
}

/// A named regex identifying an insertion point.
#[derive(Debug, Clone)]
pub struct AnchorRule {
    pub name: String,
    pub pattern: Regex,
    pub placement: Placement,
}

impl AnchorRule {
    /// Insert immediately after the first match of `pattern`.
    pub fn after(name: impl Into<String>, pattern: Regex) -> Self {
        Self {
            name: name.into(),
            pattern,
            placement: Placement::After,
        }
    }

    /// Insert immediately before the first match of `pattern`.
    pub fn before(name: impl Into<String>, pattern: Regex) -> Self {
        Self {
            name: name.into(),
            pattern,
            placement: Placement::Before,
        }
    }

    fn splice(&self, content: &str, insertion: &str) -> Option<String> {
        let found = self.pattern.find(content)?;
        let at = match self.placement {
            Placement::After => found.end(),
            Placement::Before => found.start(),
        };
        let mut out = String::with_capacity(content.len() + insertion.len());
        out.push_str(&content[..at]);
        out.push_str(insertion);
        out.push_str(&content[at..]);
        Some(out)
    }
}

/// Result of applying a [`MarkerPatch`] to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The insertion was made at the anchor named `anchor`.
    Changed { content: String, anchor: String },
    /// The marker is already present; nothing to do.
    AlreadyApplied,
    /// No anchor rule matched; nothing to do.
    NoAnchor,
}

impl PatchOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, PatchOutcome::Changed { .. })
    }
}

/// Insert `insertion` at the first matching anchor unless `marker` is present.
///
/// Rules are tried in order; the first rule with a match wins and only its
/// first match is used.
#[derive(Debug, Clone)]
pub struct MarkerPatch {
    pub marker: String,
    pub insertion: String,
    pub rules: Vec<AnchorRule>,
}

impl MarkerPatch {
    pub fn new(marker: impl Into<String>, insertion: impl Into<String>, rules: Vec<AnchorRule>) -> Self {
        Self {
            marker: marker.into(),
            insertion: insertion.into(),
            rules,
        }
    }

    pub fn apply(&self, content: &str) -> PatchOutcome {
        if content.contains(&self.marker) {
            return PatchOutcome::AlreadyApplied;
        }
        for rule in &self.rules {
            if let Some(updated) = rule.splice(content, &self.insertion) {
                return PatchOutcome::Changed {
                    content: updated,
                    anchor: rule.name.clone(),
                };
            }
        }
        PatchOutcome::NoAnchor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch() -> MarkerPatch {
        MarkerPatch::new(
            "MARK",
            "<!-- MARK -->",
            vec![
                AnchorRule::after("first", Regex::new(r"<first[^>]*>").expect("regex")),
                AnchorRule::after("second", Regex::new(r"<second>").expect("regex")),
                AnchorRule::before("closing", Regex::new(r"</end>").expect("regex")),
            ],
        )
    }

    #[test]
    fn first_matching_rule_wins() {
        let outcome = patch().apply("<second><first a=1></end>");
        assert_eq!(
            outcome,
            PatchOutcome::Changed {
                content: "<second><first a=1><!-- MARK --></end>".to_string(),
                anchor: "first".to_string(),
            }
        );
    }

    #[test]
    fn falls_through_to_later_rules() {
        let outcome = patch().apply("<second>body</end>");
        assert_eq!(
            outcome,
            PatchOutcome::Changed {
                content: "<second><!-- MARK -->body</end>".to_string(),
                anchor: "second".to_string(),
            }
        );
    }

    #[test]
    fn before_placement_inserts_ahead_of_match() {
        let outcome = patch().apply("body</end>");
        assert_eq!(
            outcome,
            PatchOutcome::Changed {
                content: "body<!-- MARK --></end>".to_string(),
                anchor: "closing".to_string(),
            }
        );
    }

    #[test]
    fn marker_present_is_already_applied() {
        assert_eq!(patch().apply("<first> MARK"), PatchOutcome::AlreadyApplied);
    }

    #[test]
    fn no_anchor_leaves_content_alone() {
        assert_eq!(patch().apply("plain text"), PatchOutcome::NoAnchor);
    }

    #[test]
    fn only_first_occurrence_is_patched() {
        let outcome = patch().apply("<second><second>");
        let PatchOutcome::Changed { content, .. } = outcome else {
            panic!("expected change");
        };
        assert_eq!(content.matches("MARK").count(), 1);
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let patch = patch();
        let PatchOutcome::Changed { content, .. } = patch.apply("<first>") else {
            panic!("expected change");
        };
        assert_eq!(patch.apply(&content), PatchOutcome::AlreadyApplied);
    }
}
