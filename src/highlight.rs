//! Composite highlight pattern
//!
//! Highlighting is advisory: it marks spans that look like what the user
//! asked for but never decides which lines are shown.

use crate::error::PatternError;
use crate::predicate::{build_regex, pattern_source};
use crate::rule::{Rule, RuleKind};
use regex::{Match, Regex};
use tracing::debug;

/// A single alternation built from every non-exclude rule
#[derive(Debug, Clone)]
pub struct HighlightPattern {
    regex: Regex,
    case_insensitive: bool,
}

impl HighlightPattern {
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Non-overlapping, non-empty matches from left to right
    ///
    /// Zero-length matches are skipped; the underlying iterator always
    /// advances past them, so patterns such as `a*` terminate.
    pub fn find_spans<'h>(&self, line: &'h str) -> impl Iterator<Item = Match<'h>> {
        self.regex.find_iter(line).filter(|m| !m.is_empty())
    }
}

/// Build the highlight pattern for a rule list
///
/// Returns `Ok(None)` when no non-blank, non-exclude rule exists. If any
/// contributing rule is case-insensitive the whole pattern is.
pub fn build_highlight(rules: &[Rule]) -> Result<Option<HighlightPattern>, PatternError> {
    let mut parts = Vec::new();
    let mut case_insensitive = false;

    for rule in rules {
        let pattern = rule.trimmed_pattern();
        if pattern.is_empty() || rule.kind == RuleKind::Exclude {
            continue;
        }
        if !rule.case_sensitive {
            case_insensitive = true;
        }
        parts.push(format!("({})", pattern_source(rule.kind, pattern)));
    }

    if parts.is_empty() {
        return Ok(None);
    }

    let source = parts.join("|");
    let regex =
        build_regex(&source, case_insensitive).map_err(|err| PatternError::new(&source, &err))?;

    debug!(source = %source, case_insensitive, "compiled highlight pattern");

    Ok(Some(HighlightPattern {
        regex,
        case_insensitive,
    }))
}
