//! Rule to line-predicate compilation

use crate::error::PatternError;
use crate::rule::{Join, Rule, RuleKind};
use regex::{Regex, RegexBuilder};
use tracing::debug;

/// Executable form of one rule
///
/// Holds the compiled expression plus the rule's kind and join so the
/// evaluator can partition and fold without going back to the rule.
#[derive(Debug, Clone)]
pub struct CompiledPredicate {
    kind: RuleKind,
    join: Option<Join>,
    regex: Regex,
}

impl CompiledPredicate {
    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    pub fn join(&self) -> Option<Join> {
        self.join
    }

    /// Source of the internal expression (escaped and anchored for literal kinds)
    pub fn source(&self) -> &str {
        self.regex.as_str()
    }

    /// Evaluate the rule against one line
    ///
    /// For [`RuleKind::Exclude`] this is the negation of literal-contains.
    pub fn matches(&self, line: &str) -> bool {
        let hit = self.regex.is_match(line);
        match self.kind {
            RuleKind::Exclude => !hit,
            _ => hit,
        }
    }
}

/// Expression source for a rule's trimmed pattern
///
/// Regex rules pass through untouched. Literal kinds are fully escaped and
/// then anchored: `^` for starts-with, `$` for ends-with.
pub fn pattern_source(kind: RuleKind, pattern: &str) -> String {
    match kind {
        RuleKind::Regex => pattern.to_string(),
        RuleKind::StartsWith => format!("^{}", regex::escape(pattern)),
        RuleKind::EndsWith => format!("{}$", regex::escape(pattern)),
        RuleKind::Include | RuleKind::Exclude => regex::escape(pattern),
    }
}

pub(crate) fn build_regex(source: &str, case_insensitive: bool) -> Result<Regex, regex::Error> {
    RegexBuilder::new(source)
        .case_insensitive(case_insensitive)
        .build()
}

/// Compile a rule into a predicate
///
/// Returns `Ok(None)` when the rule's pattern is blank; such rules are
/// dropped rather than treated as errors.
pub fn compile(rule: &Rule) -> Result<Option<CompiledPredicate>, PatternError> {
    let pattern = rule.trimmed_pattern();
    if pattern.is_empty() {
        return Ok(None);
    }

    let source = pattern_source(rule.kind, pattern);
    let regex = build_regex(&source, !rule.case_sensitive)
        .map_err(|err| PatternError::new(pattern, &err))?;

    debug!(kind = %rule.kind, source = %source, case_sensitive = rule.case_sensitive, "compiled rule");

    Ok(Some(CompiledPredicate {
        kind: rule.kind,
        join: rule.join,
        regex,
    }))
}
