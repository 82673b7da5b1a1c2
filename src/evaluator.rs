//! Rule evaluation over a document
//!
//! Compiled rules are split into two classes:
//!
//! - include-class (include, starts-with, ends-with, regex) folded left to
//!   right with each rule's own join; the first include-class term has no
//!   prior term, so its join never takes part
//! - exclude-class, all of which must hold
//!
//! A line is kept when both classes accept it. An empty include class accepts
//! everything.

use crate::document::LineRecord;
use crate::error::PatternError;
use crate::highlight::{HighlightPattern, build_highlight};
use crate::predicate::{CompiledPredicate, compile};
use crate::rule::{Join, Rule};
use tracing::{debug, warn};

/// Lines that passed evaluation, in document order with original numbering
pub type FilterResult = Vec<LineRecord>;

/// The compiled form of a whole rule list
#[derive(Debug, Clone, Default)]
pub struct CompiledRules {
    include: Vec<CompiledPredicate>,
    exclude: Vec<CompiledPredicate>,
    errors: Vec<PatternError>,
    active: usize,
}

impl CompiledRules {
    /// Compile every rule, collecting pattern errors instead of stopping at the first
    pub fn compile<'a>(rules: impl IntoIterator<Item = &'a Rule>) -> Self {
        let mut compiled = Self::default();
        for rule in rules {
            if rule.is_blank() {
                continue;
            }
            compiled.active += 1;
            match compile(rule) {
                Ok(Some(predicate)) if predicate.kind().is_include_class() => {
                    compiled.include.push(predicate)
                }
                Ok(Some(predicate)) => compiled.exclude.push(predicate),
                Ok(None) => {}
                Err(err) => {
                    warn!(pattern = %err.pattern, error = %err.message, "dropping invalid rule");
                    compiled.errors.push(err);
                }
            }
        }
        compiled
    }

    /// Number of rules with a non-blank pattern
    pub fn active_count(&self) -> usize {
        self.active
    }

    /// Number of rules that compiled
    pub fn len(&self) -> usize {
        self.include.len() + self.exclude.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn errors(&self) -> &[PatternError] {
        &self.errors
    }

    /// Rules were supplied but none of them compiled
    pub fn is_failed(&self) -> bool {
        self.active > 0 && self.is_empty()
    }

    /// Whether a line passes the compiled rules
    pub fn matches(&self, line: &str) -> bool {
        self.include_match(line) && self.exclude_match(line)
    }

    fn include_match(&self, line: &str) -> bool {
        let mut result: Option<bool> = None;
        for predicate in &self.include {
            let passed = predicate.matches(line);
            result = Some(match result {
                None => passed,
                Some(acc) => match predicate.join() {
                    Some(Join::Or) => acc || passed,
                    _ => acc && passed,
                },
            });
        }
        result.unwrap_or(true)
    }

    fn exclude_match(&self, line: &str) -> bool {
        self.exclude.iter().all(|predicate| predicate.matches(line))
    }
}

/// Outcome of evaluating rules over a line set
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    pub result: FilterResult,
    pub errors: Vec<PatternError>,
    /// Rules were supplied but none compiled; `result` is empty
    pub failed: bool,
}

/// Filter `lines` through `rules`
///
/// With no usable rules every line passes. When rules were given but every
/// one of them failed to compile the evaluation is marked failed and yields
/// no lines rather than the whole document.
pub fn evaluate(lines: &[LineRecord], rules: &[Rule]) -> Evaluation {
    let compiled = CompiledRules::compile(rules);

    if compiled.is_failed() {
        debug!(active = compiled.active_count(), "no rule compiled, filter run failed");
        return Evaluation {
            result: Vec::new(),
            errors: compiled.errors,
            failed: true,
        };
    }

    let result: FilterResult = if compiled.is_empty() {
        lines.to_vec()
    } else {
        lines
            .iter()
            .filter(|record| compiled.matches(&record.text))
            .cloned()
            .collect()
    };

    debug!(total = lines.len(), kept = result.len(), rules = compiled.len(), "filter evaluated");

    Evaluation {
        result,
        errors: compiled.errors,
        failed: false,
    }
}

/// Full result of one filter run: membership, highlight and error state
#[derive(Debug, Clone, Default)]
pub struct FilterRun {
    pub result: FilterResult,
    pub highlight: Option<HighlightPattern>,
    pub errors: Vec<PatternError>,
    pub failed: bool,
}

impl FilterRun {
    /// Message to surface to the user, if any pattern failed
    pub fn error_message(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        Some(
            self.errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// Evaluate rules and build the matching highlight pattern
///
/// The highlight error is reported only when no rule error already
/// explains it, since an invalid regex rule also breaks the composite.
pub fn run_filter(lines: &[LineRecord], rules: &[Rule]) -> FilterRun {
    let Evaluation {
        result,
        mut errors,
        failed,
    } = evaluate(lines, rules);

    if failed {
        return FilterRun {
            result,
            highlight: None,
            errors,
            failed,
        };
    }

    let highlight = match build_highlight(rules) {
        Ok(highlight) => highlight,
        Err(err) => {
            if errors.is_empty() {
                errors.push(err);
            }
            None
        }
    };

    FilterRun {
        result,
        highlight,
        errors,
        failed,
    }
}
