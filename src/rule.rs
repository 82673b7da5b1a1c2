//! Filter rule model
//!
//! A [`Rule`] is one user-declared condition: a match kind, the raw pattern
//! text, a case-sensitivity flag and the operator joining it to the rule
//! before it. Rules live in an ordered [`RuleSet`] capped at
//! [`MAX_RULES`] entries.
//!
//! # Term syntax
//!
//! ```text
//! [and:|or:]kind[/c]:pattern
//! ```
//!
//! - `include:` / `inc:` / `i:` - line contains the literal
//! - `exclude:` / `exc:` / `x:` - line does not contain the literal
//! - `starts_with:` / `starts:` / `s:` - line starts with the literal
//! - `ends_with:` / `ends:` / `e:` - line ends with the literal
//! - `regex:` / `re:` / `r:` - line matches the regular expression
//!
//! A `/c` suffix on the kind makes the rule case-sensitive. Everything after
//! the kind's colon is the pattern, colons included.
//!
//! ```text
//! include:ERROR                 # lines mentioning error (any case)
//! or:regex/c:^\d{4}-            # ... or starting with a year
//! exclude:healthcheck           # never show healthcheck noise
//! ```

pub mod error;
pub mod parser;

pub use error::{RuleError, RuleParseError};
pub use parser::parse_rule_term;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound on concurrently defined rules.
pub const MAX_RULES: usize = 8;

/// Boolean operator joining a rule to the running result of the rules before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Join {
    #[default]
    And,
    Or,
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Join::And => write!(f, "and"),
            Join::Or => write!(f, "or"),
        }
    }
}

/// How a rule's pattern is matched against a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Literal substring anywhere in the line
    #[default]
    Include,
    /// Literal substring must NOT appear in the line
    Exclude,
    /// Literal at the start of the line
    StartsWith,
    /// Literal at the end of the line
    EndsWith,
    /// Regular expression
    Regex,
}

impl RuleKind {
    /// Canonical name, as accepted by the term parser and the config file
    pub fn canonical_name(&self) -> &'static str {
        match self {
            RuleKind::Include => "include",
            RuleKind::Exclude => "exclude",
            RuleKind::StartsWith => "starts_with",
            RuleKind::EndsWith => "ends_with",
            RuleKind::Regex => "regex",
        }
    }

    /// Whether the rule narrows lines in (everything except [`RuleKind::Exclude`])
    pub fn is_include_class(&self) -> bool {
        !matches!(self, RuleKind::Exclude)
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// A single filter condition
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Rule {
    /// Join to the previous rule. Always `None` for the first rule of a [`RuleSet`].
    pub join: Option<Join>,
    pub kind: RuleKind,
    /// Raw pattern text as typed; trimmed when compiled
    pub pattern: String,
    pub case_sensitive: bool,
}

impl Rule {
    pub fn new(kind: RuleKind, pattern: impl Into<String>) -> Self {
        Self {
            join: None,
            kind,
            pattern: pattern.into(),
            case_sensitive: false,
        }
    }

    pub fn include(pattern: impl Into<String>) -> Self {
        Self::new(RuleKind::Include, pattern)
    }

    pub fn exclude(pattern: impl Into<String>) -> Self {
        Self::new(RuleKind::Exclude, pattern)
    }

    pub fn starts_with(pattern: impl Into<String>) -> Self {
        Self::new(RuleKind::StartsWith, pattern)
    }

    pub fn ends_with(pattern: impl Into<String>) -> Self {
        Self::new(RuleKind::EndsWith, pattern)
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::new(RuleKind::Regex, pattern)
    }

    pub fn joined(mut self, join: Join) -> Self {
        self.join = Some(join);
        self
    }

    pub fn and(self) -> Self {
        self.joined(Join::And)
    }

    pub fn or(self) -> Self {
        self.joined(Join::Or)
    }

    pub fn case_sensitive(mut self, value: bool) -> Self {
        self.case_sensitive = value;
        self
    }

    /// Pattern with surrounding whitespace removed
    pub fn trimmed_pattern(&self) -> &str {
        self.pattern.trim()
    }

    /// Rules whose trimmed pattern is empty take no part in filtering
    pub fn is_blank(&self) -> bool {
        self.trimmed_pattern().is_empty()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(join) = self.join {
            write!(f, "{join}:")?;
        }
        write!(f, "{}", self.kind)?;
        if self.case_sensitive {
            write!(f, "/c")?;
        }
        write!(f, ":{}", self.pattern)
    }
}

/// Ordered, capacity-bounded collection of rules
///
/// The first rule never carries a join; every later rule always does. The
/// set re-establishes this after each mutation so callers never observe a
/// stored-but-ignored join value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a list, failing when it exceeds [`MAX_RULES`]
    pub fn from_rules(rules: Vec<Rule>) -> Result<Self, RuleError> {
        if rules.len() > MAX_RULES {
            return Err(RuleError::CapacityExceeded { max: MAX_RULES });
        }
        let mut set = Self { rules };
        set.normalize_joins();
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.rules.len() >= MAX_RULES
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Append a rule, returning its index
    pub fn push(&mut self, rule: Rule) -> Result<usize, RuleError> {
        if self.is_full() {
            return Err(RuleError::CapacityExceeded { max: MAX_RULES });
        }
        self.rules.push(rule);
        self.normalize_joins();
        Ok(self.rules.len() - 1)
    }

    /// Replace the rule at `index`
    pub fn replace(&mut self, index: usize, rule: Rule) -> Result<(), RuleError> {
        let len = self.rules.len();
        let slot = self
            .rules
            .get_mut(index)
            .ok_or(RuleError::IndexOutOfRange { index, len })?;
        *slot = rule;
        self.normalize_joins();
        Ok(())
    }

    /// Remove and return the rule at `index`
    pub fn remove(&mut self, index: usize) -> Result<Rule, RuleError> {
        if index >= self.rules.len() {
            return Err(RuleError::IndexOutOfRange {
                index,
                len: self.rules.len(),
            });
        }
        let removed = self.rules.remove(index);
        self.normalize_joins();
        Ok(removed)
    }

    /// Rules that take part in filtering, in order
    pub fn active(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|rule| !rule.is_blank())
    }

    fn normalize_joins(&mut self) {
        for (idx, rule) in self.rules.iter_mut().enumerate() {
            if idx == 0 {
                rule.join = None;
            } else if rule.join.is_none() {
                rule.join = Some(Join::And);
            }
        }
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
