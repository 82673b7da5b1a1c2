//! Viewer session state
//!
//! A [`Session`] is everything a front end needs between two user actions:
//! the loaded document, the rule set, pagination settings, the current page
//! and the outcome of the last filter run. It holds no global state; every
//! mutation that affects membership re-runs the filter from scratch.

use crate::config::ViewerConfig;
use crate::decorate::{AnnotatedText, decorate};
use crate::document::Document;
use crate::error::DocumentError;
use crate::evaluator::{FilterRun, run_filter};
use crate::paginate::{Page, PagePolicy, PaginationConfig, clamp_page, paginate, parse_page_request};
use crate::rule::{MAX_RULES, Rule, RuleError, RuleSet};
use std::path::Path;
use tracing::{debug, info};

pub const EMPTY_DOCUMENT_MESSAGE: &str = "Load a file to start";
pub const NO_MATCHES_MESSAGE: &str = "No matches";

/// One-line status shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub is_error: bool,
}

impl Status {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }
}

/// A line of the current page, ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// Position in the source document
    pub line_number: usize,
    /// Position in the filter result
    pub display_index: usize,
    pub text: AnnotatedText,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    document: Option<Document>,
    rules: RuleSet,
    pagination: PaginationConfig,
    current_page: usize,
    run: FilterRun,
    status: Option<Status>,
}

impl Session {
    pub fn new(pagination: PaginationConfig) -> Self {
        Self {
            pagination,
            current_page: 1,
            ..Self::default()
        }
    }

    /// Start from a config file's pagination settings and rules
    pub fn from_config(config: &ViewerConfig) -> Result<Self, RuleError> {
        let mut session = Self::new(config.pagination.clone());
        session.rules = RuleSet::from_rules(config.initial_rules())?;
        Ok(session)
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn pagination(&self) -> &PaginationConfig {
        &self.pagination
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn last_run(&self) -> &FilterRun {
        &self.run
    }

    pub fn total_lines(&self) -> usize {
        self.document.as_ref().map_or(0, Document::len)
    }

    pub fn filtered_lines(&self) -> usize {
        self.run.result.len()
    }

    /// Replace the current document and re-filter
    pub fn load_document(&mut self, document: Document) {
        info!(name = document.name(), lines = document.len(), "document loaded");
        self.status = Some(Status::info(format!(
            "Loaded {}. Lines: {}",
            document.name(),
            document.len()
        )));
        self.document = Some(document);
        self.refilter();
    }

    /// Read a file into the session
    ///
    /// On failure the previous document, rules and results are kept.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        match Document::load(path) {
            Ok(document) => {
                self.load_document(document);
                Ok(())
            }
            Err(err) => {
                self.status = Some(Status::error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Replace the whole rule set
    pub fn set_rules(&mut self, rules: Vec<Rule>) -> Result<(), RuleError> {
        match RuleSet::from_rules(rules) {
            Ok(set) => {
                self.rules = set;
                self.refilter();
                Ok(())
            }
            Err(err) => {
                self.status = Some(Status::error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Append a rule; fails once [`MAX_RULES`] rules exist
    pub fn add_rule(&mut self, rule: Rule) -> Result<usize, RuleError> {
        match self.rules.push(rule) {
            Ok(index) => {
                self.refilter();
                Ok(index)
            }
            Err(err) => {
                debug!(max = MAX_RULES, "rule rejected, set is full");
                self.status = Some(Status::error(err.to_string()));
                Err(err)
            }
        }
    }

    pub fn update_rule(&mut self, index: usize, rule: Rule) -> Result<(), RuleError> {
        self.rules.replace(index, rule)?;
        self.refilter();
        Ok(())
    }

    /// Remove a rule
    ///
    /// The last remaining rule is blanked (pattern and case flag cleared)
    /// instead of removed, so there is always one rule to edit.
    pub fn remove_rule(&mut self, index: usize) -> Result<(), RuleError> {
        if self.rules.len() <= 1 {
            let blank = Rule {
                kind: self
                    .rules
                    .get(index)
                    .ok_or(RuleError::IndexOutOfRange {
                        index,
                        len: self.rules.len(),
                    })?
                    .kind,
                ..Rule::default()
            };
            self.rules.replace(index, blank)?;
        } else {
            self.rules.remove(index)?;
        }
        self.refilter();
        Ok(())
    }

    pub fn set_page_size(&mut self, page_size: Option<i64>) {
        self.pagination.page_size = page_size;
        self.refilter();
    }

    pub fn set_pagination_enabled(&mut self, enabled: bool) {
        self.pagination.enabled = enabled;
        self.refilter();
    }

    /// Re-run the filter over the whole document and go back to page one
    pub fn refilter(&mut self) {
        let Some(document) = &self.document else {
            return;
        };

        self.run = run_filter(document.lines(), self.rules.rules());
        self.current_page = 1;

        if let Some(message) = self.run.error_message() {
            self.status = Some(Status::error(message));
        } else if self.status.as_ref().is_some_and(|s| s.is_error) {
            self.status = None;
        }

        debug!(
            total = document.len(),
            filtered = self.run.result.len(),
            rules = self.rules.active().count(),
            failed = self.run.failed,
            "session refiltered"
        );
    }

    pub fn policy(&self) -> PagePolicy {
        self.pagination.policy_for(self.total_lines())
    }

    /// The current page, clamped to the current result
    pub fn page(&self) -> Page<'_> {
        paginate(&self.run.result, self.policy(), self.current_page as i64)
    }

    pub fn current_page(&self) -> usize {
        self.page().number
    }

    pub fn total_pages(&self) -> usize {
        self.page().total_pages
    }

    /// Go to `page`, clamped into range; returns the resulting page number
    pub fn go_to(&mut self, page: i64) -> usize {
        self.current_page = clamp_page(page, self.total_pages());
        self.current_page
    }

    pub fn next_page(&mut self) -> usize {
        self.go_to(self.current_page() as i64 + 1)
    }

    pub fn prev_page(&mut self) -> usize {
        self.go_to(self.current_page() as i64 - 1)
    }

    /// Jump to a page typed by the user; non-numeric input is ignored
    pub fn jump_to(&mut self, input: &str) -> usize {
        match parse_page_request(input) {
            Some(page) => self.go_to(page),
            None => self.current_page(),
        }
    }

    /// Decorate every line of the current page
    pub fn render_page(&self) -> Vec<RenderedLine> {
        let page = self.page();
        let highlight = self.run.highlight.as_ref();
        page.lines
            .iter()
            .enumerate()
            .map(|(idx, record)| RenderedLine {
                line_number: record.line_number,
                display_index: page.display_index(idx),
                text: decorate(&record.text, highlight),
            })
            .collect()
    }

    /// Raw text of the current page
    pub fn export_page_text(&self) -> String {
        self.page().export_text()
    }

    /// Placeholder to show instead of an empty page
    pub fn empty_message(&self) -> Option<&'static str> {
        if self.document.is_none() {
            Some(EMPTY_DOCUMENT_MESSAGE)
        } else if self.run.result.is_empty() {
            Some(NO_MATCHES_MESSAGE)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(text: &str) -> Session {
        let mut session = Session::new(PaginationConfig::default());
        session.load_document(Document::parse("test.log", text));
        session
    }

    fn numbered(n: usize) -> String {
        (1..=n)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_empty_session() {
        let session = Session::new(PaginationConfig::default());
        assert_eq!(session.empty_message(), Some(EMPTY_DOCUMENT_MESSAGE));
        assert_eq!(session.total_pages(), 1);
        assert!(session.render_page().is_empty());
    }

    #[test]
    fn test_load_sets_status_and_results() {
        let session = session_with("a\nb");
        assert_eq!(session.filtered_lines(), 2);
        assert_eq!(
            session.status(),
            Some(&Status::info("Loaded test.log. Lines: 2"))
        );
    }

    #[test]
    fn test_failed_load_keeps_previous_document() {
        let mut session = session_with("a\nb");
        assert!(session.load_path("/no/such/file.log").is_err());
        assert_eq!(session.total_lines(), 2);
        assert!(session.status().unwrap().is_error);
    }

    #[test]
    fn test_add_rule_over_capacity() {
        let mut session = session_with("a");
        for i in 0..MAX_RULES {
            session.add_rule(Rule::exclude(format!("x{i}"))).unwrap();
        }
        assert!(session.add_rule(Rule::include("a")).is_err());
        let status = session.status().unwrap();
        assert!(status.is_error);
        assert!(status.message.contains("8"));
    }

    #[test]
    fn test_invalid_only_rule_shows_no_matches() {
        let mut session = session_with("a\nb");
        session.add_rule(Rule::regex("(")).unwrap();
        assert!(session.last_run().failed);
        assert_eq!(session.empty_message(), Some(NO_MATCHES_MESSAGE));
        assert!(session.status().unwrap().is_error);
    }

    #[test]
    fn test_fixing_rule_clears_error_status() {
        let mut session = session_with("a\nb");
        session.add_rule(Rule::regex("(")).unwrap();
        session.update_rule(0, Rule::regex("a")).unwrap();
        assert!(session.status().is_none());
        assert_eq!(session.filtered_lines(), 1);
    }

    #[test]
    fn test_removing_last_rule_blanks_it() {
        let mut session = session_with("a\nb");
        session
            .add_rule(Rule::ends_with("a").case_sensitive(true))
            .unwrap();
        session.remove_rule(0).unwrap();
        assert_eq!(session.rules().len(), 1);
        let rule = &session.rules().rules()[0];
        assert!(rule.is_blank());
        assert!(!rule.case_sensitive);
        assert_eq!(session.filtered_lines(), 2);
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut session = session_with(&numbered(4500));
        assert_eq!(session.total_pages(), 23);
        assert_eq!(session.prev_page(), 1);
        assert_eq!(session.jump_to("99"), 23);
        assert_eq!(session.next_page(), 23);
        assert_eq!(session.jump_to("not a number"), 23);
        assert_eq!(session.jump_to("-3"), 1);
        assert_eq!(session.next_page(), 2);
    }

    #[test]
    fn test_refilter_resets_page() {
        let mut session = session_with(&numbered(4500));
        session.jump_to("10");
        session.add_rule(Rule::include("line 1")).unwrap();
        assert_eq!(session.current_page(), 1);
    }

    #[test]
    fn test_small_document_ignores_page_size() {
        let mut session = session_with(&numbered(2000));
        session.set_page_size(Some(10));
        assert_eq!(session.total_pages(), 1);
        assert_eq!(session.page().lines.len(), 2000);
    }

    #[test]
    fn test_render_page_numbers() {
        let mut session = session_with(&numbered(3000));
        session.set_page_size(Some(100));
        session.add_rule(Rule::ends_with("0")).unwrap();
        session.next_page();
        let rendered = session.render_page();
        assert_eq!(rendered[0].display_index, 101);
        assert_eq!(rendered[0].line_number, 1010);
        assert_eq!(rendered[0].text.plain_text(), "line 1010");
    }

    #[test]
    fn test_export_uses_raw_text() {
        let mut session = session_with("<a> & b\nINFO c");
        session.add_rule(Rule::include("a")).unwrap();
        assert_eq!(session.export_page_text(), "<a> & b");
    }
}
