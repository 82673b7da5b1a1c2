//! Page boundaries over a filter result

use crate::document::LineRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Page size used when none (or an unusable one) is configured
pub const DEFAULT_PAGE_SIZE: usize = 200;
/// Documents with at most this many source lines are shown on a single page
pub const SINGLE_PAGE_THRESHOLD: usize = 2000;

/// User-facing pagination settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub enabled: bool,
    /// Requested page size; absent or non-positive falls back to [`DEFAULT_PAGE_SIZE`]
    pub page_size: Option<i64>,
    pub single_page_threshold: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            page_size: Some(DEFAULT_PAGE_SIZE as i64),
            single_page_threshold: SINGLE_PAGE_THRESHOLD,
        }
    }
}

impl PaginationConfig {
    pub fn effective_page_size(&self) -> usize {
        match self.page_size {
            Some(size) if size > 0 => usize::try_from(size).unwrap_or(DEFAULT_PAGE_SIZE),
            _ => DEFAULT_PAGE_SIZE,
        }
    }

    /// Pick the policy for a document of `document_len` source lines
    ///
    /// The threshold is measured on the whole document, not on the filtered
    /// result.
    pub fn policy_for(&self, document_len: usize) -> PagePolicy {
        if !self.enabled || document_len <= self.single_page_threshold {
            PagePolicy::SinglePage
        } else {
            PagePolicy::Fixed(self.effective_page_size())
        }
    }
}

/// Parse a page size typed by a user; anything unusable yields `None`
pub fn parse_page_size(input: &str) -> Option<i64> {
    parse_number(input).filter(|size| *size > 0)
}

/// Parse a page jump request; non-numeric input yields `None`
///
/// Fractional input is floored. Out-of-range values are left for
/// [`clamp_page`] to resolve.
pub fn parse_page_request(input: &str) -> Option<i64> {
    parse_number(input)
}

fn parse_number(input: &str) -> Option<i64> {
    let value: f64 = input.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(value.floor() as i64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePolicy {
    /// The whole filter result on one page
    SinglePage,
    /// Fixed-size pages (size is at least 1)
    Fixed(usize),
}

/// A contiguous window of the filter result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a> {
    /// 1-based page number, already clamped
    pub number: usize,
    pub size: usize,
    pub total_pages: usize,
    /// Offset of the first line of the page within the filter result
    pub start: usize,
    pub lines: &'a [LineRecord],
}

impl Page<'_> {
    /// Position of the `idx`-th line of this page within the filter result (1-based)
    pub fn display_index(&self, idx: usize) -> usize {
        self.start + idx + 1
    }

    /// Raw text of the page joined with `\n`, for copying
    pub fn export_text(&self) -> String {
        export_page_text(self)
    }
}

/// Clamp a requested page into `[1, total_pages]`
pub fn clamp_page(requested: i64, total_pages: usize) -> usize {
    let total = total_pages.max(1);
    if requested < 1 {
        1
    } else {
        usize::try_from(requested).map_or(total, |page| page.min(total))
    }
}

/// Slice the requested page out of `filtered`
pub fn paginate(filtered: &[LineRecord], policy: PagePolicy, requested_page: i64) -> Page<'_> {
    let (size, total_pages) = match policy {
        PagePolicy::SinglePage => (filtered.len().max(1), 1),
        PagePolicy::Fixed(size) => {
            let size = size.max(1);
            (size, filtered.len().div_ceil(size).max(1))
        }
    };

    let number = clamp_page(requested_page, total_pages);
    let start = ((number - 1) * size).min(filtered.len());
    let end = (start + size).min(filtered.len());

    debug!(requested_page, number, total_pages, size, "paginated");

    Page {
        number,
        size,
        total_pages,
        start,
        lines: &filtered[start..end],
    }
}

/// Raw text of a page joined with `\n`
pub fn export_page_text(page: &Page<'_>) -> String {
    page.lines
        .iter()
        .map(|record| record.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
