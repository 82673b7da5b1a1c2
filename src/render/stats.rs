use crate::decorate::{Severity, first_level};
use crate::document::LineRecord;
use crate::session::Session;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Severity breakdown of a filter result, keyed by each line's first level token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LevelStats {
    pub total_lines: usize,
    pub filtered_lines: usize,
    pub levels: BTreeMap<Severity, usize>,
    /// Lines without any level token
    pub unleveled: usize,
}

impl LevelStats {
    pub fn collect(total_lines: usize, filtered: &[LineRecord]) -> Self {
        let mut stats = Self {
            total_lines,
            filtered_lines: filtered.len(),
            ..Self::default()
        };
        for record in filtered {
            match first_level(&record.text) {
                Some(level) => *stats.levels.entry(level).or_default() += 1,
                None => stats.unleveled += 1,
            }
        }
        stats
    }

    pub fn from_session(session: &Session) -> Self {
        Self::collect(session.total_lines(), &session.last_run().result)
    }
}

pub fn create_styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().map(|h| Cell::new(h)).collect::<Vec<_>>());
    table
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}

pub fn format_stats_text(stats: &LevelStats) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Lines: {} | Filtered: {} ({:.2}%)",
        stats.total_lines,
        stats.filtered_lines,
        percent(stats.filtered_lines, stats.total_lines)
    );

    let mut table = create_styled_table(&["Level", "Lines", "Percent"]);
    for (level, count) in &stats.levels {
        table.add_row(vec![
            Cell::new(level.as_str()),
            Cell::new(count),
            Cell::new(format!("{:>6.2}%", percent(*count, stats.filtered_lines))),
        ]);
    }
    if stats.unleveled > 0 {
        table.add_row(vec![
            Cell::new("(none)"),
            Cell::new(stats.unleveled),
            Cell::new(format!(
                "{:>6.2}%",
                percent(stats.unleveled, stats.filtered_lines)
            )),
        ]);
    }
    let _ = writeln!(out, "{table}");
    out
}

pub fn format_stats_json(stats: &LevelStats) -> Result<String, serde_json::Error> {
    let levels: BTreeMap<&str, usize> = stats
        .levels
        .iter()
        .map(|(level, count)| (level.as_str(), *count))
        .collect();
    serde_json::to_string_pretty(&json!({
        "total_lines": stats.total_lines,
        "filtered_lines": stats.filtered_lines,
        "levels": levels,
        "unleveled": stats.unleveled,
    }))
}
