//! Output forms for a session's current page
//!
//! Every renderer reads the same [`Session`]; none of them decides what is
//! shown, only how.

pub mod html;
pub mod json;
pub mod stats;
pub mod text;

pub use html::format_page_html;
pub use json::format_page_json;
pub use stats::{LevelStats, format_stats_json, format_stats_text};
pub use text::format_page_text;

use crate::session::Session;

/// One-line summary: totals, page position and any error
pub fn summary_line(session: &Session) -> String {
    let mut line = format!(
        "Lines: {} | Filtered: {} | Page: {} / {}",
        session.total_lines(),
        session.filtered_lines(),
        session.current_page(),
        session.total_pages()
    );
    if let Some(message) = session.last_run().error_message() {
        line.push_str(&format!(" | {message}"));
    }
    line
}
