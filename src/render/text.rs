use super::summary_line;
use crate::decorate::{Segment, Severity, Token};
use crate::session::{RenderedLine, Session};
use colored::{Color, ColoredString, Colorize};
use std::fmt::Write as _;

pub fn severity_color(level: Severity) -> Color {
    match level {
        Severity::Trace => Color::BrightBlack,
        Severity::Debug => Color::Magenta,
        Severity::Info => Color::Green,
        Severity::Warn | Severity::Warning => Color::Yellow,
        Severity::Error => Color::Red,
        Severity::Fatal => Color::BrightRed,
    }
}

fn paint(segment: &Segment) -> ColoredString {
    let text = segment.text.as_str().normal();
    let text = match segment.token {
        Some(Token::Date) => text.blue(),
        Some(Token::Time) => text.cyan(),
        Some(Token::Level(level)) => text.color(severity_color(level)).bold(),
        None => text,
    };
    if segment.matched {
        text.on_yellow().bold()
    } else {
        text
    }
}

/// Terminal rendering of one line: source number, display index, decorated text
pub fn format_line_text(line: &RenderedLine) -> String {
    let gutter = format!("{:>7} {:>7}", line.line_number, line.display_index);
    let gutter = match line.text.level() {
        Some(level) => gutter.as_str().color(severity_color(level)),
        None => gutter.as_str().bright_black(),
    };

    let mut out = format!("{gutter} │ ");
    for segment in line.text.segments() {
        let _ = write!(out, "{}", paint(segment));
    }
    out
}

/// Terminal rendering of the current page with a summary header
pub fn format_page_text(session: &Session) -> String {
    let mut out = String::new();
    let header = summary_line(session);
    if session.last_run().errors.is_empty() {
        let _ = writeln!(out, "{}", header.as_str().bold());
    } else {
        let _ = writeln!(out, "{}", header.as_str().red().bold());
    }

    if let Some(message) = session.empty_message() {
        let _ = writeln!(out, "{}", message.bright_black());
        return out;
    }

    for line in session.render_page() {
        let _ = writeln!(out, "{}", format_line_text(&line));
    }
    out
}
