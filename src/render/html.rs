use super::summary_line;
use crate::decorate::escape_html;
use crate::session::{RenderedLine, Session};
use std::fmt::Write as _;

const STYLE: &str = "\
body { background: #111418; color: #d8dee9; font-family: monospace; }
.status { padding: 4px 8px; }
.status.error { color: #ff6b6b; }
.line { white-space: pre; }
.line-number { display: inline-block; min-width: 6ch; text-align: right; padding-right: 1ch; color: #5c6370; }
mark { background: #e5c07b; color: #111418; }
.hl-date { color: #61afef; }
.hl-time { color: #56b6c2; }
.level-trace { color: #7f848e; }
.level-debug { color: #c678dd; }
.level-info { color: #98c379; }
.level-warn, .level-warning { color: #e5c07b; }
.level-error { color: #e06c75; }
.level-fatal { color: #ff5555; font-weight: bold; }
.level-warn-glow, .level-warning-glow { background: rgba(229, 192, 123, 0.08); }
.level-error-glow, .level-fatal-glow { background: rgba(224, 108, 117, 0.12); }
.empty { color: #5c6370; padding: 8px; }
";

/// One `<div class="line">` for a rendered line
pub fn format_line_html(line: &RenderedLine) -> String {
    let glow = line
        .text
        .level()
        .map(|level| format!(" level-{}-glow", level.class_name()))
        .unwrap_or_default();
    format!(
        "<div class=\"line{glow}\"><span class=\"line-number file\">{}</span><span class=\"line-number display\">{}</span><span class=\"line-text\">{}</span></div>",
        line.line_number,
        line.display_index,
        line.text.to_html()
    )
}

/// Body markup for the current page: the lines, or a placeholder when there are none
pub fn format_page_body(session: &Session) -> String {
    if let Some(message) = session.empty_message() {
        return format!("<div class=\"empty\">{}</div>", escape_html(message));
    }
    session
        .render_page()
        .iter()
        .map(format_line_html)
        .collect::<Vec<_>>()
        .join("\n")
}

/// A standalone HTML document for the current page
pub fn format_page_html(session: &Session) -> String {
    let title = session
        .document()
        .map(|doc| doc.name().to_string())
        .unwrap_or_else(|| "log-lens".to_string());
    let status_class = if session.last_run().errors.is_empty() {
        "status"
    } else {
        "status error"
    };

    let mut out = String::new();
    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html lang=\"en\">");
    let _ = writeln!(out, "<head>");
    let _ = writeln!(out, "<meta charset=\"utf-8\">");
    let _ = writeln!(out, "<title>{}</title>", escape_html(&title));
    let _ = writeln!(out, "<style>\n{STYLE}</style>");
    let _ = writeln!(out, "</head>");
    let _ = writeln!(out, "<body>");
    let _ = writeln!(
        out,
        "<div class=\"{status_class}\">{}</div>",
        escape_html(&summary_line(session))
    );
    let _ = writeln!(out, "<div id=\"output\">");
    let _ = writeln!(out, "{}", format_page_body(session));
    let _ = writeln!(out, "</div>");
    let _ = writeln!(out, "</body>");
    let _ = writeln!(out, "</html>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorate::{strip_tags, unescape_html};
    use crate::document::Document;
    use crate::paginate::PaginationConfig;
    use crate::rule::Rule;

    fn session(text: &str, rules: Vec<Rule>) -> Session {
        let mut session = Session::new(PaginationConfig::default());
        session.load_document(Document::parse("a.log", text));
        session.set_rules(rules).unwrap();
        session
    }

    #[test]
    fn test_line_markup() {
        let s = session("ok\nERROR <db> down", vec![Rule::include("db")]);
        let body = format_page_body(&s);
        assert_eq!(
            body,
            "<div class=\"line level-error-glow\"><span class=\"line-number file\">2</span>\
             <span class=\"line-number display\">1</span><span class=\"line-text\">\
             <span class=\"hl-level level-error\">ERROR</span> &lt;<mark>db</mark>&gt; down</span></div>"
        );
    }

    #[test]
    fn test_no_matches_placeholder() {
        let s = session("a", vec![Rule::include("zzz")]);
        assert_eq!(format_page_body(&s), "<div class=\"empty\">No matches</div>");
    }

    #[test]
    fn test_line_text_round_trips() {
        let raw = r#"2024-01-01 12:00:00 WARN "quoted" & <tag> 'single'"#;
        let s = session(raw, vec![Rule::include("tag"), Rule::regex("q\\w+").or()]);
        let rendered = s.render_page();
        let html = rendered[0].text.to_html();
        assert_eq!(unescape_html(&strip_tags(&html)), raw);
    }

    #[test]
    fn test_document_has_status_and_title() {
        let s = session("x", vec![Rule::regex("(")]);
        let doc = format_page_html(&s);
        assert!(doc.contains("<title>a.log</title>"));
        assert!(doc.contains("<div class=\"status error\">"));
        assert!(doc.contains("No matches"));
    }
}
