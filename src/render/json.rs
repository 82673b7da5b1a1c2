use crate::decorate::Severity;
use crate::session::Session;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PageReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<&'a str>,
    pub total_lines: usize,
    pub filtered_lines: usize,
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<&'a str>,
    pub lines: Vec<LineReport>,
}

#[derive(Debug, Serialize)]
pub struct LineReport {
    pub line_number: usize,
    pub display_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Severity>,
    pub text: String,
}

impl<'a> PageReport<'a> {
    pub fn from_session(session: &'a Session) -> Self {
        let page = session.page();
        let run = session.last_run();
        let lines = session
            .render_page()
            .into_iter()
            .map(|line| LineReport {
                line_number: line.line_number,
                display_index: line.display_index,
                level: line.text.level(),
                text: line.text.plain_text(),
            })
            .collect();

        Self {
            file: session.document().map(|doc| doc.name()),
            total_lines: session.total_lines(),
            filtered_lines: session.filtered_lines(),
            page: page.number,
            total_pages: page.total_pages,
            page_size: page.size,
            failed: run.failed,
            error: run.error_message(),
            highlight: run.highlight.as_ref().map(|h| h.as_str()),
            lines,
        }
    }
}

/// Pretty-printed JSON report of the current page
pub fn format_page_json(session: &Session) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&PageReport::from_session(session))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::paginate::PaginationConfig;
    use crate::rule::Rule;
    use serde_json::Value;

    #[test]
    fn test_report_fields() {
        let mut session = Session::new(PaginationConfig::default());
        session.load_document(Document::parse("app.log", "INFO up\nERROR down\nplain"));
        session.add_rule(Rule::exclude("plain")).unwrap();

        let value: Value = serde_json::from_str(&format_page_json(&session).unwrap()).unwrap();
        assert_eq!(value["file"], "app.log");
        assert_eq!(value["total_lines"], 3);
        assert_eq!(value["filtered_lines"], 2);
        assert_eq!(value["total_pages"], 1);
        assert_eq!(value["failed"], false);
        assert!(value.get("error").is_none());
        assert!(value.get("highlight").is_none());
        assert_eq!(value["lines"][1]["line_number"], 2);
        assert_eq!(value["lines"][1]["level"], "ERROR");
        assert_eq!(value["lines"][1]["text"], "ERROR down");
    }

    #[test]
    fn test_failed_run_is_reported() {
        let mut session = Session::new(PaginationConfig::default());
        session.load_document(Document::parse("app.log", "x"));
        session.add_rule(Rule::regex("*")).unwrap();

        let value: Value = serde_json::from_str(&format_page_json(&session).unwrap()).unwrap();
        assert_eq!(value["failed"], true);
        assert!(value["error"].as_str().unwrap().contains("Regex error"));
        assert_eq!(value["lines"].as_array().unwrap().len(), 0);
    }
}
