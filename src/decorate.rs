//! Line decoration: highlight spans plus cosmetic date, time and level tokens

pub mod markup;

pub use markup::{escape_html, strip_tags, unescape_html};

use crate::highlight::HighlightPattern;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)[0-9]{4}-[0-9]{2}-[0-9]{2}(?-u:\b)").expect("valid date regex")
});
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)[0-9]{2}:[0-9]{2}:[0-9]{2}(?:[.,][0-9]{3})?(?-u:\b)")
        .expect("valid time regex")
});
static LEVEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)(?:INFO|WARN|WARNING|ERROR|DEBUG|TRACE|FATAL)(?-u:\b)")
        .expect("valid level regex")
});

/// Severity tokens recognised in log lines (uppercase spellings only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Warning,
    Error,
    Fatal,
}

impl Severity {
    pub const ALL: [Severity; 7] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Warning,
        Severity::Error,
        Severity::Fatal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// Lower-cased token, used to derive marker classes
    pub fn class_name(&self) -> &'static str {
        match self {
            Severity::Trace => "trace",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }

    /// Exact, case-sensitive token lookup
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == token)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cosmetic token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Date,
    Time,
    Level(Severity),
}

impl Token {
    /// Marker classes for the token
    pub fn class_names(&self) -> String {
        match self {
            Token::Date => "hl-date".to_string(),
            Token::Time => "hl-time".to_string(),
            Token::Level(level) => format!("hl-level level-{}", level.class_name()),
        }
    }
}

/// A run of raw text with uniform markers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    /// Inside a highlight match
    pub matched: bool,
    pub token: Option<Token>,
}

/// A decorated line
///
/// Segments keep the raw text; escaping happens only when a markup form is
/// produced, so markers can never corrupt escaping or each other.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnnotatedText {
    segments: Vec<Segment>,
    level: Option<Severity>,
}

impl AnnotatedText {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// First severity token of the raw line, for line-level emphasis
    pub fn level(&self) -> Option<Severity> {
        self.level
    }

    /// The undecorated line
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Escaped HTML with `<mark>` around matches and classed spans around tokens
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let mut in_mark = false;
        for segment in &self.segments {
            if segment.matched != in_mark {
                out.push_str(if segment.matched { "<mark>" } else { "</mark>" });
                in_mark = segment.matched;
            }
            let escaped = escape_html(&segment.text);
            match segment.token {
                Some(token) => {
                    out.push_str(&format!(
                        "<span class=\"{}\">{}</span>",
                        token.class_names(),
                        escaped
                    ));
                }
                None => out.push_str(&escaped),
            }
        }
        if in_mark {
            out.push_str("</mark>");
        }
        out
    }
}

/// Decorate one line
pub fn decorate(line: &str, highlight: Option<&HighlightPattern>) -> AnnotatedText {
    let mut segments = Vec::new();

    let mut last = 0;
    if let Some(pattern) = highlight {
        for m in pattern.find_spans(line) {
            push_tokenized(&mut segments, &line[last..m.start()], false);
            push_tokenized(&mut segments, m.as_str(), true);
            last = m.end();
        }
    }
    push_tokenized(&mut segments, &line[last..], false);

    AnnotatedText {
        segments,
        level: first_level(line),
    }
}

/// First whole-word severity token in the raw line
pub fn first_level(line: &str) -> Option<Severity> {
    LEVEL_RE
        .find(line)
        .and_then(|m| Severity::from_token(m.as_str()))
}

fn push_tokenized(segments: &mut Vec<Segment>, text: &str, matched: bool) {
    if text.is_empty() {
        return;
    }
    tokenize(segments, text, matched, 0);
}

/// Apply date, then time, then level detection; later passes only see text
/// that earlier passes left plain.
fn tokenize(segments: &mut Vec<Segment>, text: &str, matched: bool, pass: usize) {
    let regex: &Regex = match pass {
        0 => &*DATE_RE,
        1 => &*TIME_RE,
        2 => &*LEVEL_RE,
        _ => {
            segments.push(Segment {
                text: text.to_string(),
                matched,
                token: None,
            });
            return;
        }
    };

    let mut last = 0;
    for m in regex.find_iter(text) {
        if m.start() > last {
            tokenize(segments, &text[last..m.start()], matched, pass + 1);
        }
        // LEVEL_RE only matches tokens `from_token` knows
        let token = match pass {
            0 => Some(Token::Date),
            1 => Some(Token::Time),
            _ => Severity::from_token(m.as_str()).map(Token::Level),
        };
        segments.push(Segment {
            text: m.as_str().to_string(),
            matched,
            token,
        });
        last = m.end();
    }
    if last < text.len() {
        tokenize(segments, &text[last..], matched, pass + 1);
    }
}
