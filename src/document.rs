use crate::error::DocumentError;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// One source line together with its stable 1-based position in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineRecord {
    pub line_number: usize,
    pub text: String,
}

impl LineRecord {
    pub fn new(line_number: usize, text: impl Into<String>) -> Self {
        Self {
            line_number,
            text: text.into(),
        }
    }
}

/// An immutable, fully loaded text document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    name: String,
    lines: Vec<LineRecord>,
}

impl Document {
    /// Split `text` into numbered lines
    ///
    /// Both `\n` and `\r\n` terminate a line. A trailing terminator does not
    /// open an extra empty line.
    pub fn parse(name: impl Into<String>, text: &str) -> Self {
        Self {
            name: name.into(),
            lines: load_document(text),
        }
    }

    /// Read and split a file
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected so any log
    /// file can be viewed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8_lossy(&bytes);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::parse(name, &text))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lines(&self) -> &[LineRecord] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Split text into [`LineRecord`]s numbered from 1
pub fn load_document(text: &str) -> Vec<LineRecord> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| LineRecord::new(idx + 1, line))
        .collect()
}
