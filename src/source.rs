//! Source text with a line index for turning byte offsets into locations

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::ast::{Location, Span};

/// Name used for sources that did not come from a file
pub const DEFAULT_SOURCE_NAME: &str = "<input>";

/// An immutable piece of Java source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    name: Arc<str>,
    content: String,
    /// Byte offset of the first character of every line
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(name: impl Into<Arc<str>>, content: impl Into<String>) -> Self {
        let content = content.into();
        let line_starts = line_starts(&content);
        Self {
            name: name.into(),
            content,
            line_starts,
        }
    }

    /// Source built from in-memory text under the default name
    pub fn from_string(content: impl Into<String>) -> Self {
        Self::new(DEFAULT_SOURCE_NAME, content)
    }

    /// Read a file as UTF-8; the path becomes the source name
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Ok(Self::new(path.display().to_string(), content))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Location (1-based line and column) of a byte offset; offsets past the end clamp to EOF
    pub fn location_at(&self, offset: usize) -> Location {
        let offset = offset.min(self.content.len());
        let line_index = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let line_start = self.line_starts[line_index];
        let column = self
            .content
            .get(line_start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset - line_start);
        Location::new(line_index + 1, column + 1, offset)
    }

    pub fn span_of(&self, start: usize, end: usize) -> Span {
        Span::new(self.location_at(start), self.location_at(end))
    }

    /// Text of a 1-based line without its terminator
    pub fn line_text(&self, line: usize) -> Option<&str> {
        if line == 0 || line > self.line_starts.len() {
            return None;
        }
        let start = self.line_starts[line - 1];
        let end = self
            .line_starts
            .get(line)
            .copied()
            .unwrap_or(self.content.len());
        self.content
            .get(start..end)
            .map(|text| text.trim_end_matches(['\n', '\r']))
    }
}

fn line_starts(content: &str) -> Vec<usize> {
    let bytes = content.as_bytes();
    let mut starts = vec![0];
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => starts.push(i + 1),
            b'\r' if bytes.get(i + 1) != Some(&b'\n') => starts.push(i + 1),
            _ => {}
        }
        i += 1;
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locations_are_one_based() {
        let source = SourceFile::from_string("class A {\n  int x;\n}\n");
        assert_eq!(source.location_at(0), Location::new(1, 1, 0));
        assert_eq!(source.location_at(12), Location::new(2, 3, 12));
        assert_eq!(source.line_text(2), Some("  int x;"));
        assert_eq!(source.name(), DEFAULT_SOURCE_NAME);
    }

    #[test]
    fn crlf_and_cr_terminate_lines() {
        let source = SourceFile::new("Win.java", "a\r\nb\rc");
        assert_eq!(source.line_count(), 3);
        assert_eq!(source.line_text(1), Some("a"));
        assert_eq!(source.location_at(5).line, 3);
    }

    #[test]
    fn offsets_past_end_clamp() {
        let source = SourceFile::from_string("ab");
        assert_eq!(source.location_at(100), Location::new(1, 3, 2));
        assert_eq!(source.line_text(7), None);
    }

    #[test]
    fn columns_count_characters() {
        let source = SourceFile::from_string("é = 1;");
        // 'é' is two bytes
        assert_eq!(source.location_at(2).column, 2);
    }
}
