//! The document-source collaborator.
//!
//! The host owns the text. The core reads it through [`DocumentSource`] once
//! per tick and never writes back.

use std::borrow::Cow;

/// An inclusive range of 0-indexed lines. `start > end` is empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> Self {
        LineRange { start, end }
    }

    /// A range covering a single line.
    pub fn line(line: usize) -> Self {
        LineRange {
            start: line,
            end: line,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.end - self.start + 1
        }
    }

    pub fn contains(&self, line: usize) -> bool {
        self.start <= line && line <= self.end
    }

    /// Clamps the range to a document of `line_count` lines.
    ///
    /// Returns `None` when nothing of the range lies inside the document.
    pub fn clamp_to(&self, line_count: usize) -> Option<LineRange> {
        if self.is_empty() || line_count == 0 || self.start >= line_count {
            return None;
        }
        Some(LineRange {
            start: self.start,
            end: self.end.min(line_count - 1),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> {
        self.start..self.end.saturating_add(1).max(self.start)
    }
}

/// Read-only view of the host's document for one tick.
pub trait DocumentSource {
    /// Number of lines in the document.
    fn line_count(&self) -> usize;

    /// Raw text of a line, without its line terminator.
    fn line(&self, index: usize) -> Option<Cow<'_, str>>;

    /// Line holding the primary cursor, if any.
    fn cursor_line(&self) -> Option<usize>;

    /// Lines currently inside the host's viewport.
    ///
    /// `None` while the host is not ready (no view attached, nothing laid
    /// out yet). The scheduler treats that as an empty viewport and retries
    /// on the next tick.
    fn visible_lines(&self) -> Option<LineRange>;
}

/// A simple in-memory document, useful for tests and non-interactive hosts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextDocument {
    lines: Vec<String>,
    cursor: Option<usize>,
    viewport: Option<LineRange>,
}

impl TextDocument {
    /// Builds a document from text. The viewport covers every line.
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(text.lines())
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        let viewport = match lines.len() {
            0 => None,
            n => Some(LineRange::new(0, n - 1)),
        };
        TextDocument {
            lines,
            cursor: None,
            viewport,
        }
    }

    pub fn with_cursor(mut self, line: usize) -> Self {
        self.cursor = Some(line);
        self
    }

    pub fn with_viewport(mut self, viewport: Option<LineRange>) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn set_cursor(&mut self, line: Option<usize>) {
        self.cursor = line;
    }

    pub fn set_viewport(&mut self, viewport: Option<LineRange>) {
        self.viewport = viewport;
    }

    /// Replaces the text of a line. Out-of-range indices are ignored.
    pub fn set_line(&mut self, index: usize, text: impl Into<String>) {
        if let Some(line) = self.lines.get_mut(index) {
            *line = text.into();
        }
    }

    /// Inserts a line, extending the viewport if it covered the old end.
    pub fn insert_line(&mut self, index: usize, text: impl Into<String>) {
        let index = index.min(self.lines.len());
        let covered_end = self
            .viewport
            .is_some_and(|v| v.end + 1 >= self.lines.len());
        self.lines.insert(index, text.into());
        if covered_end {
            let start = self.viewport.map_or(0, |v| v.start);
            self.viewport = Some(LineRange::new(start, self.lines.len() - 1));
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl DocumentSource for TextDocument {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, index: usize) -> Option<Cow<'_, str>> {
        self.lines.get(index).map(|l| Cow::Borrowed(l.as_str()))
    }

    fn cursor_line(&self) -> Option<usize> {
        self.cursor
    }

    fn visible_lines(&self) -> Option<LineRange> {
        self.viewport
    }
}
