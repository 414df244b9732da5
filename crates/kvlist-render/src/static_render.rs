//! Static (read-mode) rendering.
//!
//! [`StaticRenderer`] is the one-shot counterpart of the incremental
//! scheduler. It segments a whole text with no cursor, and replaces every
//! key-value block with an aligned two-column table. There is no width cache:
//! the key column is simply the widest key of each block.
//!
//! ```rust
//! use kvlist::Grammar;
//! use kvlist_render::StaticRenderer;
//!
//! let renderer = StaticRenderer::new(Grammar::default());
//! let text = "Profile\n\n- Name: Ada\n- Occupation: Mathematician\n";
//!
//! assert_eq!(
//!     renderer.render(text, 60),
//!     "Profile\n\nName:        Ada\nOccupation:  Mathematician\n",
//! );
//! ```

use serde::Serialize;

use kvlist::{
    unescape_footnotes, Field, FieldExtractor, Grammar, ListSegmenter, Settings, TextDocument,
    WidgetStyle,
};

use crate::style::RowStyle;
use crate::table::TwoColumnSpec;
use crate::util::{
    display_width, pad_right, terminal_width, truncate_end, ELLIPSIS, FALLBACK_COLUMNS,
};

/// One key-value block of a text, in structured form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StaticTable {
    pub start_line: usize,
    /// Inclusive.
    pub end_line: usize,
    /// Leading whitespace of the first row.
    pub indent: String,
    pub rows: Vec<Field>,
}

/// Renders key-value lists in a text as aligned tables.
#[derive(Clone, Debug)]
pub struct StaticRenderer {
    grammar: Grammar,
    styled: bool,
    gap: usize,
}

impl StaticRenderer {
    pub fn new(grammar: Grammar) -> Self {
        StaticRenderer {
            grammar,
            styled: false,
            gap: 2,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(Grammar::from_settings(settings))
    }

    /// Emit ANSI styles (bold keys, colours, stripes).
    pub fn with_styling(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    /// Columns between the key and value columns.
    pub fn with_gap(mut self, gap: usize) -> Self {
        self.gap = gap;
        self
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Finds every key-value block in `text`.
    pub fn tables(&self, text: &str) -> Vec<StaticTable> {
        let doc = TextDocument::from_text(text);
        let lines = doc.lines();
        let extractor = FieldExtractor::new(&self.grammar);

        ListSegmenter::new(&self.grammar)
            .collect_all(&doc, None)
            .into_iter()
            .filter(|block| block.is_key_value)
            .map(|block| {
                let first = &lines[block.start_line];
                let indent = first[..first.len() - first.trim_start().len()].to_string();
                StaticTable {
                    start_line: block.start_line,
                    end_line: block.end_line,
                    indent,
                    rows: block
                        .lines()
                        .iter()
                        .map(|i| extractor.extract(&lines[i]))
                        .collect(),
                }
            })
            .collect()
    }

    /// The tables of `text` as pretty JSON.
    pub fn tables_json(&self, text: &str) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.tables(text))
    }

    /// Renders `text` for a display `width` columns wide.
    ///
    /// Lines outside key-value blocks pass through unchanged, as does the
    /// whole text when read-mode rendering is disabled.
    pub fn render(&self, text: &str, width: usize) -> String {
        let presentation = self.grammar.presentation();
        if !presentation.active_in_read_mode {
            return text.to_string();
        }

        let tables = self.tables(text);
        if tables.is_empty() {
            return text.to_string();
        }
        tracing::debug!(tables = tables.len(), width, "rendering key-value tables");

        let mut out = Vec::new();
        let mut tables = tables.iter().peekable();
        let mut skip_until = None;

        for (i, line) in text.lines().enumerate() {
            if skip_until.is_some_and(|end| i <= end) {
                continue;
            }
            match tables.next_if(|t| t.start_line == i) {
                Some(table) => {
                    out.extend(self.render_table(table, width));
                    skip_until = Some(table.end_line);
                }
                None => out.push(line.to_string()),
            }
        }

        let mut rendered = out.join("\n");
        if text.ends_with('\n') {
            rendered.push('\n');
        }
        rendered
    }

    /// Renders `text` for the attached terminal.
    pub fn render_for_terminal(&self, text: &str) -> String {
        self.render(text, terminal_width().unwrap_or(FALLBACK_COLUMNS))
    }

    fn render_table(&self, table: &StaticTable, width: usize) -> Vec<String> {
        let presentation = self.grammar.presentation();
        let available = width.saturating_sub(display_width(&table.indent));
        let spec = TwoColumnSpec {
            max_key: presentation
                .max_key_width(available as f32)
                .map(|w| w.floor() as usize),
            gap: self.gap,
        };
        // Terminal output prints values as-is, without Markdown escapes.
        let pairs: Vec<(&str, String)> = table
            .rows
            .iter()
            .map(|f| (f.key.as_str(), unescape_footnotes(&f.value)))
            .collect();
        let columns = spec.resolve(available, &pairs);

        pairs
            .iter()
            .enumerate()
            .map(|(row_index, (key, value))| {
                let style = if self.styled {
                    let widget = WidgetStyle::for_row(presentation, row_index, width as f32);
                    RowStyle::from_widget(&widget, true)
                } else {
                    RowStyle::plain()
                };
                let key = truncate_end(key, columns.key, ELLIPSIS);
                format!(
                    "{}{}{}",
                    table.indent,
                    style.key(&pad_right(&key, columns.key + self.gap)),
                    style.value(value)
                )
            })
            .collect()
    }
}
