//! Line classification.
//!
//! [`LineClassifier`] answers two pure questions about a single line. It keeps
//! no state, so the segmenter can ask both questions of the same line without
//! re-deriving anything.

use crate::grammar::Grammar;

/// Decides whether a line is a list item and whether it is a key-value item.
#[derive(Clone, Copy, Debug)]
pub struct LineClassifier<'g> {
    grammar: &'g Grammar,
}

impl<'g> LineClassifier<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        LineClassifier { grammar }
    }

    /// True if the line is optional indentation, a list marker, a blank and a
    /// body. The marker is the configured bullet, `-`, `*`, `+` or `N.`.
    pub fn is_list_item(&self, line: &str) -> bool {
        self.grammar.list_marker(line).is_some()
    }

    /// True if the line is a bulleted item whose body splits into a non-blank
    /// key, one of the delimiter candidates, a space and a non-blank value.
    ///
    /// Always false when the grammar has no delimiters.
    pub fn is_key_value_item(&self, line: &str) -> bool {
        self.grammar
            .key_value_body(line)
            .and_then(|(_, body)| self.grammar.split_key_value(body))
            .is_some()
    }
}
