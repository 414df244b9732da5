//! Field extraction.
//!
//! [`FieldExtractor`] splits one line into bullet, key, delimiter and value,
//! then applies the grammar's presentation flags to the key. It never fails:
//! lines that do not split (for instance the line under the cursor, which is
//! exempt from classification) produce an empty [`Field`].

use serde::Serialize;

use crate::grammar::Grammar;

/// One line decomposed into its displayable parts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Field {
    /// The marker as written in the line, e.g. `-`.
    pub bullet_text: String,
    /// The key, including bullet and delimiter when those are displayed.
    pub key: String,
    pub delimiter: String,
    pub value: String,
}

impl Field {
    /// True if the line did not split into key and value.
    pub fn is_empty(&self) -> bool {
        self.key.is_empty() && self.value.is_empty()
    }
}

/// Splits key-value lines under a grammar.
#[derive(Clone, Copy, Debug)]
pub struct FieldExtractor<'g> {
    grammar: &'g Grammar,
}

impl<'g> FieldExtractor<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        FieldExtractor { grammar }
    }

    /// Extracts the field of a line, or an empty field if it does not match.
    pub fn extract(&self, line: &str) -> Field {
        let Some((marker, body)) = self.grammar.key_value_body(line) else {
            return Field::default();
        };
        let Some(split) = self.grammar.split_key_value(body) else {
            return Field::default();
        };

        let presentation = self.grammar.presentation();
        let mut key = String::with_capacity(split.key.len() + marker.marker.len() + 2);
        if presentation.display_bullet {
            key.push_str(marker.marker);
            key.push(' ');
        }
        key.push_str(split.key);
        if presentation.display_delimiter {
            key.push_str(split.delimiter);
        }

        Field {
            bullet_text: marker.marker.to_string(),
            key,
            delimiter: split.delimiter.to_string(),
            value: escape_footnotes(split.value),
        }
    }
}

/// Escapes the caret of footnote references (`[^1]` becomes `[\^1]`) so a
/// downstream Markdown renderer shows them literally. Other text is untouched.
pub fn escape_footnotes(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    let mut rest = text;

    while let Some(open) = rest.find("[^") {
        let after = &rest[open + 2..];
        let is_reference = after
            .find(']')
            .is_some_and(|close| close > 0 && !after[..close].contains(['[', ' ']));

        out.push_str(&rest[..open + 1]);
        if is_reference {
            out.push('\\');
        }
        out.push('^');
        rest = after;
    }
    out.push_str(rest);
    out
}

/// Drops the escape added by [`escape_footnotes`], for surfaces that print
/// values verbatim instead of handing them to a Markdown renderer.
///
/// ```rust
/// use kvlist::{escape_footnotes, unescape_footnotes};
///
/// let escaped = escape_footnotes("see note[^1]");
/// assert_eq!(unescape_footnotes(&escaped), "see note[^1]");
/// ```
pub fn unescape_footnotes(text: &str) -> String {
    text.replace("[\\^", "[^")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;

    fn grammar(display_bullet: bool, display_delimiter: bool) -> Grammar {
        Grammar::from_settings(&Settings {
            display_bullet,
            display_delimiter,
            ..Settings::default()
        })
    }

    #[test]
    fn extracts_with_delimiter_displayed() {
        let grammar = grammar(false, true);
        let field = FieldExtractor::new(&grammar).extract("- Name: Ada");
        assert_eq!(field.key, "Name:");
        assert_eq!(field.value, "Ada");
        assert_eq!(field.delimiter, ":");
        assert_eq!(field.bullet_text, "-");
    }

    #[test]
    fn extracts_plain_key() {
        let grammar = grammar(false, false);
        let field = FieldExtractor::new(&grammar).extract("  - Name :   Ada Lovelace  ");
        assert_eq!(field.key, "Name");
        assert_eq!(field.value, "Ada Lovelace");
    }

    #[test]
    fn displays_bullet() {
        let grammar = grammar(true, true);
        let field = FieldExtractor::new(&grammar).extract("- Name: Ada");
        assert_eq!(field.key, "- Name:");
    }

    #[test]
    fn colon_guard_in_key() {
        let grammar = grammar(false, false);
        let field = FieldExtractor::new(&grammar).extract("- see http://x.org: home");
        assert_eq!(field.key, "see http://x.org");
        assert_eq!(field.value, "home");
    }

    #[test]
    fn non_matching_line_is_empty() {
        let grammar = Grammar::default();
        let extractor = FieldExtractor::new(&grammar);
        assert!(extractor.extract("- Name:").is_empty());
        assert!(extractor.extract("plain text").is_empty());
        assert_eq!(extractor.extract("- incomplete"), Field::default());
    }

    #[test]
    fn escapes_footnote_in_value() {
        let grammar = Grammar::default();
        let field = FieldExtractor::new(&grammar).extract("- Ref: see note[^1]");
        assert_eq!(field.value, "see note[\\^1]");
    }

    #[test]
    fn escape_footnotes_only_touches_references() {
        assert_eq!(escape_footnotes("see note[^1]"), "see note[\\^1]");
        assert_eq!(escape_footnotes("a[^x] and b[^y]"), "a[\\^x] and b[\\^y]");
        assert_eq!(escape_footnotes("2^10 and [link](u)"), "2^10 and [link](u)");
        assert_eq!(escape_footnotes("open [^ never closed"), "open [^ never closed");
        assert_eq!(escape_footnotes("[^]"), "[^]");
        assert_eq!(escape_footnotes(""), "");
    }

    #[test]
    fn unescape_restores_references() {
        assert_eq!(unescape_footnotes("a[\\^x] and b[\\^y]"), "a[^x] and b[^y]");
        assert_eq!(unescape_footnotes("2^10 \\ [link](u)"), "2^10 \\ [link](u)");
    }
}
