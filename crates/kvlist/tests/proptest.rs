//! Property-based tests for kvlist using proptest.

use std::ops::Range;

use kvlist::{
    FieldExtractor, Grammar, LineClassifier, LineRange, ListSegmenter, PaintSurface,
    RenderScheduler, RowExtent, TextDocument, Update, Widget,
};
use proptest::prelude::*;

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Default)]
struct Surface {
    drawn: Vec<(usize, Widget)>,
}

impl PaintSurface for Surface {
    type Handle = usize;

    fn width(&self) -> f32 {
        600.0
    }

    fn clear(&mut self) {
        self.drawn.clear();
    }

    fn replace(&mut self, line: usize, _span: Range<usize>, widget: Widget) -> usize {
        self.drawn.push((line, widget));
        self.drawn.len() - 1
    }

    fn measure(&self, handle: &usize) -> Option<RowExtent> {
        let (_, widget) = self.drawn.get(*handle)?;
        Some(RowExtent {
            key_text_width: widget.field.key.chars().count() as f32,
            key_cell_width: widget.field.key.chars().count() as f32,
            value_width: widget.field.value.chars().count() as f32,
            has_link: false,
        })
    }
}

fn line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,8}".prop_map(|k| format!("- {k}: value")),
        "[a-z]{1,8}".prop_map(|k| format!("  - {k}: {k}")),
        Just("- incomplete".to_string()),
        Just("* other: bullet".to_string()),
        Just("1. numbered: item".to_string()),
        Just("prose".to_string()),
        Just(String::new()),
    ]
}

fn document_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(line_strategy(), 1..25)
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// A key-value item is always a list item.
    #[test]
    fn key_value_implies_list_item(line in "[-*+ a-z0-9:.=]{0,20}") {
        let grammar = Grammar::default();
        let classifier = LineClassifier::new(&grammar);
        if classifier.is_key_value_item(&line) {
            prop_assert!(classifier.is_list_item(&line));
        }
    }

    /// Extraction succeeds exactly on key-value items.
    #[test]
    fn extraction_agrees_with_classification(line in line_strategy()) {
        let grammar = Grammar::default();
        let classified = LineClassifier::new(&grammar).is_key_value_item(&line);
        let field = FieldExtractor::new(&grammar).extract(&line);
        prop_assert_eq!(classified, !field.is_empty());
    }

    /// Widgets are only drawn on key-value block lines, never on the cursor line.
    #[test]
    fn widgets_avoid_cursor_and_non_key_value_lines(
        lines in document_strategy(),
        cursor in prop::option::of(0usize..25),
    ) {
        let grammar = Grammar::default();
        let doc = TextDocument::from_lines(lines.clone());
        let doc = match cursor {
            Some(c) => doc.with_cursor(c),
            None => doc,
        };
        let mut surface = Surface::default();
        let mut scheduler = RenderScheduler::new();
        scheduler.update(&doc, &mut surface, &grammar, Update::doc_changed());

        let blocks = ListSegmenter::new(&grammar).collect(
            &doc,
            LineRange::new(0, lines.len() - 1),
            cursor,
        );
        for (line, widget) in &surface.drawn {
            prop_assert_ne!(Some(*line), cursor);
            let block = blocks.iter().find(|b| b.contains(*line));
            prop_assert!(block.is_some_and(|b| b.is_key_value));
            prop_assert!(!widget.field.is_empty());
        }
    }

    /// While the cursor stays put, cached widths only grow across edits.
    #[test]
    fn clean_widths_never_shrink(
        first in document_strategy(),
        edits in prop::collection::vec((0usize..25, line_strategy()), 0..10),
    ) {
        let grammar = Grammar::default();
        let mut doc = TextDocument::from_lines(first);
        let mut surface = Surface::default();
        let mut scheduler = RenderScheduler::new();
        scheduler.update(&doc, &mut surface, &grammar, Update::doc_changed());
        scheduler.after_paint(&surface);

        for (index, text) in edits {
            let before = scheduler.cache().clone();
            doc.set_line(index, text);
            scheduler.update(&doc, &mut surface, &grammar, Update::doc_changed());
            scheduler.after_paint(&surface);

            let after = scheduler.cache();
            if after.generation() == before.generation() {
                for block in 0..after.len() {
                    let (old, new) = (before.get(block), after.get(block));
                    if !old.key_dirty {
                        prop_assert!(new.key_width >= old.key_width);
                    }
                    if !old.row_dirty {
                        prop_assert!(new.row_width >= old.row_width);
                    }
                }
            }
        }
    }
}
