//! List segmentation.
//!
//! [`ListSegmenter`] walks a line range once, left to right, and groups
//! consecutive list-item lines into [`Block`]s. Blocks are values: they are
//! recomputed from scratch on every call and carry no identity across calls.

use serde::Serialize;

use crate::classify::LineClassifier;
use crate::document::{DocumentSource, LineRange};
use crate::grammar::Grammar;

/// A maximal run of consecutive list-item lines within the scanned range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Block {
    pub start_line: usize,
    /// Inclusive.
    pub end_line: usize,
    /// Every line except the cursor line is a key-value item.
    pub is_key_value: bool,
    pub contains_cursor: bool,
}

impl Block {
    pub fn lines(&self) -> LineRange {
        LineRange::new(self.start_line, self.end_line)
    }

    pub fn contains(&self, line: usize) -> bool {
        self.lines().contains(line)
    }
}

/// Groups list-item lines into blocks.
#[derive(Clone, Copy, Debug)]
pub struct ListSegmenter<'g> {
    classifier: LineClassifier<'g>,
}

impl<'g> ListSegmenter<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        ListSegmenter {
            classifier: LineClassifier::new(grammar),
        }
    }

    /// Collects the blocks inside `range`.
    ///
    /// A block that continues past `range.end` is clamped to it; the range
    /// is also clamped to the document. The line under `cursor_line` is
    /// exempt from key-value classification, so an incomplete line being
    /// typed does not disqualify its block.
    pub fn collect<D>(&self, doc: &D, range: LineRange, cursor_line: Option<usize>) -> Vec<Block>
    where
        D: DocumentSource + ?Sized,
    {
        let Some(range) = range.clamp_to(doc.line_count()) else {
            return Vec::new();
        };

        let mut blocks = Vec::new();
        let mut current = range.start;

        while current <= range.end {
            if !self.is_list_item_at(doc, current) {
                current += 1;
                continue;
            }

            let mut block = Block {
                start_line: current,
                end_line: current,
                is_key_value: true,
                contains_cursor: false,
            };
            let mut line_no = current;
            while line_no <= range.end {
                let Some(line) = doc.line(line_no) else {
                    break;
                };
                if !self.classifier.is_list_item(&line) {
                    break;
                }
                let is_cursor = cursor_line == Some(line_no);
                if is_cursor {
                    block.contains_cursor = true;
                }
                if !is_cursor && !self.classifier.is_key_value_item(&line) {
                    block.is_key_value = false;
                }
                block.end_line = line_no;
                line_no += 1;
            }

            blocks.push(block);
            current = block.end_line + 1;
        }

        blocks
    }

    /// Collects blocks over the whole document, e.g. for export.
    pub fn collect_all<D>(&self, doc: &D, cursor_line: Option<usize>) -> Vec<Block>
    where
        D: DocumentSource + ?Sized,
    {
        match doc.line_count() {
            0 => Vec::new(),
            n => self.collect(doc, LineRange::new(0, n - 1), cursor_line),
        }
    }

    fn is_list_item_at<D>(&self, doc: &D, line_no: usize) -> bool
    where
        D: DocumentSource + ?Sized,
    {
        doc.line(line_no)
            .is_some_and(|line| self.classifier.is_list_item(&line))
    }
}
