//! Per-block width cache and its invalidation state machine.
//!
//! [`WidthCache`] keeps one [`LayoutEntry`] per key-value block of the current
//! tick. Entries are keyed by position in that tick's block list, not by a
//! stable block identity: inserting a block above another can briefly hand
//! the lower block its neighbour's widths until the next reconcile or merge.
//! Blocks are recomputed every tick and a count change resets everything, so
//! widths converge within a tick.
//!
//! Entry states, as `(key, row)`:
//!
//! ```text
//!   (clean, clean) --cursor exit--> (dirty, clean) --cursor exit--> (dirty, dirty)
//!         ^                               |                               |
//!         +------------ merge ------------+-------------- merge ----------+
//! ```
//!
//! A count change puts every entry in `(dirty, dirty)`. Row dirtiness trails
//! key dirtiness by one generation, so `(clean, dirty)` is unreachable.

use serde::Serialize;

use crate::surface::{MeasureMetrics, RowExtent};

/// Forced repaint passes after the cursor leaves a block.
pub const SETTLE_PASSES: u8 = 3;

/// Cached column widths of one block.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LayoutEntry {
    /// Minimum key column width; 0 means unconstrained.
    pub key_width: f32,
    /// Minimum row width; 0 means unconstrained.
    pub row_width: f32,
    pub key_dirty: bool,
    pub row_dirty: bool,
}

impl LayoutEntry {
    /// A new entry: no widths known, both axes dirty.
    pub fn fresh() -> Self {
        LayoutEntry {
            key_width: 0.0,
            row_width: 0.0,
            key_dirty: true,
            row_dirty: true,
        }
    }
}

impl Default for LayoutEntry {
    fn default() -> Self {
        LayoutEntry::fresh()
    }
}

/// Widths measured for one block after a paint, ready to merge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockMeasurement {
    pub key_width: f32,
    pub row_width: f32,
}

impl BlockMeasurement {
    /// Folds the extents of a block's painted rows.
    ///
    /// The key width is the widest key text plus the surface's key padding.
    /// The row width is the widest key cell plus value, plus horizontal
    /// padding on both sides and the link allowance for rows with links.
    /// Returns `None` when no row was measured.
    pub fn from_rows<I>(rows: I, horizontal_padding: f32, metrics: MeasureMetrics) -> Option<Self>
    where
        I: IntoIterator<Item = RowExtent>,
    {
        let mut measured: Option<BlockMeasurement> = None;
        for row in rows {
            let key = row.key_text_width + metrics.key_padding;
            let mut width = row.key_cell_width + row.value_width + horizontal_padding * 2.0;
            if row.has_link {
                width += metrics.link_allowance;
            }
            measured = Some(match measured {
                None => BlockMeasurement {
                    key_width: key,
                    row_width: width,
                },
                Some(m) => BlockMeasurement {
                    key_width: m.key_width.max(key),
                    row_width: m.row_width.max(width),
                },
            });
        }
        measured
    }
}

/// Which block held the cursor last tick, and pending settle passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CursorTransitionState {
    pub last_touched: Option<usize>,
    pub settle_counter: u8,
}

/// How the cursor moved relative to key-value blocks since the last tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorEvent {
    /// Not inside any block, before or now.
    Outside,
    Entered(usize),
    /// Still inside the same block.
    Stayed(usize),
    Moved { from: usize, to: usize },
    Exited(usize),
}

impl CursorEvent {
    /// True if the cursor entered or left a block.
    pub fn is_transition(&self) -> bool {
        matches!(
            self,
            CursorEvent::Entered(_) | CursorEvent::Moved { .. } | CursorEvent::Exited(_)
        )
    }
}

/// Cached widths for the current tick's key-value blocks.
#[derive(Clone, Debug, Default)]
pub struct WidthCache {
    entries: Vec<LayoutEntry>,
    generation: u64,
    transition: CursorTransitionState,
}

impl WidthCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Incremented every time the entries are rebuilt.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn transition(&self) -> CursorTransitionState {
        self.transition
    }

    /// Matches the cache to `block_count` blocks.
    ///
    /// If the count differs, every entry is replaced by a fresh, fully dirty
    /// one. Returns whether a reset happened.
    pub fn reconcile(&mut self, block_count: usize) -> bool {
        if block_count == self.entries.len() {
            return false;
        }
        tracing::debug!(
            from = self.entries.len(),
            to = block_count,
            "block count changed; resetting width cache"
        );
        self.entries = vec![LayoutEntry::fresh(); block_count];
        self.generation += 1;
        true
    }

    /// The entry for a block, or a fresh entry if none exists yet.
    pub fn get(&self, block_index: usize) -> LayoutEntry {
        self.entries
            .get(block_index)
            .copied()
            .unwrap_or_else(LayoutEntry::fresh)
    }

    /// Merges measured widths into a block's entry.
    ///
    /// A dirty axis takes the measured width as is; a clean axis only grows,
    /// so columns never shrink while the user is still typing in the block.
    /// Both axes are clean afterwards.
    pub fn merge(&mut self, block_index: usize, measured_key_width: f32, measured_row_width: f32) {
        let Some(entry) = self.entries.get_mut(block_index) else {
            tracing::debug!(block_index, "merge for unknown block ignored");
            return;
        };
        entry.key_width = if entry.key_dirty {
            measured_key_width
        } else {
            entry.key_width.max(measured_key_width)
        };
        entry.row_width = if entry.row_dirty {
            measured_row_width
        } else {
            entry.row_width.max(measured_row_width)
        };
        entry.key_dirty = false;
        entry.row_dirty = false;
    }

    /// Invalidates a block the cursor just left and schedules settle passes.
    pub fn on_cursor_exit(&mut self, block_index: usize) {
        if let Some(entry) = self.entries.get_mut(block_index) {
            let was_key_dirty = entry.key_dirty;
            entry.key_dirty = true;
            entry.row_dirty = was_key_dirty;
        }
        self.transition.settle_counter = SETTLE_PASSES;
        tracing::debug!(block_index, "cursor left block; key width invalidated");
    }

    /// Records which block holds the cursor this tick.
    ///
    /// Leaving a block (to no block or to another one) runs
    /// [`on_cursor_exit`](WidthCache::on_cursor_exit) for it.
    pub fn observe_cursor(&mut self, touched: Option<usize>) -> CursorEvent {
        let event = match (self.transition.last_touched, touched) {
            (None, None) => CursorEvent::Outside,
            (None, Some(to)) => CursorEvent::Entered(to),
            (Some(from), Some(to)) if from == to => CursorEvent::Stayed(to),
            (Some(from), Some(to)) => {
                self.on_cursor_exit(from);
                CursorEvent::Moved { from, to }
            }
            (Some(from), None) => {
                self.on_cursor_exit(from);
                CursorEvent::Exited(from)
            }
        };
        self.transition.last_touched = touched;
        event
    }

    pub fn settle_pending(&self) -> bool {
        self.transition.settle_counter > 0
    }

    /// Uses up one settle pass. Returns false if none was pending.
    pub fn consume_settle(&mut self) -> bool {
        if self.transition.settle_counter == 0 {
            return false;
        }
        self.transition.settle_counter -= 1;
        true
    }
}
