//! Tick orchestration.
//!
//! [`RenderScheduler`] runs inside the host's update callback. Each tick it
//! segments the viewport, keeps the key-value blocks, reconciles the width
//! cache and tracks the cursor. When something visible may have changed it
//! repaints: every line of every key-value block except the cursor line is
//! replaced by a widget sized from the cached widths.
//!
//! Widths are only known after the host lays those widgets out, so a
//! repaint leaves one [`PendingMeasure`] behind. The host calls
//! [`RenderScheduler::after_paint`] from its after-paint hook; that
//! continuation measures the widgets and merges the result into the cache,
//! unless the block list changed in between, in which case it does nothing.
//!
//! ```rust
//! use kvlist::{Grammar, RenderScheduler, TextDocument, Update};
//! # use kvlist::{PaintSurface, RowExtent, Widget};
//! # #[derive(Default)]
//! # struct Recorder(Vec<(usize, Widget)>);
//! # impl PaintSurface for Recorder {
//! #     type Handle = usize;
//! #     fn width(&self) -> f32 { 800.0 }
//! #     fn clear(&mut self) { self.0.clear(); }
//! #     fn replace(&mut self, line: usize, _: std::ops::Range<usize>, w: Widget) -> usize {
//! #         self.0.push((line, w));
//! #         self.0.len() - 1
//! #     }
//! #     fn measure(&self, _: &usize) -> Option<RowExtent> { Some(RowExtent::default()) }
//! # }
//!
//! let grammar = Grammar::default();
//! let doc = TextDocument::from_lines(["- A: 1", "- B: 2", "- C: 3"]).with_cursor(1);
//! let mut surface = Recorder::default();
//! let mut scheduler = RenderScheduler::new();
//!
//! let outcome = scheduler.update(&doc, &mut surface, &grammar, Update::doc_changed());
//! assert_eq!(outcome.widgets, 2);
//! assert!(scheduler.after_paint(&surface));
//! ```

use std::fmt;

use crate::cache::{BlockMeasurement, CursorEvent, WidthCache};
use crate::document::DocumentSource;
use crate::extract::FieldExtractor;
use crate::grammar::Grammar;
use crate::segment::{Block, ListSegmenter};
use crate::surface::{PaintSurface, Widget, WidgetStyle};

/// Host-reported changes since the previous tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Update {
    pub doc_changed: bool,
    pub viewport_changed: bool,
    pub settings_changed: bool,
}

impl Update {
    /// Nothing changed; only cursor movement or settle passes can repaint.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn doc_changed() -> Self {
        Update {
            doc_changed: true,
            ..Self::default()
        }
    }

    pub fn viewport_changed() -> Self {
        Update {
            viewport_changed: true,
            ..Self::default()
        }
    }
}

/// Why a tick repainted. Earlier variants take precedence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepaintReason {
    /// First tick on which the host was ready.
    HostReady,
    DocChanged,
    ViewportChanged,
    /// Settings changed or the grammar version moved.
    GrammarChanged,
    /// The cursor entered or left a key-value block.
    CursorTransition,
    /// The cursor moved to another line inside a key-value block.
    CursorMoved,
    /// A settle pass after the cursor left a block.
    Settle,
}

impl fmt::Display for RepaintReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RepaintReason::HostReady => "host-ready",
            RepaintReason::DocChanged => "doc-changed",
            RepaintReason::ViewportChanged => "viewport-changed",
            RepaintReason::GrammarChanged => "grammar-changed",
            RepaintReason::CursorTransition => "cursor-transition",
            RepaintReason::CursorMoved => "cursor-moved",
            RepaintReason::Settle => "settle",
        };
        f.write_str(name)
    }
}

/// What a tick did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// `None` if the tick did not repaint.
    pub repaint: Option<RepaintReason>,
    /// Key-value blocks in the viewport.
    pub blocks: usize,
    /// Widgets emitted by this tick's repaint.
    pub widgets: usize,
    pub cursor: Option<CursorEvent>,
}

impl TickOutcome {
    pub fn repainted(&self) -> bool {
        self.repaint.is_some()
    }
}

/// The measurement continuation left behind by a repaint.
///
/// It remembers the structure it was scheduled for and is discarded if the
/// cache has been rebuilt since.
#[derive(Debug)]
pub struct PendingMeasure<H> {
    generation: u64,
    block_count: usize,
    horizontal_padding: f32,
    /// `(block_index, handle)` for every emitted widget.
    handles: Vec<(usize, H)>,
}

impl<H> PendingMeasure<H> {
    pub fn block_count(&self) -> usize {
        self.block_count
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Drives classification, extraction, layout and painting per host tick.
#[derive(Debug)]
pub struct RenderScheduler<H> {
    cache: WidthCache,
    ready: bool,
    grammar_version: Option<u64>,
    last_cursor: Option<usize>,
    blocks: Vec<Block>,
    painted: bool,
    pending: Option<PendingMeasure<H>>,
}

impl<H> Default for RenderScheduler<H> {
    fn default() -> Self {
        RenderScheduler {
            cache: WidthCache::new(),
            ready: false,
            grammar_version: None,
            last_cursor: None,
            blocks: Vec::new(),
            painted: false,
            pending: None,
        }
    }
}

impl<H> RenderScheduler<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&self) -> &WidthCache {
        &self.cache
    }

    /// Key-value blocks found by the last tick.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn pending(&self) -> Option<&PendingMeasure<H>> {
        self.pending.as_ref()
    }

    /// Processes one host update tick.
    pub fn update<D, S>(
        &mut self,
        doc: &D,
        surface: &mut S,
        grammar: &Grammar,
        update: Update,
    ) -> TickOutcome
    where
        D: DocumentSource + ?Sized,
        S: PaintSurface<Handle = H>,
    {
        let grammar_changed =
            update.settings_changed || self.grammar_version != Some(grammar.version());
        self.grammar_version = Some(grammar.version());

        if !grammar.presentation().active_in_edit_mode {
            self.withdraw(surface);
            tracing::trace!("edit mode rendering disabled; tick skipped");
            return TickOutcome::default();
        }

        let viewport = doc
            .visible_lines()
            .and_then(|range| range.clamp_to(doc.line_count()));
        let Some(viewport) = viewport else {
            // Not ready yet, or nothing left to show: classify nothing and
            // try again next tick. Widgets for vanished lines must go.
            self.withdraw(surface);
            self.ready = false;
            tracing::trace!("host not ready; tick skipped");
            return TickOutcome::default();
        };
        let became_ready = !self.ready;
        self.ready = true;

        let cursor_line = doc.cursor_line();
        self.blocks = ListSegmenter::new(grammar)
            .collect(doc, viewport, cursor_line)
            .into_iter()
            .filter(|block| block.is_key_value)
            .collect();

        self.cache.reconcile(self.blocks.len());

        let touched = self.blocks.iter().position(|block| block.contains_cursor);
        let cursor = self.cache.observe_cursor(touched);
        let cursor_moved = touched.is_some() && cursor_line != self.last_cursor;
        self.last_cursor = cursor_line;

        let reason = if became_ready {
            Some(RepaintReason::HostReady)
        } else if update.doc_changed {
            Some(RepaintReason::DocChanged)
        } else if update.viewport_changed {
            Some(RepaintReason::ViewportChanged)
        } else if grammar_changed {
            Some(RepaintReason::GrammarChanged)
        } else if cursor.is_transition() {
            Some(RepaintReason::CursorTransition)
        } else if cursor_moved {
            Some(RepaintReason::CursorMoved)
        } else if self.cache.consume_settle() {
            Some(RepaintReason::Settle)
        } else {
            None
        };

        let mut outcome = TickOutcome {
            repaint: reason,
            blocks: self.blocks.len(),
            widgets: 0,
            cursor: Some(cursor),
        };

        match reason {
            Some(reason) => {
                outcome.widgets = self.repaint(doc, surface, grammar, cursor_line);
                tracing::trace!(
                    %reason,
                    blocks = outcome.blocks,
                    widgets = outcome.widgets,
                    "repainted"
                );
            }
            None => tracing::trace!(blocks = outcome.blocks, "nothing to repaint"),
        }
        outcome
    }

    /// Removes everything this scheduler drew and drops any unfired
    /// measurement.
    fn withdraw<S>(&mut self, surface: &mut S)
    where
        S: PaintSurface<Handle = H>,
    {
        if self.painted {
            surface.clear();
            self.painted = false;
        }
        self.pending = None;
        self.blocks.clear();
    }

    /// Emits widgets for every key-value block line except the cursor line,
    /// and schedules the measurement continuation.
    fn repaint<D, S>(
        &mut self,
        doc: &D,
        surface: &mut S,
        grammar: &Grammar,
        cursor_line: Option<usize>,
    ) -> usize
    where
        D: DocumentSource + ?Sized,
        S: PaintSurface<Handle = H>,
    {
        surface.clear();
        self.painted = true;

        let extractor = FieldExtractor::new(grammar);
        let presentation = grammar.presentation();
        let surface_width = surface.width();
        let mut handles = Vec::new();

        for (block_index, block) in self.blocks.iter().enumerate() {
            let layout = self.cache.get(block_index);
            for (row_index, line_no) in block.lines().iter().enumerate() {
                if cursor_line == Some(line_no) {
                    continue;
                }
                let Some(line) = doc.line(line_no) else {
                    continue;
                };
                let span_start = grammar
                    .list_marker(&line)
                    .map_or(0, |marker| marker.start);
                let widget = Widget {
                    block_index,
                    row_index,
                    field: extractor.extract(&line),
                    layout,
                    style: WidgetStyle::for_row(presentation, row_index, surface_width),
                };
                let handle = surface.replace(line_no, span_start..line.len(), widget);
                handles.push((block_index, handle));
            }
        }

        let emitted = handles.len();
        if self.pending.is_some() {
            tracing::trace!("replacing unfired measurement continuation");
        }
        self.pending = Some(PendingMeasure {
            generation: self.cache.generation(),
            block_count: self.blocks.len(),
            horizontal_padding: f32::from(presentation.horizontal_padding),
            handles,
        });
        emitted
    }

    /// The after-paint continuation: measures the widgets of the last repaint
    /// and merges their widths into the cache.
    ///
    /// Single-shot; returns whether measurements were applied. A continuation
    /// whose block list is no longer current is dropped without effect.
    pub fn after_paint<S>(&mut self, surface: &S) -> bool
    where
        S: PaintSurface<Handle = H>,
    {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        if pending.generation != self.cache.generation()
            || pending.block_count != self.cache.len()
        {
            tracing::debug!(
                scheduled_for = pending.block_count,
                current = self.cache.len(),
                "discarding stale measurement"
            );
            return false;
        }

        let metrics = surface.metrics();
        let mut per_block = vec![Vec::new(); pending.block_count];
        for (block_index, handle) in &pending.handles {
            if let Some(extent) = surface.measure(handle) {
                per_block[*block_index].push(extent);
            }
        }

        for (block_index, rows) in per_block.into_iter().enumerate() {
            // Blocks with nothing painted keep their widths (0 on first paint).
            if let Some(measured) =
                BlockMeasurement::from_rows(rows, pending.horizontal_padding, metrics)
            {
                self.cache
                    .merge(block_index, measured.key_width, measured.row_width);
            }
        }
        true
    }
}
