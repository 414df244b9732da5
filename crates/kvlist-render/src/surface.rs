//! A terminal paint surface.
//!
//! [`TextSurface`] lays widgets out on a grid of terminal columns. Widths
//! cross the [`PaintSurface`] boundary in pixels, converted with a fixed
//! pixels-per-cell factor, so the scheduler's default measurement metrics
//! and the configured horizontal padding keep their meaning.
//!
//! ```rust
//! use kvlist::{Grammar, RenderScheduler, TextDocument, Update};
//! use kvlist_render::TextSurface;
//!
//! let grammar = Grammar::default();
//! let doc = TextDocument::from_lines(["- Name: Ada", "- Occupation: Mathematician"]);
//! let mut surface = TextSurface::new(80);
//! let mut scheduler = RenderScheduler::new();
//!
//! scheduler.update(&doc, &mut surface, &grammar, Update::doc_changed());
//! scheduler.after_paint(&surface);
//! scheduler.update(&doc, &mut surface, &grammar, Update::doc_changed());
//!
//! let text = surface.render(&doc);
//! let lines: Vec<&str> = text.lines().collect();
//! assert_eq!(lines[0].find("Ada"), lines[1].find("Mathematician"));
//! ```

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use kvlist::{
    unescape_footnotes, DocumentSource, MeasureMetrics, PaintSurface, RowExtent, Widget,
};

use crate::style::RowStyle;
use crate::util::{
    display_width, pad_right, terminal_width, truncate_end, ELLIPSIS, FALLBACK_COLUMNS,
};

/// Pixels per terminal cell used when reporting widths.
pub const DEFAULT_PX_PER_CELL: f32 = 8.0;

/// Bare URLs and Markdown links.
static LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:https?|ftp)://\S+|\[[^\]]*\]\([^)\s]+\)").expect("valid link regex")
});

/// True if the text renders a hyperlink.
pub fn contains_link(text: &str) -> bool {
    LINK.is_match(text)
}

#[derive(Clone, Debug)]
struct Painted {
    line: usize,
    span: Range<usize>,
    widget: Widget,
    /// The value as printed, footnote escapes removed.
    value: String,
    key_text: usize,
    key_cell: usize,
}

/// A [`PaintSurface`] over terminal columns.
#[derive(Clone, Debug)]
pub struct TextSurface {
    columns: usize,
    px_per_cell: f32,
    styled: bool,
    metrics: MeasureMetrics,
    painted: Vec<Painted>,
}

impl TextSurface {
    /// A plain surface `columns` cells wide.
    pub fn new(columns: usize) -> Self {
        TextSurface {
            columns,
            px_per_cell: DEFAULT_PX_PER_CELL,
            styled: false,
            metrics: MeasureMetrics::default(),
            painted: Vec::new(),
        }
    }

    /// A surface as wide as the attached terminal.
    pub fn for_terminal() -> Self {
        Self::new(terminal_width().unwrap_or(FALLBACK_COLUMNS))
    }

    /// Emit ANSI styles (bold keys, colours, stripes).
    pub fn with_styling(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    pub fn with_px_per_cell(mut self, px_per_cell: f32) -> Self {
        if px_per_cell > 0.0 {
            self.px_per_cell = px_per_cell;
        } else {
            tracing::warn!(px_per_cell, "ignoring non-positive cell size");
        }
        self
    }

    pub fn with_metrics(mut self, metrics: MeasureMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn set_columns(&mut self, columns: usize) {
        self.columns = columns;
    }

    /// Widgets drawn since the last clear, in drawing order.
    pub fn widgets(&self) -> impl Iterator<Item = (usize, &Widget)> {
        self.painted.iter().map(|p| (p.line, &p.widget))
    }

    fn px(&self, cells: usize) -> f32 {
        cells as f32 * self.px_per_cell
    }

    fn cells(&self, px: f32) -> usize {
        (px / self.px_per_cell).ceil().max(0.0) as usize
    }

    /// Renders one document line, substituting its widget if one was drawn.
    ///
    /// Styled rows are filled out to the block's cached row width so the
    /// stripe background forms an even band. Plain rows carry no trailing
    /// fill.
    pub fn render_line(&self, line_no: usize, text: &str) -> String {
        // The latest widget for a line wins.
        let Some(painted) = self.painted.iter().rev().find(|p| p.line == line_no) else {
            return text.to_string();
        };

        let field = &painted.widget.field;
        let style = if self.styled {
            RowStyle::from_widget(&painted.widget.style, true)
        } else {
            RowStyle::plain()
        };

        let key = truncate_end(&field.key, painted.key_cell, ELLIPSIS);
        let value_width = display_width(&painted.value);
        let row_cells = if self.styled {
            self.cells(painted.widget.layout.row_width)
        } else {
            0
        };
        let fill = row_cells.saturating_sub(painted.key_cell + 1 + value_width);

        let mut out = String::with_capacity(text.len() + painted.key_cell + fill);
        out.push_str(text.get(..painted.span.start).unwrap_or_default());
        out.push_str(&style.key(&pad_right(&key, painted.key_cell)));
        out.push_str(&style.value(" "));
        out.push_str(&style.value(&pad_right(&painted.value, value_width + fill)));
        out.push_str(text.get(painted.span.end..).unwrap_or_default());
        out
    }

    /// Renders every line of `doc` through the surface, joined by newlines.
    pub fn render<D>(&self, doc: &D) -> String
    where
        D: DocumentSource + ?Sized,
    {
        (0..doc.line_count())
            .map(|i| {
                let line = doc.line(i).unwrap_or_default();
                self.render_line(i, &line)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl PaintSurface for TextSurface {
    type Handle = usize;

    fn width(&self) -> f32 {
        self.px(self.columns)
    }

    fn clear(&mut self) {
        self.painted.clear();
    }

    fn replace(&mut self, line: usize, span: Range<usize>, widget: Widget) -> usize {
        let key_text = display_width(&widget.field.key);
        let mut key_cell = key_text.max(self.cells(widget.layout.key_width));
        if let Some(cap) = widget.style.max_key_width {
            key_cell = key_cell.min((cap / self.px_per_cell).floor() as usize);
        }

        let value = unescape_footnotes(&widget.field.value);
        self.painted.push(Painted {
            line,
            span,
            widget,
            value,
            key_text,
            key_cell,
        });
        self.painted.len() - 1
    }

    fn measure(&self, handle: &usize) -> Option<RowExtent> {
        let painted = self.painted.get(*handle)?;
        Some(RowExtent {
            key_text_width: self.px(painted.key_text),
            key_cell_width: self.px(painted.key_cell),
            value_width: self.px(display_width(&painted.value)),
            has_link: contains_link(&painted.value),
        })
    }

    fn metrics(&self) -> MeasureMetrics {
        self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvlist::{Field, LayoutEntry, WidgetStyle};

    fn widget(key: &str, value: &str, key_width: f32) -> Widget {
        Widget {
            block_index: 0,
            row_index: 0,
            field: Field {
                bullet_text: "-".into(),
                key: key.into(),
                delimiter: ":".into(),
                value: value.into(),
            },
            layout: LayoutEntry {
                key_width,
                ..LayoutEntry::fresh()
            },
            style: WidgetStyle::default(),
        }
    }

    #[test]
    fn detects_links() {
        assert!(contains_link("see https://example.com"));
        assert!(contains_link("[docs](./docs.md)"));
        assert!(!contains_link("plain value"));
        assert!(!contains_link("ratio 1:2"));
    }

    #[test]
    fn key_cell_grows_to_cached_width() {
        let mut surface = TextSurface::new(80);
        let handle = surface.replace(0, 0..8, widget("A:", "1", 100.0));
        let extent = surface.measure(&handle).unwrap();
        assert_eq!(extent.key_text_width, 16.0);
        // 100px -> 13 cells, reported back in pixels.
        assert_eq!(extent.key_cell_width, 104.0);
        assert_eq!(surface.render_line(0, "- A: 1"), format!("{} 1", pad_right("A:", 13)));
    }

    #[test]
    fn key_cell_capped_and_truncated() {
        let mut surface = TextSurface::new(80);
        let mut w = widget("Very long key:", "v", 0.0);
        w.style.max_key_width = Some(48.0);
        surface.replace(0, 0..20, w);
        assert_eq!(surface.render_line(0, "- Very long key: v"), "Very … v");
    }

    #[test]
    fn keeps_text_before_span() {
        let mut surface = TextSurface::new(80);
        surface.replace(0, 2..10, widget("k:", "v", 0.0));
        assert_eq!(surface.render_line(0, "  - k: v"), "  k: v");
        assert_eq!(surface.render_line(1, "untouched"), "untouched");
    }

    #[test]
    fn clear_forgets_widgets() {
        let mut surface = TextSurface::new(80);
        let handle = surface.replace(0, 0..6, widget("k:", "v", 0.0));
        surface.clear();
        assert!(surface.measure(&handle).is_none());
        assert_eq!(surface.widgets().count(), 0);
    }

    #[test]
    fn width_in_pixels() {
        let surface = TextSurface::new(10).with_px_per_cell(10.0);
        assert_eq!(surface.width(), 100.0);
        let surface = TextSurface::new(10).with_px_per_cell(0.0);
        assert_eq!(surface.width(), 80.0);
    }

    #[test]
    fn styled_row_fills_cached_row_width() {
        let mut surface = TextSurface::new(80).with_styling(true);
        let mut w = widget("k:", "v", 0.0);
        // 80px is 10 cells: "k: v" plus six cells of fill.
        w.layout.row_width = 80.0;
        surface.replace(0, 0..6, w.clone());
        let line = surface.render_line(0, "- k: v");
        assert_eq!(console::strip_ansi_codes(&line), "k: v      ");
        assert_eq!(display_width(&line), 10);

        let mut plain = TextSurface::new(80);
        plain.replace(0, 0..6, w);
        assert_eq!(plain.render_line(0, "- k: v"), "k: v");
    }

    #[test]
    fn row_wider_than_cached_width_is_not_cut() {
        let mut surface = TextSurface::new(80).with_styling(true);
        let mut w = widget("key:", "long value", 0.0);
        w.layout.row_width = 16.0;
        surface.replace(0, 0..16, w);
        let line = surface.render_line(0, "- key: long value");
        assert_eq!(console::strip_ansi_codes(&line), "key: long value");
    }

    #[test]
    fn footnote_escape_not_printed() {
        let mut surface = TextSurface::new(80);
        let handle = surface.replace(0, 0..16, widget("ref:", r"see [\^1]", 0.0));
        assert_eq!(surface.render_line(0, "- ref: see [^1]"), "ref: see [^1]");
        // Measured as printed: "see [^1]" is eight cells.
        assert_eq!(surface.measure(&handle).unwrap().value_width, 64.0);
    }

    #[test]
    fn link_values_flagged() {
        let mut surface = TextSurface::new(80);
        let handle = surface.replace(0, 0..6, widget("site:", "https://x.io", 0.0));
        assert!(surface.measure(&handle).unwrap().has_link);
    }
}
