//! Kvlist - key-value bulleted list detection and aligned layout.
//!
//! Kvlist finds runs of bulleted list items in a plain-text document whose
//! every item has the shape `<bullet> <key><delimiter> <value>`, and lays them
//! out as two aligned columns. It supports:
//!
//! - Configurable bullet and an ordered list of delimiter candidates
//! - Viewport-scoped segmentation, recomputed from scratch on every tick
//! - A per-block width cache that grows while the user types and settles
//!   after the cursor leaves
//! - A host-agnostic paint seam with an explicit after-paint measurement step
//!
//! # Quick Start
//!
//! ```rust
//! use kvlist::{Grammar, LineClassifier, FieldExtractor, ListSegmenter, TextDocument};
//!
//! let grammar = Grammar::default();
//! let doc = TextDocument::from_text("- Name: Ada\n- Born: 1815\n\nSome prose.");
//!
//! let blocks = ListSegmenter::new(&grammar).collect_all(&doc, None);
//! assert_eq!(blocks.len(), 1);
//! assert!(blocks[0].is_key_value);
//!
//! assert!(LineClassifier::new(&grammar).is_key_value_item("- Name: Ada"));
//!
//! let field = FieldExtractor::new(&grammar).extract("- Born: 1815");
//! assert_eq!(field.key, "Born:");
//! assert_eq!(field.value, "1815");
//! ```
//!
//! # Tick Model
//!
//! A host drives a [`RenderScheduler`] from two hooks:
//!
//! ```text
//! update tick  -> segment viewport -> reconcile cache -> track cursor
//!              -> repaint? -> clear + replace widgets -> schedule measurement
//! after paint  -> measure widgets -> merge widths (unless stale)
//! ```
//!
//! The host side is two traits: [`DocumentSource`] for reading text, cursor
//! and viewport, and [`PaintSurface`] for drawing and measuring widgets.
//!
//! # Configuration
//!
//! [`Settings`] load from YAML or JSON and feed a [`GrammarStore`]. Each
//! applied change bumps the grammar version, which the scheduler notices on
//! its next tick.
//!
//! | Key | Default |
//! |-----|---------|
//! | `bullet_marker` | `-` |
//! | `delimiters` | `[":"]` |
//! | `display_delimiter` | `true` |
//! | `max_key_width` | `50` (percent) |
//! | `striped_background` | `default` |

mod cache;
mod classify;
mod document;
mod error;
mod extract;
mod grammar;
mod scheduler;
mod segment;
mod settings;
mod surface;

pub use cache::{
    BlockMeasurement, CursorEvent, CursorTransitionState, LayoutEntry, WidthCache, SETTLE_PASSES,
};
pub use classify::LineClassifier;
pub use document::{DocumentSource, LineRange, TextDocument};
pub use error::{ConfigError, Result};
pub use extract::{escape_footnotes, unescape_footnotes, Field, FieldExtractor};
pub use grammar::{DelimiterMatch, Grammar, GrammarStore, ListMarker, Presentation};
pub use scheduler::{PendingMeasure, RenderScheduler, RepaintReason, TickOutcome, Update};
pub use segment::{Block, ListSegmenter};
pub use settings::{Settings, StripeMode, MAX_KEY_WIDTH_PERCENT};
pub use surface::{
    MeasureMetrics, PaintSurface, RowExtent, Widget, WidgetStyle, DEFAULT_KEY_PADDING,
    DEFAULT_LINK_ALLOWANCE,
};
