//! # Kvlist Render - terminal output for key-value lists
//!
//! `kvlist-render` provides the terminal side of [`kvlist`]:
//!
//! - [`TextSurface`]: a [`PaintSurface`](kvlist::PaintSurface) that draws
//!   widgets into terminal columns and measures them
//! - [`StaticRenderer`]: one-shot rendering of a whole text, for read mode
//!   and export, producing aligned tables or structured [`StaticTable`]s
//! - Unicode- and ANSI-aware width, padding and truncation helpers
//! - Key, value and stripe colours parsed from settings strings
//!
//! ## Quick Start
//!
//! ```rust
//! use kvlist::Settings;
//! use kvlist_render::StaticRenderer;
//!
//! let settings = Settings::from_yaml("delimiters: ['=', ':']").unwrap();
//! let renderer = StaticRenderer::from_settings(&settings);
//!
//! let out = renderer.render("- host = db01\n- port = 5432", 40);
//! assert_eq!(out, "host=  db01\nport=  5432");
//! ```

mod static_render;
mod style;
mod surface;
mod table;
mod util;

pub use static_render::{StaticRenderer, StaticTable};
pub use style::{parse_color, rgb_to_ansi256, RowStyle, DEFAULT_STRIPE};
pub use surface::{contains_link, TextSurface, DEFAULT_PX_PER_CELL};
pub use table::{ColumnWidths, TwoColumnSpec};
pub use util::{
    display_width, pad_right, terminal_width, truncate_end, ELLIPSIS, FALLBACK_COLUMNS,
};
