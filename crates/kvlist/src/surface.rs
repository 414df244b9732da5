//! The paint-surface collaborator.
//!
//! The host draws replacement visuals and reports their rendered extents.
//! Each [`PaintSurface::replace`] call returns a handle; after the host has
//! painted, the scheduler measures through those handles instead of looking
//! elements up by name.

use std::ops::Range;

use serde::Serialize;

use crate::cache::LayoutEntry;
use crate::extract::Field;
use crate::grammar::Presentation;
use crate::settings::StripeMode;

/// Padding added to the widest measured key of a block.
pub const DEFAULT_KEY_PADDING: f32 = 20.0;

/// Extra row width for rows that render a hyperlink.
pub const DEFAULT_LINK_ALLOWANCE: f32 = 16.0;

/// Presentation values a surface needs to draw one row.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct WidgetStyle {
    pub bold_key: bool,
    /// Absolute key column cap, already resolved against the surface width.
    pub max_key_width: Option<f32>,
    pub vertical_padding: u16,
    pub horizontal_padding: u16,
    /// Whether this row gets the stripe background.
    pub striped: bool,
    /// Custom stripe colour; `None` means the surface default.
    pub stripe_color: Option<String>,
    pub key_color: Option<String>,
    pub value_color: Option<String>,
}

impl WidgetStyle {
    /// Resolves the style of row `row_index` for a surface `surface_width` wide.
    pub fn for_row(presentation: &Presentation, row_index: usize, surface_width: f32) -> Self {
        let striped = presentation.stripes != StripeMode::None && row_index % 2 == 0;
        let stripe_color = match presentation.stripes {
            StripeMode::Custom if !presentation.stripe_color.is_empty() => {
                Some(presentation.stripe_color.clone())
            }
            _ => None,
        };
        WidgetStyle {
            bold_key: presentation.bold_key,
            max_key_width: presentation.max_key_width(surface_width),
            vertical_padding: presentation.vertical_padding,
            horizontal_padding: presentation.horizontal_padding,
            striped,
            stripe_color,
            key_color: presentation.key_color.clone(),
            value_color: presentation.value_color.clone(),
        }
    }
}

/// Everything a surface needs to draw one key-value row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Widget {
    /// Position of the block in the current tick's key-value block list.
    pub block_index: usize,
    /// Position of the line within its block.
    pub row_index: usize,
    pub field: Field,
    /// Snapshot of the block's cached widths at emission time.
    pub layout: LayoutEntry,
    pub style: WidgetStyle,
}

/// Rendered extents of one painted row.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RowExtent {
    /// Width of the key text alone.
    pub key_text_width: f32,
    /// Width of the key cell, including any minimum width applied.
    pub key_cell_width: f32,
    pub value_width: f32,
    /// The rendered row contains a hyperlink.
    pub has_link: bool,
}

/// Surface-specific constants used when folding row extents into widths.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeasureMetrics {
    pub key_padding: f32,
    pub link_allowance: f32,
}

impl Default for MeasureMetrics {
    fn default() -> Self {
        MeasureMetrics {
            key_padding: DEFAULT_KEY_PADDING,
            link_allowance: DEFAULT_LINK_ALLOWANCE,
        }
    }
}

/// Where replacement visuals are drawn and measured.
pub trait PaintSurface {
    /// Identifies one drawn widget until the next [`clear`](PaintSurface::clear).
    type Handle;

    /// Current width of the drawing area, in the surface's unit.
    fn width(&self) -> f32;

    /// Removes every widget drawn so far.
    fn clear(&mut self);

    /// Draws `widget` in place of byte range `span` of line `line`.
    fn replace(&mut self, line: usize, span: Range<usize>, widget: Widget) -> Self::Handle;

    /// Rendered extents of a drawn widget, or `None` if it has not been
    /// laid out (or no longer exists).
    fn measure(&self, handle: &Self::Handle) -> Option<RowExtent>;

    fn metrics(&self) -> MeasureMetrics {
        MeasureMetrics::default()
    }
}
