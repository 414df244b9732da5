//! ANSI-aware text measurement, truncation and padding.
//!
//! Escape codes are preserved in output but never count toward display width,
//! so styled keys and values can be laid out exactly like plain ones.

use console::{measure_text_width, pad_str, truncate_str, Alignment};

/// The ellipsis appended to truncated keys.
pub const ELLIPSIS: &str = "…";

/// Width used when the terminal size cannot be detected.
pub const FALLBACK_COLUMNS: usize = 80;

/// Gets the current terminal width, or None if not available.
pub fn terminal_width() -> Option<usize> {
    terminal_size::terminal_size().map(|(w, _)| w.0 as usize)
}

/// Returns the display width of a string, ignoring ANSI escape codes.
///
/// ```rust
/// use kvlist_render::display_width;
///
/// assert_eq!(display_width("key"), 3);
/// assert_eq!(display_width("\x1b[1mkey\x1b[0m"), 3);
/// assert_eq!(display_width("日本"), 4);
/// ```
pub fn display_width(s: &str) -> usize {
    measure_text_width(s)
}

/// Truncates from the end to fit `max_width`, appending `ellipsis` when
/// anything was cut.
///
/// ```rust
/// use kvlist_render::truncate_end;
///
/// assert_eq!(truncate_end("Description", 6, "…"), "Descr…");
/// assert_eq!(truncate_end("Name", 10, "…"), "Name");
/// ```
pub fn truncate_end(s: &str, max_width: usize, ellipsis: &str) -> String {
    if measure_text_width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= measure_text_width(ellipsis) {
        // No room for content: as much of the ellipsis as fits.
        return truncate_str(ellipsis, max_width, "").into_owned();
    }
    truncate_str(s, max_width, ellipsis).into_owned()
}

/// Pads on the right (left-aligns) to `width`. Never truncates.
///
/// ```rust
/// use kvlist_render::pad_right;
///
/// assert_eq!(pad_right("ab", 4), "ab  ");
/// assert_eq!(pad_right("abcdef", 3), "abcdef");
/// ```
pub fn pad_right(s: &str, width: usize) -> String {
    pad_str(s, width, Alignment::Left, None).into_owned()
}
