//! The structured grammar for list items and key-value items.
//!
//! A [`Grammar`] is an immutable snapshot derived from [`Settings`]. It owns
//! the two decisions every other component delegates to it:
//!
//! - [`Grammar::list_marker`]: where a list item's marker and body start.
//! - [`Grammar::split_key_value`]: where a body splits into key, delimiter and
//!   value.
//!
//! Delimiters are an ordered list of candidates rather than one composed
//! pattern, so precedence is explicit: the scan walks the body left to right
//! and, at each position, tries the candidates in configured order. The first
//! candidate that produces a valid split wins.
//!
//! ```rust
//! use kvlist::{Grammar, Settings};
//!
//! let grammar = Grammar::from_settings(&Settings {
//!     delimiters: vec!["=".into(), ":".into()],
//!     ..Settings::default()
//! });
//!
//! let split = grammar.split_key_value("url: http://x = y").unwrap();
//! assert_eq!(split.key, "url");
//! assert_eq!(split.delimiter, ":");
//! assert_eq!(split.value, "http://x = y");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::settings::{Settings, StripeMode, MAX_KEY_WIDTH_PERCENT};

/// Standard Markdown list markers: `-`, `*`, `+` or `1.`, followed by a blank.
static STANDARD_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*(?:[-*+]|[0-9]+\.)[ \t]").expect("valid list marker regex"));

/// A nested bullet directly after the marker, as in `- - item`.
static NESTED_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*[-*+]").expect("valid nested bullet regex"));

/// The position of a list marker within a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListMarker<'a> {
    /// Byte offset where the marker starts (after indentation).
    pub start: usize,
    /// The marker text, e.g. `-` or `12.`.
    pub marker: &'a str,
    /// Byte offset where the item body starts (after the marker's blank).
    pub body_start: usize,
    /// Whether the marker is the grammar's configured bullet.
    pub is_bullet: bool,
}

/// A key / delimiter / value split of a list item body.
///
/// `key` and `value` are trimmed slices of the original body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelimiterMatch<'a> {
    pub key: &'a str,
    pub delimiter: &'a str,
    pub value: &'a str,
    /// Index of the winning candidate in [`Grammar::delimiters`].
    pub candidate: usize,
}

/// Presentation flags read by the extractor and the scheduler.
///
/// None of these influence classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
    pub active_in_edit_mode: bool,
    pub active_in_read_mode: bool,
    pub display_bullet: bool,
    pub display_delimiter: bool,
    pub bold_key: bool,
    /// Key column cap in percent of the surface width; 0 means uncapped.
    pub max_key_width_percent: u8,
    pub vertical_padding: u16,
    pub horizontal_padding: u16,
    pub stripes: StripeMode,
    pub stripe_color: String,
    pub key_color: Option<String>,
    pub value_color: Option<String>,
}

impl Presentation {
    /// Absolute key column cap for a surface of the given width.
    pub fn max_key_width(&self, surface_width: f32) -> Option<f32> {
        if self.max_key_width_percent == 0 {
            None
        } else {
            Some(surface_width * f32::from(self.max_key_width_percent) / 100.0)
        }
    }
}

/// Immutable classification rules plus presentation flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grammar {
    bullet_marker: String,
    delimiters: Vec<String>,
    presentation: Presentation,
    version: u64,
}

impl Default for Grammar {
    fn default() -> Self {
        Grammar::from_settings(&Settings::default())
    }
}

impl Grammar {
    /// Builds a grammar from settings.
    ///
    /// Never fails. Empty delimiter strings are dropped, an empty bullet falls
    /// back to `-`, and an out-of-range key width percent is clamped.
    pub fn from_settings(settings: &Settings) -> Self {
        let delimiters: Vec<String> = settings
            .delimiters
            .iter()
            .filter(|d| !d.is_empty())
            .cloned()
            .collect();
        if delimiters.is_empty() {
            tracing::warn!("no usable delimiter configured; key-value detection is disabled");
        }

        let bullet_marker = match settings.bullet_marker.trim() {
            "" => {
                tracing::warn!("empty bullet marker configured; falling back to '-'");
                "-".to_string()
            }
            marker => marker.to_string(),
        };

        let max_key_width_percent = if settings.max_key_width > MAX_KEY_WIDTH_PERCENT {
            tracing::warn!(
                value = settings.max_key_width,
                "max_key_width out of range; clamping"
            );
            MAX_KEY_WIDTH_PERCENT
        } else {
            settings.max_key_width
        };

        Grammar {
            bullet_marker,
            delimiters,
            presentation: Presentation {
                active_in_edit_mode: settings.active_in_edit_mode,
                active_in_read_mode: settings.active_in_read_mode,
                display_bullet: settings.display_bullet,
                display_delimiter: settings.display_delimiter,
                bold_key: settings.bold_key,
                max_key_width_percent,
                vertical_padding: settings.vertical_padding,
                horizontal_padding: settings.horizontal_padding,
                stripes: settings.striped_background,
                stripe_color: settings.striped_background_color.clone(),
                key_color: settings.key_color.clone(),
                value_color: settings.value_color.clone(),
            },
            version: 0,
        }
    }

    pub fn bullet_marker(&self) -> &str {
        &self.bullet_marker
    }

    /// Delimiter candidates in precedence order.
    pub fn delimiters(&self) -> &[String] {
        &self.delimiters
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    /// Revision of this grammar as assigned by [`GrammarStore`].
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Locates the list marker of a line, if the line is a list item.
    ///
    /// Accepts the configured bullet as well as the standard Markdown markers
    /// (`-`, `*`, `+`, `1.`); the marker must be followed by a space or tab.
    pub fn list_marker<'a>(&self, line: &'a str) -> Option<ListMarker<'a>> {
        let start = line.len() - line.trim_start_matches([' ', '\t']).len();
        let rest = &line[start..];

        if let Some(after) = rest.strip_prefix(self.bullet_marker.as_str()) {
            if after.starts_with([' ', '\t']) {
                let end = start + self.bullet_marker.len();
                return Some(ListMarker {
                    start,
                    marker: &line[start..end],
                    body_start: end + 1,
                    is_bullet: true,
                });
            }
        }

        let found = STANDARD_MARKER.find(line)?;
        // The match ends with the blank after the marker.
        let end = found.end() - 1;
        Some(ListMarker {
            start,
            marker: &line[start..end],
            body_start: found.end(),
            is_bullet: false,
        })
    }

    /// Returns the key-value body of a line: the text after the configured
    /// bullet, provided it does not open a nested bullet.
    pub fn key_value_body<'a>(&self, line: &'a str) -> Option<(ListMarker<'a>, &'a str)> {
        let marker = self.list_marker(line)?;
        if !marker.is_bullet {
            return None;
        }
        let body = &line[marker.body_start..];
        if NESTED_BULLET.is_match(body) {
            return None;
        }
        Some((marker, body))
    }

    /// Splits an item body at the first qualifying delimiter.
    ///
    /// A delimiter qualifies when the text before it is non-blank and does
    /// not end in `:` (so `http://` never splits), and it is followed by a
    /// space and a non-blank value.
    pub fn split_key_value<'a>(&self, body: &'a str) -> Option<DelimiterMatch<'a>> {
        if self.delimiters.is_empty() {
            return None;
        }

        for (pos, _) in body.char_indices() {
            let (head, tail) = body.split_at(pos);
            if head.ends_with(':') || head.trim().is_empty() {
                continue;
            }
            for (candidate, delimiter) in self.delimiters.iter().enumerate() {
                let Some(rest) = tail.strip_prefix(delimiter.as_str()) else {
                    continue;
                };
                let Some(value) = rest.strip_prefix(' ') else {
                    continue;
                };
                let value = value.trim();
                if value.is_empty() {
                    continue;
                }
                return Some(DelimiterMatch {
                    key: head.trim(),
                    delimiter: &tail[..delimiter.len()],
                    value,
                    candidate,
                });
            }
        }
        None
    }
}

/// Owns the current settings and the grammar derived from them.
///
/// Every [`apply`](GrammarStore::apply) produces a grammar with a higher
/// [`version`](Grammar::version). Consumers remember the last version they
/// saw and compare on each tick instead of sharing a mutable dirty flag.
#[derive(Clone, Debug, Default)]
pub struct GrammarStore {
    settings: Settings,
    grammar: Grammar,
}

impl GrammarStore {
    pub fn new(settings: Settings) -> Self {
        let grammar = Grammar::from_settings(&settings);
        GrammarStore { settings, grammar }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Replaces the settings and rebuilds the grammar under a new version.
    pub fn apply(&mut self, settings: Settings) -> &Grammar {
        let version = self.grammar.version + 1;
        self.grammar = Grammar {
            version,
            ..Grammar::from_settings(&settings)
        };
        self.settings = settings;
        tracing::debug!(version, "grammar rebuilt");
        &self.grammar
    }
}
