//! Width resolution for the two-column key/value table.
//!
//! The key column is bounded: it takes the widest key, capped at a maximum.
//! The value column fills whatever remains of the total width after the key
//! column and the gap between them.

use crate::util::display_width;

/// Resolved widths of the key and value columns, in display columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnWidths {
    pub key: usize,
    pub value: usize,
}

impl ColumnWidths {
    /// Total width of both columns plus `gap`.
    pub fn total(&self, gap: usize) -> usize {
        self.key + gap + self.value
    }
}

/// Two-column layout: bounded key, filling value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TwoColumnSpec {
    /// Upper bound of the key column; `None` leaves it unbounded.
    pub max_key: Option<usize>,
    /// Columns between key and value.
    pub gap: usize,
}

impl Default for TwoColumnSpec {
    fn default() -> Self {
        TwoColumnSpec {
            max_key: None,
            gap: 2,
        }
    }
}

impl TwoColumnSpec {
    /// Resolves column widths by scanning the keys.
    ///
    /// The key column is the widest key clamped to `max_key`. The value column
    /// gets the rest of `total_width`; when nothing is left it falls back to
    /// the widest value so rows are never cut to zero width.
    ///
    /// ```rust
    /// use kvlist_render::TwoColumnSpec;
    ///
    /// let spec = TwoColumnSpec { max_key: Some(6), gap: 1 };
    /// let rows = [("Name", "Ada"), ("Occupation", "Mathematician")];
    /// let widths = spec.resolve(40, &rows);
    /// assert_eq!(widths.key, 6);
    /// assert_eq!(widths.value, 33);
    /// ```
    pub fn resolve<K, V>(&self, total_width: usize, rows: &[(K, V)]) -> ColumnWidths
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let widest_key = rows
            .iter()
            .map(|(key, _)| display_width(key.as_ref()))
            .max()
            .unwrap_or(0);
        let key = match self.max_key {
            Some(max) => widest_key.min(max),
            None => widest_key,
        };

        let remaining = total_width.saturating_sub(key + self.gap);
        let value = if remaining > 0 {
            remaining
        } else {
            rows.iter()
                .map(|(_, value)| display_width(value.as_ref()))
                .max()
                .unwrap_or(0)
        };

        ColumnWidths { key, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_column_is_widest_key() {
        let spec = TwoColumnSpec::default();
        let widths = spec.resolve(30, &[("a", "1"), ("abcd", "2")]);
        assert_eq!(widths.key, 4);
        assert_eq!(widths.value, 24);
        assert_eq!(widths.total(spec.gap), 30);
    }

    #[test]
    fn key_column_is_capped() {
        let spec = TwoColumnSpec {
            max_key: Some(3),
            gap: 2,
        };
        let widths = spec.resolve(20, &[("abcdefgh", "1")]);
        assert_eq!(widths.key, 3);
        assert_eq!(widths.value, 15);
    }

    #[test]
    fn no_rows() {
        let widths = TwoColumnSpec::default().resolve::<&str, &str>(10, &[]);
        assert_eq!(widths, ColumnWidths { key: 0, value: 8 });
    }

    #[test]
    fn narrow_total_falls_back_to_value_width() {
        let widths = TwoColumnSpec::default().resolve(3, &[("key", "value")]);
        assert_eq!(widths, ColumnWidths { key: 3, value: 5 });
    }

    #[test]
    fn wide_chars_count_twice() {
        let widths = TwoColumnSpec::default().resolve(20, &[("名前", "x")]);
        assert_eq!(widths.key, 4);
    }
}
