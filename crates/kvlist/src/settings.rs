//! User-facing configuration.
//!
//! [`Settings`] mirrors what a host's settings screen exposes. It is plain
//! data: the host owns persistence, and the core only reads it to build a
//! [`Grammar`](crate::Grammar).
//!
//! Settings can be loaded from YAML or JSON. Every key is optional and falls
//! back to its default:
//!
//! ```rust
//! use kvlist::{Settings, StripeMode};
//!
//! let settings = Settings::from_yaml(r#"
//! delimiters: [":", "="]
//! display_bullet: true
//! max_key_width: 30
//! striped_background: none
//! "#).unwrap();
//!
//! assert_eq!(settings.delimiters, vec![":".to_string(), "=".to_string()]);
//! assert_eq!(settings.striped_background, StripeMode::None);
//! assert_eq!(settings.bullet_marker, "-");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Largest accepted value for [`Settings::max_key_width`].
pub const MAX_KEY_WIDTH_PERCENT: u8 = 99;

/// How alternating rows of a rendered list are backgrounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StripeMode {
    /// No striping.
    None,
    /// Stripe even rows with the surface's default stripe colour.
    #[default]
    Default,
    /// Stripe even rows with [`Settings::striped_background_color`].
    Custom,
}

/// Configuration for key-value list detection and presentation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Render widgets while editing.
    pub active_in_edit_mode: bool,
    /// Render tables in the static (read-only) mode.
    pub active_in_read_mode: bool,
    /// Marker that starts a key-value list item.
    pub bullet_marker: String,
    /// Ordered delimiter candidates. Earlier entries win ties.
    #[serde(with = "delimiter_list")]
    pub delimiters: Vec<String>,
    /// Show the bullet in front of the key.
    pub display_bullet: bool,
    /// Show the delimiter after the key.
    pub display_delimiter: bool,
    /// Render the key in bold.
    pub bold_key: bool,
    /// Caps the key column as a percentage of the surface width. 0 disables the cap.
    pub max_key_width: u8,
    /// Vertical row padding in pixels.
    pub vertical_padding: u16,
    /// Horizontal row padding in pixels.
    pub horizontal_padding: u16,
    pub striped_background: StripeMode,
    pub striped_background_color: String,
    pub key_color: Option<String>,
    pub value_color: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            active_in_edit_mode: true,
            active_in_read_mode: true,
            bullet_marker: "-".to_string(),
            delimiters: vec![":".to_string()],
            display_bullet: false,
            display_delimiter: true,
            bold_key: true,
            max_key_width: 50,
            vertical_padding: 3,
            horizontal_padding: 12,
            striped_background: StripeMode::Default,
            striped_background_color: String::new(),
            key_color: None,
            value_color: None,
        }
    }
}

impl Settings {
    /// Parses settings from YAML and validates them.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parses settings from JSON and validates them.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks values that serde cannot constrain.
    ///
    /// An empty delimiter set is accepted here: it is a legal, if useless,
    /// configuration that simply disables key-value detection.
    pub fn validate(&self) -> Result<()> {
        if self.max_key_width > MAX_KEY_WIDTH_PERCENT {
            return Err(ConfigError::MaxKeyWidthOutOfRange(self.max_key_width));
        }
        if self.bullet_marker.trim().is_empty() {
            return Err(ConfigError::EmptyBulletMarker);
        }
        Ok(())
    }
}

/// Accepts either `delimiters: ":"` or `delimiters: [":", "="]`.
mod delimiter_list {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum DelimitersRaw {
        One(String),
        Many(Vec<String>),
    }

    pub fn serialize<S: Serializer>(value: &[String], serializer: S) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        Ok(match DelimitersRaw::deserialize(deserializer)? {
            DelimitersRaw::One(s) => vec![s],
            DelimitersRaw::Many(v) => v,
        })
    }
}
