//! Terminal styles for key-value rows.
//!
//! Colours come from settings as strings and accept:
//!
//! - Named colors: `red`, `green`, `blue`, etc. (8 ANSI colors, plus `gray`)
//! - Bright variants: `bright_red`, `bright_cyan`, etc.
//! - 256-color palette indices: `0` through `255`
//! - RGB hex: `#ff6b35` or `#fff`, mapped to the nearest palette entry
//!
//! Unknown colours are logged and ignored rather than failing a paint.

use console::{Color, Style};

use kvlist::WidgetStyle;

/// Background used for striped rows when no custom colour is set.
pub const DEFAULT_STRIPE: Color = Color::Color256(236);

/// Parses a colour string.
///
/// ```rust
/// use console::Color;
/// use kvlist_render::parse_color;
///
/// assert_eq!(parse_color("cyan"), Ok(Color::Cyan));
/// assert_eq!(parse_color("bright_red"), Ok(Color::Color256(9)));
/// assert_eq!(parse_color("#ff0000"), Ok(Color::Color256(196)));
/// assert_eq!(parse_color("208"), Ok(Color::Color256(208)));
/// ```
pub fn parse_color(s: &str) -> Result<Color, String> {
    let s = s.trim();

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex).map(|rgb| Color::Color256(rgb_to_ansi256(rgb)));
    }

    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        return s
            .parse::<u8>()
            .map(Color::Color256)
            .map_err(|_| format!("Color palette index {} out of range (0-255)", s));
    }

    let name = s.to_lowercase();
    if let Some(base) = name.strip_prefix("bright_") {
        let index = match base {
            "black" => 8,
            "red" => 9,
            "green" => 10,
            "yellow" => 11,
            "blue" => 12,
            "magenta" => 13,
            "cyan" => 14,
            "white" => 15,
            _ => return Err(format!("Unknown bright color: {}", s)),
        };
        return Ok(Color::Color256(index));
    }

    let color = match name.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" | "gray" | "grey" => Color::White,
        _ => return Err(format!("Unknown color name: {}", s)),
    };
    Ok(color)
}

fn parse_hex(hex: &str) -> Result<(u8, u8, u8), String> {
    let channel = |digits: &str| {
        u8::from_str_radix(digits, 16).map_err(|_| format!("Invalid hex: #{}", hex))
    };
    if !hex.is_ascii() {
        return Err(format!("Invalid hex: #{}", hex));
    }
    match hex.len() {
        3 => Ok((
            channel(&hex[0..1])? * 17,
            channel(&hex[1..2])? * 17,
            channel(&hex[2..3])? * 17,
        )),
        6 => Ok((
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => Err(format!("Invalid hex color: #{} (must be 3 or 6 digits)", hex)),
    }
}

/// Channel levels of the 6x6x6 colour cube (palette 16..=231).
const CUBE: [u8; 6] = [0, 95, 135, 175, 215, 255];

fn nearest_cube_step(channel: u8) -> usize {
    CUBE.iter()
        .enumerate()
        .min_by_key(|(_, level)| (i16::from(**level) - i16::from(channel)).abs())
        .map_or(0, |(step, _)| step)
}

fn distance(a: (u8, u8, u8), b: (u8, u8, u8)) -> u32 {
    let d = |x: u8, y: u8| (i32::from(x) - i32::from(y)).unsigned_abs().pow(2);
    d(a.0, b.0) + d(a.1, b.1) + d(a.2, b.2)
}

/// Maps an RGB triplet to the closest entry of the xterm 256-colour palette,
/// choosing between the colour cube and the 24-step gray ramp (232..=255).
///
/// ```rust
/// use kvlist_render::rgb_to_ansi256;
///
/// assert_eq!(rgb_to_ansi256((255, 0, 0)), 196);
/// assert_eq!(rgb_to_ansi256((128, 128, 128)), 244);
/// ```
pub fn rgb_to_ansi256(rgb: (u8, u8, u8)) -> u8 {
    let (r, g, b) = rgb;
    let steps = (nearest_cube_step(r), nearest_cube_step(g), nearest_cube_step(b));
    let cube = (CUBE[steps.0], CUBE[steps.1], CUBE[steps.2]);
    let cube_index = 16 + 36 * steps.0 + 6 * steps.1 + steps.2;

    let mean = (u16::from(r) + u16::from(g) + u16::from(b)) / 3;
    let gray_step = ((mean.saturating_sub(8) + 5) / 10).min(23);
    let level = (8 + 10 * gray_step) as u8;
    let gray_index = 232 + gray_step as usize;

    if distance(rgb, (level, level, level)) < distance(rgb, cube) {
        gray_index as u8
    } else {
        cube_index as u8
    }
}

fn lenient(color: Option<&str>, what: &str) -> Option<Color> {
    let color = color.filter(|c| !c.trim().is_empty())?;
    match parse_color(color) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            tracing::warn!(%err, what, "ignoring colour");
            None
        }
    }
}

/// The resolved key and value styles of one row.
#[derive(Clone, Debug)]
pub struct RowStyle {
    pub key: Style,
    pub value: Style,
}

impl RowStyle {
    /// Builds terminal styles from a widget style.
    ///
    /// With `enabled` false the styles are plain and emit no escape codes.
    pub fn from_widget(style: &WidgetStyle, enabled: bool) -> Self {
        let mut key = Style::new().force_styling(enabled);
        let mut value = Style::new().force_styling(enabled);

        if style.bold_key {
            key = key.bold();
        }
        if let Some(fg) = lenient(style.key_color.as_deref(), "key") {
            key = key.fg(fg);
        }
        if let Some(fg) = lenient(style.value_color.as_deref(), "value") {
            value = value.fg(fg);
        }
        if style.striped {
            let bg = lenient(style.stripe_color.as_deref(), "stripe").unwrap_or(DEFAULT_STRIPE);
            key = key.bg(bg);
            value = value.bg(bg);
        }

        RowStyle { key, value }
    }

    pub fn plain() -> Self {
        RowStyle {
            key: Style::new().force_styling(false),
            value: Style::new().force_styling(false),
        }
    }

    pub fn key(&self, text: &str) -> String {
        self.key.apply_to(text).to_string()
    }

    pub fn value(&self, text: &str) -> String {
        self.value.apply_to(text).to_string()
    }
}
