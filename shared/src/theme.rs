//! Themes and event color resolution
//!
//! A theme is a plain value handed to whoever draws. Nothing reads an ambient
//! "current theme".

use serde::{Deserialize, Serialize};

use crate::event::EventColor;

/// Hex colors for the five event color tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventColorScheme {
    pub red: String,
    pub blue: String,
    pub green: String,
    pub yellow: String,
    pub purple: String,
}

/// Hex colors for the dial chrome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiColorScheme {
    pub background_color: String,
    pub text_primary: String,
    pub text_secondary: String,
    pub clock_hand_primary: String,
    pub clock_hand_secondary: String,
    pub tick_primary: String,
    pub tick_secondary: String,
    pub glass_highlight: String,
    pub glass_shadow: String,
    pub center_fill: String,
    pub center_stroke: String,
    pub accent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: String,
    pub name: String,
    /// Background image reference, or a hex color
    pub background: String,
    pub color_scheme: EventColorScheme,
    pub ui_color_scheme: UiColorScheme,
}

/// Id of the theme used before any options are loaded
pub const DEFAULT_THEME_ID: &str = "default";

impl Default for Theme {
    fn default() -> Self {
        Self {
            id: DEFAULT_THEME_ID.to_string(),
            name: "Default".to_string(),
            background: "#ffffff".to_string(),
            color_scheme: EventColorScheme {
                red: "#ff6b6b".to_string(),
                blue: "#4d9fff".to_string(),
                green: "#6ee7b7".to_string(),
                yellow: "#ffe066".to_string(),
                purple: "#c084fc".to_string(),
            },
            ui_color_scheme: UiColorScheme {
                background_color: "#fafafa".to_string(),
                text_primary: "#0f172a".to_string(),
                text_secondary: "#475569".to_string(),
                clock_hand_primary: "#0f172a".to_string(),
                clock_hand_secondary: "#38bdf8".to_string(),
                tick_primary: "#475569".to_string(),
                tick_secondary: "#cbd5e1".to_string(),
                glass_highlight: "#ffffff".to_string(),
                glass_shadow: "#e2e8f0".to_string(),
                center_fill: "#ffffff".to_string(),
                center_stroke: "#94a3b8".to_string(),
                accent: "#6366f1".to_string(),
            },
        }
    }
}

fn leafy() -> Theme {
    Theme {
        id: "leafy".to_string(),
        name: "Leafy".to_string(),
        background: "#1b4332".to_string(),
        color_scheme: EventColorScheme {
            red: "#ef476f".to_string(),
            blue: "#118ab2".to_string(),
            green: "#06d6a0".to_string(),
            yellow: "#ffd166".to_string(),
            purple: "#8338ec".to_string(),
        },
        ui_color_scheme: UiColorScheme {
            background_color: "#000000".to_string(),
            text_primary: "#ffffff".to_string(),
            text_secondary: "#e5e7eb".to_string(),
            clock_hand_primary: "#ffffff".to_string(),
            clock_hand_secondary: "#e5e7eb".to_string(),
            tick_primary: "#e5e7eb".to_string(),
            tick_secondary: "#cbd5e1".to_string(),
            glass_highlight: "#ffffff".to_string(),
            glass_shadow: "#94a3b8".to_string(),
            center_fill: "#ffffff".to_string(),
            center_stroke: "#94a3b8".to_string(),
            accent: "#6366f1".to_string(),
        },
    }
}

/// Themes shipped with the application
pub fn builtin_themes() -> Vec<Theme> {
    vec![Theme::default(), leafy()]
}

/// Look up a built-in theme, falling back to the default one
pub fn theme_by_id(id: &str) -> Theme {
    builtin_themes()
        .into_iter()
        .find(|t| t.id == id)
        .unwrap_or_default()
}

/// Hex color for an event color tag
pub fn resolve_color(color: EventColor, scheme: &EventColorScheme) -> &str {
    match color {
        EventColor::Red => &scheme.red,
        EventColor::Blue => &scheme.blue,
        EventColor::Green => &scheme.green,
        EventColor::Yellow => &scheme.yellow,
        EventColor::Purple => &scheme.purple,
    }
}

/// Hex color for a raw color code; unknown codes resolve to blue
pub fn resolve_color_code(code: u8, scheme: &EventColorScheme) -> &str {
    resolve_color(EventColor::from_code(code), scheme)
}

/// Parse "#rrggbb" or "#rgb" into RGB components
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();

    match digits.len() {
        6 => Some((
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        3 => {
            let short = |s: &str| channel(s).map(|v| v * 17);
            Some((short(&digits[0..1])?, short(&digits[1..2])?, short(&digits[2..3])?))
        }
        _ => None,
    }
}
