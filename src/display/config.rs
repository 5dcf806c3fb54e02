//! Colour configuration and theme management
//!
//! Maps each notification kind to a terminal colour and decides whether
//! colours should be emitted at all.

use colored::Color;
use serde::{Deserialize, Serialize};
use crate::notifications::NotificationKind;

/// Colour configuration for the display system
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ColourConfig {
    /// Whether colours are enabled globally
    pub enabled: bool,
    /// The colour theme to use
    pub theme: ColourTheme,
    /// Whether to respect NO_COLOR environment variable
    pub respect_no_color: bool,
    /// Force colours even when not in a TTY
    #[serde(skip, default)]
    pub color_forced: bool,
}

impl Default for ColourConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            theme: ColourTheme::Auto,
            respect_no_color: true,
            color_forced: false,
        }
    }
}

/// Available colour themes
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum ColourTheme {
    /// No background detection yet; behaves like `Dark`
    Auto,
    /// Optimised for light backgrounds
    Light,
    /// Optimised for dark backgrounds
    Dark,
    /// Custom colour palette
    Custom(ColourPalette),
}

impl std::str::FromStr for ColourTheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColourTheme::Auto),
            "light" => Ok(ColourTheme::Light),
            "dark" => Ok(ColourTheme::Dark),
            _ => Err(format!("Invalid theme: {}. Valid options: auto, light, dark", s)),
        }
    }
}

/// Colour per notification kind, plus one for secondary text
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ColourPalette {
    pub success: String,
    pub error: String,
    pub warning: String,
    pub info: String,
    /// Ids, lifetimes and other secondary details
    pub muted: String,
}

impl Default for ColourPalette {
    fn default() -> Self {
        Self {
            success: "green".to_string(),
            error: "red".to_string(),
            warning: "yellow".to_string(),
            info: "blue".to_string(),
            muted: "bright_black".to_string(),
        }
    }
}

impl ColourPalette {
    /// Palette for light backgrounds
    pub fn light() -> Self {
        Self {
            muted: "black".to_string(),
            ..Self::default()
        }
    }

    /// Palette for dark backgrounds
    pub fn dark() -> Self {
        Self {
            success: "bright_green".to_string(),
            error: "bright_red".to_string(),
            warning: "bright_yellow".to_string(),
            info: "bright_blue".to_string(),
            muted: "bright_black".to_string(),
        }
    }

    pub fn colour_name(&self, kind: NotificationKind) -> &str {
        match kind {
            NotificationKind::Success => &self.success,
            NotificationKind::Error => &self.error,
            NotificationKind::Warning => &self.warning,
            NotificationKind::Info => &self.info,
        }
    }

    /// Parse a colour string into a Color enum
    pub fn parse_color(color_str: &str) -> Option<Color> {
        match color_str.to_lowercase().as_str() {
            "black" => Some(Color::Black),
            "red" => Some(Color::Red),
            "green" => Some(Color::Green),
            "yellow" => Some(Color::Yellow),
            "blue" => Some(Color::Blue),
            "magenta" => Some(Color::Magenta),
            "cyan" => Some(Color::Cyan),
            "white" => Some(Color::White),
            "bright_black" => Some(Color::BrightBlack),
            "bright_red" => Some(Color::BrightRed),
            "bright_green" => Some(Color::BrightGreen),
            "bright_yellow" => Some(Color::BrightYellow),
            "bright_blue" => Some(Color::BrightBlue),
            "bright_magenta" => Some(Color::BrightMagenta),
            "bright_cyan" => Some(Color::BrightCyan),
            "bright_white" => Some(Color::BrightWhite),
            _ => None,
        }
    }
}

impl ColourTheme {
    /// Get the appropriate colour palette for this theme
    pub fn get_palette(&self) -> ColourPalette {
        match self {
            ColourTheme::Auto | ColourTheme::Dark => ColourPalette::dark(),
            ColourTheme::Light => ColourPalette::light(),
            ColourTheme::Custom(palette) => palette.clone(),
        }
    }
}

impl ColourConfig {
    /// Create a colour configuration with colours disabled
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_theme(&mut self, theme: ColourTheme) {
        self.theme = theme;
    }

    pub fn set_color_forced(&mut self, forced: bool) {
        self.color_forced = forced;
    }

    /// Check if colours should be enabled based on configuration and environment
    pub fn should_use_colours(&self) -> bool {
        if !self.enabled {
            return false;
        }

        if self.color_forced {
            return true;
        }

        if self.respect_no_color && std::env::var("NO_COLOR").is_ok() {
            return false;
        }

        if !self.respect_no_color {
            return true;
        }

        use std::io::IsTerminal;
        std::io::stdout().is_terminal()
    }

    pub fn get_palette(&self) -> ColourPalette {
        self.theme.get_palette()
    }
}
