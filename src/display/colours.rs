//! Core colour management for CLI output
//!
//! Provides colour support with terminal compatibility, NO_COLOR compliance,
//! and graceful degradation for non-colour terminals.

use colored::{ColoredString, Colorize};
use super::config::{ColourConfig, ColourPalette};
use crate::notifications::NotificationKind;

/// Manages colour output for the CLI application
#[derive(Debug, Clone)]
pub struct ColourManager {
    config: ColourConfig,
    palette: ColourPalette,
}

impl ColourManager {
    pub fn new() -> Self {
        Self::with_config(ColourConfig::default())
    }

    /// Create a ColourManager with explicit colour control
    pub fn with_colours(enabled: bool) -> Self {
        let mut config = ColourConfig::default();
        config.set_enabled(enabled);
        if enabled {
            config.set_color_forced(true);
        }
        Self::with_config(config)
    }

    pub fn with_config(config: ColourConfig) -> Self {
        let palette = config.get_palette();
        Self { config, palette }
    }

    /// Create a ColourManager from CLI flags and optional configuration
    pub fn from_args_and_config(no_color_flag: bool, config: Option<ColourConfig>) -> Self {
        let mut final_config = config.unwrap_or_default();

        // --no-color overrides everything
        if no_color_flag {
            final_config.set_enabled(false);
        }

        Self::with_config(final_config)
    }

    pub fn colours_enabled(&self) -> bool {
        self.config.should_use_colours()
    }

    pub fn palette(&self) -> &ColourPalette {
        &self.palette
    }

    /// Colour text the way notifications of `kind` are shown
    pub fn kind(&self, kind: NotificationKind, text: &str) -> ColoredString {
        if self.colours_enabled() {
            self.apply_color(text, self.palette.colour_name(kind)).bold()
        } else {
            text.normal()
        }
    }

    /// Secondary details such as ids and lifetimes
    pub fn muted(&self, text: &str) -> ColoredString {
        if self.colours_enabled() {
            self.apply_color(text, &self.palette.muted)
        } else {
            text.normal()
        }
    }

    fn apply_color(&self, text: &str, color_name: &str) -> ColoredString {
        match ColourPalette::parse_color(color_name) {
            Some(color) => text.color(color),
            None => text.normal(),
        }
    }
}

impl Default for ColourManager {
    fn default() -> Self {
        Self::new()
    }
}
