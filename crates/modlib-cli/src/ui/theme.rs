//! Colors and icons shared by all commands.

use crossterm::style::Color;

/// Visual constants for command output.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Colors for different output elements
    pub colors: ColorScheme,
    /// Status icons
    pub icons: Icons,
    /// Column where values start in `label value` rows
    pub label_width: usize,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            colors: ColorScheme::default(),
            icons: Icons::default(),
            label_width: 14,
        }
    }
}

/// Color scheme for output elements
#[derive(Debug, Clone)]
pub struct ColorScheme {
    /// Mod ids
    pub mod_name: Color,
    /// Versions
    pub version: Color,
    /// Secondary info
    pub secondary: Color,
    /// Labels
    pub header: Color,
    /// Success states
    pub success: Color,
    /// Warning states
    pub warning: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            mod_name: Color::Cyan,
            version: Color::White,
            secondary: Color::DarkGrey,
            header: Color::DarkGrey,
            success: Color::Green,
            warning: Color::Yellow,
        }
    }
}

/// Status icons
#[derive(Debug, Clone)]
pub struct Icons {
    /// Completed (✓)
    pub success: &'static str,
    /// Warning (⚠)
    pub warning: &'static str,
    /// Info (ℹ)
    pub info: &'static str,
    /// Manually added pack member (●)
    pub manual: &'static str,
    /// Member pulled in as a dependency (○)
    pub dependency: &'static str,
}

impl Default for Icons {
    fn default() -> Self {
        Self {
            success: "✓",
            warning: "⚠",
            info: "ℹ",
            manual: "●",
            dependency: "○",
        }
    }
}
