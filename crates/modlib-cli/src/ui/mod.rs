//! Terminal output.

pub mod theme;

pub use theme::Theme;

use crossterm::style::Stylize;

/// Print a line prefixed with the success icon.
pub fn success(message: &str) {
    let theme = Theme::default();
    println!(
        "  {} {message}",
        theme.icons.success.with(theme.colors.success)
    );
}

/// Print a line prefixed with the info icon.
pub fn info(message: &str) {
    let theme = Theme::default();
    println!("  {} {message}", theme.icons.info.with(theme.colors.secondary));
}

/// Print a `label value` row with the label padded to a fixed column.
pub fn row(label: &str, value: &str) {
    let theme = Theme::default();
    let width = theme.label_width;
    println!(
        "  {}{value}",
        format!("{label:<width$}").with(theme.colors.header)
    );
}

/// Print an id in the emphasized style used for mod names.
pub fn heading(name: &str, detail: &str) {
    let theme = Theme::default();
    println!(
        "  {} {}",
        name.with(theme.colors.mod_name).bold(),
        detail.with(theme.colors.secondary)
    );
}
