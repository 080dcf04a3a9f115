//! Color constants and auto-scaling helpers for the TUI.

use ratatui::style::Color;

/// Voltage series color.
pub const VOLTAGE_COLOR: Color = Color::Blue;
/// Current series color.
pub const CURRENT_COLOR: Color = Color::Green;
/// Power series color.
pub const POWER_COLOR: Color = Color::Yellow;
/// Asserted pin.
pub const PIN_HIGH: Color = Color::Green;
/// Cleared pin.
pub const PIN_LOW: Color = Color::DarkGray;
/// Board outline.
pub const BOARD_COLOR: Color = Color::Green;
/// Header pins on the board view.
pub const BOARD_PIN_COLOR: Color = Color::Yellow;
/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;

/// Run-state color for the header.
pub fn run_color(running: bool) -> Color {
    if running { Color::Green } else { Color::Red }
}

/// Computes Y-axis bounds over every series with 10% padding.
pub fn auto_bounds_y(series: &[&[(f64, f64)]]) -> [f64; 2] {
    let all = series.iter().flat_map(|s| s.iter()).map(|&(_, y)| y);
    let min = all.clone().fold(f64::INFINITY, f64::min);
    let max = all.fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    let range = (max - min).max(0.1);
    let pad = range * 0.1;
    [min - pad, max + pad]
}
