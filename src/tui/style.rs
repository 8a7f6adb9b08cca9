//! Color constants and scaling helpers for the dashboard.

use ratatui::style::Color;

/// Sensor history line color.
pub const HISTORY_COLOR: Color = Color::Cyan;
/// Forecast line color.
pub const FORECAST_COLOR: Color = Color::Yellow;
/// Stress color when high (>= 0.7).
pub const STRESS_HIGH: Color = Color::Red;
/// Stress color when moderate (>= 0.4).
pub const STRESS_MID: Color = Color::Yellow;
/// Stress color when low (< 0.4).
pub const STRESS_LOW: Color = Color::Green;
/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Highlighted list row.
pub const SELECTED_BG: Color = Color::Blue;

/// Returns a color for a stress score in `[0, 1]`.
pub fn stress_color(stress: f64) -> Color {
    if stress >= 0.7 {
        STRESS_HIGH
    } else if stress >= 0.4 {
        STRESS_MID
    } else {
        STRESS_LOW
    }
}

/// Ten-cell bar for a stress score, e.g. `███████░░░`.
pub fn stress_bar(stress: f64) -> String {
    let filled = (stress.clamp(0.0, 1.0) * 10.0).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

/// Computes Y-axis bounds from chart data points with 10% padding.
pub fn auto_bounds_y(history: &[(f64, f64)], forecast: &[(f64, f64)]) -> [f64; 2] {
    let all = history.iter().chain(forecast.iter()).map(|&(_, y)| y);
    let min = all.clone().fold(f64::INFINITY, f64::min);
    let max = all.fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    let range = (max - min).max(0.1);
    let pad = range * 0.1;
    [min - pad, max + pad]
}
