//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;

/// Series colors shared by the interactive and static charts.
pub const PALETTE: [[u8; 3]; 6] = [
    [14, 116, 144],  // Teal
    [220, 38, 38],   // Red
    [37, 99, 235],   // Blue
    [217, 119, 6],   // Amber
    [22, 163, 74],   // Green
    [147, 51, 234],  // Purple
];

/// Format a count with thousands separators, e.g. `12,345`.
pub fn format_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
