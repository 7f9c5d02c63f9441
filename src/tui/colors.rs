//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::project::Rgb;

/// Selected row of the project list.
pub const SELECTED_FG: Color = Color::Cyan;
/// Selected cell of the schedule grid.
pub const GRID_SELECTED_BG: Color = Color::White;
pub const GRID_SELECTED_FG: Color = Color::Black;
/// Status line background.
pub const STATUS_BG: Color = Color::Rgb(0, 80, 0);
/// Status line background while a prompt is open.
pub const PROMPT_BG: Color = Color::Rgb(86, 60, 92);
/// Status line background for rejected actions.
pub const WARNING_BG: Color = Color::Rgb(114, 0, 0);
/// Done tasks.
pub const DONE_FG: Color = Color::DarkGray;

/// Convert a stored project colour to a terminal colour.
pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}
