//! Status colors shared by the widgets.

use egui::Color32;

/// Loaded and up to date.
pub const COLOR_GREEN: Color32 = Color32::from_rgb(34, 139, 34);

/// Failed requests and validation messages.
pub const COLOR_RED: Color32 = Color32::from_rgb(220, 53, 69);

/// In flight, or saved with a stale list.
pub const COLOR_AMBER: Color32 = Color32::from_rgb(255, 193, 7);
