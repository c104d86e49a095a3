// Terminal UI: drawing surface, input handling and the dashboard

pub mod dashboard;
pub mod formatters;
pub mod input;
pub mod renderer;
pub mod terminal;

pub use formatters::{fit_width, format_mib, percent, right_align};
pub use input::{coalesce, poll_input, Input};
pub use renderer::{Attr, Canvas, Key, Palette, Renderer, TextStyle};
