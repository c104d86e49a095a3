// The interactive dashboard: main loop, commands, layout and dialogs

pub mod app;
pub mod commands;
pub mod modals;
pub mod render;

pub use app::{run_dashboard, Dashboard, DashboardOptions, TickReport};
pub use commands::{Command, Diagnostic, Outcome};
pub use render::{render, DashboardView, RenderScope, Thresholds};
