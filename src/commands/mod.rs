// Command handlers module
pub mod dashboard;

pub use dashboard::execute as dashboard;
