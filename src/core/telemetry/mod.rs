//! Telemetry model: the fields shown on the dashboard, their values, and
//! the state container that tiers write into.

mod field;
mod state;
mod value;

pub use field::Field;
pub use state::{SharedTelemetry, TelemetryBatch, TelemetryState, PLACEHOLDER};
pub use value::{FieldError, FieldValue};
