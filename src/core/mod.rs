// Scheduling, telemetry and collection; no terminal code lives here

pub mod clock;
pub mod collectors;
pub mod config;
pub mod executor;
pub mod scheduler;
pub mod settings;
pub mod telemetry;

pub use clock::ClockTime;
pub use config::Config;
pub use scheduler::{ForcedTiers, Scheduler, Tier, TickPlan};
pub use settings::Settings;
pub use telemetry::{SharedTelemetry, TelemetryState};
