pub mod error;
pub mod telemetry;
