mod application;

/// The prefix of environment variables that override configuration values.
/// Nested keys are separated by `__`, e.g. `COLLINEAR__SPLIT__SEED`.
pub const CONFIG_ENV_PREFIX: &str = "COLLINEAR__";

pub use application::*;
