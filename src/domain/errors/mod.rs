//! Domain error types.

mod config_error;
mod skip_reason;

pub use config_error::ConfigError;
pub use skip_reason::SkipReason;
