//! Error types for the governance engine.
//!
//! Configuration errors are fatal and abort initialization. License errors are
//! never re-thrown: they collapse into disabled protections on `GovernanceState`.

pub mod config_error;
pub mod error_code;
pub mod license_error;

pub use config_error::ConfigError;
pub use error_code::GovernanceErrorCode;
pub use license_error::LicenseError;
