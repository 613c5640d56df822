//! # costgate-core
//!
//! Foundation crate for the costgate GraphQL governance engine.
//! Defines errors, config, licensing, cost telemetry and tracing setup.
//! The engine crate depends on this.

pub mod config;
pub mod errors;
pub mod licensing;
pub mod telemetry;
pub mod tracing;

// Re-export the most commonly used types at the crate root.
pub use config::{GovernanceConfig, Limit, LimitOverrides};
pub use errors::error_code::GovernanceErrorCode;
pub use errors::{ConfigError, LicenseError};
pub use licensing::{GovernanceState, LicenseGate, LicenseStatus};
pub use telemetry::{CostCollector, CostObserver, CostReport};
