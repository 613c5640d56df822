pub mod governance_config;
pub mod limit;

pub use governance_config::{GovernanceConfig, GovernanceLimits, LimitOverrides, LICENSE_KEY_ENV};
pub use limit::Limit;
