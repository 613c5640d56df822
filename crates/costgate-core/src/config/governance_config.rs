//! Governance configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::limit::Limit;
use crate::errors::ConfigError;

/// Environment variable consulted when no license key is present in the config file.
pub const LICENSE_KEY_ENV: &str = "COSTGATE_LICENSE_KEY";

/// Process-wide governance settings. Every field is optional; the `effective_*`
/// accessors carry the documented defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GovernanceConfig {
    /// Base64 license blob.
    pub license_key: Option<String>,
    /// Pagination cap for fields without a `paginationCap` tag. Default: 50. `-1` = uncapped.
    pub default_pagination_cap: Option<i64>,
    /// Maximum selection nesting depth. Default: 16. `-1` = disabled.
    pub depth_limit: Option<i64>,
    /// Maximum accumulated operation cost. Default: 30000. `-1` = disabled.
    pub cost_limit: Option<i64>,
    /// Report computed cost to the observer and response metadata. Default: true.
    pub expose_computed_cost: Option<bool>,
    /// Maximum operations per batched request. Default: 10. `-1` = disabled.
    pub batched_query_limit: Option<i64>,
    /// Read-only replica connection target. Enables replica routing when set.
    pub read_only_connection_target: Option<String>,
}

/// Limits after validation, with sentinels resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GovernanceLimits {
    pub default_pagination_cap: Limit,
    pub depth: Limit,
    pub cost: Limit,
    pub batch: Limit,
    pub expose_computed_cost: bool,
}

impl Default for GovernanceLimits {
    fn default() -> Self {
        Self {
            default_pagination_cap: Limit::Max(50),
            depth: Limit::Max(16),
            cost: Limit::Max(30_000),
            batch: Limit::Max(10),
            expose_computed_cost: true,
        }
    }
}

/// Per-request replacements for the process-wide limits. Unset fields keep the
/// configured value; the batch limit is request-level and cannot be overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LimitOverrides {
    pub default_pagination_cap: Option<Limit>,
    pub depth: Option<Limit>,
    pub cost: Option<Limit>,
    pub expose_computed_cost: Option<bool>,
}

impl LimitOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge over `base`.
    pub fn apply(&self, base: &GovernanceLimits) -> GovernanceLimits {
        GovernanceLimits {
            default_pagination_cap: self.default_pagination_cap.unwrap_or(base.default_pagination_cap),
            depth: self.depth.unwrap_or(base.depth),
            cost: self.cost.unwrap_or(base.cost),
            batch: base.batch,
            expose_computed_cost: self.expose_computed_cost.unwrap_or(base.expose_computed_cost),
        }
    }
}

impl GovernanceConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    pub fn effective_default_pagination_cap(&self) -> i64 {
        self.default_pagination_cap.unwrap_or(50)
    }

    pub fn effective_depth_limit(&self) -> i64 {
        self.depth_limit.unwrap_or(16)
    }

    pub fn effective_cost_limit(&self) -> i64 {
        self.cost_limit.unwrap_or(30_000)
    }

    pub fn effective_expose_computed_cost(&self) -> bool {
        self.expose_computed_cost.unwrap_or(true)
    }

    pub fn effective_batched_query_limit(&self) -> i64 {
        self.batched_query_limit.unwrap_or(10)
    }

    /// Whether queries and subscriptions should be routed to a read-only replica.
    pub fn replica_configured(&self) -> bool {
        self.read_only_connection_target
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
    }

    /// License key from config, falling back to `COSTGATE_LICENSE_KEY`.
    pub fn resolve_license_key(&self) -> Option<String> {
        self.license_key
            .clone()
            .or_else(|| std::env::var(LICENSE_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
    }

    /// Resolve sentinels and reject out-of-range values. Fails fast: a broken
    /// limit must abort startup rather than silently change enforcement.
    pub fn validate(&self) -> Result<GovernanceLimits, ConfigError> {
        let batch = Limit::from_setting("batched_query_limit", self.effective_batched_query_limit())?;
        if batch == Limit::Max(0) {
            return Err(ConfigError::InvalidLimit {
                setting: "batched_query_limit",
                value: 0,
                reason: "a batch must be allowed at least one operation",
            });
        }

        Ok(GovernanceLimits {
            default_pagination_cap: Limit::from_setting(
                "default_pagination_cap",
                self.effective_default_pagination_cap(),
            )?,
            depth: Limit::from_setting("depth_limit", self.effective_depth_limit())?,
            cost: Limit::from_setting("cost_limit", self.effective_cost_limit())?,
            batch,
            expose_computed_cost: self.effective_expose_computed_cost(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let limits = GovernanceConfig::default().validate().unwrap();
        assert_eq!(limits, GovernanceLimits::default());
    }

    #[test]
    fn blank_replica_target_is_not_configured() {
        let config = GovernanceConfig {
            read_only_connection_target: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(!config.replica_configured());
    }

    #[test]
    fn zero_batch_limit_is_rejected() {
        let config = GovernanceConfig {
            batched_query_limit: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn overrides_replace_only_what_they_set() {
        let base = GovernanceLimits::default();
        assert_eq!(LimitOverrides::default().apply(&base), base);

        let overrides = LimitOverrides {
            cost: Some(Limit::Max(500)),
            depth: Some(Limit::Unlimited),
            ..Default::default()
        };
        let merged = overrides.apply(&base);
        assert_eq!(merged.cost, Limit::Max(500));
        assert_eq!(merged.depth, Limit::Unlimited);
        assert_eq!(merged.default_pagination_cap, base.default_pagination_cap);
        assert_eq!(merged.batch, base.batch);
        assert!(!overrides.is_empty());
    }
}
