//! Numeric limits with the `-1` "disabled" sentinel.

use serde::Serialize;

use crate::errors::ConfigError;

/// A configured ceiling. `-1` in configuration means `Unlimited`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Limit {
    Unlimited,
    Max(u64),
}

impl Limit {
    /// Parse a raw setting. `-1` is the unbounded sentinel; anything lower is rejected.
    pub fn from_setting(setting: &'static str, value: i64) -> Result<Self, ConfigError> {
        match value {
            -1 => Ok(Self::Unlimited),
            v if v < -1 => Err(ConfigError::InvalidLimit {
                setting,
                value,
                reason: "must be -1 (disabled) or a non-negative integer",
            }),
            v => Ok(Self::Max(v as u64)),
        }
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self, Self::Unlimited)
    }

    /// The finite bound, if any.
    pub fn max(&self) -> Option<u64> {
        match self {
            Self::Unlimited => None,
            Self::Max(n) => Some(*n),
        }
    }

    /// Inclusive check: a value equal to the ceiling is allowed.
    pub fn allows(&self, value: u64) -> bool {
        match self {
            Self::Unlimited => true,
            Self::Max(n) => value <= *n,
        }
    }

    /// Inclusive check for fractional quantities such as accumulated cost.
    pub fn allows_f64(&self, value: f64) -> bool {
        match self {
            Self::Unlimited => true,
            Self::Max(n) => value <= *n as f64,
        }
    }
}

impl std::fmt::Display for Limit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unlimited => write!(f, "unlimited"),
            Self::Max(n) => write!(f, "{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minus_one_is_unlimited() {
        assert_eq!(Limit::from_setting("x", -1).unwrap(), Limit::Unlimited);
        assert!(Limit::Unlimited.allows(u64::MAX));
    }

    #[test]
    fn below_minus_one_is_rejected() {
        let err = Limit::from_setting("graphql_depth_limit", -2).unwrap_err();
        assert!(err.to_string().contains("graphql_depth_limit"));
    }

    #[test]
    fn ceiling_is_inclusive() {
        let limit = Limit::from_setting("x", 30_000).unwrap();
        assert!(limit.allows(30_000));
        assert!(!limit.allows(30_001));
        assert!(limit.allows_f64(30_000.0));
        assert!(!limit.allows_f64(30_000.5));
    }
}
