//! Configuration errors. Always fatal at startup or schema-build time.

use super::error_code::{self, GovernanceErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse governance config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read governance config {path}: {message}")]
    Io { path: String, message: String },

    #[error("invalid value {value} for {setting}: {reason}")]
    InvalidLimit {
        setting: &'static str,
        value: i64,
        reason: &'static str,
    },

    #[error("invalid paginationCap tag on {type_name}.{field_name}: {value} ({reason})")]
    InvalidPaginationCap {
        type_name: String,
        field_name: String,
        value: String,
        reason: &'static str,
    },

    #[error("invalid {tag} tag on {type_name}.{field_name}: {value}")]
    InvalidCostTag {
        type_name: String,
        field_name: String,
        tag: &'static str,
        value: String,
    },

    #[error("schema references unknown type {type_name}")]
    UnknownType { type_name: String },
}

impl GovernanceErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(_) => error_code::CONFIG_PARSE_FAILED,
            Self::Io { .. } => error_code::CONFIG_IO_FAILED,
            Self::InvalidLimit { .. } => error_code::CONFIG_INVALID_LIMIT,
            Self::InvalidPaginationCap { .. } => error_code::CONFIG_INVALID_PAGINATION_CAP,
            Self::InvalidCostTag { .. } => error_code::CONFIG_INVALID_COST_TAG,
            Self::UnknownType { .. } => error_code::CONFIG_UNKNOWN_TYPE,
        }
    }
}
