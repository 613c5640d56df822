//! Governance config loading and fail-fast validation.

use costgate_core::config::{GovernanceConfig, Limit};
use costgate_core::{ConfigError, GovernanceErrorCode};

#[test]
fn toml_overrides_and_sentinels() {
    let config = GovernanceConfig::from_toml(
        r#"
        default_pagination_cap = -1
        depth_limit = 8
        cost_limit = -1
        expose_computed_cost = false
        read_only_connection_target = "postgres://replica/app"
        "#,
    )
    .unwrap();

    let limits = config.validate().unwrap();
    assert_eq!(limits.default_pagination_cap, Limit::Unlimited);
    assert_eq!(limits.depth, Limit::Max(8));
    assert_eq!(limits.cost, Limit::Unlimited);
    assert_eq!(limits.batch, Limit::Max(10));
    assert!(!limits.expose_computed_cost);
    assert!(config.replica_configured());
}

#[test]
fn limit_below_sentinel_is_a_config_error() {
    let config = GovernanceConfig::from_toml("cost_limit = -5").unwrap();
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidLimit { setting: "cost_limit", value: -5, .. }));
    assert_eq!(err.error_code(), "CONFIG_INVALID_LIMIT");
}

#[test]
fn unparseable_toml_is_a_config_error() {
    let err = GovernanceConfig::from_toml("depth_limit = \"deep\"").unwrap_err();
    assert_eq!(err.error_code(), "CONFIG_PARSE_FAILED");
}

#[test]
fn loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("governance.toml");
    std::fs::write(&path, "batched_query_limit = 3\nlicense_key = \"abc\"\n").unwrap();

    let config = GovernanceConfig::from_file(&path).unwrap();
    assert_eq!(config.effective_batched_query_limit(), 3);
    assert_eq!(config.resolve_license_key().as_deref(), Some("abc"));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = GovernanceConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert_eq!(err.error_code(), "CONFIG_IO_FAILED");
}
