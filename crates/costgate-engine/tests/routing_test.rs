//! Pool routing: replica for reads, primary for writes and unmatched operations.

mod common;

use common::{engine, parse};
use costgate_engine::{OperationKind, PoolRouter, PoolSelection};

#[derive(Debug, PartialEq, Eq)]
struct Pool(&'static str);

fn with_replica() -> PoolRouter<Pool> {
    PoolRouter::new(Pool("primary"), Some(Pool("replica")))
}

const MIXED: &str = "query ListUsers { currentUser { id } } \
                     mutation AddUser { createUser { id } } \
                     subscription Watch { userChanged { id } }";

#[test]
fn named_mutation_never_gets_the_replica() {
    let router = with_replica();
    let doc = parse(MIXED);

    let decision = router.decide(&doc, Some("AddUser"));
    assert_eq!(decision.selection, PoolSelection::Primary);
    assert_eq!(decision.operation_kind, Some(OperationKind::Mutation));
    assert_eq!(router.route(&doc, Some("AddUser")), &Pool("primary"));
}

#[test]
fn queries_and_subscriptions_prefer_the_replica() {
    let router = with_replica();
    let doc = parse(MIXED);

    assert_eq!(router.route(&doc, Some("ListUsers")), &Pool("replica"));
    assert_eq!(router.route(&doc, Some("Watch")), &Pool("replica"));
}

#[test]
fn unmatched_operation_stays_on_primary() {
    let router = with_replica();
    let doc = parse(MIXED);

    let decision = router.decide(&doc, Some("Missing"));
    assert_eq!(decision.selection, PoolSelection::Primary);
    assert_eq!(decision.operation_kind, None);

    // Several operations and no name: don't guess.
    assert_eq!(router.route(&doc, None), &Pool("primary"));
}

#[test]
fn sole_operation_is_used_without_a_name() {
    let router = with_replica();
    assert_eq!(router.route(&parse("{ currentUser { id } }"), None), &Pool("replica"));
    assert_eq!(router.route(&parse("query Only { currentUser { id } }"), None), &Pool("replica"));
    assert_eq!(router.route(&parse("mutation { createUser { id } }"), None), &Pool("primary"));
}

#[test]
fn no_replica_means_primary_for_everything() {
    let router = PoolRouter::new(Pool("primary"), None);
    let doc = parse(MIXED);

    assert!(!router.has_replica());
    assert_eq!(router.route(&doc, Some("ListUsers")), &Pool("primary"));
}

#[test]
fn engine_builds_routers() {
    let engine = engine("");
    let router = engine.router("primary", Some("replica"));
    assert_eq!(*router.route(&parse("{ currentUser { id } }"), None), "replica");
}

#[test]
fn replica_requires_a_configured_target() {
    use costgate_core::GovernanceConfig;
    use costgate_engine::GovernanceEngine;

    let doc = parse("{ currentUser { id } }");
    let model = common::schema_model();

    let without = GovernanceEngine::from_config(&model, &GovernanceConfig::default()).unwrap();
    assert_eq!(*without.router("primary", Some("replica")).route(&doc, None), "primary");

    let config = GovernanceConfig {
        read_only_connection_target: Some("postgres://replica/app".to_string()),
        license_key: Some(common::valid_license()),
        ..Default::default()
    };
    let with = GovernanceEngine::from_config_with(&model, &config, &common::gate(), common::NOW_MS).unwrap();
    assert!(with.state().protections_active());
    assert_eq!(*with.router("primary", Some("replica")).route(&doc, None), "replica");
}

#[test]
fn inactive_license_disables_the_replica() {
    use costgate_core::GovernanceState;
    use costgate_engine::GovernanceEngine;

    let limits = costgate_core::config::GovernanceLimits::default();
    let schema = common::schema_model().decorate(limits.default_pagination_cap).unwrap();
    let engine = GovernanceEngine::new(schema, limits, GovernanceState::establish(None));
    assert!(!engine.state().protections_active());

    let router = engine.router("primary", Some("replica"));
    assert!(!router.has_replica());
    assert_eq!(*router.route(&parse("{ currentUser { id } }"), None), "primary");
}
