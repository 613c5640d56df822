//! Shared fixture: a small database-derived schema and helpers to validate
//! operations against it.

#![allow(dead_code)]

use async_graphql_parser::parse_query;
use async_graphql_parser::types::ExecutableDocument;
use costgate_core::licensing::{encode_license_blob, FeatureSet, GatedFeature, LicenseGate};
use costgate_core::{GovernanceConfig, GovernanceState};
use costgate_engine::schema::{FieldRole, Relation};
use costgate_engine::{FieldDef, GovernanceEngine, ObjectType, OperationRequest, SchemaModel, ValidationOutcome, VariableValues};
use ed25519_dalek::{Signer, SigningKey};
use serde_json::json;

/// Fixed test clock, epoch milliseconds.
pub const NOW_MS: u64 = 1_750_000_000_000;
pub const YEAR_MS: u64 = 365 * 86_400_000;

/// Users and their posts, plus a few root fields with fixed costs.
pub fn schema_model() -> SchemaModel {
    SchemaModel::new("Query")
        .with_mutation("Mutation")
        .with_subscription("Subscription")
        .with_type(
            ObjectType::new("Query")
                .field(FieldDef::new("allUsers", "UsersConnection").connection().table())
                .field(FieldDef::new("usersList", "User").simple_list().table())
                .field(
                    FieldDef::new("allLogs", "LogsConnection")
                        .connection()
                        .table()
                        .tag("paginationCap", json!(-1)),
                )
                .field(FieldDef::new("searchUsers", "UsersConnection").connection().procedure(Some(2000.0)))
                .field(FieldDef::new("currentUser", "User"))
                .field(FieldDef::new("userCount", "Int").role(FieldRole::TotalCount).table())
                .field(FieldDef::new("moreUsers", "Boolean").role(FieldRole::PageFlag)),
        )
        .with_type(ObjectType::new("Mutation").field(FieldDef::new("createUser", "User")))
        .with_type(
            ObjectType::new("Subscription")
                .field(FieldDef::new("userChanged", "User").live())
                .field(FieldDef::new("liveUsers", "UsersConnection").connection().table().live()),
        )
        .with_type(
            ObjectType::new("UsersConnection")
                .field(FieldDef::new("nodes", "User"))
                .field(FieldDef::new("edges", "UserEdge"))
                .field(FieldDef::new("totalCount", "Int").role(FieldRole::TotalCount).table())
                .field(FieldDef::new("pageInfo", "PageInfo").role(FieldRole::PageInfo)),
        )
        .with_type(ObjectType::new("UserEdge").field(FieldDef::new("node", "User")))
        .with_type(
            ObjectType::new("PageInfo")
                .field(FieldDef::new("hasNextPage", "Boolean").role(FieldRole::PageFlag))
                .field(FieldDef::new("hasPreviousPage", "Boolean").role(FieldRole::PageFlag)),
        )
        .with_type(
            ObjectType::new("User")
                .field(FieldDef::new("id", "ID"))
                .field(FieldDef::new("name", "String"))
                .field(FieldDef::new("manager", "User").relation(Relation::Forward))
                .field(FieldDef::new("posts", "PostsConnection").connection().table()),
        )
        .with_type(
            ObjectType::new("PostsConnection")
                .field(FieldDef::new("nodes", "Post"))
                .field(FieldDef::new("totalCount", "Int").role(FieldRole::TotalCount).table()),
        )
        .with_type(
            ObjectType::new("Post")
                .field(FieldDef::new("id", "ID"))
                .field(FieldDef::new("title", "String"))
                .field(FieldDef::new("author", "User").relation(Relation::Forward)),
        )
        .with_type(ObjectType::new("LogsConnection").field(FieldDef::new("nodes", "Log")))
        .with_type(ObjectType::new("Log").field(FieldDef::new("id", "ID")))
}

/// Engine with protections forced on, configured from a TOML snippet.
pub fn engine(config_toml: &str) -> GovernanceEngine {
    costgate_core::tracing::init_tracing();
    let config = GovernanceConfig::from_toml(config_toml).unwrap();
    let limits = config.validate().unwrap();
    let schema = schema_model().decorate(limits.default_pagination_cap).unwrap();
    GovernanceEngine::new(schema, limits, GovernanceState::enforced("Test Suite"))
}

pub fn parse(query: &str) -> ExecutableDocument {
    parse_query(query).unwrap()
}

pub fn validate(engine: &GovernanceEngine, query: &str) -> ValidationOutcome {
    validate_with(engine, query, None, &VariableValues::default())
}

pub fn validate_with(
    engine: &GovernanceEngine,
    query: &str,
    operation_name: Option<&str>,
    variables: &VariableValues,
) -> ValidationOutcome {
    let document = parse(query);
    engine.validate_operation(&OperationRequest {
        document: &document,
        operation_name,
        variables,
    })
}

/// Computed cost with every limit disabled.
pub fn cost_of(query: &str) -> f64 {
    let engine = engine("cost_limit = -1\ndepth_limit = -1\ndefault_pagination_cap = -1");
    let outcome = validate(&engine, query);
    assert!(outcome.is_ok(), "unexpected errors: {:?}", outcome.errors);
    outcome.computed_cost.unwrap()
}

pub fn codes(outcome: &ValidationOutcome) -> Vec<&'static str> {
    outcome.errors.iter().map(|e| e.code).collect()
}

fn signing_key() -> SigningKey {
    SigningKey::from_bytes(&[7u8; 32])
}

/// Gate trusting the test signing key.
pub fn gate() -> LicenseGate {
    LicenseGate::with_public_key(signing_key().verifying_key().to_bytes())
}

/// Signed license key with the given feature bits and expiry (epoch ms).
pub fn mint(features: u64, expires_at_ms: u64) -> String {
    let payload = json!({ "t": "Engine Tests Ltd", "g": features, "e": expires_at_ms }).to_string();
    let signature = signing_key().sign(payload.as_bytes());
    encode_license_blob(&signature.to_bytes(), payload.as_bytes())
}

/// License granting protections for a year from `NOW_MS`.
pub fn valid_license() -> String {
    mint(FeatureSet::from_features(&[GatedFeature::GraphqlProtections]).0, NOW_MS + YEAR_MS)
}
