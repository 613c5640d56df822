//! # costgate-engine
//!
//! Pre-execution governance for GraphQL operations over a database-derived schema.
//! Decorates a schema once with per-field cost functions and pagination caps,
//! then validates each operation (pagination bounds, cost ceiling, depth) and
//! picks the connection pool that should execute it.

pub mod cost;
pub mod engine;
pub mod pagination;
pub mod routing;
pub mod schema;
pub mod validation;

pub use engine::GovernanceEngine;
pub use routing::{OperationKind, PoolRouter, PoolSelection, RouteDecision};
pub use schema::{DecoratedSchema, FieldDef, FieldMeta, ObjectType, SchemaModel};
pub use validation::{OperationRequest, ValidationError, ValidationOutcome, VariableValues};
