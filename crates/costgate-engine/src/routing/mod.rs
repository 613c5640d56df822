//! Pool routing: picks the primary or read-only replica pool per operation.

pub mod pool_router;

pub use pool_router::{OperationKind, PoolRouter, PoolSelection, RouteDecision};
