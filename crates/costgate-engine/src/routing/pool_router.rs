use async_graphql_parser::types::{ExecutableDocument, OperationType};
use serde::Serialize;
use tracing::trace;

use crate::validation::select_operation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl From<OperationType> for OperationKind {
    fn from(ty: OperationType) -> Self {
        match ty {
            OperationType::Query => Self::Query,
            OperationType::Mutation => Self::Mutation,
            OperationType::Subscription => Self::Subscription,
        }
    }
}

impl OperationKind {
    /// Queries and subscriptions never write.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::Query | Self::Subscription)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PoolSelection {
    Primary,
    Replica,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteDecision {
    pub selection: PoolSelection,
    /// `None` when no operation matched the requested name.
    pub operation_kind: Option<OperationKind>,
}

/// Holds the primary pool and an optional read-only replica. Generic over the
/// pool handle so the executor's own pool type flows through unchanged.
#[derive(Debug, Clone)]
pub struct PoolRouter<P> {
    primary: P,
    replica: Option<P>,
}

impl<P> PoolRouter<P> {
    pub fn new(primary: P, replica: Option<P>) -> Self {
        Self { primary, replica }
    }

    pub fn has_replica(&self) -> bool {
        self.replica.is_some()
    }

    /// Decide which pool runs `operation_name` from `document`. An operation that
    /// cannot be matched stays on the primary pool.
    pub fn decide(&self, document: &ExecutableDocument, operation_name: Option<&str>) -> RouteDecision {
        let operation_kind = select_operation(document, operation_name).map(|(_, op)| OperationKind::from(op.node.ty));
        let selection = match operation_kind {
            Some(kind) if kind.is_read_only() && self.replica.is_some() => PoolSelection::Replica,
            _ => PoolSelection::Primary,
        };
        trace!(
            operation = operation_name.unwrap_or("<anonymous>"),
            ?operation_kind,
            ?selection,
            "pool selected"
        );
        RouteDecision {
            selection,
            operation_kind,
        }
    }

    /// The pool handle to execute with.
    pub fn route(&self, document: &ExecutableDocument, operation_name: Option<&str>) -> &P {
        match (self.decide(document, operation_name).selection, &self.replica) {
            (PoolSelection::Replica, Some(replica)) => replica,
            _ => &self.primary,
        }
    }
}
