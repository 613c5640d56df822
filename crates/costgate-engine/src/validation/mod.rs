//! Validation rule generator: independent passes run against one operation
//! immediately before execution.
//!
//! ## Passes
//! - **pagination_rule**: `first`/`last` presence and bounds on capped connections
//! - **cost_rule**: accumulated cost against the ceiling, reported to an observer
//! - **depth_rule**: lexical selection nesting depth
//!
//! The batch guard in **batch** runs before any pass, regardless of license state.

pub mod batch;
pub mod context;
pub mod cost_rule;
pub mod depth_rule;
pub mod operation;
pub mod pagination_rule;
pub(crate) mod walker;

use async_graphql_parser::types::ExecutableDocument;
use async_graphql_parser::Pos;
use async_graphql_value::ConstValue;
use costgate_core::GovernanceErrorCode;
use rustc_hash::FxHashMap;
use serde::Serialize;

pub use batch::{check_batch_size, BatchError};
pub use context::{generate_rules, RuleContext, RuleReport, ValidationRule};
pub use cost_rule::CostLimitRule;
pub use depth_rule::DepthLimitRule;
pub use operation::select_operation;
pub use pagination_rule::PaginationBoundsRule;

/// Already-coerced variable values keyed by variable name.
pub type VariableValues = FxHashMap<String, ConstValue>;

/// One operation as handed over by the transport.
#[derive(Debug, Clone, Copy)]
pub struct OperationRequest<'a> {
    pub document: &'a ExecutableDocument,
    pub operation_name: Option<&'a str>,
    pub variables: &'a VariableValues,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl From<Pos> for Location {
    fn from(pos: Pos) -> Self {
        Self {
            line: pos.line,
            column: pos.column,
        }
    }
}

/// A structured rejection, shaped for a GraphQL `errors` array entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
    /// Response keys from the operation root to the offending field.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,
}

impl ValidationError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: Vec::new(),
            locations: Vec::new(),
        }
    }

    pub fn at(mut self, path: &[String], pos: Pos) -> Self {
        self.path = path.to_vec();
        self.locations = vec![pos.into()];
        self
    }
}

impl GovernanceErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        self.code
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if !self.path.is_empty() {
            write!(f, " at {}", self.path.join("."))?;
        }
        Ok(())
    }
}

/// Result of validating one operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ValidationOutcome {
    pub errors: Vec<ValidationError>,
    /// Present when computed cost exposure is enabled and the cost pass ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computed_cost: Option<f64>,
    /// False when an invalid license disabled every pass.
    pub protections_active: bool,
}

impl ValidationOutcome {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }
}
