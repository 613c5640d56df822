//! Cost annotator: assigns each field a deterministic cost function derived
//! from its classification alone.
//!
//! ## Components
//! - **classify**: ordered table of classification rules, first match wins
//! - **spec**: `FieldCostSpec` and the cost function evaluated per request

pub mod classify;
pub mod spec;

pub use classify::{annotate, apply_live_penalty, CostRule, FieldContext, COST_RULES, LIVE_COST_PENALTY};
pub use spec::{CostFunctionError, CostScope, DEFAULT_CHILD_BASE_COST, FieldCost, FieldCostSpec, LimitArg, LimitArgs, Pricing};
