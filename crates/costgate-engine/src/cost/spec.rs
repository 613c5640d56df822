//! Per-field cost specification and its cost function.

use serde::Serialize;

/// Page-size growth exponent: cost grows sub-linearly but without bound.
const PAGE_SIZE_EXPONENT: f64 = 0.95;
/// Added to the page size before scaling so tiny pages still register.
const PAGE_SIZE_OFFSET: f64 = 3.0;
/// Per-row overhead of every paginated field, independent of its own cost.
pub const DEFAULT_CHILD_BASE_COST: f64 = 0.12;

/// How a field's cost responds to its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Pricing {
    /// Constant cost, never multiplies its children.
    Fixed,
    /// Cost scales children by the requested page size. `default_limit` is the
    /// page size assumed when neither `first` nor `last` is supplied.
    Paginated { default_limit: f64 },
}

/// Which ancestor multiplier a field's own cost is charged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CostScope {
    /// Multiplied by every enclosing collection.
    Inherited,
    /// Charged once per enclosing collection, not once per row of it
    /// (`totalCount`, `pageInfo.hasNextPage`).
    Flat,
}

/// Attached to every classified field at schema build time. Never mutated after.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldCostSpec {
    /// Name of the classification rule that produced this spec.
    pub rule: &'static str,
    pub base_cost: f64,
    pub child_base_cost: f64,
    pub multiplier: f64,
    pub pricing: Pricing,
    pub scope: CostScope,
}

/// Result of evaluating a cost function against one field's arguments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldCost {
    /// Charged to the parent.
    pub cost: f64,
    /// Per-row overhead charged for the field's sub-selection.
    pub base_child_cost: f64,
    /// Effective multiplier applied to every descendant.
    pub multiplier: f64,
    pub scope: CostScope,
}

/// One pagination argument as coerced from the operation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LimitArg {
    #[default]
    Absent,
    Int(i64),
    /// Supplied but not an integer; holds the value as written.
    Invalid(String),
}

/// The `first` / `last` arguments of one field selection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LimitArgs {
    pub first: LimitArg,
    pub last: LimitArg,
}

impl LimitArgs {
    pub fn is_supplied(&self) -> bool {
        self.first != LimitArg::Absent || self.last != LimitArg::Absent
    }

    /// Both arguments with their names, for per-argument checks.
    pub fn named(&self) -> [(&'static str, &LimitArg); 2] {
        [("first", &self.first), ("last", &self.last)]
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CostFunctionError {
    #[error("argument `{argument}` must be an integer to compute cost, got {value}")]
    InvalidLimit { argument: &'static str, value: String },

    #[error("cost function produced a non-finite value")]
    NonFinite,
}

impl FieldCostSpec {
    pub fn fixed(rule: &'static str, cost: f64, scope: CostScope) -> Self {
        Self {
            rule,
            base_cost: cost,
            child_base_cost: 0.0,
            multiplier: 1.0,
            pricing: Pricing::Fixed,
            scope,
        }
    }

    pub fn paginated(rule: &'static str, base_cost: f64, multiplier: f64, default_limit: f64) -> Self {
        Self {
            rule,
            base_cost,
            child_base_cost: DEFAULT_CHILD_BASE_COST,
            multiplier,
            pricing: Pricing::Paginated { default_limit },
            scope: CostScope::Inherited,
        }
    }

    /// Evaluate the cost function for one selection of this field.
    pub fn get_cost(&self, args: &LimitArgs) -> Result<FieldCost, CostFunctionError> {
        let multiplier = match self.pricing {
            Pricing::Fixed => 1.0,
            Pricing::Paginated { default_limit } => {
                let limit = requested_limit(args)?.unwrap_or(default_limit);
                let scale = if limit == 0.0 {
                    0.0
                } else {
                    (limit + PAGE_SIZE_OFFSET).powf(PAGE_SIZE_EXPONENT)
                };
                (self.multiplier * scale).max(1.0)
            }
        };

        let cost = FieldCost {
            cost: self.base_cost,
            base_child_cost: self.child_base_cost,
            multiplier,
            scope: self.scope,
        };
        if !(cost.cost.is_finite() && cost.base_child_cost.is_finite() && cost.multiplier.is_finite()) {
            return Err(CostFunctionError::NonFinite);
        }
        Ok(cost)
    }
}

/// Largest supplied page size. Negative sizes count as zero here; rejecting
/// them is the pagination pass's job.
fn requested_limit(args: &LimitArgs) -> Result<Option<f64>, CostFunctionError> {
    let mut limit: Option<f64> = None;
    for (argument, arg) in args.named() {
        match arg {
            LimitArg::Absent => {}
            LimitArg::Int(n) => {
                let n = (*n).max(0) as f64;
                limit = Some(limit.map_or(n, |l| l.max(n)));
            }
            LimitArg::Invalid(value) => {
                return Err(CostFunctionError::InvalidLimit {
                    argument,
                    value: value.clone(),
                });
            }
        }
    }
    Ok(limit)
}
