//! Rule context, the `ValidationRule` seam, and the rule generator.

use std::sync::Arc;

use async_graphql_parser::types::{ExecutableDocument, OperationDefinition};
use async_graphql_parser::Positioned;
use costgate_core::config::GovernanceLimits;
use costgate_core::CostObserver;

use super::cost_rule::CostLimitRule;
use super::depth_rule::DepthLimitRule;
use super::pagination_rule::PaginationBoundsRule;
use super::{ValidationError, VariableValues};
use crate::schema::DecoratedSchema;

/// Everything a pass may read. All borrowed, nothing mutable.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub schema: &'a DecoratedSchema,
    pub document: &'a ExecutableDocument,
    pub operation: &'a Positioned<OperationDefinition>,
    pub operation_name: Option<&'a str>,
    pub variables: &'a VariableValues,
}

impl<'a> RuleContext<'a> {
    /// Root object type of the operation, if the schema defines one.
    pub fn root_type(&self) -> Option<&'a str> {
        self.schema.root_type(self.operation.node.ty)
    }
}

/// What the passes produced for one operation. Errors are collected, never thrown.
#[derive(Debug, Default)]
pub struct RuleReport {
    pub errors: Vec<ValidationError>,
    pub computed_cost: Option<f64>,
}

/// One independent validation pass.
pub trait ValidationRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn check(&self, ctx: &RuleContext<'_>, report: &mut RuleReport);
}

/// Build the passes implied by the configured limits. Disabled limits drop
/// their pass, except that cost is still computed when it must be reported.
pub fn generate_rules(limits: &GovernanceLimits, observer: Arc<dyn CostObserver>) -> Vec<Box<dyn ValidationRule>> {
    let mut rules: Vec<Box<dyn ValidationRule>> = vec![Box::new(PaginationBoundsRule::new(limits.default_pagination_cap))];

    if !limits.cost.is_unlimited() || limits.expose_computed_cost {
        rules.push(Box::new(CostLimitRule::new(limits.cost, limits.expose_computed_cost, observer)));
    }
    if !limits.depth.is_unlimited() {
        rules.push(Box::new(DepthLimitRule::new(limits.depth)));
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use costgate_core::telemetry::NoopCostObserver;
    use costgate_core::Limit;

    fn names(limits: GovernanceLimits) -> Vec<&'static str> {
        generate_rules(&limits, Arc::new(NoopCostObserver))
            .iter()
            .map(|r| r.name())
            .collect()
    }

    #[test]
    fn defaults_generate_all_three_passes() {
        assert_eq!(names(GovernanceLimits::default()), vec!["pagination_bounds", "cost_limit", "depth_limit"]);
    }

    #[test]
    fn disabled_limits_drop_passes() {
        let limits = GovernanceLimits {
            cost: Limit::Unlimited,
            depth: Limit::Unlimited,
            expose_computed_cost: false,
            ..GovernanceLimits::default()
        };
        assert_eq!(names(limits), vec!["pagination_bounds"]);
    }

    #[test]
    fn cost_pass_kept_for_exposure_only() {
        let limits = GovernanceLimits {
            cost: Limit::Unlimited,
            ..GovernanceLimits::default()
        };
        assert!(names(limits).contains(&"cost_limit"));
    }
}
