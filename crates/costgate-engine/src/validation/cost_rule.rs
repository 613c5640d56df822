//! Cumulative cost-limit pass.
//!
//! Each costed field charges its base cost times the multiplier accumulated from
//! its ancestors. Paginated fields multiply everything beneath them, and charge a
//! per-row overhead when their sub-selection reads rows. Flat fields (total count,
//! page flags) are charged against the multiplier outside their connection.

use std::sync::Arc;

use async_graphql_parser::types::{Field, SelectionSet};
use async_graphql_parser::Positioned;
use costgate_core::errors::error_code;
use costgate_core::{CostObserver, CostReport, Limit};
use tracing::debug;

use super::context::{RuleContext, RuleReport, ValidationRule};
use super::walker::{self, FieldPath, TypedVisitor};
use super::ValidationError;
use crate::cost::{CostScope, Pricing};
use crate::schema::{DecoratedField, FieldRole};

pub struct CostLimitRule {
    limit: Limit,
    expose: bool,
    observer: Arc<dyn CostObserver>,
}

impl CostLimitRule {
    pub fn new(limit: Limit, expose: bool, observer: Arc<dyn CostObserver>) -> Self {
        Self { limit, expose, observer }
    }

    /// Accumulated cost of the operation plus any cost-function failures.
    pub fn compute(&self, ctx: &RuleContext<'_>) -> (f64, Vec<ValidationError>) {
        let Some(root) = ctx.root_type() else {
            return (0.0, Vec::new());
        };
        let mut visitor = CostVisitor::default();
        walker::walk(
            ctx,
            &mut visitor,
            root,
            &ctx.operation.node.selection_set.node,
            &Multipliers::ROOT,
            &mut FieldPath::new(),
            &mut Vec::new(),
        );
        (visitor.total, visitor.errors)
    }
}

impl std::fmt::Debug for CostLimitRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CostLimitRule")
            .field("limit", &self.limit)
            .field("expose", &self.expose)
            .finish()
    }
}

impl ValidationRule for CostLimitRule {
    fn name(&self) -> &'static str {
        "cost_limit"
    }

    fn check(&self, ctx: &RuleContext<'_>, report: &mut RuleReport) {
        let (total, errors) = self.compute(ctx);
        report.errors.extend(errors);

        let accepted = self.limit.allows_f64(total);
        if !accepted {
            report.errors.push(ValidationError::new(
                error_code::COST_LIMIT_EXCEEDED,
                format!("operation cost {total:.2} exceeds the limit of {}", self.limit),
            ));
        }
        debug!(
            operation = ctx.operation_name.unwrap_or("<anonymous>"),
            cost = total,
            accepted,
            "cost pass complete"
        );

        if self.expose {
            report.computed_cost = Some(total);
            self.observer.observe(&CostReport {
                operation_name: ctx.operation_name.map(str::to_string),
                cost: total,
                limit: self.limit.max(),
                accepted,
            });
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Multipliers {
    /// Product of every enclosing collection's multiplier.
    inner: f64,
    /// Same product, excluding the nearest enclosing collection.
    outer: f64,
}

impl Multipliers {
    const ROOT: Self = Self { inner: 1.0, outer: 1.0 };
}

#[derive(Default)]
struct CostVisitor {
    total: f64,
    errors: Vec<ValidationError>,
}

impl<'a> TypedVisitor<'a> for CostVisitor {
    type Frame = Multipliers;

    fn visit_field(
        &mut self,
        ctx: &RuleContext<'a>,
        field: &'a Positioned<Field>,
        def: Option<&'a DecoratedField>,
        path: &[String],
        frame: &Multipliers,
    ) -> Option<Multipliers> {
        let Some(spec) = def.and_then(|d| d.cost.as_ref()) else {
            return Some(*frame);
        };

        let cost = match spec.get_cost(&walker::limit_args(&field.node, ctx.variables)) {
            Ok(cost) => cost,
            Err(err) => {
                self.errors.push(
                    ValidationError::new(
                        error_code::COST_FUNCTION_FAILED,
                        format!("cannot compute cost of `{}`: {err}", field.node.name.node),
                    )
                    .at(path, field.pos),
                );
                return None;
            }
        };

        let charged_against = match cost.scope {
            CostScope::Inherited => frame.inner,
            CostScope::Flat => frame.outer,
        };
        self.total += charged_against * cost.cost;

        match spec.pricing {
            Pricing::Fixed => Some(*frame),
            Pricing::Paginated { .. } => {
                if reads_rows(ctx, def, &field.node.selection_set.node) {
                    self.total += frame.inner * cost.multiplier * cost.base_child_cost;
                }
                Some(Multipliers {
                    inner: frame.inner * cost.multiplier,
                    outer: frame.inner,
                })
            }
        }
    }
}

/// A paginated selection reads rows unless it only asks for counts and page info.
fn reads_rows<'a>(ctx: &RuleContext<'a>, def: Option<&DecoratedField>, set: &'a SelectionSet) -> bool {
    def.is_some_and(|def| {
        walker::selects_field(
            ctx,
            def.def.type_name.as_str(),
            set,
            &|f| f.def.meta.role == FieldRole::Data,
            &mut Vec::new(),
        )
    })
}
