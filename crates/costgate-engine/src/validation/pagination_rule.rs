//! Pagination presence and bounds on capped connections.

use async_graphql_parser::types::{Field, SelectionSet};
use async_graphql_parser::Positioned;
use costgate_core::errors::error_code;
use costgate_core::Limit;

use super::context::{RuleContext, RuleReport, ValidationRule};
use super::walker::{self, FieldPath, TypedVisitor};
use super::ValidationError;
use crate::cost::LimitArg;
use crate::schema::{DecoratedField, FieldRole};

/// Rejects missing, negative or over-cap `first` / `last` arguments.
#[derive(Debug, Clone, Copy)]
pub struct PaginationBoundsRule {
    /// Cap for fields without a `paginationCap` tag.
    default_cap: Limit,
}

impl PaginationBoundsRule {
    pub fn new(default_cap: Limit) -> Self {
        Self { default_cap }
    }
}

impl ValidationRule for PaginationBoundsRule {
    fn name(&self) -> &'static str {
        "pagination_bounds"
    }

    fn check(&self, ctx: &RuleContext<'_>, report: &mut RuleReport) {
        let Some(root) = ctx.root_type() else {
            return;
        };
        let mut visitor = BoundsVisitor {
            default_cap: self.default_cap,
            errors: &mut report.errors,
        };
        walker::walk(
            ctx,
            &mut visitor,
            root,
            &ctx.operation.node.selection_set.node,
            &(),
            &mut FieldPath::new(),
            &mut Vec::new(),
        );
    }
}

struct BoundsVisitor<'r> {
    default_cap: Limit,
    errors: &'r mut Vec<ValidationError>,
}

impl<'a> TypedVisitor<'a> for BoundsVisitor<'_> {
    type Frame = ();

    fn visit_field(
        &mut self,
        ctx: &RuleContext<'a>,
        field: &'a Positioned<Field>,
        def: Option<&'a DecoratedField>,
        path: &[String],
        _frame: &(),
    ) -> Option<()> {
        let Some(spec) = def.and_then(|d| d.cap).map(|c| c.with_default(self.default_cap)) else {
            return Some(());
        };
        // Only bounded connections are checked, and selecting the total count
        // forces a full scan anyway.
        if !spec.requires_limit() || selects_total_count(ctx, def, &field.node.selection_set.node) {
            return Some(());
        }
        let args = walker::limit_args(&field.node, ctx.variables);
        let name = field.node.name.node.as_str();

        for (argument, arg) in args.named() {
            let error = match arg {
                LimitArg::Absent => continue,
                LimitArg::Invalid(value) => ValidationError::new(
                    error_code::PAGINATION_ARGUMENT_INVALID,
                    format!("`{argument}` on `{name}` must be a non-negative integer, got {value}"),
                ),
                LimitArg::Int(n) if *n < 0 => ValidationError::new(
                    error_code::PAGINATION_ARGUMENT_INVALID,
                    format!("`{argument}` on `{name}` must be a non-negative integer, got {n}"),
                ),
                LimitArg::Int(n) => match spec.cap {
                    Limit::Max(cap) if (*n as u64) > cap => ValidationError::new(
                        error_code::PAGINATION_CAP_EXCEEDED,
                        format!("`{argument}: {n}` on `{name}` exceeds the pagination cap of {cap}"),
                    ),
                    _ => continue,
                },
            };
            self.errors.push(error.at(path, field.pos));
        }

        if !args.is_supplied() {
            self.errors.push(
                ValidationError::new(
                    error_code::PAGINATION_ARGUMENT_MISSING,
                    format!("`{name}` requires `first` or `last` (pagination cap is {})", spec.cap),
                )
                .at(path, field.pos),
            );
        }
        Some(())
    }
}

/// Whether the connection's own selection set asks for its total count.
fn selects_total_count<'a>(ctx: &RuleContext<'a>, def: Option<&DecoratedField>, set: &'a SelectionSet) -> bool {
    def.is_some_and(|def| {
        walker::selects_field(
            ctx,
            def.def.type_name.as_str(),
            set,
            &|f| f.def.meta.role == FieldRole::TotalCount,
            &mut Vec::new(),
        )
    })
}
