//! Lexical selection depth.
//!
//! Depth follows the document as written: a fragment spread adds nothing where it
//! appears, and each fragment definition reachable from the operation is measured
//! on its own. Root selections sit at depth 0 and introspection fields
//! (`__schema`, `__type`, `__typename`) are not counted.

use async_graphql_parser::types::{Selection, SelectionSet};
use async_graphql_parser::Pos;
use costgate_core::errors::error_code;
use costgate_core::Limit;

use super::context::{RuleContext, RuleReport, ValidationRule};
use super::walker::response_key;
use super::ValidationError;

#[derive(Debug, Clone, Copy)]
pub struct DepthLimitRule {
    limit: Limit,
}

impl DepthLimitRule {
    pub fn new(limit: Limit) -> Self {
        Self { limit }
    }
}

/// Deepest field found so far and the response-key path leading to it.
#[derive(Debug, Default)]
struct Deepest {
    /// Number of nested field levels, root fields included.
    levels: usize,
    path: Vec<String>,
    pos: Option<Pos>,
}

impl Deepest {
    fn depth(&self) -> usize {
        self.levels.saturating_sub(1)
    }
}

impl ValidationRule for DepthLimitRule {
    fn name(&self) -> &'static str {
        "depth_limit"
    }

    fn check(&self, ctx: &RuleContext<'_>, report: &mut RuleReport) {
        let mut spreads = Vec::new();
        let deepest = measure(&ctx.operation.node.selection_set.node, &mut spreads);
        self.report(None, deepest, report);

        let mut seen: Vec<&str> = Vec::new();
        while let Some(name) = spreads.pop() {
            if seen.contains(&name) {
                continue;
            }
            seen.push(name);
            let Some(definition) = ctx.document.fragments.get(name) else {
                continue;
            };
            let deepest = measure(&definition.node.selection_set.node, &mut spreads);
            self.report(Some(name), deepest, report);
        }
    }
}

impl DepthLimitRule {
    fn report(&self, fragment: Option<&str>, deepest: Deepest, report: &mut RuleReport) {
        let depth = deepest.depth();
        if self.limit.allows(depth as u64) {
            return;
        }
        let message = match fragment {
            Some(name) => format!(
                "fragment `{name}` has selection depth {depth}, exceeding the limit of {}",
                self.limit
            ),
            None => format!("selection depth {depth} exceeds the limit of {}", self.limit),
        };
        let mut error = ValidationError::new(error_code::DEPTH_LIMIT_EXCEEDED, message);
        if let Some(pos) = deepest.pos {
            error = error.at(&deepest.path, pos);
        }
        report.errors.push(error);
    }
}

fn measure<'a>(set: &'a SelectionSet, spreads: &mut Vec<&'a str>) -> Deepest {
    let mut deepest = Deepest::default();
    descend(set, &mut Vec::new(), &mut deepest, spreads);
    deepest
}

fn descend<'a>(set: &'a SelectionSet, path: &mut Vec<String>, deepest: &mut Deepest, spreads: &mut Vec<&'a str>) {
    for selection in &set.items {
        match &selection.node {
            Selection::Field(field) if field.node.name.node.starts_with("__") => {}
            Selection::Field(field) => {
                path.push(response_key(&field.node).to_string());
                if path.len() > deepest.levels {
                    deepest.levels = path.len();
                    deepest.path = path.clone();
                    deepest.pos = Some(field.pos);
                }
                descend(&field.node.selection_set.node, path, deepest, spreads);
                path.pop();
            }
            Selection::InlineFragment(fragment) => {
                descend(&fragment.node.selection_set.node, path, deepest, spreads);
            }
            Selection::FragmentSpread(spread) => spreads.push(spread.node.fragment_name.node.as_str()),
        }
    }
}
