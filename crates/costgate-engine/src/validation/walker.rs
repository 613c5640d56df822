//! Typed selection walk shared by the pagination and cost passes.

use async_graphql_parser::types::{Field, Selection, SelectionSet, TypeCondition};
use async_graphql_parser::Positioned;
use async_graphql_value::{ConstValue, Number, Value};
use smallvec::SmallVec;

use super::context::RuleContext;
use super::VariableValues;
use crate::cost::{LimitArg, LimitArgs};
use crate::schema::DecoratedField;

pub(crate) type FieldPath = SmallVec<[String; 8]>;

/// Callback for each field reached by [`walk`].
pub(crate) trait TypedVisitor<'a> {
    /// State carried from a field into its sub-selection.
    type Frame: Clone;

    /// Returns the frame for the field's children, or `None` to skip them.
    fn visit_field(
        &mut self,
        ctx: &RuleContext<'a>,
        field: &'a Positioned<Field>,
        def: Option<&'a DecoratedField>,
        path: &[String],
        frame: &Self::Frame,
    ) -> Option<Self::Frame>;
}

/// Response key of a field: its alias if present, else its name.
pub(crate) fn response_key(field: &Field) -> &str {
    field.alias.as_ref().map_or(field.name.node.as_str(), |alias| alias.node.as_str())
}

/// Walk `set` as a selection on `parent_type`, resolving each field against the
/// decorated schema. Fragment spreads already on the `visiting` stack are skipped.
pub(crate) fn walk<'a, V: TypedVisitor<'a>>(
    ctx: &RuleContext<'a>,
    visitor: &mut V,
    parent_type: &'a str,
    set: &'a SelectionSet,
    frame: &V::Frame,
    path: &mut FieldPath,
    visiting: &mut Vec<&'a str>,
) {
    for selection in &set.items {
        match &selection.node {
            Selection::Field(field) => {
                let def = ctx.schema.field(parent_type, field.node.name.node.as_str());
                path.push(response_key(&field.node).to_string());

                if let Some(child_frame) = visitor.visit_field(ctx, field, def, path.as_slice(), frame) {
                    if let Some(def) = def {
                        walk(
                            ctx,
                            visitor,
                            def.def.type_name.as_str(),
                            &field.node.selection_set.node,
                            &child_frame,
                            path,
                            visiting,
                        );
                    }
                }
                path.pop();
            }
            Selection::InlineFragment(fragment) => {
                let target = narrow(ctx, parent_type, fragment.node.type_condition.as_ref());
                walk(ctx, visitor, target, &fragment.node.selection_set.node, frame, path, visiting);
            }
            Selection::FragmentSpread(spread) => {
                let name = spread.node.fragment_name.node.as_str();
                if visiting.contains(&name) {
                    continue;
                }
                let Some(definition) = ctx.document.fragments.get(name) else {
                    continue;
                };
                let target = narrow(ctx, parent_type, Some(&definition.node.type_condition));

                visiting.push(name);
                walk(ctx, visitor, target, &definition.node.selection_set.node, frame, path, visiting);
                visiting.pop();
            }
        }
    }
}

/// Whether `set`, as a selection on `type_name`, directly selects a field matching
/// `pred`. Fragments are looked through; nested selections are not.
pub(crate) fn selects_field<'a>(
    ctx: &RuleContext<'a>,
    type_name: &str,
    set: &'a SelectionSet,
    pred: &dyn Fn(&DecoratedField) -> bool,
    visiting: &mut Vec<&'a str>,
) -> bool {
    set.items.iter().any(|selection| match &selection.node {
        Selection::Field(field) => ctx
            .schema
            .field(type_name, field.node.name.node.as_str())
            .is_some_and(pred),
        Selection::InlineFragment(fragment) => {
            selects_field(ctx, type_name, &fragment.node.selection_set.node, pred, visiting)
        }
        Selection::FragmentSpread(spread) => {
            let name = spread.node.fragment_name.node.as_str();
            if visiting.contains(&name) {
                return false;
            }
            let Some(definition) = ctx.document.fragments.get(name) else {
                return false;
            };
            visiting.push(name);
            let found = selects_field(ctx, type_name, &definition.node.selection_set.node, pred, visiting);
            visiting.pop();
            found
        }
    })
}

/// Type a fragment selects on. Conditions naming an unknown object type (interfaces,
/// unions) keep the parent type.
fn narrow<'a>(ctx: &RuleContext<'a>, parent_type: &'a str, condition: Option<&'a Positioned<TypeCondition>>) -> &'a str {
    match condition {
        Some(condition) => {
            let on = condition.node.on.node.as_str();
            if ctx.schema.object_type(on).is_some() {
                on
            } else {
                parent_type
            }
        }
        None => parent_type,
    }
}

/// Read `first` / `last` from a field, substituting variables. Null literals and
/// null or undefined variables count as absent.
pub(crate) fn limit_args(field: &Field, variables: &VariableValues) -> LimitArgs {
    LimitArgs {
        first: limit_arg(field, "first", variables),
        last: limit_arg(field, "last", variables),
    }
}

fn limit_arg(field: &Field, name: &str, variables: &VariableValues) -> LimitArg {
    let Some(value) = field.get_argument(name) else {
        return LimitArg::Absent;
    };
    match &value.node {
        Value::Null => LimitArg::Absent,
        Value::Number(n) => number_arg(n),
        Value::Variable(var) => match variables.get(var.as_str()) {
            None | Some(ConstValue::Null) => LimitArg::Absent,
            Some(ConstValue::Number(n)) => number_arg(n),
            Some(other) => LimitArg::Invalid(other.to_string()),
        },
        other => LimitArg::Invalid(other.to_string()),
    }
}

fn number_arg(n: &Number) -> LimitArg {
    if let Some(i) = n.as_i64() {
        return LimitArg::Int(i);
    }
    if n.as_u64().is_some() {
        return LimitArg::Int(i64::MAX);
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 => LimitArg::Int(f as i64),
        _ => LimitArg::Invalid(n.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql_parser::parse_query;
    use async_graphql_parser::types::DocumentOperations;

    fn first_field(query: &str) -> Field {
        let doc = parse_query(query).unwrap();
        let op = match doc.operations {
            DocumentOperations::Single(op) => op,
            DocumentOperations::Multiple(_) => panic!("expected a single anonymous operation"),
        };
        match op.node.selection_set.node.items.into_iter().next().map(|s| s.node) {
            Some(Selection::Field(field)) => field.node,
            _ => panic!("expected a field"),
        }
    }

    #[test]
    fn literal_and_variable_limits() {
        let mut vars = VariableValues::default();
        vars.insert("n".to_string(), ConstValue::Number(Number::from(25)));

        let args = limit_args(&first_field("{ all(first: 10, last: $n) { id } }"), &vars);
        assert_eq!(args.first, LimitArg::Int(10));
        assert_eq!(args.last, LimitArg::Int(25));
    }

    #[test]
    fn null_and_undefined_count_as_absent() {
        let mut vars = VariableValues::default();
        vars.insert("n".to_string(), ConstValue::Null);

        let args = limit_args(&first_field("{ all(first: $n, last: $missing) { id } }"), &vars);
        assert!(!args.is_supplied());
        assert!(!limit_args(&first_field("{ all(first: null) { id } }"), &vars).is_supplied());
    }

    #[test]
    fn non_integer_values_are_invalid() {
        let vars = VariableValues::default();
        let args = limit_args(&first_field("{ all(first: \"ten\", last: 2.5) { id } }"), &vars);
        assert!(matches!(args.first, LimitArg::Invalid(_)));
        assert!(matches!(args.last, LimitArg::Invalid(_)));
    }

    #[test]
    fn alias_is_the_response_key() {
        assert_eq!(response_key(&first_field("{ people: all { id } }")), "people");
        assert_eq!(response_key(&first_field("{ all { id } }")), "all");
    }
}
