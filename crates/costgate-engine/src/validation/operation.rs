//! Operation selection by name, shared by validation and pool routing.

use async_graphql_parser::types::{DocumentOperations, ExecutableDocument, OperationDefinition};
use async_graphql_parser::Positioned;
use async_graphql_value::Name;

/// Pick the operation to execute. With a name, only a named operation with that
/// exact name matches. Without one, the document must contain exactly one
/// operation. Anything else is `None`; callers must not guess.
pub fn select_operation<'a>(
    document: &'a ExecutableDocument,
    operation_name: Option<&str>,
) -> Option<(Option<&'a Name>, &'a Positioned<OperationDefinition>)> {
    match (&document.operations, operation_name) {
        (DocumentOperations::Single(op), None) => Some((None, op)),
        (DocumentOperations::Single(_), Some(_)) => None,
        (DocumentOperations::Multiple(ops), Some(wanted)) => ops
            .iter()
            .find(|(name, _)| name.as_str() == wanted)
            .map(|(name, op)| (Some(name), op)),
        (DocumentOperations::Multiple(ops), None) if ops.len() == 1 => {
            ops.iter().next().map(|(name, op)| (Some(name), op))
        }
        (DocumentOperations::Multiple(_), None) => None,
    }
}
