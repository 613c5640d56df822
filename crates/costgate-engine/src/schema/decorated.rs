//! Decorated schema: the output of the build phase. Immutable and shared
//! read-only across all request-handling threads.

use std::sync::Arc;

use async_graphql_parser::types::OperationType;
use costgate_core::{ConfigError, Limit};
use rustc_hash::FxHashMap;
use tracing::info;

use super::model::{FieldDef, SchemaModel};
use crate::cost::{self, FieldContext, FieldCostSpec};
use crate::pagination::{self, PaginationCapSpec};

/// A field together with the metadata computed for it at build time.
#[derive(Debug, Clone)]
pub struct DecoratedField {
    pub def: FieldDef,
    /// `None` means zero cost and a non-multiplying field.
    pub cost: Option<FieldCostSpec>,
    /// Present only on paginated collections.
    pub cap: Option<PaginationCapSpec>,
}

#[derive(Debug, Clone)]
pub struct DecoratedType {
    pub name: String,
    pub fields: FxHashMap<String, DecoratedField>,
}

#[derive(Debug, Clone)]
pub struct DecoratedSchema {
    query_type: String,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
    types: FxHashMap<String, DecoratedType>,
}

impl SchemaModel {
    /// Run the cost annotator and the pagination cap resolver over every field,
    /// returning a new decorated schema. The model itself is left untouched.
    ///
    /// Fails on configuration errors (bad smart tags, missing root types); these
    /// must abort schema build rather than surface at request time.
    pub fn decorate(&self, default_pagination_cap: Limit) -> Result<Arc<DecoratedSchema>, ConfigError> {
        for root in [Some(&self.query_type), self.mutation_type.as_ref(), self.subscription_type.as_ref()]
            .into_iter()
            .flatten()
        {
            if !self.types.contains_key(root) {
                return Err(ConfigError::UnknownType {
                    type_name: root.clone(),
                });
            }
        }

        let mut types = FxHashMap::default();
        let mut costed = 0usize;
        let mut capped = 0usize;

        for (type_name, object) in &self.types {
            let is_root = self.is_root_type(type_name);
            let mut fields = FxHashMap::default();

            for (field_name, def) in &object.fields {
                let ctx = FieldContext {
                    type_name,
                    field: def,
                    is_root,
                };
                let cost = cost::annotate(&ctx)?.map(|spec| cost::apply_live_penalty(spec, &def.meta));
                let cap = pagination::resolve_cap(&ctx, default_pagination_cap)?;

                costed += usize::from(cost.is_some());
                capped += usize::from(cap.as_ref().is_some_and(|c| !c.cap.is_unlimited()));

                fields.insert(
                    field_name.clone(),
                    DecoratedField {
                        def: def.clone(),
                        cost,
                        cap,
                    },
                );
            }

            types.insert(
                type_name.clone(),
                DecoratedType {
                    name: type_name.clone(),
                    fields,
                },
            );
        }

        info!(
            types = types.len(),
            costed_fields = costed,
            capped_fields = capped,
            "schema decorated with cost and pagination metadata"
        );

        Ok(Arc::new(DecoratedSchema {
            query_type: self.query_type.clone(),
            mutation_type: self.mutation_type.clone(),
            subscription_type: self.subscription_type.clone(),
            types,
        }))
    }
}

impl DecoratedSchema {
    pub fn object_type(&self, name: &str) -> Option<&DecoratedType> {
        self.types.get(name)
    }

    pub fn field(&self, type_name: &str, field_name: &str) -> Option<&DecoratedField> {
        self.types.get(type_name)?.fields.get(field_name)
    }

    /// Root object type for an operation kind, if the schema defines one.
    pub fn root_type(&self, ty: OperationType) -> Option<&str> {
        match ty {
            OperationType::Query => Some(self.query_type.as_str()),
            OperationType::Mutation => self.mutation_type.as_deref(),
            OperationType::Subscription => self.subscription_type.as_deref(),
        }
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}
