//! Field classification table. Rules are evaluated top to bottom and the first
//! match wins, so precedence is exactly the order of `COST_RULES`.

use costgate_core::ConfigError;

use super::spec::{CostScope, FieldCostSpec};
use crate::schema::model::{FieldDef, FieldMeta, FieldRole, FieldSource, Relation};

/// Procedure costs are declared in planner units; this converts them to operation cost.
pub const PROCEDURE_COST_SCALE: f64 = 0.0005;
/// Declared cost assumed for procedures that don't declare one.
pub const DEFAULT_PROCEDURE_COST: f64 = 100.0;
/// Live fields re-execute on every update.
pub const LIVE_COST_PENALTY: f64 = 10.0;

const RELATION_BASE_COST: f64 = 0.06;
const NESTED_MULTIPLIER: f64 = 1.2;

/// Everything a rule may look at when classifying a field.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    pub type_name: &'a str,
    pub field: &'a FieldDef,
    /// Field sits directly on the query, mutation or subscription type.
    pub is_root: bool,
}

impl FieldContext<'_> {
    fn meta(&self) -> &FieldMeta {
        &self.field.meta
    }

    fn is_collection(&self) -> bool {
        self.meta().shape.is_collection()
    }

    fn procedure_cost(&self) -> Option<f64> {
        match self.meta().source {
            FieldSource::Procedure { cost } => Some(cost.unwrap_or(DEFAULT_PROCEDURE_COST)),
            _ => None,
        }
    }

    /// Numeric smart tag. Must be a non-negative finite number (or numeric string);
    /// zero counts as unset.
    fn tag_number(&self, tag: &'static str) -> Result<Option<f64>, ConfigError> {
        let Some(value) = self.meta().tags.get(tag) else {
            return Ok(None);
        };
        let parsed = match value {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed {
            Some(n) if n == 0.0 => Ok(None),
            Some(n) if n.is_finite() && n > 0.0 => Ok(Some(n)),
            _ => Err(ConfigError::InvalidCostTag {
                type_name: self.type_name.to_string(),
                field_name: self.field.name.clone(),
                tag,
                value: value.to_string(),
            }),
        }
    }
}

/// One row of the classification table.
pub struct CostRule {
    pub name: &'static str,
    pub applies: fn(&FieldContext<'_>) -> bool,
    pub build: fn(&FieldContext<'_>) -> Result<FieldCostSpec, ConfigError>,
}

impl std::fmt::Debug for CostRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CostRule").field("name", &self.name).finish()
    }
}

pub const COST_RULES: &[CostRule] = &[
    CostRule {
        name: "table_collection",
        applies: is_table_collection,
        build: build_table_collection,
    },
    CostRule {
        name: "procedure_collection",
        applies: is_procedure_collection,
        build: build_procedure_collection,
    },
    CostRule {
        name: "other_collection",
        applies: is_other_collection,
        build: build_other_collection,
    },
    CostRule {
        name: "total_count",
        applies: is_total_count,
        build: build_total_count,
    },
    CostRule {
        name: "page_flag",
        applies: is_page_flag,
        build: build_page_flag,
    },
    CostRule {
        name: "forward_relation",
        applies: is_forward_relation,
        build: build_forward_relation,
    },
    CostRule {
        name: "backward_relation",
        applies: is_backward_relation,
        build: build_backward_relation,
    },
    CostRule {
        name: "scalar_procedure",
        applies: is_scalar_procedure,
        build: build_scalar_procedure,
    },
];

/// Classify a field and build its cost spec. `Ok(None)` means no rule matched
/// and the field costs nothing.
pub fn annotate(ctx: &FieldContext<'_>) -> Result<Option<FieldCostSpec>, ConfigError> {
    COST_RULES
        .iter()
        .find(|rule| (rule.applies)(ctx))
        .map(|rule| (rule.build)(ctx))
        .transpose()
}

/// Second decoration layer, applied after `annotate`: a live field's own cost is
/// `LIVE_COST_PENALTY` times higher. Row overhead and multiplier are untouched,
/// and ancestors are never penalized.
pub fn apply_live_penalty(mut spec: FieldCostSpec, meta: &FieldMeta) -> FieldCostSpec {
    if meta.live {
        spec.base_cost *= LIVE_COST_PENALTY;
    }
    spec
}

// ── Predicates ─────────────────────────────────────────────

fn is_table_collection(ctx: &FieldContext<'_>) -> bool {
    ctx.is_collection() && ctx.meta().source == FieldSource::Table
}

fn is_procedure_collection(ctx: &FieldContext<'_>) -> bool {
    ctx.is_collection() && ctx.procedure_cost().is_some()
}

fn is_other_collection(ctx: &FieldContext<'_>) -> bool {
    ctx.is_collection()
}

fn is_total_count(ctx: &FieldContext<'_>) -> bool {
    ctx.meta().role == FieldRole::TotalCount
}

fn is_page_flag(ctx: &FieldContext<'_>) -> bool {
    ctx.meta().role == FieldRole::PageFlag
}

fn is_forward_relation(ctx: &FieldContext<'_>) -> bool {
    ctx.meta().relation == Some(Relation::Forward)
}

fn is_backward_relation(ctx: &FieldContext<'_>) -> bool {
    ctx.meta().relation == Some(Relation::Backward)
}

fn is_scalar_procedure(ctx: &FieldContext<'_>) -> bool {
    ctx.procedure_cost().is_some()
}

// ── Builders ───────────────────────────────────────────────

fn build_table_collection(ctx: &FieldContext<'_>) -> Result<FieldCostSpec, ConfigError> {
    let rule = "table_collection";
    if ctx.is_root {
        let limit = ctx.tag_number("unboundedAllCost")?.unwrap_or(100_000.0);
        Ok(FieldCostSpec::paginated(rule, 1.0, 1.0, limit))
    } else {
        let limit = ctx.tag_number("unboundedRelationCost")?.unwrap_or(1000.0);
        Ok(FieldCostSpec::paginated(rule, RELATION_BASE_COST, NESTED_MULTIPLIER, limit))
    }
}

fn build_procedure_collection(ctx: &FieldContext<'_>) -> Result<FieldCostSpec, ConfigError> {
    let base = ctx.procedure_cost().unwrap_or(DEFAULT_PROCEDURE_COST) * PROCEDURE_COST_SCALE;
    let (multiplier, default_limit) = if ctx.is_root {
        (1.0, 1000.0)
    } else {
        (NESTED_MULTIPLIER, 50.0)
    };
    let limit = ctx.tag_number("unboundedCost")?.unwrap_or(default_limit);
    Ok(FieldCostSpec::paginated("procedure_collection", base, multiplier, limit))
}

fn build_other_collection(_ctx: &FieldContext<'_>) -> Result<FieldCostSpec, ConfigError> {
    Ok(FieldCostSpec::paginated("other_collection", 2.0, NESTED_MULTIPLIER, 100_000.0))
}

fn build_total_count(ctx: &FieldContext<'_>) -> Result<FieldCostSpec, ConfigError> {
    let cost = if ctx.meta().source == FieldSource::Table { 2.0 } else { 10.0 };
    Ok(FieldCostSpec::fixed("total_count", cost, CostScope::Flat))
}

fn build_page_flag(_ctx: &FieldContext<'_>) -> Result<FieldCostSpec, ConfigError> {
    Ok(FieldCostSpec::fixed("page_flag", 7.0, CostScope::Flat))
}

fn build_forward_relation(_ctx: &FieldContext<'_>) -> Result<FieldCostSpec, ConfigError> {
    Ok(FieldCostSpec::fixed("forward_relation", RELATION_BASE_COST, CostScope::Inherited))
}

fn build_backward_relation(_ctx: &FieldContext<'_>) -> Result<FieldCostSpec, ConfigError> {
    Ok(FieldCostSpec::paginated(
        "backward_relation",
        RELATION_BASE_COST,
        NESTED_MULTIPLIER,
        1000.0,
    ))
}

fn build_scalar_procedure(ctx: &FieldContext<'_>) -> Result<FieldCostSpec, ConfigError> {
    let cost = ctx.procedure_cost().unwrap_or(DEFAULT_PROCEDURE_COST) * PROCEDURE_COST_SCALE;
    Ok(FieldCostSpec::fixed("scalar_procedure", cost, CostScope::Inherited))
}
