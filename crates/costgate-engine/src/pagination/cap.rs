use costgate_core::{ConfigError, Limit};
use serde::Serialize;

use crate::cost::FieldContext;
use crate::schema::model::{FieldShape, FieldSource};

/// Smart tag overriding the process-wide default cap. `-1` means uncapped.
pub const PAGINATION_CAP_TAG: &str = "paginationCap";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CollectionKind {
    Connection,
    SimpleList,
}

/// Resolved cap plus the collection kind, so validation never re-derives either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationCapSpec {
    pub cap: Limit,
    pub kind: CollectionKind,
    /// Cap came from a `paginationCap` tag rather than the default.
    pub tagged: bool,
}

impl PaginationCapSpec {
    /// Only connections with a finite cap require an explicit page size.
    pub fn requires_limit(&self) -> bool {
        self.kind == CollectionKind::Connection && !self.cap.is_unlimited()
    }

    /// This spec under a different default cap. Tagged caps are kept.
    pub fn with_default(self, default_cap: Limit) -> Self {
        if self.tagged {
            self
        } else {
            Self { cap: default_cap, ..self }
        }
    }
}

/// Resolve the cap for a table- or procedure-backed collection. Other fields get
/// `None`. A malformed tag is a configuration error here, never at request time.
pub fn resolve_cap(ctx: &FieldContext<'_>, default_cap: Limit) -> Result<Option<PaginationCapSpec>, ConfigError> {
    let meta = &ctx.field.meta;
    let kind = match meta.shape {
        FieldShape::Connection => CollectionKind::Connection,
        FieldShape::SimpleList => CollectionKind::SimpleList,
        FieldShape::Single => return Ok(None),
    };
    if !matches!(meta.source, FieldSource::Table | FieldSource::Procedure { .. }) {
        return Ok(None);
    }

    let (cap, tagged) = match meta.tags.get(PAGINATION_CAP_TAG) {
        None => (default_cap, false),
        Some(value) => (parse_cap_tag(ctx, value)?, true),
    };
    Ok(Some(PaginationCapSpec { cap, kind, tagged }))
}

fn parse_cap_tag(ctx: &FieldContext<'_>, value: &serde_json::Value) -> Result<Limit, ConfigError> {
    let invalid = |reason: &'static str| ConfigError::InvalidPaginationCap {
        type_name: ctx.type_name.to_string(),
        field_name: ctx.field.name.clone(),
        value: value.to_string(),
        reason,
    };

    let n = match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| invalid("expected an integer"))?;

    match n {
        -1 => Ok(Limit::Unlimited),
        n if n < -1 => Err(invalid("must be -1 (uncapped) or a non-negative integer")),
        n => Ok(Limit::Max(n as u64)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::model::FieldDef;
    use serde_json::json;

    fn resolve(field: FieldDef) -> Result<Option<PaginationCapSpec>, ConfigError> {
        let ctx = FieldContext {
            type_name: "Query",
            field: &field,
            is_root: true,
        };
        resolve_cap(&ctx, Limit::Max(50))
    }

    fn users() -> FieldDef {
        FieldDef::new("allUsers", "UsersConnection").connection().table()
    }

    #[test]
    fn absent_tag_uses_default() {
        let spec = resolve(users()).unwrap().unwrap();
        assert_eq!(spec.cap, Limit::Max(50));
        assert!(spec.requires_limit());
    }

    #[test]
    fn request_default_replaces_only_untagged_caps() {
        let untagged = resolve(users()).unwrap().unwrap();
        assert_eq!(untagged.with_default(Limit::Max(5)).cap, Limit::Max(5));

        let tagged = resolve(users().tag(PAGINATION_CAP_TAG, json!(200))).unwrap().unwrap();
        assert_eq!(tagged.with_default(Limit::Max(5)).cap, Limit::Max(200));
    }

    #[test]
    fn minus_one_is_uncapped() {
        let spec = resolve(users().tag(PAGINATION_CAP_TAG, json!(-1))).unwrap().unwrap();
        assert_eq!(spec.cap, Limit::Unlimited);
        assert!(!spec.requires_limit());
    }

    #[test]
    fn explicit_cap_and_numeric_string() {
        assert_eq!(resolve(users().tag(PAGINATION_CAP_TAG, json!(200))).unwrap().unwrap().cap, Limit::Max(200));
        assert_eq!(resolve(users().tag(PAGINATION_CAP_TAG, json!("10"))).unwrap().unwrap().cap, Limit::Max(10));
    }

    #[test]
    fn below_minus_one_is_a_config_error() {
        let err = resolve(users().tag(PAGINATION_CAP_TAG, json!(-2))).unwrap_err();
        assert!(err.to_string().contains("must be -1 (uncapped) or a non-negative integer"));
        assert!(err.to_string().contains("Query.allUsers"));
    }

    #[test]
    fn non_numeric_is_a_config_error() {
        assert!(resolve(users().tag(PAGINATION_CAP_TAG, json!("many"))).is_err());
        assert!(resolve(users().tag(PAGINATION_CAP_TAG, json!(2.5))).is_err());
        assert!(resolve(users().tag(PAGINATION_CAP_TAG, json!(true))).is_err());
    }

    #[test]
    fn simple_lists_never_require_a_limit() {
        let spec = resolve(FieldDef::new("usersList", "User").simple_list().table()).unwrap().unwrap();
        assert_eq!(spec.kind, CollectionKind::SimpleList);
        assert!(!spec.requires_limit());
    }

    #[test]
    fn non_database_fields_have_no_cap() {
        assert!(resolve(FieldDef::new("things", "Thing").connection()).unwrap().is_none());
        assert!(resolve(FieldDef::new("id", "ID")).unwrap().is_none());
    }
}
