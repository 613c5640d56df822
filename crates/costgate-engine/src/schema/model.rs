//! Input schema model. Carries the classification metadata the cost annotator
//! and pagination cap resolver need; nothing here is request-specific.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Smart tags attached out of band (`unboundedCost`, `paginationCap`, ...).
pub type SmartTags = FxHashMap<String, serde_json::Value>;

/// What a field returns, structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FieldShape {
    #[default]
    Single,
    /// Paginated plain list.
    SimpleList,
    /// Paginated connection exposing page info and total count.
    Connection,
}

impl FieldShape {
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::SimpleList | Self::Connection)
    }
}

/// What backs a field in the database.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum FieldSource {
    #[default]
    Other,
    /// A table or view ("class" kind).
    Table,
    /// A computed procedure with its declared execution cost, if any.
    Procedure { cost: Option<f64> },
}

/// Relation direction for fields that follow a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    /// To-one, following the key from the referencing row.
    Forward,
    /// To-many, from the referenced row back to referencing rows.
    Backward,
}

/// Special-purpose connection fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FieldRole {
    #[default]
    Data,
    /// `totalCount` on a connection.
    TotalCount,
    /// `pageInfo.hasNextPage` / `pageInfo.hasPreviousPage`.
    PageFlag,
    /// The `pageInfo` container itself.
    PageInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMeta {
    pub shape: FieldShape,
    pub source: FieldSource,
    pub relation: Option<Relation>,
    pub role: FieldRole,
    /// Eligible for live re-execution on updates.
    pub live: bool,
    pub tags: SmartTags,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    /// Named return type with list/non-null wrappers stripped.
    pub type_name: String,
    #[serde(default)]
    pub meta: FieldMeta,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            meta: FieldMeta::default(),
        }
    }

    pub fn connection(mut self) -> Self {
        self.meta.shape = FieldShape::Connection;
        self
    }

    pub fn simple_list(mut self) -> Self {
        self.meta.shape = FieldShape::SimpleList;
        self
    }

    pub fn table(mut self) -> Self {
        self.meta.source = FieldSource::Table;
        self
    }

    pub fn procedure(mut self, cost: Option<f64>) -> Self {
        self.meta.source = FieldSource::Procedure { cost };
        self
    }

    pub fn relation(mut self, relation: Relation) -> Self {
        self.meta.relation = Some(relation);
        self
    }

    pub fn role(mut self, role: FieldRole) -> Self {
        self.meta.role = role;
        self
    }

    pub fn live(mut self) -> Self {
        self.meta.live = true;
        self
    }

    pub fn tag(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.meta.tags.insert(name.into(), value);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectType {
    pub name: String,
    pub fields: FxHashMap<String, FieldDef>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: FxHashMap::default(),
        }
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }
}

/// Object types of a schema plus its root operation types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaModel {
    pub query_type: String,
    pub mutation_type: Option<String>,
    pub subscription_type: Option<String>,
    pub types: FxHashMap<String, ObjectType>,
}

impl SchemaModel {
    pub fn new(query_type: impl Into<String>) -> Self {
        Self {
            query_type: query_type.into(),
            mutation_type: None,
            subscription_type: None,
            types: FxHashMap::default(),
        }
    }

    pub fn with_mutation(mut self, name: impl Into<String>) -> Self {
        self.mutation_type = Some(name.into());
        self
    }

    pub fn with_subscription(mut self, name: impl Into<String>) -> Self {
        self.subscription_type = Some(name.into());
        self
    }

    pub fn with_type(mut self, object: ObjectType) -> Self {
        self.types.insert(object.name.clone(), object);
        self
    }

    /// Whether `type_name` is the query, mutation or subscription root.
    pub fn is_root_type(&self, type_name: &str) -> bool {
        self.query_type == type_name
            || self.mutation_type.as_deref() == Some(type_name)
            || self.subscription_type.as_deref() == Some(type_name)
    }
}
