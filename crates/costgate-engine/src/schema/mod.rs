//! Schema model supplied by the schema-derivation layer, and its decorated,
//! immutable form used at request time.

pub mod decorated;
pub mod model;

pub use decorated::{DecoratedField, DecoratedSchema, DecoratedType};
pub use model::{
    FieldDef, FieldMeta, FieldRole, FieldShape, FieldSource, ObjectType, Relation, SchemaModel,
    SmartTags,
};
