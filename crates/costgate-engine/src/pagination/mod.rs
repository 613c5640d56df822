//! Pagination cap resolver: the maximum `first`/`last` a caller may request
//! on each paginated field, resolved once at schema build time.

pub mod cap;

pub use cap::{resolve_cap, CollectionKind, PaginationCapSpec, PAGINATION_CAP_TAG};
