//! Core module: validation pipeline, query building, ownership and store traits

pub mod auth;
pub mod error;
pub mod field;
pub mod filter;
pub mod listing;
pub mod ownership;
pub mod pagination;
pub mod predicate;
pub mod query;
pub mod resource;
pub mod service;
pub mod sort;
pub mod store;

pub use auth::AuthContext;
pub use error::{ApiError, ApiResult, QueryError, SavedQueryError};
pub use field::{FieldKind, FieldValue};
pub use filter::{FilterExpression, FilterParser, FilterSet};
pub use listing::ListPipeline;
pub use ownership::OwnershipGuard;
pub use pagination::{PageSpec, PaginatedResponse, PaginationConfig, PaginationParser};
pub use predicate::{FieldCapability, Operator, ResourceDescriptor};
pub use query::{ListQuery, QueryBuilder, SqlStatement};
pub use resource::{OwnerId, Resource, SAVED_QUERY_DESCRIPTOR, SavedQuery};
pub use service::{CreateSavedQueryRequest, SavedQueryService};
pub use sort::{SortDirection, SortSpec};
pub use store::{SavedQueryStore, StoreError};
