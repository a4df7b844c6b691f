//! # Saved Queries
//!
//! An owner-scoped saved query service: users store named query strings and
//! list, filter, sort, page and delete only their own entries.
//!
//! ## Features
//!
//! - **Validated list parameters**: `sort_by`, `field[op]=value` filters,
//!   `skip` and `limit` are checked against a static capability table
//! - **Parameterized SQL**: user values are always bound, never interpolated
//! - **Owner scope**: every list and delete is restricted to the caller
//! - **Pluggable storage**: in-memory store by default, PostgreSQL behind the
//!   `postgres` feature
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use saved_queries::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     ServerBuilder::new()
//!         .with_store(InMemorySavedQueryStore::new())
//!         .serve("127.0.0.1:8080")
//!         .await
//! }
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    pub use crate::config::ServiceConfig;

    pub use crate::core::{
        auth::AuthContext,
        error::{ApiError, ApiResult, QueryError, SavedQueryError},
        field::{FieldKind, FieldValue},
        filter::{FilterParser, FilterSet},
        listing::ListPipeline,
        ownership::OwnershipGuard,
        pagination::{PageSpec, PaginatedResponse, PaginationConfig, PaginationParser},
        predicate::{Operator, ResourceDescriptor},
        query::{ListQuery, QueryBuilder},
        resource::{OwnerId, Resource, SAVED_QUERY_DESCRIPTOR, SavedQuery},
        service::{CreateSavedQueryRequest, SavedQueryService},
        sort::{SortDirection, SortSpec, parse_sort},
        store::{SavedQueryStore, StoreError},
    };

    pub use crate::server::{AppState, ServerBuilder};

    pub use crate::storage::InMemorySavedQueryStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresSavedQueryStore;

    pub use async_trait::async_trait;
    pub use uuid::Uuid;
}
