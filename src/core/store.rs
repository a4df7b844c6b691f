//! Store trait for saved queries

use crate::core::error::StorageError;
use crate::core::query::ListQuery;
use crate::core::resource::{OwnerId, SavedQuery};
use async_trait::async_trait;

/// Conditions a store reports
///
/// `DuplicateName` and `NotFound` are domain conditions the caller acts on;
/// the rest are failures of the store itself.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("a saved query with this name already exists for the owner")]
    DuplicateName,

    #[error("saved query not found")]
    NotFound,

    #[error("store operation '{operation}' timed out")]
    Timeout { operation: &'static str },

    #[error("store operation '{operation}' failed: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },
}

impl StoreError {
    pub fn backend(operation: &'static str, err: impl std::fmt::Display) -> Self {
        StoreError::Backend {
            operation,
            message: err.to_string(),
        }
    }

    /// Convert a store failure into an opaque storage error
    ///
    /// Domain conditions should be matched before falling back to this.
    pub fn into_storage_error(self) -> StorageError {
        match self {
            StoreError::Timeout { operation } => StorageError::Timeout {
                operation: operation.to_string(),
            },
            StoreError::Backend { operation, message } => StorageError::QueryError {
                operation: operation.to_string(),
                message,
            },
            other => StorageError::QueryError {
                operation: "unexpected store condition".to_string(),
                message: other.to_string(),
            },
        }
    }
}

/// Persistent table of saved queries
///
/// Every method is a single atomic round-trip. `delete` and `lookup` address
/// rows by id alone; callers go through the ownership guard before using them.
#[async_trait]
pub trait SavedQueryStore: Send + Sync {
    /// One page of rows plus the total number of rows matching the query
    async fn list(&self, query: &ListQuery) -> Result<(Vec<SavedQuery>, u64), StoreError>;

    /// Insert a new row; `DuplicateName` if the owner already uses `name`
    async fn create(
        &self,
        owner: &OwnerId,
        name: &str,
        query: &str,
    ) -> Result<SavedQuery, StoreError>;

    /// Remove a row; `NotFound` if it does not exist
    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Fetch a row; `NotFound` if it does not exist
    async fn lookup(&self, id: i64) -> Result<SavedQuery, StoreError>;
}
