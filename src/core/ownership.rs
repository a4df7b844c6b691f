//! Ownership guard for deleting saved queries
//!
//! ```text
//! Unchecked ──parse id──▶ lookup ──owner matches──▶ BelongsToOwner ──delete──▶ Deleted
//!     │                     │            │                             │
//!     ▼                     ▼            ▼                             ▼
//! MalformedId            NotFound    Forbidden            NotFound (lost race)
//! ```
//!
//! The owner check and the delete are two separate store round-trips. A
//! concurrent delete can win in between; that case is reported exactly like a
//! missing row.

use crate::core::error::{ApiResult, SavedQueryError};
use crate::core::resource::{OwnerId, Resource};
use crate::core::store::{SavedQueryStore, StoreError};

/// Parse the external representation of a saved query id
pub fn parse_saved_query_id(raw: &str) -> Result<i64, SavedQueryError> {
    raw.parse::<i64>()
        .map_err(|_| SavedQueryError::MalformedId {
            value: raw.to_string(),
        })
}

/// Re-verifies ownership before mutating a saved query
pub struct OwnershipGuard<'a> {
    store: &'a dyn SavedQueryStore,
}

impl<'a> OwnershipGuard<'a> {
    pub fn new(store: &'a dyn SavedQueryStore) -> Self {
        Self { store }
    }

    /// Delete the saved query identified by `raw_id` on behalf of `owner`
    ///
    /// Returns the id of the deleted row.
    pub async fn delete(&self, owner: &OwnerId, raw_id: &str) -> ApiResult<i64> {
        let id = parse_saved_query_id(raw_id)?;

        let saved = match self.store.lookup(id).await {
            Ok(saved) => saved,
            Err(StoreError::NotFound) => return Err(SavedQueryError::NotFound { id }.into()),
            Err(e) => return Err(e.into_storage_error().into()),
        };

        if saved.owner() != owner {
            tracing::debug!(saved_query_id = id, %owner, "delete refused: not the owner");
            return Err(SavedQueryError::Forbidden { id }.into());
        }

        match self.store.delete(id).await {
            Ok(()) => {
                tracing::info!(saved_query_id = id, %owner, "saved query deleted");
                Ok(id)
            }
            Err(StoreError::NotFound) => {
                tracing::warn!(
                    saved_query_id = id,
                    %owner,
                    "saved query removed concurrently between ownership check and delete"
                );
                Err(SavedQueryError::NotFound { id }.into())
            }
            Err(e) => Err(e.into_storage_error().into()),
        }
    }
}
