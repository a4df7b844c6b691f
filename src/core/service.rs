//! Saved query operations, independent of the HTTP layer

use crate::core::error::{ApiResult, RequestError, SavedQueryError};
use crate::core::listing::ListPipeline;
use crate::core::ownership::OwnershipGuard;
use crate::core::pagination::{PaginatedResponse, PaginationConfig};
use crate::core::resource::{OwnerId, Resource, SavedQuery};
use crate::core::store::{SavedQueryStore, StoreError};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// Request body for creating a saved query
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSavedQueryRequest {
    #[validate(length(min = 1))]
    pub name: String,

    #[validate(length(min = 1))]
    pub query: String,
}

/// List, create and delete saved queries for the requesting owner
#[derive(Clone)]
pub struct SavedQueryService {
    store: Arc<dyn SavedQueryStore>,
    pipeline: ListPipeline,
}

impl SavedQueryService {
    pub fn new(store: Arc<dyn SavedQueryStore>, pagination: PaginationConfig) -> Self {
        Self {
            store,
            pipeline: ListPipeline::new(SavedQuery::descriptor(), pagination),
        }
    }

    pub fn store(&self) -> &Arc<dyn SavedQueryStore> {
        &self.store
    }

    /// One page of the owner's saved queries plus the total matching count
    pub async fn list(
        &self,
        owner: OwnerId,
        params: &[(String, String)],
    ) -> ApiResult<PaginatedResponse<SavedQuery>> {
        let query = self.pipeline.prepare(owner, params)?;

        let (rows, count) = self
            .store
            .list(&query)
            .await
            .map_err(StoreError::into_storage_error)?;

        Ok(PaginatedResponse::new(rows, query.page(), count))
    }

    /// Create a saved query owned by `owner`
    pub async fn create(
        &self,
        owner: OwnerId,
        request: CreateSavedQueryRequest,
    ) -> ApiResult<SavedQuery> {
        request
            .validate()
            .map_err(|_| SavedQueryError::EmptyField)?;

        match self.store.create(&owner, &request.name, &request.query).await {
            Ok(saved) => {
                tracing::info!(saved_query_id = saved.id, %owner, "saved query created");
                Ok(saved)
            }
            Err(StoreError::DuplicateName) => Err(SavedQueryError::DuplicateName {
                name: request.name,
            }
            .into()),
            Err(e) => Err(e.into_storage_error().into()),
        }
    }

    /// Delete a saved query after re-checking that `owner` owns it
    pub async fn delete(&self, owner: OwnerId, raw_id: &str) -> ApiResult<()> {
        OwnershipGuard::new(self.store.as_ref())
            .delete(&owner, raw_id)
            .await
            .map(|_| ())
    }
}

/// Parse a JSON body into a create request
pub fn parse_create_request(body: &[u8]) -> ApiResult<CreateSavedQueryRequest> {
    serde_json::from_slice(body).map_err(|e| {
        RequestError::InvalidBody {
            message: e.to_string(),
        }
        .into()
    })
}
