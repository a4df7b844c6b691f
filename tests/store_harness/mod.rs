//! Shared test harness for saved query store testing
//!
//! Provides list-query helpers, a `RacingStore` double for the
//! check-then-delete window, a `CountingStore` double that records store
//! round-trips, and the contract suites generated by
//! `saved_query_store_tests!` and `rest_integration_tests!`.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//! use store_harness::*;
//! ```

#![allow(dead_code)]

use async_trait::async_trait;
use saved_queries::core::listing::ListPipeline;
use saved_queries::core::pagination::PaginationConfig;
use saved_queries::core::query::ListQuery;
use saved_queries::core::resource::{OwnerId, Resource, SavedQuery};
use saved_queries::core::store::{SavedQueryStore, StoreError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use uuid::Uuid;

#[macro_use]
pub mod store_contract_tests;


pub const SAMPLE_QUERY: &str = "MATCH (n:Host) RETURN n LIMIT 10";

/// A fresh random owner
pub fn new_owner() -> OwnerId {
    OwnerId::new(Uuid::new_v4())
}

/// Build a validated list query from raw query-string pairs
pub fn list_query(owner: OwnerId, params: &[(&str, &str)]) -> ListQuery {
    let params: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    ListPipeline::new(SavedQuery::descriptor(), PaginationConfig::default())
        .prepare(owner, &params)
        .expect("list parameters should validate")
}

/// Names of the rows in listing order
pub fn names(rows: &[SavedQuery]) -> Vec<&str> {
    rows.iter().map(|row| row.name.as_str()).collect()
}

/// Store wrapper that deletes the row itself right after the first lookup,
/// so the caller's own delete always loses the race.
#[derive(Clone)]
pub struct RacingStore<S> {
    inner: S,
    raced: Arc<AtomicBool>,
}

impl<S> RacingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            raced: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: SavedQueryStore> SavedQueryStore for RacingStore<S> {
    async fn list(&self, query: &ListQuery) -> Result<(Vec<SavedQuery>, u64), StoreError> {
        self.inner.list(query).await
    }

    async fn create(
        &self,
        owner: &OwnerId,
        name: &str,
        query: &str,
    ) -> Result<SavedQuery, StoreError> {
        self.inner.create(owner, name, query).await
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.inner.delete(id).await
    }

    async fn lookup(&self, id: i64) -> Result<SavedQuery, StoreError> {
        let saved = self.inner.lookup(id).await?;
        if !self.raced.swap(true, Ordering::SeqCst) {
            self.inner.delete(id).await?;
        }
        Ok(saved)
    }
}

/// Store wrapper that counts every call reaching the inner store
#[derive(Clone)]
pub struct CountingStore<S> {
    inner: S,
    calls: Arc<AtomicUsize>,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Calls made so far, shared by every clone
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl<S: SavedQueryStore> SavedQueryStore for CountingStore<S> {
    async fn list(&self, query: &ListQuery) -> Result<(Vec<SavedQuery>, u64), StoreError> {
        self.record();
        self.inner.list(query).await
    }

    async fn create(
        &self,
        owner: &OwnerId,
        name: &str,
        query: &str,
    ) -> Result<SavedQuery, StoreError> {
        self.record();
        self.inner.create(owner, name, query).await
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.record();
        self.inner.delete(id).await
    }

    async fn lookup(&self, id: i64) -> Result<SavedQuery, StoreError> {
        self.record();
        self.inner.lookup(id).await
    }
}
