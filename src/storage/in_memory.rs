//! In-memory implementation of SavedQueryStore for testing and development

use crate::core::query::ListQuery;
use crate::core::resource::{OwnerId, SavedQuery};
use crate::core::store::{SavedQueryStore, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i64, SavedQuery>,
    last_id: i64,
}

/// In-memory saved query store
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// every operation holds the lock for its whole duration, so each one is
/// atomic like a single SQL statement.
#[derive(Clone, Default)]
pub struct InMemorySavedQueryStore {
    table: Arc<RwLock<Table>>,
}

impl InMemorySavedQueryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SavedQueryStore for InMemorySavedQueryStore {
    async fn list(&self, query: &ListQuery) -> Result<(Vec<SavedQuery>, u64), StoreError> {
        let table = self
            .table
            .read()
            .map_err(|e| StoreError::backend("list saved queries", e))?;

        let mut matching: Vec<&SavedQuery> =
            table.rows.values().filter(|row| query.matches(*row)).collect();
        let count = matching.len() as u64;

        matching.sort_by(|a, b| query.compare(*a, *b));

        let page = query.page();
        let skip = usize::try_from(page.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);

        let rows = matching
            .into_iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect();

        Ok((rows, count))
    }

    async fn create(
        &self,
        owner: &OwnerId,
        name: &str,
        query: &str,
    ) -> Result<SavedQuery, StoreError> {
        let mut table = self
            .table
            .write()
            .map_err(|e| StoreError::backend("create saved query", e))?;

        if table
            .rows
            .values()
            .any(|row| &row.user_id == owner && row.name == name)
        {
            return Err(StoreError::DuplicateName);
        }

        table.last_id += 1;
        let now = Utc::now();
        let saved = SavedQuery {
            id: table.last_id,
            user_id: *owner,
            name: name.to_string(),
            query: query.to_string(),
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(saved.id, saved.clone());

        Ok(saved)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut table = self
            .table
            .write()
            .map_err(|e| StoreError::backend("delete saved query", e))?;

        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn lookup(&self, id: i64) -> Result<SavedQuery, StoreError> {
        let table = self
            .table
            .read()
            .map_err(|e| StoreError::backend("look up saved query", e))?;

        table.rows.get(&id).cloned().ok_or(StoreError::NotFound)
    }
}
