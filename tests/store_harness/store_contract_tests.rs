//! Macro-generated test suite for `SavedQueryStore` contract validation.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//!
//! use store_harness::*;
//! use saved_queries::storage::InMemorySavedQueryStore;
//!
//! saved_query_store_tests!(InMemorySavedQueryStore::new());
//! ```
//!
//! # Generated Tests
//!
//! ## Create
//! - `test_create_and_lookup`: created row comes back with all fields
//! - `test_duplicate_name_rejected`: same owner, same name → `DuplicateName`
//! - `test_same_name_different_owners`: names are unique per owner only
//!
//! ## List
//! - `test_list_sorted_descending`: `sort_by=-name`
//! - `test_list_page_keeps_total_count`: `skip`/`limit` slice, count unchanged
//! - `test_list_owner_isolation`: another owner's rows never appear
//! - `test_list_substring_filter`: `name[~eq]` is case-insensitive
//! - `test_list_like_wildcards_are_literal`: `%` and `_` only match themselves
//! - `test_list_id_range`: `id[gte]` / `id[lt]`
//! - `test_list_timestamp_range`: `created_at[gt]` / `updated_at[lte]`
//! - `test_list_text_sort_is_bytewise`: uppercase sorts before lowercase
//! - `test_list_injection_value_is_data`: SQL in a value matches nothing
//!
//! ## Delete
//! - `test_guarded_delete`: owner deletes, row is gone
//! - `test_guarded_delete_missing`: unknown id → `SAVED_QUERY_NOT_FOUND`
//! - `test_guarded_delete_other_owner`: refused, row still present
//! - `test_guarded_delete_lost_race`: concurrent delete wins → not found
//! - `test_concurrent_guarded_deletes`: exactly one of two deletes succeeds

/// Generate a full `SavedQueryStore` conformance test suite.
///
/// `$factory` must evaluate to a fresh, empty store implementing
/// `SavedQueryStore + Clone + 'static`. It is re-evaluated for each test.
#[macro_export]
macro_rules! saved_query_store_tests {
    ($factory:expr) => {
        mod saved_query_store_contract_tests {
            use super::*;
            use saved_queries::core::error::{ApiError, SavedQueryError};
            use saved_queries::core::ownership::OwnershipGuard;
            use saved_queries::core::store::{SavedQueryStore, StoreError};

            // ==================================================================
            // Create
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_lookup() {
                let store = $factory;
                let owner = new_owner();

                let created = store.create(&owner, "alpha", SAMPLE_QUERY).await.unwrap();
                assert_eq!(created.user_id, owner);
                assert_eq!(created.name, "alpha");
                assert_eq!(created.query, SAMPLE_QUERY);

                let found = store.lookup(created.id).await.unwrap();
                assert_eq!(found.id, created.id);
                assert_eq!(found.user_id, owner);
                assert_eq!(found.name, "alpha");
            }

            #[tokio::test]
            async fn test_duplicate_name_rejected() {
                let store = $factory;
                let owner = new_owner();

                store.create(&owner, "alpha", SAMPLE_QUERY).await.unwrap();
                let err = store
                    .create(&owner, "alpha", "MATCH (u:User) RETURN u")
                    .await
                    .unwrap_err();
                assert!(matches!(err, StoreError::DuplicateName));

                let (rows, count) = store.list(&list_query(owner, &[])).await.unwrap();
                assert_eq!(count, 1);
                assert_eq!(rows[0].query, SAMPLE_QUERY);
            }

            #[tokio::test]
            async fn test_same_name_different_owners() {
                let store = $factory;
                let a = new_owner();
                let b = new_owner();

                let first = store.create(&a, "alpha", SAMPLE_QUERY).await.unwrap();
                let second = store.create(&b, "alpha", SAMPLE_QUERY).await.unwrap();
                assert_ne!(first.id, second.id);
            }

            // ==================================================================
            // List
            // ==================================================================

            #[tokio::test]
            async fn test_list_sorted_descending() {
                let store = $factory;
                let owner = new_owner();
                store.create(&owner, "alpha", SAMPLE_QUERY).await.unwrap();
                store.create(&owner, "beta", SAMPLE_QUERY).await.unwrap();

                let (rows, count) = store
                    .list(&list_query(owner, &[("sort_by", "-name")]))
                    .await
                    .unwrap();
                assert_eq!(names(&rows), vec!["beta", "alpha"]);
                assert_eq!(count, 2);
            }

            #[tokio::test]
            async fn test_list_page_keeps_total_count() {
                let store = $factory;
                let owner = new_owner();
                store.create(&owner, "alpha", SAMPLE_QUERY).await.unwrap();
                store.create(&owner, "beta", SAMPLE_QUERY).await.unwrap();

                let (rows, count) = store
                    .list(&list_query(
                        owner,
                        &[("sort_by", "-name"), ("skip", "1"), ("limit", "1")],
                    ))
                    .await
                    .unwrap();
                assert_eq!(names(&rows), vec!["alpha"]);
                assert_eq!(count, 2);

                let (rows, count) = store
                    .list(&list_query(owner, &[("skip", "5")]))
                    .await
                    .unwrap();
                assert!(rows.is_empty());
                assert_eq!(count, 2);
            }

            #[tokio::test]
            async fn test_list_owner_isolation() {
                let store = $factory;
                let a = new_owner();
                let b = new_owner();
                store.create(&a, "mine", SAMPLE_QUERY).await.unwrap();
                store.create(&b, "theirs", SAMPLE_QUERY).await.unwrap();

                let (rows, count) = store.list(&list_query(a, &[])).await.unwrap();
                assert_eq!(names(&rows), vec!["mine"]);
                assert_eq!(count, 1);

                // Filtering on the owner column cannot widen the scope
                let other = b.to_string();
                let (rows, count) = store
                    .list(&list_query(a, &[("user_id[eq]", other.as_str())]))
                    .await
                    .unwrap();
                assert!(rows.is_empty());
                assert_eq!(count, 0);
            }

            #[tokio::test]
            async fn test_list_substring_filter() {
                let store = $factory;
                let owner = new_owner();
                store.create(&owner, "Admin hosts", SAMPLE_QUERY).await.unwrap();
                store.create(&owner, "domain admins", SAMPLE_QUERY).await.unwrap();
                store.create(&owner, "kerberoastable", SAMPLE_QUERY).await.unwrap();

                let (rows, count) = store
                    .list(&list_query(
                        owner,
                        &[("name[~eq]", "ADMIN"), ("sort_by", "name")],
                    ))
                    .await
                    .unwrap();
                assert_eq!(names(&rows), vec!["Admin hosts", "domain admins"]);
                assert_eq!(count, 2);

                let (rows, _) = store
                    .list(&list_query(owner, &[("name[neq]", "kerberoastable")]))
                    .await
                    .unwrap();
                assert_eq!(rows.len(), 2);
            }

            #[tokio::test]
            async fn test_list_like_wildcards_are_literal() {
                let store = $factory;
                let owner = new_owner();
                store.create(&owner, "100% done", SAMPLE_QUERY).await.unwrap();
                store.create(&owner, "1000 done", SAMPLE_QUERY).await.unwrap();
                store.create(&owner, "snake_case", SAMPLE_QUERY).await.unwrap();
                store.create(&owner, "snakeXcase", SAMPLE_QUERY).await.unwrap();

                let (rows, _) = store
                    .list(&list_query(owner, &[("name[~eq]", "0%")]))
                    .await
                    .unwrap();
                assert_eq!(names(&rows), vec!["100% done"]);

                let (rows, _) = store
                    .list(&list_query(owner, &[("name[~eq]", "e_c")]))
                    .await
                    .unwrap();
                assert_eq!(names(&rows), vec!["snake_case"]);
            }

            #[tokio::test]
            async fn test_list_id_range() {
                let store = $factory;
                let owner = new_owner();
                let mut ids = Vec::new();
                for name in ["one", "two", "three", "four"] {
                    ids.push(store.create(&owner, name, SAMPLE_QUERY).await.unwrap().id);
                }

                let lower = ids[1].to_string();
                let upper = ids[3].to_string();
                let (rows, count) = store
                    .list(&list_query(
                        owner,
                        &[("id[gte]", lower.as_str()), ("id[lt]", upper.as_str())],
                    ))
                    .await
                    .unwrap();
                assert_eq!(names(&rows), vec!["two", "three"]);
                assert_eq!(count, 2);
            }

            #[tokio::test]
            async fn test_list_timestamp_range() {
                let store = $factory;
                let owner = new_owner();
                let first = store.create(&owner, "first", SAMPLE_QUERY).await.unwrap();
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                let second = store.create(&owner, "second", SAMPLE_QUERY).await.unwrap();
                assert!(second.created_at > first.created_at);

                let after_first = first.created_at.to_rfc3339();
                let (rows, count) = store
                    .list(&list_query(owner, &[("created_at[gt]", after_first.as_str())]))
                    .await
                    .unwrap();
                assert_eq!(names(&rows), vec!["second"]);
                assert_eq!(count, 1);

                let up_to_first = first.updated_at.to_rfc3339();
                let (rows, count) = store
                    .list(&list_query(owner, &[("updated_at[lte]", up_to_first.as_str())]))
                    .await
                    .unwrap();
                assert_eq!(names(&rows), vec!["first"]);
                assert_eq!(count, 1);

                let (rows, _) = store
                    .list(&list_query(
                        owner,
                        &[
                            ("created_at[gte]", after_first.as_str()),
                            ("sort_by", "-created_at"),
                        ],
                    ))
                    .await
                    .unwrap();
                assert_eq!(names(&rows), vec!["second", "first"]);
            }

            #[tokio::test]
            async fn test_list_text_sort_is_bytewise() {
                let store = $factory;
                let owner = new_owner();
                store.create(&owner, "alpha", SAMPLE_QUERY).await.unwrap();
                store.create(&owner, "Beta", SAMPLE_QUERY).await.unwrap();

                let (rows, _) = store
                    .list(&list_query(owner, &[("sort_by", "name")]))
                    .await
                    .unwrap();
                assert_eq!(names(&rows), vec!["Beta", "alpha"]);
            }

            #[tokio::test]
            async fn test_list_injection_value_is_data() {
                let store = $factory;
                let owner = new_owner();
                store.create(&owner, "alpha", SAMPLE_QUERY).await.unwrap();

                let (rows, count) = store
                    .list(&list_query(owner, &[("name[eq]", "x' OR '1'='1")]))
                    .await
                    .unwrap();
                assert!(rows.is_empty());
                assert_eq!(count, 0);

                // The table is still intact
                let (_, count) = store.list(&list_query(owner, &[])).await.unwrap();
                assert_eq!(count, 1);
            }

            // ==================================================================
            // Delete through the ownership guard
            // ==================================================================

            #[tokio::test]
            async fn test_guarded_delete() {
                let store = $factory;
                let owner = new_owner();
                let saved = store.create(&owner, "alpha", SAMPLE_QUERY).await.unwrap();

                let deleted = OwnershipGuard::new(&store)
                    .delete(&owner, &saved.id.to_string())
                    .await
                    .unwrap();
                assert_eq!(deleted, saved.id);
                assert!(matches!(
                    store.lookup(saved.id).await,
                    Err(StoreError::NotFound)
                ));
            }

            #[tokio::test]
            async fn test_guarded_delete_missing() {
                let store = $factory;
                let owner = new_owner();

                let err = OwnershipGuard::new(&store)
                    .delete(&owner, "987654321")
                    .await
                    .unwrap_err();
                assert_eq!(err.error_code(), "SAVED_QUERY_NOT_FOUND");
                assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_guarded_delete_other_owner() {
                let store = $factory;
                let a = new_owner();
                let b = new_owner();
                let saved = store.create(&b, "theirs", SAMPLE_QUERY).await.unwrap();

                let err = OwnershipGuard::new(&store)
                    .delete(&a, &saved.id.to_string())
                    .await
                    .unwrap_err();
                assert!(matches!(
                    err,
                    ApiError::SavedQuery(SavedQueryError::Forbidden { id }) if id == saved.id
                ));
                assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
                assert_eq!(err.to_string(), "invalid saved_query_id supplied");

                assert!(store.lookup(saved.id).await.is_ok());
            }

            #[tokio::test]
            async fn test_guarded_delete_lost_race() {
                let store = RacingStore::new($factory);
                let owner = new_owner();
                let saved = store.create(&owner, "alpha", SAMPLE_QUERY).await.unwrap();

                let err = OwnershipGuard::new(&store)
                    .delete(&owner, &saved.id.to_string())
                    .await
                    .unwrap_err();
                assert!(matches!(
                    err,
                    ApiError::SavedQuery(SavedQueryError::NotFound { .. })
                ));
                assert!(matches!(
                    store.inner().lookup(saved.id).await,
                    Err(StoreError::NotFound)
                ));
            }

            #[tokio::test]
            async fn test_concurrent_guarded_deletes() {
                let store = $factory;
                let owner = new_owner();
                let saved = store.create(&owner, "alpha", SAMPLE_QUERY).await.unwrap();
                let raw_id = saved.id.to_string();

                let attempts = (0..2).map(|_| {
                    let store = store.clone();
                    let raw_id = raw_id.clone();
                    tokio::spawn(async move {
                        OwnershipGuard::new(&store).delete(&owner, &raw_id).await
                    })
                });

                let results = futures::future::join_all(attempts).await;
                let outcomes: Vec<_> = results.into_iter().map(|r| r.unwrap()).collect();

                assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
                for outcome in outcomes.iter().filter_map(|r| r.as_ref().err()) {
                    assert_eq!(outcome.error_code(), "SAVED_QUERY_NOT_FOUND");
                }
            }
        }
    };
}
