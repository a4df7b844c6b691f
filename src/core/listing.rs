//! List request pipeline
//!
//! Raw query-string pairs go through a fixed sequence of stages, each of which
//! either passes its output on or stops the request with a single error:
//!
//! 1. split reserved parameters (`sort_by`, `skip`, `limit`) from filters
//! 2. sort tokens → [`SortSpec`](crate::core::sort::SortSpec) list
//! 3. filter parameters → [`FilterSet`](crate::core::filter::FilterSet)
//! 4. `skip` / `limit` → [`PageSpec`](crate::core::pagination::PageSpec)
//! 5. everything above + owner → [`ListQuery`]
//!
//! No stage touches the store.

use crate::core::error::QueryError;
use crate::core::filter::FilterParser;
use crate::core::pagination::{PARAM_LIMIT, PARAM_SKIP, PaginationConfig, PaginationParser};
use crate::core::predicate::ResourceDescriptor;
use crate::core::query::{ListQuery, QueryBuilder};
use crate::core::resource::OwnerId;
use crate::core::sort::parse_sort;

/// Query parameter carrying a sort token; repeatable
pub const PARAM_SORT_BY: &str = "sort_by";

/// Raw list parameters after the reserved names have been split off
#[derive(Debug, Default)]
struct RawListParams<'a> {
    sort: Vec<&'a str>,
    skip: Option<&'a str>,
    limit: Option<&'a str>,
    filters: Vec<(&'a str, &'a str)>,
}

impl<'a> RawListParams<'a> {
    fn split(params: &'a [(String, String)]) -> Self {
        let mut raw = Self::default();
        for (key, value) in params {
            match key.as_str() {
                PARAM_SORT_BY => raw.sort.push(value.as_str()),
                PARAM_SKIP => raw.skip = Some(value.as_str()),
                PARAM_LIMIT => raw.limit = Some(value.as_str()),
                _ => raw.filters.push((key.as_str(), value.as_str())),
            }
        }
        raw
    }
}

/// Validation pipeline for one resource type
#[derive(Debug, Clone, Copy)]
pub struct ListPipeline {
    descriptor: &'static ResourceDescriptor,
    pagination: PaginationParser,
}

impl ListPipeline {
    pub fn new(descriptor: &'static ResourceDescriptor, pagination: PaginationConfig) -> Self {
        Self {
            descriptor,
            pagination: PaginationParser::new(pagination),
        }
    }

    /// Turn raw query-string pairs into an executable query for `owner`
    pub fn prepare(
        &self,
        owner: OwnerId,
        params: &[(String, String)],
    ) -> Result<ListQuery, QueryError> {
        let raw = RawListParams::split(params);

        let sort = parse_sort(self.descriptor, raw.sort)?;
        let filters = FilterParser::new(self.descriptor).parse(raw.filters)?;
        let page = self.pagination.parse(raw.skip, raw.limit)?;

        QueryBuilder::new(self.descriptor).build(owner, &filters, sort, page)
    }
}
