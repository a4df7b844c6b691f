//! Sort token parsing
//!
//! Each `sort_by` token names a column, optionally prefixed with `-` for
//! descending order. The first token is the primary sort key.

use crate::core::error::QueryError;
use crate::core::predicate::ResourceDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// A validated sort key
///
/// `field` always points into the resource's static capability table, never
/// at request text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: &'static str,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(field: &'static str) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: &'static str) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }
}

/// Parse sort tokens against a resource's capability table
///
/// Aborts on the first column that is not sortable.
pub fn parse_sort<'a, I>(
    descriptor: &'static ResourceDescriptor,
    tokens: I,
) -> Result<Vec<SortSpec>, QueryError>
where
    I: IntoIterator<Item = &'a str>,
{
    tokens
        .into_iter()
        .map(|token| {
            let (column, direction) = match token.strip_prefix('-') {
                Some(stripped) => (stripped, SortDirection::Descending),
                None => (token, SortDirection::Ascending),
            };

            match descriptor.field(column) {
                Some(capability) if capability.sortable => Ok(SortSpec {
                    field: capability.name,
                    direction,
                }),
                _ => Err(QueryError::NotSortable {
                    field: column.to_string(),
                }),
            }
        })
        .collect()
}
