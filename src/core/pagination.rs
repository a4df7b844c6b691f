//! Pagination parameters and paginated responses

use crate::core::error::QueryError;
use serde::{Deserialize, Serialize};

/// Query parameter name for the number of rows to skip
pub const PARAM_SKIP: &str = "skip";
/// Query parameter name for the maximum number of rows
pub const PARAM_LIMIT: &str = "limit";

/// Default and maximum page sizes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_skip: u64,
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_skip: 0,
            default_limit: 10_000,
            max_limit: 10_000,
        }
    }
}

/// A bounded slice of a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    pub skip: u64,
    pub limit: u64,
}

impl PageSpec {
    pub fn new(skip: u64, limit: u64) -> Self {
        Self { skip, limit }
    }
}

/// Parser for `skip` / `limit`
///
/// Out-of-range values are rejected, never clamped.
#[derive(Debug, Clone, Copy)]
pub struct PaginationParser {
    config: PaginationConfig,
}

impl PaginationParser {
    pub fn new(config: PaginationConfig) -> Self {
        Self { config }
    }

    pub fn parse(&self, skip: Option<&str>, limit: Option<&str>) -> Result<PageSpec, QueryError> {
        let skip = match skip {
            Some(raw) => parse_non_negative(PARAM_SKIP, raw)?,
            None => self.config.default_skip,
        };

        let limit = match limit {
            Some(raw) => parse_non_negative(PARAM_LIMIT, raw)?,
            None => self.config.default_limit,
        };

        if limit > self.config.max_limit {
            return Err(QueryError::BadQueryParameter {
                parameter: PARAM_LIMIT.to_string(),
                message: format!("must not exceed {}", self.config.max_limit),
            });
        }

        Ok(PageSpec { skip, limit })
    }
}

fn parse_non_negative(parameter: &str, raw: &str) -> Result<u64, QueryError> {
    let value = raw
        .trim()
        .parse::<i64>()
        .map_err(|e| QueryError::BadQueryParameter {
            parameter: parameter.to_string(),
            message: e.to_string(),
        })?;

    u64::try_from(value).map_err(|_| QueryError::BadQueryParameter {
        parameter: parameter.to_string(),
        message: "must be non-negative".to_string(),
    })
}

/// Paginated response body
///
/// `count` is the number of matching rows ignoring `skip`/`limit`.
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub count: u64,
    pub limit: u64,
    pub skip: u64,
    pub data: Vec<T>,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: PageSpec, count: u64) -> Self {
        Self {
            count,
            limit: page.limit,
            skip: page.skip,
            data,
        }
    }
}
