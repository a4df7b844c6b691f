//! Typed error handling for the saved query service
//!
//! Every failure a request can hit is described by a variant of [`ApiError`],
//! grouped by category so callers can match on the precise condition instead
//! of inspecting message text.
//!
//! # Error Categories
//!
//! - [`QueryError`]: Invalid sort, filter or pagination parameters
//! - [`SavedQueryError`]: Create/delete conditions on a saved query
//! - [`RequestError`]: Identity and payload problems
//! - [`StorageError`]: Store failures (always opaque to the client)
//! - [`ConfigError`]: Configuration loading and validation (startup only,
//!   never part of a response)
//!
//! # Example
//!
//! ```rust,ignore
//! match pipeline.prepare(owner, &params) {
//!     Err(ApiError::Query(QueryError::NotSortable { field })) => {
//!         println!("cannot sort by {}", field);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//!     Ok(query) => run(query).await,
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// Message returned to clients for every server-side failure
pub const INTERNAL_ERROR_MESSAGE: &str = "an internal error has occurred";

/// The main error type for the service
#[derive(Debug)]
pub enum ApiError {
    /// Sort/filter/pagination parameter errors
    Query(QueryError),

    /// Saved query create/delete errors
    SavedQuery(SavedQueryError),

    /// HTTP/Request errors
    Request(RequestError),

    /// Storage backend errors
    Storage(StorageError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Query(e) => write!(f, "{}", e),
            ApiError::SavedQuery(e) => write!(f, "{}", e),
            ApiError::Request(e) => write!(f, "{}", e),
            ApiError::Storage(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Query(e) => Some(e),
            ApiError::SavedQuery(e) => Some(e),
            ApiError::Request(e) => Some(e),
            ApiError::Storage(e) => Some(e),
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Query(_) => StatusCode::BAD_REQUEST,
            ApiError::SavedQuery(e) => e.status_code(),
            ApiError::Request(e) => e.status_code(),
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Query(e) => e.error_code(),
            ApiError::SavedQuery(e) => e.error_code(),
            ApiError::Request(e) => e.error_code(),
            ApiError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Whether the error is the server's fault rather than the client's
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Convert to an error response
    ///
    /// Server-side failures never expose their cause to the client.
    pub fn to_response(&self) -> ErrorResponse {
        let message = if self.is_server_error() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        };

        ErrorResponse {
            code: self.error_code().to_string(),
            message,
            details: self.details(),
        }
    }

    /// Get additional details for the error
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::Query(QueryError::NotSortable { field })
            | ApiError::Query(QueryError::NotFilterable { field }) => {
                Some(serde_json::json!({ "field": field }))
            }
            ApiError::Query(QueryError::PredicateNotSupported { field, operator }) => {
                Some(serde_json::json!({ "field": field, "operator": operator }))
            }
            ApiError::Query(QueryError::BadQueryParameter { parameter, .. })
            | ApiError::Query(QueryError::MalformedFilterSyntax { parameter }) => {
                Some(serde_json::json!({ "parameter": parameter }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "request rejected");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Query Parameter Errors
// =============================================================================

/// Errors raised while validating list parameters
///
/// All of these are client errors and are reported with enough detail
/// (field, operator or parameter name) for the caller to self-correct.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryError {
    /// Sort requested on a column that is not sortable
    NotSortable { field: String },

    /// Filter requested on a column that is not filterable
    NotFilterable { field: String },

    /// Operator not permitted for the column
    PredicateNotSupported { field: String, operator: String },

    /// Filter parameter could not be split into field/operator/value
    MalformedFilterSyntax { parameter: String },

    /// Pagination parameter is not an acceptable integer
    BadQueryParameter { parameter: String, message: String },

    /// Validated filters could not be turned into a statement
    Build { message: String },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::NotSortable { field } => write!(f, "column not sortable: {}", field),
            QueryError::NotFilterable { field } => {
                write!(f, "column not filterable: {}", field)
            }
            QueryError::PredicateNotSupported { field, operator } => {
                write!(f, "filter predicate not supported: {} {}", field, operator)
            }
            QueryError::MalformedFilterSyntax { parameter } => {
                write!(f, "malformed filter: {}", parameter)
            }
            QueryError::BadQueryParameter { parameter, message } => {
                write!(
                    f,
                    "invalid value for query parameter '{}': {}",
                    parameter, message
                )
            }
            QueryError::Build { message } => {
                write!(f, "error building SQL for filter: {}", message)
            }
        }
    }
}

impl std::error::Error for QueryError {}

impl QueryError {
    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::NotSortable { .. } => "COLUMN_NOT_SORTABLE",
            QueryError::NotFilterable { .. } => "COLUMN_NOT_FILTERABLE",
            QueryError::PredicateNotSupported { .. } => "FILTER_PREDICATE_NOT_SUPPORTED",
            QueryError::MalformedFilterSyntax { .. } => "MALFORMED_FILTER",
            QueryError::BadQueryParameter { .. } => "BAD_QUERY_PARAMETER",
            QueryError::Build { .. } => "FILTER_BUILD_ERROR",
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::Query(err)
    }
}

// =============================================================================
// Saved Query Errors
// =============================================================================

/// Conditions raised while creating or deleting a saved query
#[derive(Debug, Clone, PartialEq)]
pub enum SavedQueryError {
    /// `name` or `query` was empty
    EmptyField,

    /// The owner already has a saved query with this name
    DuplicateName { name: String },

    /// The id in the path is not an integer
    MalformedId { value: String },

    /// No saved query with this id exists (or it vanished mid-operation)
    NotFound { id: i64 },

    /// The saved query belongs to someone else
    ///
    /// Reported as a bad request so existence is never confirmed across owners.
    Forbidden { id: i64 },
}

impl fmt::Display for SavedQueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SavedQueryError::EmptyField => write!(f, "the name and/or query field is empty"),
            SavedQueryError::DuplicateName { .. } => write!(
                f,
                "duplicate name for saved query: please choose a different name"
            ),
            SavedQueryError::MalformedId { .. } => write!(f, "id is malformed"),
            SavedQueryError::NotFound { .. } => write!(f, "query does not exist"),
            SavedQueryError::Forbidden { .. } => write!(f, "invalid saved_query_id supplied"),
        }
    }
}

impl std::error::Error for SavedQueryError {}

impl SavedQueryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SavedQueryError::EmptyField => StatusCode::BAD_REQUEST,
            SavedQueryError::DuplicateName { .. } => StatusCode::BAD_REQUEST,
            SavedQueryError::MalformedId { .. } => StatusCode::BAD_REQUEST,
            SavedQueryError::NotFound { .. } => StatusCode::NOT_FOUND,
            SavedQueryError::Forbidden { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            SavedQueryError::EmptyField => "EMPTY_FIELD",
            SavedQueryError::DuplicateName { .. } => "DUPLICATE_NAME",
            SavedQueryError::MalformedId { .. } => "ID_MALFORMED",
            SavedQueryError::NotFound { .. } => "SAVED_QUERY_NOT_FOUND",
            // Same code as a malformed id on purpose: no existence leakage.
            SavedQueryError::Forbidden { .. } => "ID_MALFORMED",
        }
    }
}

impl From<SavedQueryError> for ApiError {
    fn from(err: SavedQueryError) -> Self {
        ApiError::SavedQuery(err)
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug, Clone, PartialEq)]
pub enum RequestError {
    /// No usable identity on the request
    Unauthorized { message: String },

    /// Invalid request body
    InvalidBody { message: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Unauthorized { message } => write!(f, "Unauthorized: {}", message),
            RequestError::InvalidBody { message } => {
                write!(f, "Invalid request body: {}", message)
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RequestError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::Unauthorized { .. } => "UNAUTHORIZED",
            RequestError::InvalidBody { .. } => "INVALID_BODY",
        }
    }
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        ApiError::Request(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// Query execution error
    QueryError { operation: String, message: String },

    /// The store did not answer in time
    Timeout { operation: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::QueryError { operation, message } => {
                write!(f, "{} failed: {}", operation, message)
            }
            StorageError::Timeout { operation } => write!(f, "{} timed out", operation),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Storage(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::IoError { message } => write!(f, "IO error: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError {
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for service operations
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Tests
// =============================================================================
