//! Requesting identity
//!
//! Authentication happens upstream; by the time a request reaches these
//! handlers the authenticated user id is carried in the `X-User-Id` header.

use crate::core::error::{ApiError, RequestError};
use crate::core::resource::OwnerId;
use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;

/// Header carrying the authenticated user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Authorization context extracted from a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: OwnerId,
}

impl AuthContext {
    pub fn owner(&self) -> OwnerId {
        self.user_id
    }
}

/// Read the requesting user's id from the request headers
pub fn extract_user_id(headers: &HeaderMap) -> Result<OwnerId, RequestError> {
    let raw = headers
        .get(USER_ID_HEADER)
        .ok_or_else(|| RequestError::Unauthorized {
            message: format!("missing {} header", USER_ID_HEADER),
        })?
        .to_str()
        .map_err(|_| RequestError::Unauthorized {
            message: format!("{} header is not valid text", USER_ID_HEADER),
        })?;

    OwnerId::parse(raw).map_err(|_| RequestError::Unauthorized {
        message: format!("{} header is not a valid user id", USER_ID_HEADER),
    })
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = extract_user_id(&parts.headers)?;
        Ok(AuthContext { user_id })
    }
}
