//! Request identity extraction.

use axum::http::HeaderMap;
use common::UserId;

use crate::error::ApiError;

/// Header carrying the authenticated user, set by the gateway in front of this service.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Reads the calling user from the request headers.
///
/// A missing, non-UTF-8 or blank header is rejected as unauthorized.
pub fn extract_user_id(headers: &HeaderMap) -> Result<UserId, ApiError> {
    let value = headers
        .get(USER_ID_HEADER)
        .ok_or_else(|| ApiError::Unauthorized(format!("missing {USER_ID_HEADER} header")))?;

    let user_id = value
        .to_str()
        .map_err(|_| ApiError::Unauthorized(format!("{USER_ID_HEADER} header is not valid text")))?
        .trim();

    if user_id.is_empty() {
        return Err(ApiError::Unauthorized(format!("{USER_ID_HEADER} header is empty")));
    }

    Ok(UserId::new(user_id))
}
