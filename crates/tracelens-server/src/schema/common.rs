//! Common API response wrapper types.

use serde::Serialize;

/// Standard API response envelope.
///
/// All successful responses wrap their payload in this structure; the
/// `success` field is always `true` here. Error responses are produced by
/// `ApiError` with `success: false`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data,
        }
    }
}
