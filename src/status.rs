//! Status codes commonly returned by REST services.

use http::StatusCode;

/// 422: the request was well formed but its content is invalid.
pub const UNPROCESSABLE_ENTITY: StatusCode = StatusCode::UNPROCESSABLE_ENTITY;

/// 424: the request failed because a request it depends on failed.
pub const FAILED_DEPENDENCY: StatusCode = StatusCode::FAILED_DEPENDENCY;

/// 429: a rate limit was reached.
pub const TOO_MANY_REQUESTS: StatusCode = StatusCode::TOO_MANY_REQUESTS;
