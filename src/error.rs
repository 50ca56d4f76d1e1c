//! Errors produced by the compression stage.
//!
//! The service itself returns [`tower::BoxError`]: failures raised by the
//! stage are boxed [`Error`] values, while errors from the inner service are
//! boxed without any wrapping so callers can downcast them to their original
//! type.

use std::io;
use tower::BoxError;

/// An error raised while compressing a request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request body could not be read to completion.
    #[error("failed to read request body")]
    Body(#[source] BoxError),

    /// The encoder rejected the request body.
    #[error("failed to compress request body")]
    Compress(#[source] io::Error),

    /// The request's cancellation token fired before the request was sent.
    #[error("request cancelled")]
    Cancelled,
}

impl Error {
    /// Returns `true` if the request was cancelled rather than failed.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    /// Returns `true` if `err` is a cancellation raised by this crate.
    pub fn is_cancellation(err: &BoxError) -> bool {
        err.downcast_ref::<Error>().is_some_and(Error::is_cancelled)
    }
}

/// A content-coding token that no enabled codec understands.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported content encoding: {token}")]
pub struct UnknownEncoding {
    token: String,
}

impl UnknownEncoding {
    pub(crate) fn new(token: &str) -> Self {
        Self {
            token: token.to_owned(),
        }
    }

    /// Returns the rejected token.
    pub fn token(&self) -> &str {
        &self.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_cancelled_is_distinguishable() {
        let cancelled: BoxError = Box::new(Error::Cancelled);
        assert!(Error::is_cancellation(&cancelled));

        let failed: BoxError = Box::new(Error::Compress(io::Error::other("corrupt")));
        assert!(!Error::is_cancellation(&failed));

        let foreign: BoxError = "connection refused".into();
        assert!(!Error::is_cancellation(&foreign));
    }

    #[test]
    fn test_compress_error_keeps_source() {
        let err = Error::Compress(io::Error::other("corrupt"));
        assert_eq!(err.to_string(), "failed to compress request body");
        assert_eq!(err.source().unwrap().to_string(), "corrupt");
    }

    #[test]
    fn test_unknown_encoding_token() {
        let err = UnknownEncoding::new("compress");
        assert_eq!(err.token(), "compress");
    }
}
