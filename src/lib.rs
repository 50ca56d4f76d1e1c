//! HTTP request compression middleware for Tower.
//!
//! This crate provides a Tower layer that compresses the body of every
//! outgoing HTTP request before handing it to the next service, typically
//! the transport that puts it on the wire.
//!
//! # Example
//!
//! ```ignore
//! use http_request_compression::RequestCompressionLayer;
//! use tower::ServiceBuilder;
//!
//! let client = ServiceBuilder::new()
//!     .layer(RequestCompressionLayer::gzip())
//!     .service(transport);
//! ```
//!
//! # Request Modifications
//!
//! For every request:
//! - The body is read into memory and replaced with its compressed form
//! - The codec's token is appended to `Accept-Encoding`
//! - `Content-Encoding` is set to the codec's token, replacing any prior value
//! - `Content-Length` is set to the compressed length
//!
//! Bodies are buffered in full; this middleware is not meant for streaming
//! uploads of unbounded size.
//!
//! # Cancellation
//!
//! A [`CancellationToken`](tokio_util::sync::CancellationToken) stored in the
//! request's extensions is honored while the body is read and compressed and
//! while the inner service runs. Cancellation surfaces as
//! [`Error::Cancelled`].
//!
//! # Codecs
//!
//! Gzip and raw deflate are enabled by default. Zstd and Brotli are available
//! behind the `zstd` and `brotli` features. Other algorithms can be plugged in
//! by implementing [`Encoding`].

#![deny(missing_docs)]

mod codec;
mod error;
mod future;
mod layer;
mod service;
pub mod status;
mod writer;

#[cfg(feature = "brotli")]
pub use codec::Brotli;
#[cfg(feature = "deflate")]
pub use codec::Deflate;
#[cfg(feature = "gzip")]
pub use codec::Gzip;
#[cfg(feature = "zstd")]
pub use codec::Zstd;
pub use codec::{Codec, Encoding};
pub use compression_codecs::EncodeV2;
pub use compression_core::Level;
pub use error::{Error, UnknownEncoding};
pub use future::ResponseFuture;
pub use layer::RequestCompressionLayer;
pub use service::RequestCompression;
pub use writer::CompressingWriter;
