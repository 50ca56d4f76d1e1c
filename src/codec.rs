#[cfg(feature = "brotli")]
use compression_codecs::brotli::{BrotliEncoder, params::EncoderParams as BrotliParams};
#[cfg(feature = "deflate")]
use compression_codecs::deflate::DeflateEncoder;
#[cfg(feature = "gzip")]
use compression_codecs::gzip::GzipEncoder;
#[cfg(feature = "zstd")]
use compression_codecs::zstd::ZstdEncoder;

use crate::writer::CompressingWriter;
use bytes::BytesMut;
use compression_codecs::EncodeV2;
use compression_core::Level;
use std::fmt;
use std::str::FromStr;

/// A compression algorithm that can be applied to a request body.
///
/// A binding supplies the two things the compression stage needs to know
/// about an algorithm: the `Content-Encoding` token and a way to build the
/// algorithm's encoder. Everything else is shared.
pub trait Encoding {
    /// Returns the `Content-Encoding` / `Accept-Encoding` token.
    fn content_encoding(&self) -> &'static str;

    /// Creates a fresh encoder at the given compression level.
    fn encoder(&self, level: Level) -> Box<dyn EncodeV2 + Send>;

    /// Wraps `sink` in a writer that compresses everything written to it.
    fn wrap(&self, sink: BytesMut, level: Level) -> CompressingWriter {
        CompressingWriter::new(self.encoder(level), sink)
    }
}

/// Gzip (RFC 1952) request compression.
#[cfg(feature = "gzip")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gzip;

#[cfg(feature = "gzip")]
impl Encoding for Gzip {
    fn content_encoding(&self) -> &'static str {
        "gzip"
    }

    fn encoder(&self, level: Level) -> Box<dyn EncodeV2 + Send> {
        Box::new(GzipEncoder::new(level.into()))
    }
}

/// Raw deflate (RFC 1951) request compression.
#[cfg(feature = "deflate")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deflate;

#[cfg(feature = "deflate")]
impl Encoding for Deflate {
    fn content_encoding(&self) -> &'static str {
        "deflate"
    }

    fn encoder(&self, level: Level) -> Box<dyn EncodeV2 + Send> {
        Box::new(DeflateEncoder::new(level.into()))
    }
}

/// Zstd request compression.
#[cfg(feature = "zstd")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Zstd;

#[cfg(feature = "zstd")]
impl Encoding for Zstd {
    fn content_encoding(&self) -> &'static str {
        "zstd"
    }

    fn encoder(&self, level: Level) -> Box<dyn EncodeV2 + Send> {
        let level = match level {
            Level::Fastest => 1,
            Level::Best => 19,
            Level::Precise(n) => n,
            _ => 3,
        };
        Box::new(ZstdEncoder::new(level))
    }
}

/// Brotli request compression.
///
/// The compression level is not applied; the encoder runs with its default
/// parameters.
#[cfg(feature = "brotli")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Brotli;

#[cfg(feature = "brotli")]
impl Encoding for Brotli {
    fn content_encoding(&self) -> &'static str {
        "br"
    }

    fn encoder(&self, _level: Level) -> Box<dyn EncodeV2 + Send> {
        Box::new(BrotliEncoder::new(BrotliParams::default()))
    }
}

/// Supported compression codecs, selectable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    /// Gzip compression.
    #[cfg(feature = "gzip")]
    Gzip,
    /// Deflate compression.
    #[cfg(feature = "deflate")]
    Deflate,
    /// Zstd compression.
    #[cfg(feature = "zstd")]
    Zstd,
    /// Brotli compression.
    #[cfg(feature = "brotli")]
    Brotli,
}

impl Encoding for Codec {
    fn content_encoding(&self) -> &'static str {
        match *self {
            #[cfg(feature = "gzip")]
            Codec::Gzip => Gzip.content_encoding(),
            #[cfg(feature = "deflate")]
            Codec::Deflate => Deflate.content_encoding(),
            #[cfg(feature = "zstd")]
            Codec::Zstd => Zstd.content_encoding(),
            #[cfg(feature = "brotli")]
            Codec::Brotli => Brotli.content_encoding(),
        }
    }

    fn encoder(&self, level: Level) -> Box<dyn EncodeV2 + Send> {
        match *self {
            #[cfg(feature = "gzip")]
            Codec::Gzip => Gzip.encoder(level),
            #[cfg(feature = "deflate")]
            Codec::Deflate => Deflate.encoder(level),
            #[cfg(feature = "zstd")]
            Codec::Zstd => Zstd.encoder(level),
            #[cfg(feature = "brotli")]
            Codec::Brotli => Brotli.encoder(level),
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.content_encoding())
    }
}

impl FromStr for Codec {
    type Err = crate::error::UnknownEncoding;

    /// Parses a content-coding token such as `gzip` or `br`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        match token.as_str() {
            #[cfg(feature = "gzip")]
            "gzip" | "x-gzip" => Ok(Codec::Gzip),
            #[cfg(feature = "deflate")]
            "deflate" => Ok(Codec::Deflate),
            #[cfg(feature = "zstd")]
            "zstd" => Ok(Codec::Zstd),
            #[cfg(feature = "brotli")]
            "br" | "brotli" => Ok(Codec::Brotli),
            _ => Err(crate::error::UnknownEncoding::new(s)),
        }
    }
}
