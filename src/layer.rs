use crate::service::RequestCompression;
use compression_core::Level;
use tower::Layer;

/// A Tower layer that compresses HTTP request bodies.
///
/// The layer is placed in front of the service that sends requests, usually
/// the transport:
///
/// ```ignore
/// let client = ServiceBuilder::new()
///     .layer(RequestCompressionLayer::gzip())
///     .service(transport);
/// ```
#[derive(Debug, Clone)]
pub struct RequestCompressionLayer<E> {
    encoding: E,
    level: Level,
}

impl<E> RequestCompressionLayer<E> {
    /// Creates a new compression layer using the given encoding.
    ///
    /// The default compression level is [`Level::Default`].
    pub fn new(encoding: E) -> Self {
        Self {
            encoding,
            level: Level::Default,
        }
    }

    /// Sets the compression level.
    ///
    /// Levels are applied to gzip, deflate and zstd. Brotli always uses its
    /// default parameters.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }
}

#[cfg(feature = "gzip")]
impl RequestCompressionLayer<crate::codec::Gzip> {
    /// Creates a layer that gzip-compresses request bodies.
    pub fn gzip() -> Self {
        Self::new(crate::codec::Gzip)
    }
}

#[cfg(feature = "deflate")]
impl RequestCompressionLayer<crate::codec::Deflate> {
    /// Creates a layer that deflate-compresses request bodies.
    pub fn deflate() -> Self {
        Self::new(crate::codec::Deflate)
    }
}

impl<S, E: Clone> Layer<S> for RequestCompressionLayer<E> {
    type Service = RequestCompression<S, E>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestCompression::new(inner, self.encoding.clone()).with_level(self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{Request, header};
    use http_body_util::{BodyExt, Full};
    use std::convert::Infallible;
    use std::io::Read;
    use tower::{ServiceBuilder, ServiceExt, service_fn};

    #[tokio::test]
    #[cfg(feature = "deflate")]
    async fn test_layer_in_service_builder() {
        let transport = service_fn(|req: Request<Full<Bytes>>| async move {
            Ok::<_, Infallible>(req)
        });
        let client = ServiceBuilder::new()
            .layer(RequestCompressionLayer::deflate().level(Level::Best))
            .service(transport);

        let input = "the quick brown fox ".repeat(100);
        let req = Request::post("http://example.com/")
            .body(Full::new(Bytes::from(input.clone())))
            .unwrap();
        let sent = client.oneshot(req).await.unwrap();

        assert_eq!(
            sent.headers().get(header::CONTENT_ENCODING).unwrap(),
            "deflate"
        );
        let body = sent.into_body().collect().await.unwrap().to_bytes();
        let mut decoded = String::new();
        flate2::read::DeflateDecoder::new(&body[..])
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, input);
    }

    #[test]
    #[cfg(feature = "gzip")]
    fn test_layer_keeps_encoding() {
        let service = RequestCompressionLayer::gzip().layer(());
        assert_eq!(*service.encoding(), crate::codec::Gzip);
    }

    #[tokio::test]
    #[cfg(feature = "gzip")]
    async fn test_runtime_codec_layer() {
        let codec: crate::Codec = "gzip".parse().unwrap();
        let transport = service_fn(|req: Request<Full<Bytes>>| async move {
            Ok::<_, Infallible>(req)
        });
        let client = RequestCompressionLayer::new(codec).layer(transport);

        let req = Request::post("http://example.com/")
            .body(Full::new(Bytes::from_static(b"payload")))
            .unwrap();
        let sent = client.oneshot(req).await.unwrap();
        assert_eq!(sent.headers().get(header::CONTENT_ENCODING).unwrap(), "gzip");
    }
}
