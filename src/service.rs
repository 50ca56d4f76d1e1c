use crate::codec::Encoding;
use crate::error::Error;
use crate::future::ResponseFuture;
use bytes::{Bytes, BytesMut};
use compression_core::Level;
use http::{HeaderValue, Request, header};
use http_body::Body;
use http_body_util::{BodyExt, Full};
use std::future::Future;
use std::io::Write;
use std::task::{Context, Poll};
use tokio_util::sync::CancellationToken;
use tower::{BoxError, Service};

/// Bytes handed to the encoder between cancellation checks.
const WRITE_CHUNK_SIZE: usize = 64 * 1024;

/// A Tower service that compresses HTTP request bodies before passing the
/// request on to the inner service.
///
/// The whole body is buffered in memory and compressed in one pass; this
/// service does not stream.
///
/// If the request's extensions contain a [`CancellationToken`], it is
/// observed while the body is read, while it is compressed, and while the
/// inner service runs. A cancelled request fails with
/// [`Error::Cancelled`] and is never handed to the inner service if the
/// cancellation is seen first.
#[derive(Debug, Clone)]
pub struct RequestCompression<S, E> {
    inner: S,
    encoding: E,
    level: Level,
}

impl<S, E> RequestCompression<S, E> {
    /// Creates a new compression service wrapping the given inner service.
    pub fn new(inner: S, encoding: E) -> Self {
        Self {
            inner,
            encoding,
            level: Level::Default,
        }
    }

    /// Sets the compression level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Returns the encoding applied to request bodies.
    pub fn encoding(&self) -> &E {
        &self.encoding
    }

    /// Returns a reference to the inner service.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Returns a mutable reference to the inner service.
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Consumes this service, returning the inner service.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, E, ReqBody> Service<Request<ReqBody>> for RequestCompression<S, E>
where
    S: Service<Request<Full<Bytes>>> + Clone + Send + 'static,
    S::Future: Send,
    S::Error: Into<BoxError>,
    E: Encoding + Clone + Send + Sync + 'static,
    ReqBody: Body + Send + 'static,
    ReqBody::Data: Send,
    ReqBody::Error: Into<BoxError>,
{
    type Response = S::Response;
    type Error = BoxError;
    type Future = ResponseFuture<S::Response>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // Call the service that was polled ready and leave the clone behind.
        let clone = self.inner.clone();
        let inner = std::mem::replace(&mut self.inner, clone);

        ResponseFuture::new(compress_and_call(
            inner,
            req,
            self.encoding.clone(),
            self.level,
        ))
    }
}

async fn compress_and_call<S, E, B>(
    mut inner: S,
    req: Request<B>,
    encoding: E,
    level: Level,
) -> Result<S::Response, BoxError>
where
    S: Service<Request<Full<Bytes>>>,
    S::Error: Into<BoxError>,
    E: Encoding,
    B: Body,
    B::Error: Into<BoxError>,
{
    let req = compress_request(req, &encoding, level).await?;
    let cancel = req.extensions().get::<CancellationToken>().cloned();

    // Errors from the inner service are passed on as they are
    cancellable(cancel.as_ref(), inner.call(req))
        .await?
        .map_err(Into::into)
}

/// Buffers and compresses the body of `req`, stamping the encoding headers.
async fn compress_request<B, E>(
    req: Request<B>,
    encoding: &E,
    level: Level,
) -> Result<Request<Full<Bytes>>, Error>
where
    B: Body,
    B::Error: Into<BoxError>,
    E: Encoding + ?Sized,
{
    let (mut parts, body) = req.into_parts();
    let cancel = parts.extensions.get::<CancellationToken>().cloned();
    let token = HeaderValue::from_static(encoding.content_encoding());

    // Add the codec to Accept-Encoding
    parts.headers.append(header::ACCEPT_ENCODING, token.clone());

    let raw = cancellable(cancel.as_ref(), body.collect())
        .await?
        .map_err(|e| Error::Body(e.into()))?
        .to_bytes();

    let mut writer = encoding.wrap(BytesMut::with_capacity(raw.len() / 2), level);
    for chunk in raw.chunks(WRITE_CHUNK_SIZE) {
        ensure_not_cancelled(cancel.as_ref())?;
        writer.write_all(chunk).map_err(Error::Compress)?;
    }
    ensure_not_cancelled(cancel.as_ref())?;
    let compressed = writer.finish().map_err(Error::Compress)?;

    tracing::debug!(
        encoding = encoding.content_encoding(),
        original_len = raw.len(),
        compressed_len = compressed.len(),
        "compressed request body"
    );

    parts.headers.insert(header::CONTENT_ENCODING, token);
    parts
        .headers
        .insert(header::CONTENT_LENGTH, HeaderValue::from(compressed.len()));
    parts.headers.remove(header::TRANSFER_ENCODING);

    Ok(Request::from_parts(parts, Full::new(compressed)))
}

/// Runs `fut` to completion unless `cancel` fires first.
async fn cancellable<F: Future>(
    cancel: Option<&CancellationToken>,
    fut: F,
) -> Result<F::Output, Error> {
    match cancel {
        Some(cancel) => cancel.run_until_cancelled(fut).await.ok_or(Error::Cancelled),
        None => Ok(fut.await),
    }
}

fn ensure_not_cancelled(cancel: Option<&CancellationToken>) -> Result<(), Error> {
    if cancel.is_some_and(CancellationToken::is_cancelled) {
        return Err(Error::Cancelled);
    }
    Ok(())
}
