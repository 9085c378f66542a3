// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{ConnectInfo, MatchedPath, Request};
use bytes::Bytes;
use futures::future::BoxFuture;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::json::{decode_json_request, encode_json_response};
use super::{HttpRequest, HttpResponse, reject};
use crate::{Context, Endpoint, TransportError};

/// Largest request body a binding reads unless told otherwise.
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Decoder used by [`HttpBinding::json`].
pub type JsonDecoder<Req> = fn(&Context, &HttpRequest) -> Result<Req, TransportError>;

/// Encoder used by [`HttpBinding::json`].
pub type JsonEncoder<Resp> = fn(&Context, Resp) -> Result<HttpResponse, TransportError>;

/// Connects one [`Endpoint`] to HTTP: decode, invoke, encode.
///
/// A decode failure is answered with a 4xx response and the endpoint is never called.
/// When the endpoint returns `Ok`, the encoded response is sent as-is, whatever business
/// outcome it carries. An endpoint `Err` becomes a 5xx response.
///
/// A binding is an [`axum::handler::Handler`], so it is mounted like any other handler,
/// usually through [`post`](super::post). The handler builds the request [`Context`] from
/// the matched route and the peer address, and reads at most
/// [`body_limit`](Self::body_limit) bytes of body before decoding.
///
/// # Examples
///
/// ```
/// use waypoint::http::{HttpBinding, post, router};
/// use waypoint::{Context, EndpointError, EndpointFn};
///
/// let length = EndpointFn::new(|_ctx: Context, text: String| async move { Ok::<_, EndpointError>(text.len()) });
/// let app: axum::Router = router().route("/length", post(HttpBinding::json(length)));
/// # let _ = app;
/// ```
pub struct HttpBinding<Req, E, Dec, Enc> {
    inner: Arc<Codec<E, Dec, Enc>>,
    body_limit: usize,
    _request: PhantomData<fn() -> Req>,
}

struct Codec<E, Dec, Enc> {
    endpoint: E,
    decode: Dec,
    encode: Enc,
}

impl<Req, E, Dec, Enc> HttpBinding<Req, E, Dec, Enc>
where
    E: Endpoint<Req>,
    Dec: Fn(&Context, &HttpRequest) -> Result<Req, TransportError> + Send + Sync,
    Enc: Fn(&Context, E::Response) -> Result<HttpResponse, TransportError> + Send + Sync,
{
    /// Creates a binding with custom request decoding and response encoding.
    #[must_use]
    pub fn new(endpoint: E, decode: Dec, encode: Enc) -> Self {
        Self {
            inner: Arc::new(Codec { endpoint, decode, encode }),
            body_limit: DEFAULT_BODY_LIMIT,
            _request: PhantomData,
        }
    }
}

impl<Req, E> HttpBinding<Req, E, JsonDecoder<Req>, JsonEncoder<E::Response>>
where
    E: Endpoint<Req>,
    Req: DeserializeOwned,
    E::Response: Serialize,
{
    /// Creates a binding that reads the request body as JSON and writes the response as JSON.
    #[must_use]
    pub fn json(endpoint: E) -> Self {
        Self::new(endpoint, decode_json_request::<Req>, encode_json_response::<E::Response>)
    }
}

impl<Req, E, Dec, Enc> HttpBinding<Req, E, Dec, Enc> {
    /// Caps the number of body bytes read per request.
    ///
    /// Larger bodies are answered with `413 Payload Too Large` and never decoded.
    #[must_use]
    pub fn body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }
}

impl<Req, E, Dec, Enc> HttpBinding<Req, E, Dec, Enc>
where
    E: Endpoint<Req>,
    Dec: Fn(&Context, &HttpRequest) -> Result<Req, TransportError> + Send + Sync,
    Enc: Fn(&Context, E::Response) -> Result<HttpResponse, TransportError> + Send + Sync,
{
    /// Runs decode, invoke and encode for a request whose body is already in memory.
    ///
    /// Failures are logged and rendered with [`error_response`](super::error_response).
    pub async fn handle(&self, ctx: Context, request: HttpRequest) -> HttpResponse {
        let route = ctx.route().unwrap_or_default().to_owned();

        match self.invoke(ctx, request).await {
            Ok(response) => response,
            Err(error) => reject(&route, &error),
        }
    }

    async fn invoke(&self, ctx: Context, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let codec = &*self.inner;
        let decoded = (codec.decode)(&ctx, &request)?;
        let response = codec.endpoint.call(ctx.clone(), decoded).await?;

        (codec.encode)(&ctx, response)
    }
}

mod private {
    #[derive(Debug)]
    pub enum Binding {}
}

impl<Req, E, Dec, Enc, S> axum::handler::Handler<private::Binding, S> for HttpBinding<Req, E, Dec, Enc>
where
    Req: Send + 'static,
    E: Endpoint<Req> + 'static,
    E::Response: Send + 'static,
    Dec: Fn(&Context, &HttpRequest) -> Result<Req, TransportError> + Send + Sync + 'static,
    Enc: Fn(&Context, E::Response) -> Result<HttpResponse, TransportError> + Send + Sync + 'static,
{
    type Future = BoxFuture<'static, HttpResponse>;

    fn call(self, request: Request, _state: S) -> Self::Future {
        Box::pin(async move {
            let ctx = context_of(&request);
            let (parts, body) = request.into_parts();

            match read_body(body, self.body_limit).await {
                Ok(bytes) => self.handle(ctx, HttpRequest::from_parts(parts, bytes)).await,
                Err(error) => reject(ctx.route().unwrap_or_default(), &error),
            }
        })
    }
}

impl<Req, E, Dec, Enc> Clone for HttpBinding<Req, E, Dec, Enc> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            body_limit: self.body_limit,
            _request: PhantomData,
        }
    }
}

impl<Req, E, Dec, Enc> Debug for HttpBinding<Req, E, Dec, Enc> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBinding")
            .field("body_limit", &self.body_limit)
            .finish_non_exhaustive()
    }
}

fn context_of(request: &Request) -> Context {
    let mut ctx = Context::new();

    if let Some(path) = request.extensions().get::<MatchedPath>() {
        ctx = ctx.with_route(path.as_str().to_owned());
    }
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        ctx = ctx.with_peer_addr(*addr);
    }

    ctx
}

async fn read_body(body: Body, limit: usize) -> Result<Bytes, TransportError> {
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(error) if error.is::<LengthLimitError>() => Err(TransportError::BodyTooLarge { limit }),
        Err(error) => Err(TransportError::Body(error)),
    }
}
