// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::{Context, EndpointError};

/// A single RPC-style operation: `(Context, Req) → Result<Response, EndpointError>`.
///
/// The request and response types are fixed by the implementation, so a transport binding
/// can only ever hand an endpoint the request shape it was built for. There is no opaque
/// request type and no runtime narrowing.
///
/// `Err` is reserved for failures of the endpoint itself. Expected business outcomes, such
/// as rejected input, belong inside `Self::Response` so that they reach the caller as a
/// normal, successful reply.
///
/// # Examples
///
/// ```
/// use waypoint::{Context, Endpoint, EndpointError};
///
/// struct Length;
///
/// impl Endpoint<String> for Length {
///     type Response = usize;
///
///     async fn call(&self, _ctx: Context, request: String) -> Result<usize, EndpointError> {
///         Ok(request.len())
///     }
/// }
/// ```
pub trait Endpoint<Req>: Send + Sync {
    /// The response produced for a successfully handled request.
    type Response;

    /// Handles one request.
    ///
    /// The returned future must be [`Send`] so that endpoints can run on multi-threaded
    /// runtimes.
    fn call(&self, ctx: Context, request: Req) -> impl Future<Output = Result<Self::Response, EndpointError>> + Send;
}

impl<E, Req> Endpoint<Req> for Box<E>
where
    E: Endpoint<Req>,
{
    type Response = E::Response;

    fn call(&self, ctx: Context, request: Req) -> impl Future<Output = Result<Self::Response, EndpointError>> + Send {
        (**self).call(ctx, request)
    }
}

impl<E, Req> Endpoint<Req> for Arc<E>
where
    E: Endpoint<Req>,
{
    type Response = E::Response;

    fn call(&self, ctx: Context, request: Req) -> impl Future<Output = Result<Self::Response, EndpointError>> + Send {
        (**self).call(ctx, request)
    }
}

/// An [`Endpoint`] backed by a function or closure.
///
/// # Examples
///
/// ```
/// use waypoint::{Context, Endpoint, EndpointFn};
///
/// # async fn example() {
/// let echo = EndpointFn::new(|_ctx: Context, text: String| async move { Ok::<_, waypoint::EndpointError>(text) });
///
/// assert_eq!(echo.call(Context::new(), "hi".to_string()).await.unwrap(), "hi");
/// # }
/// ```
#[derive(Clone)]
pub struct EndpointFn<F>(F);

impl<F> EndpointFn<F> {
    /// Wraps `f` so it can be used wherever an [`Endpoint`] is expected.
    #[must_use]
    pub fn new<Req, Resp, Fut>(f: F) -> Self
    where
        F: Fn(Context, Req) -> Fut + Send + Sync,
        Fut: Future<Output = Result<Resp, EndpointError>> + Send,
    {
        Self(f)
    }
}

impl<F, Fut, Req, Resp> Endpoint<Req> for EndpointFn<F>
where
    F: Fn(Context, Req) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Resp, EndpointError>> + Send,
{
    type Response = Resp;

    fn call(&self, ctx: Context, request: Req) -> impl Future<Output = Result<Self::Response, EndpointError>> + Send {
        (self.0)(ctx, request)
    }
}

impl<F> Debug for EndpointFn<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointFn").finish_non_exhaustive()
    }
}
