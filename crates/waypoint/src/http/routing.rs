// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::future::{Ready, ready};

use axum::extract::{MatchedPath, Request};
use axum::handler::Handler;
use axum::routing::MethodRouter;
use http::{Method, Uri};

use super::HttpResponse;
use super::json::error_response;
use crate::TransportError;

/// Creates an [`axum::Router`] whose unmatched paths are answered by [`not_found`].
#[must_use]
pub fn router<S>() -> axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    axum::Router::new().fallback(not_found)
}

/// Routes `POST` requests to `handler`; any other method gets a JSON 405 with `Allow: POST`.
pub fn post<H, T, S>(handler: H) -> MethodRouter<S>
where
    H: Handler<T, S>,
    T: 'static,
    S: Clone + Send + Sync + 'static,
{
    only(axum::routing::post(handler), Method::POST)
}

/// Routes `GET` (and `HEAD`) requests to `handler`; any other method gets a JSON 405 with
/// `Allow: GET`.
pub fn get<H, T, S>(handler: H) -> MethodRouter<S>
where
    H: Handler<T, S>,
    T: 'static,
    S: Clone + Send + Sync + 'static,
{
    only(axum::routing::get(handler), Method::GET)
}

/// Answers a request for a path without a route with a JSON 404.
#[expect(clippy::needless_pass_by_value, reason = "axum extracts handler arguments by value")]
pub fn not_found(uri: Uri) -> Ready<HttpResponse> {
    let path = uri.path();

    ready(reject(path, &TransportError::NotFound { path: path.to_owned() }))
}

fn only<S>(route: MethodRouter<S>, allow: Method) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.fallback(move |request: Request| {
        let route = request
            .extensions()
            .get::<MatchedPath>()
            .map_or_else(|| request.uri().path().to_owned(), |path| path.as_str().to_owned());
        let error = TransportError::MethodNotAllowed {
            method: request.method().clone(),
            allow: allow.clone(),
        };

        ready(reject(&route, &error))
    })
}

/// Logs a rejected request by route and renders the error.
///
/// Only the route template is logged, never the request body.
pub(super) fn reject(route: &str, error: &TransportError) -> HttpResponse {
    tracing::debug!(route = %route, status = error.status().as_u16(), error = %error, "transport.rejected");

    error_response(error)
}
