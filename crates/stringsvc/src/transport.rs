// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::Arc;

use axum::Router;
use futures::future::ready;
use http::StatusCode;
use prometheus::{Encoder, Registry, TextEncoder};
use waypoint::http::{HttpBinding, HttpResponse, get, post, router, text_response};

use crate::{StringService, make_count_endpoint, make_uppercase_endpoint};

/// Route of the uppercase operation.
pub const UPPERCASE_PATH: &str = "/uppercase";

/// Route of the count operation.
pub const COUNT_PATH: &str = "/count";

/// Route of the Prometheus scrape.
pub const METRICS_PATH: &str = "/metrics";

/// Builds the route table: `POST /uppercase`, `POST /count` and `GET /metrics`.
///
/// Both operations are served by the same `service`; `/metrics` exposes everything
/// registered in `registry`. Unknown paths get a JSON 404 and a wrong method a JSON 405
/// naming the allowed one.
pub fn make_router<S: StringService + 'static>(service: Arc<S>, registry: Registry) -> Router {
    router()
        .route(
            UPPERCASE_PATH,
            post(HttpBinding::json(make_uppercase_endpoint(Arc::clone(&service)))),
        )
        .route(COUNT_PATH, post(HttpBinding::json(make_count_endpoint(service))))
        .route(METRICS_PATH, get(move || ready(metrics_response(&registry))))
}

fn metrics_response(registry: &Registry) -> HttpResponse {
    let mut body = Vec::new();

    match TextEncoder::new().encode(&registry.gather(), &mut body) {
        Ok(()) => text_response(prometheus::TEXT_FORMAT, body),
        Err(error) => {
            tracing::warn!(error = %error, "metrics.encode_failed");

            let mut response = text_response("text/plain; charset=utf-8", error.to_string());
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    }
}
