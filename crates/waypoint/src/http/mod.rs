// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! HTTP/JSON realization of the transport layer, built on [`axum`].
//!
//! A [`HttpBinding`] ties one [`Endpoint`](crate::Endpoint) to a request decoder and a
//! response encoder and is mounted on an [`axum::Router`] like any other handler. The
//! [`router`], [`post`] and [`get`] helpers answer unknown paths and wrong methods with the
//! same JSON error bodies the bindings use. [`serve`] drives the router from a listener.
//!
//! ```no_run
//! use waypoint::http::{HttpBinding, RetryingListener, post, router, serve};
//! use waypoint::{Context, EndpointError, EndpointFn};
//!
//! # async fn example() -> std::io::Result<()> {
//! let echo = EndpointFn::new(|_ctx: Context, body: serde_json::Value| async move { Ok::<_, EndpointError>(body) });
//!
//! let app = router().route("/echo", post(HttpBinding::json(echo)));
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! serve(RetryingListener::new(listener), app, std::future::pending()).await
//! # }
//! ```

use bytes::Bytes;

mod binding;
mod json;
mod routing;
mod server;

pub use binding::{DEFAULT_BODY_LIMIT, HttpBinding, JsonDecoder, JsonEncoder};
pub use json::{decode_json_request, encode_json_response, error_response, text_response};
use routing::reject;
pub use routing::{get, not_found, post, router};
pub use server::{Accept, RetryingListener, serve};

/// A request whose body has already been read into memory.
pub type HttpRequest = http::Request<Bytes>;

/// The response type produced by every handler.
pub type HttpResponse = axum::response::Response;
