// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Waypoint
//!
//! Transport-agnostic RPC endpoints, layered middleware and HTTP/JSON bindings.
//!
//! A service built with this crate is assembled from three pieces:
//!
//! - **Middleware**: decorators that implement the same business trait as the thing they
//!   wrap. They are produced by a [`Layer`] and composed with [`Stack`], outer to inner.
//! - **Endpoints**: one [`Endpoint`] per operation, typed by its exact request and
//!   response. An endpoint turns a decoded request into a response and reports only
//!   internal failures through [`EndpointError`]; business outcomes travel as data inside
//!   the response.
//! - **Transport bindings**: an [`http::HttpBinding`] decodes the wire request, invokes the
//!   endpoint and encodes the response. Bindings are mounted on an [`axum::Router`] that
//!   [`http::serve`] drives.
//!
//! ## Quick Start
//!
//! ```
//! use waypoint::{Context, Endpoint, EndpointError, EndpointFn};
//!
//! # async fn example() -> Result<(), EndpointError> {
//! let double = EndpointFn::new(|_ctx: Context, value: i64| async move { Ok::<_, EndpointError>(value * 2) });
//!
//! assert_eq!(double.call(Context::new(), 21).await?, 42);
//! # Ok(())
//! # }
//! ```
//!
//! ## Composing middleware
//!
//! ```
//! use waypoint::{Layer, Stack};
//!
//! struct Tag(&'static str);
//!
//! impl Layer<String> for Tag {
//!     type Service = String;
//!
//!     fn layer(&self, inner: String) -> Self::Service {
//!         format!("{}({inner})", self.0)
//!     }
//! }
//!
//! // The first element is the outermost layer.
//! let built = (Tag("outer"), Tag("inner"), "core".to_string()).build();
//! assert_eq!(built, "outer(inner(core))");
//! ```
//!
//! ## Thread Safety
//!
//! Endpoints and handlers must be [`Send`] and [`Sync`] and their futures [`Send`], so a
//! single instance can serve any number of concurrent requests on a multi-threaded runtime.

mod context;
pub use context::Context;

mod endpoint;
pub use endpoint::{Endpoint, EndpointFn};

mod error;
pub use error::{EndpointError, TransportError};

mod layer;
pub use layer::{Layer, Stack};

pub mod http;
