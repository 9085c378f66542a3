// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A string service exposed over HTTP/JSON.
//!
//! The business logic lives in [`BasicService`], behind the [`StringService`] trait. Cross-cutting
//! behavior is added by decorators that implement the same trait and wrap another
//! implementation:
//!
//! - [`Logging`] emits one structured event per call;
//! - [`Instrumenting`] records Prometheus request counts, latencies and count results.
//!
//! The decorated service is adapted into transport-agnostic endpoints
//! ([`make_uppercase_endpoint`], [`make_count_endpoint`]), which [`make_router`] binds to HTTP
//! routes.
//!
//! ```
//! use prometheus::Registry;
//! use stringsvc::{MetricsConfig, StringService, build_service};
//! use tick::Clock;
//! use waypoint::Context;
//!
//! # fn example(clock: Clock) -> Result<(), stringsvc::Error> {
//! let registry = Registry::new();
//! let service = build_service(&registry, &MetricsConfig::default(), &clock)?;
//!
//! assert_eq!(service.uppercase(&Context::new(), "hello").as_deref(), Ok("HELLO"));
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use prometheus::Registry;
use tick::Clock;
use tokio::net::TcpListener;
use waypoint::Stack;
use waypoint::http::RetryingListener;

mod cli;
mod config;
mod endpoints;
mod error;
mod instrumenting;
mod logging;
mod metrics;
mod service;
mod subscriber;
mod transport;

pub use cli::{Args, CONFIG_ENV, LISTEN_ENV};
pub use config::{Config, LogConfig, MetricsConfig};
pub use endpoints::{
    CountEndpoint, CountRequest, CountResponse, UppercaseEndpoint, UppercaseRequest, UppercaseResponse, make_count_endpoint,
    make_uppercase_endpoint,
};
pub use error::{Error, ServiceError};
pub use instrumenting::{Instrumenting, InstrumentingLayer};
pub use logging::{Logging, LoggingLayer};
pub use service::{BasicService, StringService};
pub use subscriber::install_subscriber;
pub use transport::{COUNT_PATH, METRICS_PATH, UPPERCASE_PATH, make_router};

/// The fully decorated service the process serves.
pub type DecoratedService = Instrumenting<Logging<BasicService>>;

/// Composes the decorator chain around [`BasicService`].
///
/// Instrumenting is the outermost link, so the recorded latency includes logging; Logging
/// wraps the business logic directly.
///
/// # Errors
///
/// Returns [`Error::Metrics`] when the collectors cannot be registered with `registry`.
pub fn build_service(registry: &Registry, metrics: &MetricsConfig, clock: &Clock) -> Result<DecoratedService, Error> {
    let instrumenting = InstrumentingLayer::new(registry, &metrics.namespace, &metrics.subsystem, clock.clone())?;

    Ok((instrumenting, LoggingLayer::new(clock.clone()), BasicService).build())
}

/// Binds `config.listen` and serves requests until `shutdown` completes.
///
/// Must be called from within a Tokio runtime.
///
/// # Errors
///
/// Returns an error when the metrics cannot be registered, the address cannot be bound or
/// the server cannot be driven. Failed accepts are retried and never end the server.
pub async fn run<F>(config: Config, shutdown: F) -> Result<(), Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let clock = Clock::new_tokio();
    let registry = Registry::new();
    let service = build_service(&registry, &config.metrics, &clock)?;
    let router = make_router(Arc::new(service), registry);

    let listener = TcpListener::bind(config.listen).await.map_err(|source| Error::Bind {
        addr: config.listen,
        source,
    })?;

    waypoint::http::serve(RetryingListener::new(listener), router, shutdown)
        .await
        .map_err(Error::Serve)
}
