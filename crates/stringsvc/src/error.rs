// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

/// A business failure of a [`StringService`](crate::StringService) operation.
///
/// Business failures are part of a successful response: the endpoints embed the display
/// text in the response body instead of failing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ServiceError {
    /// The input string was empty.
    #[error("empty string")]
    EmptyInput,
}

/// A failure that prevents the process from starting or keeps it from serving.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {}", path.display())]
    ReadConfig {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The configuration document is not valid.
    #[error("invalid configuration")]
    ParseConfig(#[source] serde_json::Error),

    /// The log filter directive could not be parsed.
    #[error("invalid log filter {filter:?}")]
    LogFilter {
        /// The rejected directive.
        filter: String,
        /// Parse failure.
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    /// A global tracing subscriber was already installed.
    #[error("failed to install the log subscriber")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Collectors could not be registered, typically because of a name clash.
    #[error("failed to register metrics")]
    Metrics(#[from] prometheus::Error),

    /// The listen socket could not be bound.
    #[error("failed to bind {addr}")]
    Bind {
        /// Address that was requested.
        addr: SocketAddr,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The HTTP server could not be driven.
    #[error("server failed")]
    Serve(#[source] io::Error),
}
