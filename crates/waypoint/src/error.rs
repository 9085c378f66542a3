// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use http::{Method, StatusCode};
use thiserror::Error;

/// A failure of the endpoint itself, as opposed to a business outcome.
///
/// Business errors are returned inside the endpoint's response value. An `EndpointError`
/// means the endpoint could not produce any response and is reported to the caller as a
/// transport failure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EndpointError {
    /// The endpoint received something its contract does not allow.
    #[error("endpoint contract violation: {0}")]
    ContractViolation(String),

    /// Any other internal failure.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// A failure at the transport boundary.
///
/// Every variant maps to a non-2xx HTTP status through [`TransportError::status`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// No route is registered for the requested path.
    #[error("no route for {path}")]
    NotFound {
        /// The requested path.
        path: String,
    },

    /// A route exists for the path but not for the requested method.
    #[error("method {method} is not allowed, use {allow}")]
    MethodNotAllowed {
        /// The method of the rejected request.
        method: Method,
        /// The method the route accepts.
        allow: Method,
    },

    /// The request body could not be read.
    #[error("failed to read request body: {0}")]
    Body(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The request body exceeds the configured limit.
    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge {
        /// The limit in bytes.
        limit: usize,
    },

    /// The request carried no body where one is required.
    #[error("request body is empty")]
    EmptyBody,

    /// The request body is not a valid request for the route.
    #[error("failed to decode request: {0}")]
    Decode(#[source] serde_json::Error),

    /// The response could not be serialized.
    #[error("failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),

    /// The endpoint failed internally.
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

impl TransportError {
    /// The HTTP status reported for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::Body(_) | Self::EmptyBody | Self::Decode(_) => StatusCode::BAD_REQUEST,
            Self::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Encode(_) | Self::Endpoint(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
