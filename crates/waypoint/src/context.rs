// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::net::SocketAddr;

/// Per-request metadata passed unmodified through endpoints and middleware.
///
/// The transport creates one `Context` per inbound request. Everything downstream receives
/// it by value or by reference and may read it, but nothing in this crate rewrites it after
/// the route has been matched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct Context {
    route: Option<Cow<'static, str>>,
    peer_addr: Option<SocketAddr>,
}

impl Context {
    /// Creates an empty context, as used by direct (non-transport) callers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the route the request was matched against.
    #[must_use]
    pub fn with_route(self, route: impl Into<Cow<'static, str>>) -> Self {
        Self {
            route: Some(route.into()),
            ..self
        }
    }

    /// Sets the address of the remote peer.
    #[must_use]
    pub fn with_peer_addr(self, peer_addr: SocketAddr) -> Self {
        Self {
            peer_addr: Some(peer_addr),
            ..self
        }
    }

    /// The matched route, if the request came through a router.
    #[must_use]
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    /// The remote peer, if the request came over a socket.
    #[must_use]
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer_addr
    }
}
