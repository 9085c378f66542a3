// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use axum::serve::{Listener, ListenerExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};

const INITIAL_BACKOFF: Duration = Duration::from_millis(5);
const MAX_BACKOFF: Duration = Duration::from_secs(1);

/// A source of inbound connections whose `accept` may fail.
///
/// Implemented for [`TcpListener`]. [`RetryingListener`] turns any implementation into an
/// [`axum::serve::Listener`].
pub trait Accept: Send + 'static {
    /// The connection stream.
    type Io: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    /// Waits for the next connection.
    fn accept(&mut self) -> impl Future<Output = io::Result<(Self::Io, SocketAddr)>> + Send;

    /// The address connections are accepted on.
    ///
    /// # Errors
    ///
    /// Returns the error reported by the underlying socket.
    fn local_addr(&self) -> io::Result<SocketAddr>;
}

impl Accept for TcpListener {
    type Io = TcpStream;

    async fn accept(&mut self) -> io::Result<(TcpStream, SocketAddr)> {
        Self::accept(self).await
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        Self::local_addr(self)
    }
}

/// Keeps accepting after failed `accept` calls.
///
/// Each failure is logged at warn level and followed by a pause that starts at 5ms and
/// doubles up to one second. The pause resets once a connection is accepted. Running out
/// of file descriptors therefore slows the server down instead of stopping it.
#[derive(Debug)]
pub struct RetryingListener<A> {
    inner: A,
    initial_backoff: Duration,
}

impl<A> RetryingListener<A> {
    /// Wraps `inner` with the default backoff.
    #[must_use]
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            initial_backoff: INITIAL_BACKOFF,
        }
    }

    /// Sets the first pause after a failed `accept`.
    #[must_use]
    pub fn initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }
}

impl<A: Accept> Listener for RetryingListener<A> {
    type Io = A::Io;
    type Addr = SocketAddr;

    async fn accept(&mut self) -> (Self::Io, SocketAddr) {
        let mut backoff = self.initial_backoff;

        loop {
            match self.inner.accept().await {
                Ok(connection) => return connection,
                Err(error) => {
                    tracing::warn!(error = %error, backoff = ?backoff, "server.accept_failed");
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
            }
        }
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner.local_addr()
    }
}

/// Serves `router` on `listener` until `shutdown` completes.
///
/// Every request carries its peer address as [`ConnectInfo`](axum::extract::ConnectInfo),
/// which [`HttpBinding`](super::HttpBinding) copies into the request
/// [`Context`](crate::Context). Failed accepts are retried by the listener and never end
/// the server. Once `shutdown` resolves no new connections are accepted and the call
/// returns after in-flight connections finish.
///
/// # Errors
///
/// Returns an I/O error if the server cannot be driven.
pub async fn serve<A, F>(listener: RetryingListener<A>, router: axum::Router, shutdown: F) -> io::Result<()>
where
    A: Accept,
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(local_addr) = listener.local_addr() {
        tracing::info!(addr = %local_addr, "server.listening");
    }

    // `ConnectInfo<SocketAddr>` is only implemented for `TcpListener` and `TapIo`; the no-op
    // tap lets a custom listener provide it.
    let listener = listener.tap_io(|_io: &mut A::Io| {});

    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(async move {
            shutdown.await;
            tracing::info!("server.shutdown");
        })
        .await
}
