// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;

/// Shared log capture buffer for testing.
///
/// Formatted `tracing` output is appended to an in-memory buffer that tests can inspect.
/// Install it for the current thread with `tracing::subscriber::set_default(capture.subscriber())`,
/// or hand it to code under test as a [`tracing::Dispatch`] via [`LogCapture::dispatch`].
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Creates an empty capture. Nothing is recorded until [`subscriber`](Self::subscriber) or
    /// [`dispatch`](Self::dispatch) is installed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the captured log output as a string.
    #[must_use]
    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap_or_else(PoisonError::into_inner)).into_owned()
    }

    /// Returns the captured lines that contain `needle`.
    #[must_use]
    pub fn lines_containing(&self, needle: &str) -> Vec<String> {
        self.output()
            .lines()
            .filter(|line| line.contains(needle))
            .map(str::to_owned)
            .collect()
    }

    /// Asserts that the captured log output contains the given string.
    ///
    /// # Panics
    ///
    /// Panics if the captured log output does not contain the expected string.
    pub fn assert_contains(&self, expected: &str) {
        let output = self.output();
        assert!(
            output.contains(expected),
            "log output does not contain '{expected}', got:\n{output}"
        );
    }

    /// Asserts that the captured log output does not contain the given string.
    ///
    /// # Panics
    ///
    /// Panics if the captured log output contains the string.
    pub fn assert_not_contains(&self, unexpected: &str) {
        let output = self.output();
        assert!(
            !output.contains(unexpected),
            "log output unexpectedly contains '{unexpected}', got:\n{output}"
        );
    }

    /// Creates a `tracing_subscriber` that writes every level to this capture buffer.
    /// Use with `set_default()` for thread-local capture.
    #[must_use]
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
        tracing_subscriber::registry().with(tracing_subscriber::fmt::layer().with_writer(self.clone()).with_ansi(false))
    }

    /// Same as [`LogCapture::subscriber`], wrapped for injection into code that accepts a dispatcher.
    #[must_use]
    pub fn dispatch(&self) -> tracing::Dispatch {
        tracing::Dispatch::new(self.subscriber())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogCaptureWriter {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

/// Writer that appends to a shared buffer.
#[derive(Debug)]
pub struct LogCaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for LogCaptureWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_events_of_every_level() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());

        tracing::debug!(answer = 42, "probe.debug");
        tracing::info!(kind = "x", "probe.info");

        capture.assert_contains("probe.debug");
        capture.assert_contains("answer=42");
        capture.assert_contains("kind=\"x\"");
        capture.assert_not_contains("probe.warn");
        assert_eq!(capture.lines_containing("probe.").len(), 2);
    }

    #[test]
    fn dispatch_writes_to_same_buffer() {
        let capture = LogCapture::new();
        let dispatch = capture.dispatch();

        tracing::dispatcher::with_default(&dispatch, || tracing::info!("probe.dispatch"));

        capture.assert_contains("probe.dispatch");
    }
}
