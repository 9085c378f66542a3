// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use tick::Clock;
use tracing::{Dispatch, Level};
use waypoint::{Context, Layer};

use crate::{ServiceError, StringService};

/// Name of the event emitted once per call.
pub(crate) const REQUEST_EVENT_NAME: &str = "stringsvc.request";

/// Creates [`Logging`] decorators.
///
/// Each call through the decorator emits exactly one `INFO` event once the inner service
/// has returned. The event carries the method name, the input, the result and the time the
/// inner call took. Uppercase events also carry `err`, which is `None` on success.
///
/// Events go to the injected [`Dispatch`] when one is set, and to the ambient subscriber
/// otherwise.
///
/// # Examples
///
/// ```
/// use stringsvc::{BasicService, LoggingLayer, StringService};
/// use tick::Clock;
/// use waypoint::{Context, Stack};
///
/// # fn example(clock: Clock) {
/// let service = (LoggingLayer::new(clock), BasicService).build();
///
/// assert_eq!(service.count(&Context::new(), "abc"), 3);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LoggingLayer {
    clock: Clock,
    dispatch: Option<Dispatch>,
}

impl LoggingLayer {
    /// Creates a layer that times calls with `clock`.
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self { clock, dispatch: None }
    }

    /// Sends events to `dispatch` instead of the ambient subscriber.
    #[must_use]
    pub fn dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            clock: self.clock.clone(),
            dispatch: self.dispatch.clone(),
        }
    }
}

/// A [`StringService`] decorator that logs every call. Built by [`LoggingLayer`].
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    clock: Clock,
    dispatch: Option<Dispatch>,
}

impl<S> Logging<S> {
    fn emit(&self, event: impl FnOnce()) {
        match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, event),
            None => event(),
        }
    }
}

impl<S: StringService> StringService for Logging<S> {
    fn uppercase(&self, ctx: &Context, s: &str) -> Result<String, ServiceError> {
        let stopwatch = self.clock.stopwatch();
        let result = self.inner.uppercase(ctx, s);
        let took = stopwatch.elapsed();

        let (output, err) = match &result {
            Ok(output) => (output.as_str(), None),
            Err(error) => ("", Some(error.to_string())),
        };

        self.emit(|| {
            tracing::event!(
                name: REQUEST_EVENT_NAME,
                Level::INFO,
                method = "uppercase",
                input = s,
                output = output,
                err = ?err,
                took = ?took,
            );
        });

        result
    }

    fn count(&self, ctx: &Context, s: &str) -> usize {
        let stopwatch = self.clock.stopwatch();
        let n = self.inner.count(ctx, s);
        let took = stopwatch.elapsed();

        self.emit(|| {
            tracing::event!(
                name: REQUEST_EVENT_NAME,
                Level::INFO,
                method = "count",
                input = s,
                n = n,
                took = ?took,
            );
        });

        n
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use testing_aids::LogCapture;
    use tick::ClockControl;
    use waypoint::Stack;

    use super::*;
    use crate::BasicService;

    /// Emits its own event so tests can check ordering against the decorator's event.
    struct Noisy;

    impl StringService for Noisy {
        fn uppercase(&self, ctx: &Context, s: &str) -> Result<String, ServiceError> {
            tracing::info!("inner.uppercase");
            BasicService.uppercase(ctx, s)
        }

        fn count(&self, ctx: &Context, s: &str) -> usize {
            tracing::info!("inner.count");
            BasicService.count(ctx, s)
        }
    }

    #[test]
    fn uppercase_success_is_logged_once() {
        let capture = LogCapture::new();
        let service = (LoggingLayer::new(Clock::new_frozen()).dispatch(capture.dispatch()), BasicService).build();

        let output = service.uppercase(&Context::new(), "hello").unwrap();

        assert_eq!(output, "HELLO");
        assert_eq!(capture.lines_containing("method=\"uppercase\"").len(), 1);
        capture.assert_contains("input=\"hello\"");
        capture.assert_contains("output=\"HELLO\"");
        capture.assert_contains("err=None");
    }

    #[test]
    fn uppercase_failure_is_logged_and_returned() {
        let capture = LogCapture::new();
        let service = (LoggingLayer::new(Clock::new_frozen()).dispatch(capture.dispatch()), BasicService).build();

        let result = service.uppercase(&Context::new(), "");

        assert_eq!(result, Err(ServiceError::EmptyInput));
        capture.assert_contains("err=Some(\"empty string\")");
        capture.assert_contains("output=\"\"");
    }

    #[test]
    fn count_is_logged_with_result() {
        let capture = LogCapture::new();
        let service = (LoggingLayer::new(Clock::new_frozen()).dispatch(capture.dispatch()), BasicService).build();

        assert_eq!(service.count(&Context::new(), "hello"), 5);

        capture.assert_contains("method=\"count\"");
        capture.assert_contains("n=5");
        capture.assert_not_contains("output=");
    }

    #[test]
    fn event_follows_delegation() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());
        let service = (LoggingLayer::new(Clock::new_frozen()), Noisy).build();

        service.count(&Context::new(), "abc");

        let output = capture.output();
        let inner = output.find("inner.count").unwrap();
        let outer = output.find("method=\"count\"").unwrap();
        assert!(inner < outer, "decorator logged before delegating:\n{output}");
    }

    #[test]
    fn took_is_measured_with_clock() {
        let capture = LogCapture::new();
        let clock = ClockControl::new().auto_advance(Duration::from_millis(3)).to_clock();
        let service = (LoggingLayer::new(clock).dispatch(capture.dispatch()), BasicService).build();

        service.count(&Context::new(), "abc");

        capture.assert_contains("took=3ms");
    }

    #[test]
    fn every_call_produces_one_event() {
        struct Counted(AtomicUsize);

        impl StringService for Counted {
            fn uppercase(&self, _ctx: &Context, s: &str) -> Result<String, ServiceError> {
                self.0.fetch_add(1, Ordering::Relaxed);
                Ok(s.to_owned())
            }

            fn count(&self, _ctx: &Context, s: &str) -> usize {
                self.0.fetch_add(1, Ordering::Relaxed);
                s.len()
            }
        }

        let capture = LogCapture::new();
        let service = (
            LoggingLayer::new(Clock::new_frozen()).dispatch(capture.dispatch()),
            Counted(AtomicUsize::new(0)),
        )
            .build();

        for _ in 0..3 {
            service.count(&Context::new(), "x");
            let _ = service.uppercase(&Context::new(), "x");
        }

        assert_eq!(service.inner.0.load(Ordering::Relaxed), 6);
        assert_eq!(capture.lines_containing("method=").len(), 6);
    }
}
