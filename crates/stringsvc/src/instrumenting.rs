// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use prometheus::Registry;
use tick::Clock;
use waypoint::{Context, Layer};

use crate::metrics::Metrics;
use crate::{ServiceError, StringService};

/// Creates [`Instrumenting`] decorators.
///
/// The collectors are registered once, when the layer is created; every decorator built
/// from the layer updates the same collectors. For each call the decorator records:
///
/// - `<namespace>_<subsystem>_request_count{method, error}`, incremented by one;
/// - `<namespace>_<subsystem>_request_latency_microseconds{method, error}`, the time the
///   inner call took;
/// - `<namespace>_<subsystem>_count_result`, the value returned by `count`.
///
/// The `error` label is `"true"` when the inner call failed and `"false"` otherwise.
#[derive(Debug, Clone)]
pub struct InstrumentingLayer {
    clock: Clock,
    metrics: Metrics,
}

impl InstrumentingLayer {
    /// Registers the collectors with `registry` and creates the layer.
    ///
    /// # Errors
    ///
    /// Returns an error when the collectors cannot be registered, for example because
    /// collectors with the same names are already present in `registry`.
    pub fn new(registry: &Registry, namespace: &str, subsystem: &str, clock: Clock) -> Result<Self, prometheus::Error> {
        Ok(Self {
            clock,
            metrics: Metrics::register(registry, namespace, subsystem)?,
        })
    }
}

impl<S> Layer<S> for InstrumentingLayer {
    type Service = Instrumenting<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Instrumenting {
            inner,
            clock: self.clock.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

/// A [`StringService`] decorator that records Prometheus metrics. Built by [`InstrumentingLayer`].
#[derive(Debug, Clone)]
pub struct Instrumenting<S> {
    inner: S,
    clock: Clock,
    metrics: Metrics,
}

impl<S: StringService> StringService for Instrumenting<S> {
    fn uppercase(&self, ctx: &Context, s: &str) -> Result<String, ServiceError> {
        let stopwatch = self.clock.stopwatch();
        let result = self.inner.uppercase(ctx, s);

        self.metrics.record_request("uppercase", result.is_err(), stopwatch.elapsed());

        result
    }

    fn count(&self, ctx: &Context, s: &str) -> usize {
        let stopwatch = self.clock.stopwatch();
        let n = self.inner.count(ctx, s);

        self.metrics.record_request("count", false, stopwatch.elapsed());
        self.metrics.record_count_result(n);

        n
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::time::Duration;

    use testing_aids::MetricsSnapshot;
    use tick::ClockControl;
    use waypoint::Stack;

    use super::*;
    use crate::BasicService;

    fn instrumented(registry: &Registry, clock: Clock) -> Instrumenting<BasicService> {
        (InstrumentingLayer::new(registry, "my_group", "string_service", clock).unwrap(), BasicService).build()
    }

    #[test]
    fn results_pass_through() {
        let registry = Registry::new();
        let service = instrumented(&registry, Clock::new_frozen());
        let ctx = Context::new();

        assert_eq!(service.uppercase(&ctx, "hello").unwrap(), "HELLO");
        assert_eq!(service.uppercase(&ctx, ""), Err(ServiceError::EmptyInput));
        assert_eq!(service.count(&ctx, "hello"), 5);
    }

    #[test]
    fn calls_are_counted_per_method_and_outcome() {
        let registry = Registry::new();
        let service = instrumented(&registry, Clock::new_frozen());
        let ctx = Context::new();

        for input in ["a", "", "bc", ""] {
            let _ = service.uppercase(&ctx, input);
        }
        for input in ["", "abc", "de"] {
            service.count(&ctx, input);
        }

        let snapshot = MetricsSnapshot::capture(&registry);
        let name = "my_group_string_service_request_count";
        assert!((snapshot.sum(name, &[("method", "uppercase")]) - 4.0).abs() < f64::EPSILON);
        assert!((snapshot.sum(name, &[("method", "uppercase"), ("error", "true")]) - 2.0).abs() < f64::EPSILON);
        assert!((snapshot.sum(name, &[("method", "count")]) - 3.0).abs() < f64::EPSILON);
        assert!(snapshot.sum(name, &[("method", "count"), ("error", "true")]).abs() < f64::EPSILON);
        assert!((snapshot.sum("my_group_string_service_count_result_sum", &[]) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn latency_uses_clock() {
        let registry = Registry::new();
        let clock = ClockControl::new().auto_advance(Duration::from_micros(300)).to_clock();
        let service = instrumented(&registry, clock);

        service.count(&Context::new(), "x");

        let snapshot = MetricsSnapshot::capture(&registry);
        let latency = snapshot.sum(
            "my_group_string_service_request_latency_microseconds_sum",
            &[("method", "count"), ("error", "false")],
        );
        assert!((latency - 300.0).abs() < 1e-6, "unexpected latency {latency}");
    }

    #[test]
    fn layer_shares_collectors_between_services() {
        let registry = Registry::new();
        let layer = InstrumentingLayer::new(&registry, "my_group", "string_service", Clock::new_frozen()).unwrap();
        let first = layer.layer(BasicService);
        let second = layer.layer(BasicService);

        first.count(&Context::new(), "a");
        second.count(&Context::new(), "b");

        let snapshot = MetricsSnapshot::capture(&registry);
        assert!((snapshot.sum("my_group_string_service_request_count", &[]) - 2.0).abs() < f64::EPSILON);
    }
}
