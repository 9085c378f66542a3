// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::Duration;

use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

pub(crate) const REQUEST_COUNT: &str = "request_count";
pub(crate) const REQUEST_LATENCY: &str = "request_latency_microseconds";
pub(crate) const COUNT_RESULT: &str = "count_result";

pub(crate) const METHOD_LABEL: &str = "method";
pub(crate) const ERROR_LABEL: &str = "error";

/// Collectors updated by the instrumenting decorator.
#[derive(Debug, Clone)]
pub(crate) struct Metrics {
    request_count: IntCounterVec,
    request_latency: HistogramVec,
    count_result: Histogram,
}

impl Metrics {
    /// Creates the collectors and registers them with `registry`.
    pub(crate) fn register(registry: &Registry, namespace: &str, subsystem: &str) -> prometheus::Result<Self> {
        let request_count = IntCounterVec::new(
            Opts::new(REQUEST_COUNT, "Number of requests received.")
                .namespace(namespace)
                .subsystem(subsystem),
            &[METHOD_LABEL, ERROR_LABEL],
        )?;

        let request_latency = HistogramVec::new(
            HistogramOpts::new(REQUEST_LATENCY, "Total duration of requests in microseconds.")
                .namespace(namespace)
                .subsystem(subsystem)
                .buckets(prometheus::exponential_buckets(10.0, 4.0, 10)?),
            &[METHOD_LABEL, ERROR_LABEL],
        )?;

        let count_result = Histogram::with_opts(
            HistogramOpts::new(COUNT_RESULT, "The result of each count method.")
                .namespace(namespace)
                .subsystem(subsystem)
                .buckets(prometheus::exponential_buckets(1.0, 4.0, 10)?),
        )?;

        registry.register(Box::new(request_count.clone()))?;
        registry.register(Box::new(request_latency.clone()))?;
        registry.register(Box::new(count_result.clone()))?;

        Ok(Self {
            request_count,
            request_latency,
            count_result,
        })
    }

    pub(crate) fn record_request(&self, method: &str, failed: bool, took: Duration) {
        let labels = [method, if failed { "true" } else { "false" }];

        self.request_count.with_label_values(&labels).inc();
        self.request_latency
            .with_label_values(&labels)
            .observe(took.as_secs_f64() * 1_000_000.0);
    }

    #[expect(clippy::cast_precision_loss, reason = "observations are approximate by nature")]
    pub(crate) fn record_count_result(&self, n: usize) {
        self.count_result.observe(n as f64);
    }
}
