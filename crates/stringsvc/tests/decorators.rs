// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Properties of the composed decorator chain.

use std::sync::Arc;

use prometheus::Registry;
use rstest::rstest;
use static_assertions::assert_impl_all;
use stringsvc::{
    BasicService, DecoratedService, Instrumenting, InstrumentingLayer, Logging, LoggingLayer, MetricsConfig, StringService, build_service,
};
use testing_aids::{LogCapture, MetricsSnapshot};
use tick::Clock;
use waypoint::{Context, Stack};

assert_impl_all!(DecoratedService: StringService, Send, Sync);
assert_impl_all!(Logging<BasicService>: Clone);
assert_impl_all!(Instrumenting<BasicService>: Clone);

const INPUTS: [&str; 6] = ["", "hello", "Hello World", "straße", "日本語", "  "];

#[rstest]
fn decorated_matches_plain(#[values("", "hello", "Hello World", "straße", "日本語", "  ")] input: &str) {
    let registry = Registry::new();
    let decorated = build_service(&registry, &MetricsConfig::default(), &Clock::new_frozen()).unwrap();
    let ctx = Context::new();

    assert_eq!(decorated.uppercase(&ctx, input), BasicService.uppercase(&ctx, input));
    assert_eq!(decorated.count(&ctx, input), BasicService.count(&ctx, input));
}

#[test]
fn either_order_is_transparent() {
    let registry = Registry::new();
    let clock = Clock::new_frozen();
    let instrumenting = InstrumentingLayer::new(&registry, "a", "b", clock.clone()).unwrap();
    let reversed = (LoggingLayer::new(clock), instrumenting, BasicService).build();
    let ctx = Context::new();

    for input in INPUTS {
        assert_eq!(reversed.uppercase(&ctx, input), BasicService.uppercase(&ctx, input));
        assert_eq!(reversed.count(&ctx, input), BasicService.count(&ctx, input));
    }
}

#[test]
fn request_counts_match_calls() {
    let registry = Registry::new();
    let service = build_service(&registry, &MetricsConfig::default(), &Clock::new_frozen()).unwrap();
    let ctx = Context::new();

    let uppercase_inputs = ["a", "", "b", "", "", "c"];
    let count_inputs = ["x", "", "yy", "zzz"];

    for input in uppercase_inputs {
        let _ = service.uppercase(&ctx, input);
    }
    for input in count_inputs {
        service.count(&ctx, input);
    }

    let snapshot = MetricsSnapshot::capture(&registry);
    let name = "my_group_string_service_request_count";
    let empty_calls = uppercase_inputs.iter().filter(|s| s.is_empty()).count();

    assert_eq!(snapshot.sum(name, &[("method", "count")]), count_inputs.len() as f64);
    assert_eq!(snapshot.sum(name, &[("method", "uppercase")]), uppercase_inputs.len() as f64);
    assert_eq!(snapshot.sum(name, &[("method", "uppercase"), ("error", "true")]), empty_calls as f64);
    assert_eq!(snapshot.sum("my_group_string_service_count_result_count", &[]), count_inputs.len() as f64);
}

#[test]
fn one_log_event_per_call_through_chain() {
    let capture = LogCapture::new();
    let registry = Registry::new();
    let clock = Clock::new_frozen();
    let service = (
        InstrumentingLayer::new(&registry, "my_group", "string_service", clock.clone()).unwrap(),
        LoggingLayer::new(clock).dispatch(capture.dispatch()),
        BasicService,
    )
        .build();
    let ctx = Context::new();

    let _ = service.uppercase(&ctx, "hi");
    let _ = service.uppercase(&ctx, "");
    service.count(&ctx, "hey");

    assert_eq!(capture.lines_containing("method=\"uppercase\"").len(), 2);
    assert_eq!(capture.lines_containing("method=\"count\"").len(), 1);
}

#[test]
fn second_chain_on_same_registry_fails() {
    let registry = Registry::new();
    build_service(&registry, &MetricsConfig::default(), &Clock::new_frozen()).unwrap();

    let error = build_service(&registry, &MetricsConfig::default(), &Clock::new_frozen()).unwrap_err();

    assert!(matches!(error, stringsvc::Error::Metrics(_)));
}

#[test]
fn shared_across_threads() {
    let registry = Registry::new();
    let service = Arc::new(build_service(&registry, &MetricsConfig::default(), &Clock::new_frozen()).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&service);
            std::thread::spawn(move || {
                for _ in 0..25 {
                    assert_eq!(service.count(&Context::new(), "abcd"), 4);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = MetricsSnapshot::capture(&registry);
    assert_eq!(snapshot.sum("my_group_string_service_request_count", &[("method", "count")]), 100.0);
}
