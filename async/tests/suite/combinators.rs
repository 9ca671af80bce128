//! Async combinators mirror the synchronous algebra.

use std::sync::{Arc, Mutex};

use verdict_async::AsyncOutcome;
use verdict_core::{Failure, Outcome, Success, Traced, generate_error, generate_message};

use crate::common::{Counter, counted, err, error_codes, ok, trace_codes};

#[tokio::test]
async fn chain_success_order_law() {
    let seed: Outcome<i32> = Success::new(1)
        .with_traces([
            generate_message("info", "audit", "A"),
            generate_message("info", "audit", "B"),
        ])
        .into();
    let op = AsyncOutcome::from_outcome(seed);
    let chained = op.chain_success(|_| -> Outcome<&'static str> {
        Success::new("v2")
            .with_traces([generate_message("info", "audit", "C")])
            .into()
    });
    let outcome = chained.resolve().await;
    assert_eq!(outcome.value(), Some(&"v2"));
    assert_eq!(trace_codes(&outcome), vec!["C", "A", "B"]);
}

#[tokio::test]
async fn chain_success_accepts_async_steps() {
    let counter = Counter::default();
    let downstream = counted(&counter, ok(10, "C"));
    let op = AsyncOutcome::from_outcome(ok(1, "A"));
    let chained: AsyncOutcome<i32> = op.chain_success(move |_| downstream.clone());

    let outcome = chained.resolve().await;
    assert_eq!(outcome.value(), Some(&10));
    assert_eq!(trace_codes(&outcome), vec!["C", "A"]);

    let _ = chained.resolve().await;
    assert_eq!(counter.get(), 2);
}

#[tokio::test]
async fn map_success_skips_failures() {
    let calls = Counter::default();
    let seen = calls.clone();
    let op = AsyncOutcome::from_outcome(err("E1", "T1")).map_success(move |v| {
        seen.bump();
        Success::new(v * 2)
    });
    let outcome = op.resolve().await;
    assert_eq!(calls.get(), 0);
    assert_eq!(outcome, err("E1", "T1"));
}

#[tokio::test]
async fn map_failure_and_map_both() {
    let op = AsyncOutcome::from_outcome(err("E1", "T1"))
        .map_failure(|_| Failure::new(generate_error("technicalIssue", "wrapped")));
    let outcome = op.resolve().await;
    assert_eq!(error_codes(&outcome), vec!["wrapped"]);
    assert_eq!(trace_codes(&outcome), vec!["T1"]);

    let op = AsyncOutcome::from_outcome(ok(2, "T")).map_both(
        |v| Success::new(v.to_string()),
        |_| Failure::new(generate_error("processError", "never")),
    );
    assert_eq!(op.resolve().await.value().map(String::as_str), Some("2"));
}

#[tokio::test]
async fn chain_failure_recovers_and_keeps_traces() {
    let op = AsyncOutcome::from_outcome(err("E1", "T1")).chain_failure(|errors| {
        assert_eq!(errors[0].code(), "E1");
        ok(0, "R")
    });
    let outcome = op.resolve().await;
    assert_eq!(outcome.value(), Some(&0));
    assert_eq!(trace_codes(&outcome), vec!["R", "T1"]);
}

#[tokio::test]
async fn chain_both_and_chain() {
    let op = AsyncOutcome::from_outcome(err("E1", "T1"))
        .chain_both(|_| ok(1, "S"), |_| ok(-1, "F"));
    let outcome = op.resolve().await;
    assert_eq!(outcome.value(), Some(&-1));
    assert_eq!(trace_codes(&outcome), vec!["F", "T1"]);

    let op = AsyncOutcome::from_outcome(ok(5, "T")).chain(|outcome| {
        let flipped: Outcome<bool> = Outcome::failure(generate_error("processError", "flip"));
        assert!(outcome.is_success());
        flipped
    });
    let outcome = op.resolve().await;
    assert_eq!(error_codes(&outcome), vec!["flip"]);
    assert_eq!(trace_codes(&outcome), vec!["T"]);
}

#[tokio::test]
async fn taps_fire_once_per_resolution() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (a, b, c) = (Arc::clone(&log), Arc::clone(&log), Arc::clone(&log));
    let op = AsyncOutcome::from_outcome(ok(1, "T"))
        .tap(move |_| a.lock().unwrap().push("tap"))
        .tap_failure(move |_| b.lock().unwrap().push("failure"))
        .tap_both(
            move |_| c.lock().unwrap().push("both:success"),
            |_| unreachable!(),
        );

    let outcome = op.resolve().await;
    assert_eq!(outcome, ok(1, "T"));
    assert_eq!(*log.lock().unwrap(), vec!["tap", "both:success"]);

    let _ = op.resolve().await;
    assert_eq!(log.lock().unwrap().len(), 4);
}

#[tokio::test]
async fn tap_success_sees_value() {
    let seen = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&seen);
    let op = AsyncOutcome::from_outcome(ok(42, "T")).tap_success(move |v| {
        *sink.lock().unwrap() = Some(*v);
    });
    let _ = op.resolve().await;
    assert_eq!(*seen.lock().unwrap(), Some(42));
}

#[tokio::test]
async fn convert_failure_to_success_demotes_errors() {
    let op = AsyncOutcome::from_outcome(err("E1", "T1")).convert_failure_to_success(0);
    let outcome = op.resolve().await;
    assert_eq!(outcome.value(), Some(&0));
    assert_eq!(trace_codes(&outcome), vec!["E1", "T1"]);
}

#[tokio::test]
async fn panic_in_a_step_is_normalized() {
    let op = AsyncOutcome::from_outcome(ok(1, "T")).map_success(|v: i32| -> Success<i32> {
        if v == 1 {
            panic!("step exploded");
        }
        Success::new(v)
    });
    let outcome = op.resolve().await;
    assert_eq!(error_codes(&outcome), vec!["uncaughtException"]);
}

#[tokio::test]
async fn collect_fail_fast_stops_resolving() {
    let counters: Vec<Counter> = (0..4).map(|_| Counter::default()).collect();
    let items = vec![
        counted(&counters[0], ok(1, "t1")),
        counted(&counters[1], err("E1", "t2")),
        counted(&counters[2], ok(2, "t3")),
        counted(&counters[3], err("E2", "t4")),
    ];

    let outcome = AsyncOutcome::collect(items.clone(), true).resolve().await;
    assert_eq!(error_codes(&outcome), vec!["E1"]);
    let resolved: Vec<_> = counters.iter().map(Counter::get).collect();
    assert_eq!(resolved, vec![1, 1, 0, 0]);

    let outcome = AsyncOutcome::collect(items, false).resolve().await;
    assert_eq!(error_codes(&outcome), vec!["E1", "E2"]);
    assert_eq!(trace_codes(&outcome), vec!["t1", "t2", "t3", "t4"]);
}

#[tokio::test]
async fn collect_all_successes() {
    let items = vec![
        AsyncOutcome::from_outcome(ok(1, "a")),
        AsyncOutcome::from_outcome(ok(2, "b")),
    ];
    let outcome = AsyncOutcome::collect(items, true).resolve().await;
    assert_eq!(outcome.value(), Some(&vec![1, 2]));
    assert_eq!(trace_codes(&outcome), vec!["a", "b"]);
}
