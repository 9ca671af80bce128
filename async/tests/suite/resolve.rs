//! Resolution, re-invocation and normalization at the async boundary.

use std::io;
use std::time::Duration;

use futures_util::future;
use tokio::{task, time};
use verdict_async::{AsyncOutcome, Lift};
use verdict_core::{Failure, Outcome, Success, generate_error};

use crate::common::{Counter, counted, error_codes, ok, trace_codes};

fn explode_before_suspending(_: Lift) -> future::Ready<anyhow::Result<Outcome<i32>>> {
    panic!("sync boom")
}

fn uncaught_reason(outcome: &Outcome<i32>) -> String {
    let errors = outcome.errors().expect("expected a failure");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message_type(), "technicalIssue");
    assert_eq!(errors[0].code(), "uncaughtException");
    errors[0].data().unwrap()["reason"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn resolving_twice_runs_the_computation_twice() {
    let counter = Counter::default();
    let op = counted(&counter, ok(1, "t"));

    let first = op.resolve().await;
    let second = op.resolve().await;

    assert_eq!(counter.get(), 2);
    assert_eq!(first, second);
}

#[tokio::test]
async fn awaiting_reruns_the_whole_chain() {
    let counter = Counter::default();
    let mapped_calls = Counter::default();
    let calls = mapped_calls.clone();
    let op = counted(&counter, ok(1, "t")).map_success(move |v| {
        calls.bump();
        Success::new(v + 1)
    });

    let a = (&op).await;
    let b = op.clone().await;
    let c = op.resolve().await;

    assert_eq!(counter.get(), 3);
    assert_eq!(mapped_calls.get(), 3);
    assert_eq!(a.value(), Some(&2));
    assert_eq!(b, c);
}

#[tokio::test]
async fn building_a_chain_runs_nothing() {
    let counter = Counter::default();
    let _op = counted(&counter, ok(1, "t"))
        .map_success(Success::new)
        .tap(|_| {});
    assert_eq!(counter.get(), 0);
}

#[tokio::test]
async fn sync_panic_becomes_uncaught_exception() {
    let op = AsyncOutcome::new(explode_before_suspending);
    let outcome = op.resolve().await;
    assert_eq!(uncaught_reason(&outcome), "sync boom");
}

#[tokio::test]
async fn panic_while_polling_becomes_uncaught_exception() {
    let op: AsyncOutcome<i32> = AsyncOutcome::new(|_| async {
        task::yield_now().await;
        if true {
            panic!("async boom");
        }
        Ok::<_, anyhow::Error>(Outcome::success(1))
    });
    let outcome = op.resolve().await;
    assert_eq!(uncaught_reason(&outcome), "async boom");
}

#[tokio::test]
async fn rejection_becomes_uncaught_exception() {
    let op: AsyncOutcome<i32> = AsyncOutcome::new(|lift| async move {
        let n: i32 = "not a number".parse()?;
        Ok::<_, anyhow::Error>(lift.lift_success(n))
    });
    let outcome = op.resolve().await;
    assert_eq!(uncaught_reason(&outcome), "invalid digit found in string");
}

#[tokio::test]
async fn timeout_surfaces_as_rejection() {
    let op: AsyncOutcome<i32> = AsyncOutcome::new(|lift| async move {
        time::timeout(Duration::from_millis(5), future::pending::<()>()).await?;
        Ok::<_, anyhow::Error>(lift.lift_success(1))
    });
    let outcome = op.resolve().await;
    assert_eq!(uncaught_reason(&outcome), "deadline has elapsed");
}

#[tokio::test]
async fn produced_failure_is_not_wrapped_again() {
    let failure = Failure::new(generate_error("processError", "denied"));
    let op: AsyncOutcome<i32> = AsyncOutcome::failure(failure.clone());
    assert_eq!(op.resolve().await, Outcome::Failure(failure));
}

#[tokio::test]
async fn lifted_constructors_resolve_to_their_content() {
    assert_eq!(AsyncOutcome::success(7).resolve().await.value(), Some(&7));

    let outcome = ok(3, "kept");
    let op = AsyncOutcome::from_outcome(outcome.clone());
    assert_eq!(op.resolve().await, outcome);
    assert_eq!(op.resolve().await, outcome);
}

#[tokio::test]
async fn from_promise_builds_a_fresh_future_per_resolution() {
    let counter = Counter::default();
    let calls = counter.clone();
    let op = AsyncOutcome::from_promise(
        move || {
            calls.bump();
            async { Ok::<_, io::Error>(4) }
        },
        |_| unreachable!(),
    );
    assert_eq!(op.resolve().await.value(), Some(&4));
    assert_eq!(op.resolve().await.value(), Some(&4));
    assert_eq!(counter.get(), 2);
}

#[tokio::test]
async fn from_promise_routes_rejection_through_on_error() {
    let op: AsyncOutcome<i32> = AsyncOutcome::from_promise(
        || async { Err::<i32, _>(io::Error::other("connection refused")) },
        |e: io::Error| {
            let draft = generate_error("technicalIssue", "upstreamDown").with_data(e.to_string());
            Failure::new(draft)
        },
    );
    let outcome = op.resolve().await;
    assert_eq!(error_codes(&outcome), vec!["upstreamDown"]);
}

#[tokio::test]
async fn from_result_promise_passes_outcome_or_normalizes() {
    let op = AsyncOutcome::from_result_promise(|| async { Ok::<_, io::Error>(ok(2, "t")) });
    let outcome = op.resolve().await;
    assert_eq!(outcome.value(), Some(&2));
    assert_eq!(trace_codes(&outcome), vec!["t"]);

    let op: AsyncOutcome<i32> = AsyncOutcome::from_result_promise(|| async {
        Err::<Outcome<i32>, _>(io::Error::other("reset"))
    });
    assert_eq!(uncaught_reason(&op.resolve().await), "reset");
}

#[tokio::test]
async fn computation_can_use_lift_helpers() {
    let op: AsyncOutcome<i32> = AsyncOutcome::new(|lift| async move {
        let fetched = lift
            .from_promise(async { Ok::<_, io::Error>(20) }, |_| unreachable!())
            .await;
        Ok::<_, anyhow::Error>(fetched.chain_success(|v| lift.lift_success(v + 1)))
    });
    assert_eq!(op.resolve().await.value(), Some(&21));
}
