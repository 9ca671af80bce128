//! Shared test utilities and fixtures

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use verdict_async::AsyncOutcome;
use verdict_core::{Failure, Message, Outcome, Success, Traced, generate_error, generate_message};

/// Shared call counter for observing how often a computation runs.
#[derive(Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn ok(value: i32, trace: &str) -> Outcome<i32> {
    Success::new(value)
        .with_traces([generate_message("info", "audit", trace)])
        .into()
}

pub fn err(code: &str, trace: &str) -> Outcome<i32> {
    Failure::new(generate_error("processError", code))
        .with_traces([generate_message("info", "audit", trace)])
        .into()
}

/// An async outcome that bumps `counter` each time it is resolved.
pub fn counted(counter: &Counter, outcome: Outcome<i32>) -> AsyncOutcome<i32> {
    let counter = counter.clone();
    AsyncOutcome::new(move |lift| {
        counter.bump();
        let outcome = outcome.clone();
        async move { Ok::<_, anyhow::Error>(lift.lift_result(outcome)) }
    })
}

pub fn trace_codes<V>(outcome: &Outcome<V>) -> Vec<String> {
    outcome
        .traces()
        .iter()
        .map(|m: &Message| m.code().to_string())
        .collect()
}

pub fn error_codes<V>(outcome: &Outcome<V>) -> Vec<String> {
    outcome
        .errors()
        .unwrap_or_default()
        .iter()
        .map(|e| e.code().to_string())
        .collect()
}
