//! Combine many outcomes into one.

use verdict_types::Message;

use crate::outcome::{Failure, Outcome, Success};
use crate::traced::{Traced, carry_traces, demote_errors};

/// Run a fallible function and lift its result into the algebra.
///
/// An `Err` is the thrown value: it is handed to `on_error`, which builds the
/// failure. `Ok` becomes a success with no traces.
pub fn from_throwable<X, E>(
    f: impl FnOnce() -> Result<X, E>,
    on_error: impl FnOnce(E) -> Failure,
) -> Outcome<X> {
    match f() {
        Ok(value) => Outcome::success(value),
        Err(e) => Outcome::Failure(on_error(e)),
    }
}

/// Combine outcomes into one outcome of all values.
///
/// Every scanned outcome's traces are gathered, in order, into a running
/// buffer.
///
/// - `first_failure_only`: the first failure is returned with the buffer of
///   the outcomes before it appended, and the scan stops there. Later items
///   are never pulled from the iterator.
/// - otherwise: the scan continues, every failure's errors are folded into one
///   failure in order, and it is returned carrying the whole buffer.
///
/// With no failure, the result is a success of every value in order, carrying
/// the whole buffer.
pub fn from_result_array<X, I>(outcomes: I, first_failure_only: bool) -> Outcome<Vec<X>>
where
    I: IntoIterator<Item = Outcome<X>>,
{
    let outcomes = outcomes.into_iter();
    let mut values = Vec::with_capacity(outcomes.size_hint().0);
    let mut buffer: Vec<Message> = Vec::new();
    let mut merged: Option<Failure> = None;

    for outcome in outcomes {
        match outcome {
            Outcome::Success(success) => {
                let (value, traces) = success.into_parts();
                buffer.extend(traces);
                if merged.is_none() {
                    values.push(value);
                }
            }
            Outcome::Failure(failure) if first_failure_only => {
                return Outcome::Failure(carry_traces(failure, buffer));
            }
            Outcome::Failure(failure) => {
                let (errors, traces) = failure.into_parts();
                buffer.extend(traces);
                match merged.as_mut() {
                    Some(merged) => merged.extend_errors(errors),
                    None => merged = Some(Failure::from_parts(errors, Vec::new())),
                }
            }
        }
    }

    match merged {
        Some(failure) => Outcome::Failure(carry_traces(failure, buffer)),
        None => Outcome::Success(carry_traces(Success::new(values), buffer)),
    }
}

/// Combine outcomes into a success that never fails.
///
/// Success values are collected in order. Each failure's errors are demoted
/// into the trace list at the failure's position, followed by its own traces,
/// so nothing is dropped.
pub fn from_result_array_as_success<X, I>(outcomes: I) -> Success<Vec<X>>
where
    I: IntoIterator<Item = Outcome<X>>,
{
    let mut values = Vec::new();
    let mut buffer: Vec<Message> = Vec::new();

    for outcome in outcomes {
        match outcome {
            Outcome::Success(success) => {
                let (value, traces) = success.into_parts();
                values.push(value);
                buffer.extend(traces);
            }
            Outcome::Failure(failure) => {
                let (errors, traces) = failure.into_parts();
                buffer.extend(demote_errors(errors));
                buffer.extend(traces);
            }
        }
    }

    let mut success = Success::new(values);
    success.extend_traces(buffer);
    success
}
