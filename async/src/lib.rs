//! Asynchronous outcomes for Verdict.
//!
//! [`AsyncOutcome`] lifts future-based computations into the outcome algebra.
//! It is a re-invocable recipe: each [`AsyncOutcome::resolve`] (or `.await`)
//! runs the captured computation again from scratch. Rejections and panics
//! crossing the resolution boundary are normalized into typed failures, so a
//! resolved value is always a plain [`Outcome`](verdict_core::Outcome).
//!
//! Cancellation is not modelled. Timeouts belong to the caller: wrap the
//! awaited future (for example with `tokio::time::timeout`) and let the
//! elapsed error surface as a rejection.

mod lift;
mod normalize;
mod outcome;

pub use lift::Lift;
pub use normalize::uncaught_exception;
pub use outcome::{AsyncOutcome, IntoOutcomeFuture};
