//! Helpers handed to every asynchronous computation.

use std::future::Future;

use verdict_core::{Failure, Outcome};

use crate::normalize::{rejection_reason, uncaught_exception};

/// Lifting helpers passed to an [`AsyncOutcome`](crate::AsyncOutcome)
/// computation.
///
/// `lift_*` are pure and never suspend. `from_promise` and
/// `from_result_promise` await an external future and bring its result into
/// the algebra.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lift;

impl Lift {
    pub fn lift_success<V>(self, value: V) -> Outcome<V> {
        Outcome::success(value)
    }

    pub fn lift_failure<V>(self, failure: Failure) -> Outcome<V> {
        Outcome::Failure(failure)
    }

    pub fn lift_result<V>(self, outcome: Outcome<V>) -> Outcome<V> {
        outcome
    }

    /// Await `promise`. `Ok` becomes a success; `Err` is handed to `on_error`
    /// to build the failure.
    pub async fn from_promise<X, E, Fut>(
        self,
        promise: Fut,
        on_error: impl FnOnce(E) -> Failure,
    ) -> Outcome<X>
    where
        Fut: Future<Output = Result<X, E>>,
    {
        match promise.await {
            Ok(value) => Outcome::success(value),
            Err(e) => {
                let failure = on_error(e);
                tracing::debug!(%failure, "Promise rejection mapped to failure");
                Outcome::Failure(failure)
            }
        }
    }

    /// Await a future that already yields an outcome. The outcome passes
    /// through unchanged; a rejection is normalized into an
    /// `uncaughtException` failure.
    pub async fn from_result_promise<X, E, Fut>(self, promise: Fut) -> Outcome<X>
    where
        Fut: Future<Output = Result<Outcome<X>, E>>,
        E: Into<anyhow::Error>,
    {
        match promise.await {
            Ok(outcome) => outcome,
            Err(rejection) => {
                let reason = rejection_reason(&rejection.into());
                tracing::warn!(%reason, "Outcome promise rejected");
                Outcome::Failure(uncaught_exception(reason))
            }
        }
    }
}
