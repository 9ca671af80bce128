//! Re-invocable asynchronous outcomes.
//!
//! An [`AsyncOutcome`] is a recipe, not a cached future. It holds a thunk that
//! builds a fresh future every time it is resolved, so resolving the same value
//! twice runs the whole upstream chain twice, side effects included. Every
//! combinator wraps the upstream recipe in a new thunk; nothing is memoized.

use std::fmt;
use std::future::{Future, IntoFuture};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures_util::future::{self, BoxFuture, FutureExt};
use verdict_core::{
    ErrorMessage, Failure, Outcome, Success, Traced, carry_traces, from_result_array,
};

use crate::lift::Lift;
use crate::normalize::{panic_payload_to_string, rejection_reason, uncaught_exception};

type Thunk<V> =
    Arc<dyn Fn(Lift) -> BoxFuture<'static, anyhow::Result<Outcome<V>>> + Send + Sync>;

/// Anything a chaining callback may hand back: a ready [`Outcome`] or another
/// [`AsyncOutcome`] to resolve.
pub trait IntoOutcomeFuture<V>: Send + 'static {
    fn into_outcome_future(self) -> BoxFuture<'static, Outcome<V>>;
}

impl<V: Send + 'static> IntoOutcomeFuture<V> for Outcome<V> {
    fn into_outcome_future(self) -> BoxFuture<'static, Outcome<V>> {
        future::ready(self).boxed()
    }
}

impl<V: Send + 'static> IntoOutcomeFuture<V> for AsyncOutcome<V> {
    fn into_outcome_future(self) -> BoxFuture<'static, Outcome<V>> {
        self.resolve()
    }
}

/// A deferred, re-invocable computation producing an [`Outcome`].
///
/// The computation receives a [`Lift`] and returns a future of
/// `anyhow::Result<Outcome<V>>`. `Err` is a rejection: `?` on any external
/// error inside the computation ends up there. A rejection, or a panic while
/// starting or polling the computation, is normalized by [`AsyncOutcome::resolve`]
/// into a `technicalIssue` / `uncaughtException` failure.
pub struct AsyncOutcome<V> {
    thunk: Thunk<V>,
}

impl<V> Clone for AsyncOutcome<V> {
    fn clone(&self) -> Self {
        Self {
            thunk: Arc::clone(&self.thunk),
        }
    }
}

impl<V> fmt::Debug for AsyncOutcome<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncOutcome").finish_non_exhaustive()
    }
}

impl<V: Send + 'static> AsyncOutcome<V> {
    pub fn new<F, Fut>(computation: F) -> Self
    where
        F: Fn(Lift) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Outcome<V>>> + Send + 'static,
    {
        let thunk: Thunk<V> = Arc::new(move |lift: Lift| computation(lift).boxed());
        Self { thunk }
    }

    // ------------------------------------------------------------------------
    // constructors
    // ------------------------------------------------------------------------

    /// Resolves to `Success(value)` every time, each with its own copy.
    pub fn success(value: V) -> Self
    where
        V: Clone + Sync,
    {
        Self::new(move |lift| future::ready(Ok(lift.lift_success(value.clone()))))
    }

    pub fn failure(failure: Failure) -> Self {
        Self::new(move |lift| future::ready(Ok(lift.lift_failure(failure.clone()))))
    }

    pub fn from_outcome(outcome: Outcome<V>) -> Self
    where
        V: Clone + Sync,
    {
        Self::new(move |lift| future::ready(Ok(lift.lift_result(outcome.clone()))))
    }

    /// Asynchronous [`verdict_core::from_throwable`].
    ///
    /// Takes a factory rather than a future: a future can be awaited once, and
    /// each resolution needs a fresh one.
    pub fn from_promise<E, P, Fut, H>(promise: P, on_error: H) -> Self
    where
        P: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
        H: Fn(E) -> Failure + Send + Sync + 'static,
        E: Send + 'static,
    {
        let on_error = Arc::new(on_error);
        Self::new(move |lift| {
            let pending = promise();
            let on_error = Arc::clone(&on_error);
            async move {
                let outcome = lift.from_promise(pending, |e| on_error(e)).await;
                Ok::<_, anyhow::Error>(outcome)
            }
        })
    }

    /// Partner of [`AsyncOutcome::from_promise`] for futures that already
    /// yield an outcome.
    pub fn from_result_promise<E, P, Fut>(promise: P) -> Self
    where
        P: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Outcome<V>, E>> + Send + 'static,
        E: Into<anyhow::Error> + Send + 'static,
    {
        Self::new(move |lift| {
            let pending = promise();
            async move { Ok::<_, anyhow::Error>(lift.from_result_promise(pending).await) }
        })
    }

    /// Resolve every item in order, then aggregate with
    /// [`verdict_core::from_result_array`].
    ///
    /// With `first_failure_only`, items after the first failure are never
    /// resolved.
    pub fn collect(
        items: Vec<AsyncOutcome<V>>,
        first_failure_only: bool,
    ) -> AsyncOutcome<Vec<V>> {
        let items = Arc::new(items);
        AsyncOutcome::new(move |_| {
            let items = Arc::clone(&items);
            async move {
                let mut resolved = Vec::with_capacity(items.len());
                for item in items.iter() {
                    let outcome = item.resolve().await;
                    let stop = first_failure_only && outcome.is_failure();
                    resolved.push(outcome);
                    if stop {
                        break;
                    }
                }
                Ok::<_, anyhow::Error>(from_result_array(resolved, first_failure_only))
            }
        })
    }

    // ------------------------------------------------------------------------
    // resolution
    // ------------------------------------------------------------------------

    /// Run the computation from scratch and normalize its result.
    ///
    /// Never fails: an outcome passes through unchanged, while a rejection or
    /// panic becomes an `uncaughtException` failure.
    pub fn resolve(&self) -> BoxFuture<'static, Outcome<V>> {
        let thunk = Arc::clone(&self.thunk);
        async move {
            let pending = match panic::catch_unwind(AssertUnwindSafe(|| thunk(Lift))) {
                Ok(pending) => pending,
                Err(payload) => {
                    let reason = panic_payload_to_string(&payload);
                    tracing::warn!(%reason, "Computation panicked before suspending");
                    return Outcome::Failure(uncaught_exception(reason));
                }
            };

            match AssertUnwindSafe(pending).catch_unwind().await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(rejection)) => {
                    let reason = rejection_reason(&rejection);
                    tracing::warn!(%reason, "Computation rejected");
                    Outcome::Failure(uncaught_exception(reason))
                }
                Err(payload) => {
                    let reason = panic_payload_to_string(&payload);
                    tracing::warn!(%reason, "Computation panicked");
                    Outcome::Failure(uncaught_exception(reason))
                }
            }
        }
        .boxed()
    }

    /// Build a new recipe that resolves `self` and feeds the outcome to `step`.
    fn then<V2, F, Fut>(&self, step: F) -> AsyncOutcome<V2>
    where
        V2: Send + 'static,
        F: Fn(Outcome<V>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Outcome<V2>> + Send + 'static,
    {
        let upstream = self.clone();
        let step = Arc::new(step);
        AsyncOutcome::new(move |_| {
            let upstream = upstream.clone();
            let step = Arc::clone(&step);
            async move { Ok::<_, anyhow::Error>(step(upstream.resolve().await).await) }
        })
    }

    // ------------------------------------------------------------------------
    // tap
    // ------------------------------------------------------------------------

    pub fn tap<F>(&self, f: F) -> Self
    where
        F: Fn(&Outcome<V>) + Send + Sync + 'static,
    {
        self.then(move |outcome| future::ready(outcome.tap(&f)))
    }

    pub fn tap_success<F>(&self, f: F) -> Self
    where
        F: Fn(&V) + Send + Sync + 'static,
    {
        self.then(move |outcome| future::ready(outcome.tap_success(&f)))
    }

    pub fn tap_failure<F>(&self, f: F) -> Self
    where
        F: Fn(&[ErrorMessage]) + Send + Sync + 'static,
    {
        self.then(move |outcome| future::ready(outcome.tap_failure(&f)))
    }

    pub fn tap_both<S, E>(&self, on_success: S, on_failure: E) -> Self
    where
        S: Fn(&V) + Send + Sync + 'static,
        E: Fn(&[ErrorMessage]) + Send + Sync + 'static,
    {
        self.then(move |outcome| future::ready(outcome.tap_both(&on_success, &on_failure)))
    }

    // ------------------------------------------------------------------------
    // map
    // ------------------------------------------------------------------------

    pub fn map_success<V2, F>(&self, f: F) -> AsyncOutcome<V2>
    where
        V2: Send + 'static,
        F: Fn(V) -> Success<V2> + Send + Sync + 'static,
    {
        self.then(move |outcome| future::ready(outcome.map_success(&f)))
    }

    pub fn map_failure<F>(&self, f: F) -> Self
    where
        F: Fn(Vec<ErrorMessage>) -> Failure + Send + Sync + 'static,
    {
        self.then(move |outcome| future::ready(outcome.map_failure(&f)))
    }

    pub fn map_both<V2, S, E>(&self, on_success: S, on_failure: E) -> AsyncOutcome<V2>
    where
        V2: Send + 'static,
        S: Fn(V) -> Success<V2> + Send + Sync + 'static,
        E: Fn(Vec<ErrorMessage>) -> Failure + Send + Sync + 'static,
    {
        self.then(move |outcome| future::ready(outcome.map_both(&on_success, &on_failure)))
    }

    // ------------------------------------------------------------------------
    // chain
    // ------------------------------------------------------------------------

    /// Continue with `f` on success. `f` may return an [`Outcome`] or another
    /// [`AsyncOutcome`]; either way the upstream traces are appended to what
    /// it resolves to.
    pub fn chain_success<V2, F, R>(&self, f: F) -> AsyncOutcome<V2>
    where
        V2: Send + 'static,
        F: Fn(V) -> R + Send + Sync + 'static,
        R: IntoOutcomeFuture<V2>,
    {
        self.then(move |outcome| {
            let pending = match outcome {
                Outcome::Success(success) => {
                    let (value, traces) = success.into_parts();
                    Ok((f(value).into_outcome_future(), traces))
                }
                Outcome::Failure(failure) => Err(failure),
            };
            async move {
                match pending {
                    Ok((next, traces)) => carry_traces(next.await, traces),
                    Err(failure) => Outcome::Failure(failure),
                }
            }
        })
    }

    pub fn chain_failure<F, R>(&self, f: F) -> Self
    where
        F: Fn(Vec<ErrorMessage>) -> R + Send + Sync + 'static,
        R: IntoOutcomeFuture<V>,
    {
        self.then(move |outcome| {
            let pending = match outcome {
                Outcome::Success(success) => Err(success),
                Outcome::Failure(failure) => {
                    let (errors, traces) = failure.into_parts();
                    Ok((f(errors).into_outcome_future(), traces))
                }
            };
            async move {
                match pending {
                    Ok((next, traces)) => carry_traces(next.await, traces),
                    Err(success) => Outcome::Success(success),
                }
            }
        })
    }

    pub fn chain_both<V2, S, E, R>(&self, on_success: S, on_failure: E) -> AsyncOutcome<V2>
    where
        V2: Send + 'static,
        S: Fn(V) -> R + Send + Sync + 'static,
        E: Fn(Vec<ErrorMessage>) -> R + Send + Sync + 'static,
        R: IntoOutcomeFuture<V2>,
    {
        self.then(move |outcome| {
            let (next, traces) = match outcome {
                Outcome::Success(success) => {
                    let (value, traces) = success.into_parts();
                    (on_success(value).into_outcome_future(), traces)
                }
                Outcome::Failure(failure) => {
                    let (errors, traces) = failure.into_parts();
                    (on_failure(errors).into_outcome_future(), traces)
                }
            };
            async move { carry_traces(next.await, traces) }
        })
    }

    /// Transform the whole resolved outcome. Its traces are appended to the
    /// result, as with [`Outcome::chain`].
    pub fn chain<V2, F, R>(&self, f: F) -> AsyncOutcome<V2>
    where
        V2: Send + 'static,
        F: Fn(Outcome<V>) -> R + Send + Sync + 'static,
        R: IntoOutcomeFuture<V2>,
    {
        self.then(move |outcome| {
            let carried = outcome.get_traces();
            let next = f(outcome).into_outcome_future();
            async move { carry_traces(next.await, carried) }
        })
    }

    // ------------------------------------------------------------------------
    // recovery
    // ------------------------------------------------------------------------

    /// Resolves to a success on every path; see
    /// [`Outcome::convert_failure_to_success`].
    pub fn convert_failure_to_success(&self, default_value: V) -> Self
    where
        V: Clone + Sync,
    {
        self.then(move |outcome| {
            future::ready(Outcome::Success(
                outcome.convert_failure_to_success(default_value.clone()),
            ))
        })
    }
}

impl<V: Send + 'static> IntoFuture for AsyncOutcome<V> {
    type Output = Outcome<V>;
    type IntoFuture = BoxFuture<'static, Outcome<V>>;

    fn into_future(self) -> Self::IntoFuture {
        self.resolve()
    }
}

impl<V: Send + 'static> IntoFuture for &AsyncOutcome<V> {
    type Output = Outcome<V>;
    type IntoFuture = BoxFuture<'static, Outcome<V>>;

    fn into_future(self) -> Self::IntoFuture {
        self.resolve()
    }
}

impl<V: Send + 'static> From<Failure> for AsyncOutcome<V> {
    fn from(failure: Failure) -> Self {
        Self::failure(failure)
    }
}
