//! The outcome algebra.
//!
//! [`Outcome`] is a closed two-variant sum: [`Success`] owns a value, [`Failure`]
//! owns a non-empty error list. Both own an ordered trace list. Variants never
//! change in place; every transform consumes the receiver and returns a new
//! instance.
//!
//! # Trace ordering
//!
//! Whenever two lists merge, the new outcome's own messages come first and the
//! carried-over messages are appended after, each group keeping its relative
//! order. `Success(v, [A, B]).chain_success(|_| Success(w, [C]))` therefore has
//! traces `[C, A, B]`.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;
use verdict_types::{ErrorMessage, Message, MessageDraft, error_or_substitute};

use crate::aggregate::from_result_array;
use crate::traced::{Traced, carry_traces, demote_errors};

// ============================================================================
// Success
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Success<V> {
    value: V,
    traces: Vec<Message>,
}

impl<V> Success<V> {
    #[must_use]
    pub fn new(value: V) -> Self {
        Self {
            value,
            traces: Vec::new(),
        }
    }

    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }

    #[must_use]
    pub fn into_value(self) -> V {
        self.value
    }

    #[must_use]
    pub fn into_parts(self) -> (V, Vec<Message>) {
        (self.value, self.traces)
    }
}

impl<V> Traced for Success<V> {
    fn traces(&self) -> &[Message] {
        &self.traces
    }

    fn extend_traces(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.traces.extend(messages);
    }
}

// ============================================================================
// Failure
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("a failure needs at least one error")]
pub struct EmptyErrorList;

/// A computation that could not produce a value.
///
/// The error list is never empty. Errors pass through validation on the way
/// in, so an invalid candidate shows up as an `internalError` entry instead of
/// disappearing.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    errors: Vec<ErrorMessage>,
    traces: Vec<Message>,
}

impl Failure {
    #[must_use]
    pub fn new(error: impl Into<MessageDraft>) -> Self {
        Self {
            errors: vec![error_or_substitute(error.into())],
            traces: Vec::new(),
        }
    }

    pub fn from_errors<I, D>(errors: I) -> Result<Self, EmptyErrorList>
    where
        I: IntoIterator<Item = D>,
        D: Into<MessageDraft>,
    {
        let errors: Vec<_> = errors
            .into_iter()
            .map(|e| error_or_substitute(e.into()))
            .collect();
        if errors.is_empty() {
            return Err(EmptyErrorList);
        }
        Ok(Self {
            errors,
            traces: Vec::new(),
        })
    }

    /// Rebuild from parts already known to hold at least one error.
    pub(crate) fn from_parts(errors: Vec<ErrorMessage>, traces: Vec<Message>) -> Self {
        debug_assert!(!errors.is_empty());
        Self { errors, traces }
    }

    #[must_use]
    pub fn errors(&self) -> &[ErrorMessage] {
        &self.errors
    }

    /// Defensive copy of the error list, in insertion order.
    #[must_use]
    pub fn get_errors(&self) -> Vec<ErrorMessage> {
        self.errors.clone()
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<ErrorMessage>, Vec<Message>) {
        (self.errors, self.traces)
    }

    /// Validate and append errors to this failure, in place.
    ///
    /// Appending N candidates always appends N entries.
    pub fn add_errors<I, D>(&mut self, errors: I) -> &mut Self
    where
        I: IntoIterator<Item = D>,
        D: Into<MessageDraft>,
    {
        self.errors
            .extend(errors.into_iter().map(|e| error_or_substitute(e.into())));
        self
    }

    /// By-value twin of [`Failure::add_errors`].
    pub fn with_errors<I, D>(mut self, errors: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<MessageDraft>,
    {
        self.add_errors(errors);
        self
    }

    pub(crate) fn extend_errors(&mut self, errors: impl IntoIterator<Item = ErrorMessage>) {
        self.errors.extend(errors);
    }
}

impl Traced for Failure {
    fn traces(&self) -> &[Message] {
        &self.traces
    }

    fn extend_traces(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.traces.extend(messages);
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = self.errors.iter().map(|e| e.code()).collect();
        write!(f, "failure: {}", codes.join(", "))
    }
}

impl StdError for Failure {}

// ============================================================================
// Outcome
// ============================================================================

/// The result of an operation: a value or a non-empty error list, plus the
/// trace of what happened along the way.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "this `Outcome` may be a `Failure`, which should be handled"]
pub enum Outcome<V> {
    Success(Success<V>),
    Failure(Failure),
}

impl<V> Outcome<V> {
    pub fn success(value: V) -> Self {
        Self::Success(Success::new(value))
    }

    pub fn failure(error: impl Into<MessageDraft>) -> Self {
        Self::Failure(Failure::new(error))
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    #[must_use]
    pub fn value(&self) -> Option<&V> {
        match self {
            Self::Success(s) => Some(s.value()),
            Self::Failure(_) => None,
        }
    }

    #[must_use]
    pub fn errors(&self) -> Option<&[ErrorMessage]> {
        match self {
            Self::Success(_) => None,
            Self::Failure(f) => Some(f.errors()),
        }
    }

    /// Defensive copy of the error list. `None` on success.
    #[must_use]
    pub fn get_errors(&self) -> Option<Vec<ErrorMessage>> {
        self.errors().map(<[ErrorMessage]>::to_vec)
    }

    /// Drop the traces and convert into a `Result`.
    pub fn into_result(self) -> Result<V, Failure> {
        match self {
            Self::Success(s) => Ok(s.into_value()),
            Self::Failure(f) => Err(f),
        }
    }

    // ------------------------------------------------------------------------
    // map
    // ------------------------------------------------------------------------

    /// Replace the success value. The current traces are appended after the
    /// new success's own traces. `f` is never called on a failure.
    pub fn map_success<V2>(self, f: impl FnOnce(V) -> Success<V2>) -> Outcome<V2> {
        match self {
            Self::Success(s) => {
                let (value, traces) = s.into_parts();
                Outcome::Success(carry_traces(f(value), traces))
            }
            Self::Failure(failure) => Outcome::Failure(failure),
        }
    }

    /// Replace the error list. The current traces are appended after the new
    /// failure's own traces. `f` is never called on a success.
    pub fn map_failure(self, f: impl FnOnce(Vec<ErrorMessage>) -> Failure) -> Self {
        match self {
            Self::Success(s) => Self::Success(s),
            Self::Failure(failure) => {
                let (errors, traces) = failure.into_parts();
                Self::Failure(carry_traces(f(errors), traces))
            }
        }
    }

    /// Dispatch to exactly one of `on_success` / `on_failure`.
    pub fn map_both<V2>(
        self,
        on_success: impl FnOnce(V) -> Success<V2>,
        on_failure: impl FnOnce(Vec<ErrorMessage>) -> Failure,
    ) -> Outcome<V2> {
        match self {
            Self::Success(s) => {
                let (value, traces) = s.into_parts();
                Outcome::Success(carry_traces(on_success(value), traces))
            }
            Self::Failure(failure) => {
                let (errors, traces) = failure.into_parts();
                Outcome::Failure(carry_traces(on_failure(errors), traces))
            }
        }
    }

    // ------------------------------------------------------------------------
    // chain
    // ------------------------------------------------------------------------

    /// Continue with another computation on success. `f` may return either
    /// variant; the original traces are appended onto whatever it returns.
    pub fn chain_success<V2>(self, f: impl FnOnce(V) -> Outcome<V2>) -> Outcome<V2> {
        match self {
            Self::Success(s) => {
                let (value, traces) = s.into_parts();
                carry_traces(f(value), traces)
            }
            Self::Failure(failure) => Outcome::Failure(failure),
        }
    }

    /// Recover from (or re-shape) a failure. `f` may return either variant.
    pub fn chain_failure(self, f: impl FnOnce(Vec<ErrorMessage>) -> Self) -> Self {
        match self {
            Self::Success(s) => Self::Success(s),
            Self::Failure(failure) => {
                let (errors, traces) = failure.into_parts();
                carry_traces(f(errors), traces)
            }
        }
    }

    pub fn chain_both<V2>(
        self,
        on_success: impl FnOnce(V) -> Outcome<V2>,
        on_failure: impl FnOnce(Vec<ErrorMessage>) -> Outcome<V2>,
    ) -> Outcome<V2> {
        match self {
            Self::Success(s) => {
                let (value, traces) = s.into_parts();
                carry_traces(on_success(value), traces)
            }
            Self::Failure(failure) => {
                let (errors, traces) = failure.into_parts();
                carry_traces(on_failure(errors), traces)
            }
        }
    }

    /// Transform the whole outcome unconditionally.
    ///
    /// `f` receives the outcome with its traces intact, and those traces are
    /// appended to the result again afterwards. Returning the input unchanged
    /// therefore duplicates its traces.
    pub fn chain<V2>(self, f: impl FnOnce(Self) -> Outcome<V2>) -> Outcome<V2> {
        let carried = self.get_traces();
        carry_traces(f(self), carried)
    }

    // ------------------------------------------------------------------------
    // tap
    // ------------------------------------------------------------------------

    pub fn tap(self, f: impl FnOnce(&Self)) -> Self {
        f(&self);
        self
    }

    pub fn tap_success(self, f: impl FnOnce(&V)) -> Self {
        if let Self::Success(s) = &self {
            f(s.value());
        }
        self
    }

    pub fn tap_failure(self, f: impl FnOnce(&[ErrorMessage])) -> Self {
        if let Self::Failure(failure) = &self {
            f(failure.errors());
        }
        self
    }

    /// Fire exactly one of the callbacks, matching the current variant.
    pub fn tap_both(
        self,
        on_success: impl FnOnce(&V),
        on_failure: impl FnOnce(&[ErrorMessage]),
    ) -> Self {
        match &self {
            Self::Success(s) => on_success(s.value()),
            Self::Failure(failure) => on_failure(failure.errors()),
        }
        self
    }

    // ------------------------------------------------------------------------
    // recovery
    // ------------------------------------------------------------------------

    /// Turn a failure into `Success(default_value)`.
    ///
    /// The errors are demoted to traces, followed by the failure's own traces,
    /// so nothing is lost. Identity on success.
    #[must_use]
    pub fn convert_failure_to_success(self, default_value: V) -> Success<V> {
        match self {
            Self::Success(s) => s,
            Self::Failure(failure) => {
                let (errors, traces) = failure.into_parts();
                let mut success = Success::new(default_value);
                success.extend_traces(demote_errors(errors));
                success.extend_traces(traces);
                success
            }
        }
    }
}

impl<V> Traced for Outcome<V> {
    fn traces(&self) -> &[Message] {
        match self {
            Self::Success(s) => s.traces(),
            Self::Failure(f) => f.traces(),
        }
    }

    fn extend_traces(&mut self, messages: impl IntoIterator<Item = Message>) {
        match self {
            Self::Success(s) => s.extend_traces(messages),
            Self::Failure(f) => f.extend_traces(messages),
        }
    }
}

impl<V> From<Success<V>> for Outcome<V> {
    fn from(success: Success<V>) -> Self {
        Self::Success(success)
    }
}

impl<V> From<Failure> for Outcome<V> {
    fn from(failure: Failure) -> Self {
        Self::Failure(failure)
    }
}

impl<V> From<Outcome<V>> for Result<V, Failure> {
    fn from(outcome: Outcome<V>) -> Self {
        outcome.into_result()
    }
}

/// Collect fail-fast: the first failure stops the scan.
///
/// Same semantics as [`crate::from_result_array`] with `first_failure_only`.
impl<X> FromIterator<Outcome<X>> for Outcome<Vec<X>> {
    fn from_iter<I: IntoIterator<Item = Outcome<X>>>(iter: I) -> Self {
        from_result_array(iter, true)
    }
}
