//! Outcome algebra for Verdict.
//!
//! Every operation returns an [`Outcome`]: either a [`Success`] carrying a value
//! or a [`Failure`] carrying a non-empty error list. Both carry a trace list of
//! [`Message`]s that combinators propagate, so the audit trail of a computation
//! survives every transform.
//!
//! Throwing code is bridged in at a single sanctioned boundary,
//! [`from_throwable`]. The asynchronous layer lives in `verdict-async`.

mod aggregate;
mod outcome;
mod traced;
pub mod validation;

pub use aggregate::{from_result_array, from_result_array_as_success, from_throwable};
pub use outcome::{EmptyErrorList, Failure, Outcome, Success};
pub use traced::{Traced, carry_traces, demote_errors};
pub use validation::{ValidationIssue, ValidationResult, from_validation};

pub use verdict_types::{
    ErrorMessage, Message, MessageDiagnostic, MessageDraft, codes, generate_error,
    generate_message, kinds, types, validate_error, validate_message,
};
