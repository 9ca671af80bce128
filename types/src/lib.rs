//! Message model for Verdict.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies:
//! the structured [`Message`] every traced event is recorded as, the error-only
//! [`ErrorMessage`], the unvalidated [`MessageDraft`] built by the generators, and
//! the validation that sits between them.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod message;
mod proofs;
mod validate;
pub mod wire;

pub use message::{
    ErrorMessage, Message, MessageDraft, NotAnErrorKind, generate_error, generate_message,
};
pub use proofs::{EmptyStringError, NonEmptyStaticStr, NonEmptyString};
pub use validate::{
    DiagnosticIssue, MessageDiagnostic, error_or_substitute, invalid_message_error,
    message_or_substitute, validate_error, validate_message,
};

// ============================================================================
// Well-known strings
// ============================================================================

/// Message kinds.
pub mod kinds {
    use crate::NonEmptyStaticStr;

    pub const ERROR: NonEmptyStaticStr = NonEmptyStaticStr::new("error");
}

/// Error taxonomy.
pub mod types {
    use crate::NonEmptyStaticStr;

    /// Expected business-rule violation.
    pub const PROCESS_ERROR: NonEmptyStaticStr = NonEmptyStaticStr::new("processError");
    /// Infrastructure or external failure.
    pub const TECHNICAL_ISSUE: NonEmptyStaticStr = NonEmptyStaticStr::new("technicalIssue");
    /// Integrity violation inside the algebra itself.
    pub const INTERNAL_ERROR: NonEmptyStaticStr = NonEmptyStaticStr::new("internalError");
}

/// Codes produced by the library itself.
pub mod codes {
    use crate::NonEmptyStaticStr;

    pub const INVALID_TRACE_MESSAGE: NonEmptyStaticStr =
        NonEmptyStaticStr::new("invalidTraceMessage");
    pub const INVALID_ERROR: NonEmptyStaticStr = NonEmptyStaticStr::new("invalidError");
    pub const UNCAUGHT_EXCEPTION: NonEmptyStaticStr = NonEmptyStaticStr::new("uncaughtException");
    pub const VALIDATION_FAILED: NonEmptyStaticStr = NonEmptyStaticStr::new("validationFailed");
}
