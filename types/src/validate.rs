//! Message validation and substitution.
//!
//! Validation turns a [`MessageDraft`] into a [`Message`] (or [`ErrorMessage`])
//! and reports every violated rule at once. The `*_or_substitute` functions are
//! the infallible ingestion path: an invalid draft is replaced by a synthetic
//! internal error that embeds the draft and the diagnostic, so appending N
//! drafts always appends N entries.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::message::{ErrorMessage, Message, MessageDraft};
use crate::proofs::{NonEmptyStaticStr, NonEmptyString};
use crate::{codes, kinds, types};

/// One violated validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticIssue {
    pub field: &'static str,
    pub reason: String,
}

/// Why a draft was rejected. Lists every violated rule in field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("invalid message: {}", summarize(.issues))]
pub struct MessageDiagnostic {
    pub issues: Vec<DiagnosticIssue>,
}

fn summarize(issues: &[DiagnosticIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{} {}", issue.field, issue.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

struct Checker {
    issues: Vec<DiagnosticIssue>,
}

impl Checker {
    fn required(&mut self, field: &'static str, value: &str) -> Option<NonEmptyString> {
        match NonEmptyString::new(value) {
            Ok(v) => Some(v),
            Err(_) => {
                self.fail(field, "must not be empty");
                None
            }
        }
    }

    fn optional(&mut self, field: &'static str, value: Option<&String>) -> Option<NonEmptyString> {
        let value = value?;
        match NonEmptyString::new(value.as_str()) {
            Ok(v) => Some(v),
            Err(_) => {
                self.fail(field, "must not be empty when present");
                None
            }
        }
    }

    fn fail(&mut self, field: &'static str, reason: impl Into<String>) {
        self.issues.push(DiagnosticIssue {
            field,
            reason: reason.into(),
        });
    }
}

fn check(draft: &MessageDraft, require_error_kind: bool) -> Result<Message, MessageDiagnostic> {
    let mut checker = Checker { issues: Vec::new() };

    let kind = checker.required("kind", &draft.kind);
    if require_error_kind && kind.is_some() && draft.kind != kinds::ERROR.as_str() {
        checker.fail("kind", format!("must be \"{}\"", kinds::ERROR));
    }
    let message_type = checker.required("type", &draft.message_type);
    let code = checker.required("code", &draft.code);
    if let Some(detail) = &draft.data_error {
        checker.fail("data", format!("is not JSON-serializable: {detail}"));
    }
    let issuer = checker.optional("issuer", draft.issuer.as_ref());
    let localized_message = checker.optional("localizedMessage", draft.localized_message.as_ref());

    match (kind, message_type, code) {
        (Some(kind), Some(message_type), Some(code)) if checker.issues.is_empty() => {
            Ok(Message::from_parts(
                kind,
                message_type,
                code,
                draft.data.clone(),
                issuer,
                localized_message,
            ))
        }
        _ => Err(MessageDiagnostic {
            issues: checker.issues,
        }),
    }
}

/// Validate a trace message candidate.
pub fn validate_message(draft: &MessageDraft) -> Result<Message, MessageDiagnostic> {
    check(draft, false)
}

/// Validate an error candidate. On top of the trace rules, `kind` must be `"error"`.
pub fn validate_error(draft: &MessageDraft) -> Result<ErrorMessage, MessageDiagnostic> {
    check(draft, true).map(ErrorMessage::from_message_unchecked)
}

/// Build the internal error that stands in for a rejected draft.
///
/// `data` is `{candidate, diagnostic}` with the candidate serialized as given.
#[must_use]
pub fn invalid_message_error(
    code: NonEmptyStaticStr,
    candidate: &MessageDraft,
    diagnostic: &MessageDiagnostic,
) -> ErrorMessage {
    let mut data = Map::new();
    data.insert(
        "candidate".to_string(),
        serde_json::to_value(candidate).unwrap_or(Value::Null),
    );
    data.insert(
        "diagnostic".to_string(),
        serde_json::to_value(diagnostic).unwrap_or(Value::Null),
    );
    ErrorMessage::known(types::INTERNAL_ERROR, code, Some(Value::Object(data)))
}

/// Ingest a trace candidate, substituting an `invalidTraceMessage` internal
/// error when it does not validate.
#[must_use]
pub fn message_or_substitute(draft: MessageDraft) -> Message {
    match validate_message(&draft) {
        Ok(message) => message,
        Err(diagnostic) => {
            tracing::warn!(
                code = %draft.code,
                %diagnostic,
                "Invalid trace message replaced by internal error"
            );
            invalid_message_error(codes::INVALID_TRACE_MESSAGE, &draft, &diagnostic).into_message()
        }
    }
}

/// Ingest an error candidate, substituting an `invalidError` internal error
/// when it does not validate.
#[must_use]
pub fn error_or_substitute(draft: MessageDraft) -> ErrorMessage {
    match validate_error(&draft) {
        Ok(error) => error,
        Err(diagnostic) => {
            tracing::warn!(
                code = %draft.code,
                %diagnostic,
                "Invalid error message replaced by internal error"
            );
            invalid_message_error(codes::INVALID_ERROR, &draft, &diagnostic)
        }
    }
}
