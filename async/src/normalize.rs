//! Turning uncontrolled panics and rejections into typed failures.

use std::any::Any;

use serde_json::json;
use verdict_core::{ErrorMessage, Failure, codes, types};

/// The failure a panic or rejection is normalized into:
/// `technicalIssue` / `uncaughtException` with `data: {reason}`.
#[must_use]
pub fn uncaught_exception(reason: impl Into<String>) -> Failure {
    let reason = reason.into();
    Failure::new(ErrorMessage::known(
        types::TECHNICAL_ISSUE,
        codes::UNCAUGHT_EXCEPTION,
        Some(json!({ "reason": reason })),
    ))
}

/// Stringify a rejection, including its cause chain.
pub(crate) fn rejection_reason(rejection: &anyhow::Error) -> String {
    format!("{rejection:#}")
}

pub(crate) fn panic_payload_to_string(payload: &Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
