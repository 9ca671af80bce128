//! Adapter from a schema-validation result to the outcome algebra.
//!
//! The validator itself is external. This module only understands its result
//! shape: `{success: true, data}` or `{success: false, error: {issues}}`.
//!
//! Translation:
//! - each issue with code `"custom"` becomes one `processError` whose code is
//!   the issue's message and whose data is the issue's params;
//! - all other issues collapse into a single `processError` / `validationFailed`
//!   with `data: {count, diagnostic}`, placed after the custom ones.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use verdict_types::{MessageDraft, codes, generate_error, types, wire};

use crate::outcome::{Failure, Outcome};

/// Issue code that marks a user-raised issue.
pub const CUSTOM_ISSUE_CODE: &str = "custom";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    /// Anything else the validator reported (paths, expected types, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ValidationIssue {
    #[must_use]
    pub fn is_custom(&self) -> bool {
        self.code == CUSTOM_ISSUE_CODE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

/// Result reported by the external validator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawValidationResult<X>")]
pub enum ValidationResult<X> {
    Valid(X),
    Invalid(ValidationError),
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "X: Deserialize<'de>"))]
struct RawValidationResult<X> {
    success: bool,
    // A present `"data": null` is a payload when `X` reads from null.
    #[serde(default, deserialize_with = "wire::present")]
    data: Option<X>,
    #[serde(default)]
    error: Option<ValidationError>,
}

impl<X> TryFrom<RawValidationResult<X>> for ValidationResult<X> {
    type Error = String;

    fn try_from(raw: RawValidationResult<X>) -> Result<Self, Self::Error> {
        match (raw.success, raw.data, raw.error) {
            (true, Some(data), _) => Ok(Self::Valid(data)),
            (true, None, _) => Err("`success: true` requires `data`".to_string()),
            (false, _, Some(error)) => Ok(Self::Invalid(error)),
            (false, _, None) => Err("`success: false` requires `error`".to_string()),
        }
    }
}

/// Translate a validation result into an outcome.
pub fn from_validation<X>(result: ValidationResult<X>) -> Outcome<X> {
    match result {
        ValidationResult::Valid(data) => Outcome::success(data),
        ValidationResult::Invalid(error) => Outcome::Failure(issues_to_failure(error.issues)),
    }
}

fn issues_to_failure(issues: Vec<ValidationIssue>) -> Failure {
    let (custom, other): (Vec<_>, Vec<_>) =
        issues.into_iter().partition(ValidationIssue::is_custom);

    let collapsed = (!other.is_empty()).then(|| validation_failed(&other));
    let mut drafts = custom.into_iter().map(custom_error).chain(collapsed);

    match drafts.next() {
        Some(first) => Failure::new(first).with_errors(drafts),
        // A rejection with no issues at all still has to say something.
        None => Failure::new(validation_failed(&[])),
    }
}

fn custom_error(issue: ValidationIssue) -> MessageDraft {
    let draft = generate_error(types::PROCESS_ERROR.as_str(), issue.message);
    match issue.params {
        Some(params) => draft.with_data(params),
        None => draft,
    }
}

fn validation_failed(diagnostic: &[ValidationIssue]) -> MessageDraft {
    let count = diagnostic.len();
    generate_error(
        types::PROCESS_ERROR.as_str(),
        codes::VALIDATION_FAILED.as_str(),
    )
    .with_data(json!({"count": count, "diagnostic": diagnostic}))
}
