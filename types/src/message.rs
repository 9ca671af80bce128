//! Core message domain model.
//!
//! Contains the validated [`Message`] record, its error-only specialization
//! [`ErrorMessage`], and the unvalidated [`MessageDraft`] produced by the
//! generators. A draft only becomes a `Message` by passing through
//! [`crate::validate_message`] or [`crate::validate_error`].

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::kinds;
use crate::proofs::{NonEmptyStaticStr, NonEmptyString};
use crate::wire;

/// A validated, structured record describing something that happened.
///
/// Wire shape is `{kind, type, code, data?, issuer?, localizedMessage?}`;
/// absent optionals are omitted. Deserializing re-checks the non-empty
/// invariants, so a `Message` read from the wire is as trustworthy as one
/// built locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    kind: NonEmptyString,
    #[serde(rename = "type")]
    message_type: NonEmptyString,
    code: NonEmptyString,
    #[serde(
        default,
        deserialize_with = "wire::present",
        skip_serializing_if = "Option::is_none"
    )]
    data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    issuer: Option<NonEmptyString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    localized_message: Option<NonEmptyString>,
}

impl Message {
    pub(crate) fn from_parts(
        kind: NonEmptyString,
        message_type: NonEmptyString,
        code: NonEmptyString,
        data: Option<Value>,
        issuer: Option<NonEmptyString>,
        localized_message: Option<NonEmptyString>,
    ) -> Self {
        Self {
            kind,
            message_type,
            code,
            data,
            issuer,
            localized_message,
        }
    }

    /// Build a message from compile-time checked strings. Cannot fail.
    #[must_use]
    pub fn known(
        kind: NonEmptyStaticStr,
        message_type: NonEmptyStaticStr,
        code: NonEmptyStaticStr,
        data: Option<Value>,
    ) -> Self {
        Self::from_parts(kind.into(), message_type.into(), code.into(), data, None, None)
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        self.kind.as_str()
    }

    #[must_use]
    pub fn message_type(&self) -> &str {
        self.message_type.as_str()
    }

    #[must_use]
    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    #[must_use]
    pub fn issuer(&self) -> Option<&str> {
        self.issuer.as_deref()
    }

    #[must_use]
    pub fn localized_message(&self) -> Option<&str> {
        self.localized_message.as_deref()
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind.as_str() == kinds::ERROR.as_str()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}/{}", self.kind, self.message_type, self.code)?;
        if let Some(localized) = &self.localized_message {
            write!(f, ": {localized}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
#[error("expected kind \"error\", got \"{kind}\"")]
pub struct NotAnErrorKind {
    pub kind: String,
}

/// A [`Message`] whose `kind` is `"error"`.
///
/// Only lives inside a failure's error list. Demote it to a plain trace with
/// [`ErrorMessage::into_message`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Message", into = "Message")]
pub struct ErrorMessage(Message);

impl ErrorMessage {
    pub(crate) fn from_message_unchecked(message: Message) -> Self {
        debug_assert!(message.is_error());
        Self(message)
    }

    /// Build an error from compile-time checked strings. Cannot fail.
    #[must_use]
    pub fn known(
        message_type: NonEmptyStaticStr,
        code: NonEmptyStaticStr,
        data: Option<Value>,
    ) -> Self {
        Self(Message::known(kinds::ERROR, message_type, code, data))
    }

    #[must_use]
    pub fn as_message(&self) -> &Message {
        &self.0
    }

    #[must_use]
    pub fn into_message(self) -> Message {
        self.0
    }
}

impl TryFrom<Message> for ErrorMessage {
    type Error = NotAnErrorKind;

    fn try_from(message: Message) -> Result<Self, Self::Error> {
        if message.is_error() {
            Ok(Self(message))
        } else {
            Err(NotAnErrorKind {
                kind: message.kind.into_inner(),
            })
        }
    }
}

impl From<ErrorMessage> for Message {
    fn from(error: ErrorMessage) -> Self {
        error.0
    }
}

impl Deref for ErrorMessage {
    type Target = Message;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An unvalidated message candidate.
///
/// The generators copy what they are given verbatim; nothing is checked until
/// the draft is validated, which is what `add_traces` / `add_errors` do on
/// ingestion. Serializing a draft yields exactly the caller's input, which is
/// what gets embedded when a draft is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDraft {
    pub kind: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub code: String,
    #[serde(
        default,
        deserialize_with = "wire::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localized_message: Option<String>,
    /// Set when `with_data` could not serialize its argument.
    #[serde(skip)]
    pub(crate) data_error: Option<String>,
}

impl MessageDraft {
    /// Attach a JSON payload. The value is serialized immediately; a
    /// serialization failure is kept on the draft and reported by validation.
    #[must_use]
    pub fn with_data(mut self, data: impl Serialize) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => {
                self.data = Some(value);
                self.data_error = None;
            }
            Err(e) => {
                self.data = None;
                self.data_error = Some(e.to_string());
            }
        }
        self
    }

    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    #[must_use]
    pub fn with_localized_message(mut self, localized_message: impl Into<String>) -> Self {
        self.localized_message = Some(localized_message.into());
        self
    }

    #[must_use]
    pub fn data_error(&self) -> Option<&str> {
        self.data_error.as_deref()
    }
}

impl From<Message> for MessageDraft {
    fn from(message: Message) -> Self {
        Self {
            kind: message.kind.into_inner(),
            message_type: message.message_type.into_inner(),
            code: message.code.into_inner(),
            data: message.data,
            issuer: message.issuer.map(NonEmptyString::into_inner),
            localized_message: message.localized_message.map(NonEmptyString::into_inner),
            data_error: None,
        }
    }
}

impl From<&Message> for MessageDraft {
    fn from(message: &Message) -> Self {
        Self::from(message.clone())
    }
}

impl From<ErrorMessage> for MessageDraft {
    fn from(error: ErrorMessage) -> Self {
        Self::from(error.0)
    }
}

impl From<&ErrorMessage> for MessageDraft {
    fn from(error: &ErrorMessage) -> Self {
        Self::from(error.0.clone())
    }
}

/// Pure constructor for a trace message candidate. Inputs are taken verbatim.
#[must_use]
pub fn generate_message(
    kind: impl Into<String>,
    message_type: impl Into<String>,
    code: impl Into<String>,
) -> MessageDraft {
    MessageDraft {
        kind: kind.into(),
        message_type: message_type.into(),
        code: code.into(),
        data: None,
        issuer: None,
        localized_message: None,
        data_error: None,
    }
}

/// Pure constructor for an error candidate: a message draft with `kind`
/// fixed to `"error"`.
#[must_use]
pub fn generate_error(message_type: impl Into<String>, code: impl Into<String>) -> MessageDraft {
    generate_message(kinds::ERROR.as_str(), message_type, code)
}
