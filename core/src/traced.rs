//! Trace-list behaviour shared by [`Success`](crate::Success),
//! [`Failure`](crate::Failure) and [`Outcome`](crate::Outcome).

use verdict_types::{ErrorMessage, Message, MessageDraft, message_or_substitute};

/// Something that owns an ordered trace list.
///
/// Implementors only provide storage access; validation and copying live in
/// the provided methods so every variant ingests traces the same way.
pub trait Traced {
    /// Borrow the trace list, in insertion order.
    fn traces(&self) -> &[Message];

    /// Append already-validated messages.
    fn extend_traces(&mut self, messages: impl IntoIterator<Item = Message>);

    /// Defensive copy of the trace list.
    fn get_traces(&self) -> Vec<Message> {
        self.traces().to_vec()
    }

    /// Validate and append traces in place, returning the same instance.
    ///
    /// Appending N candidates always appends N entries: an invalid candidate is
    /// replaced by an `invalidTraceMessage` internal error.
    fn add_traces<I, D>(&mut self, traces: I) -> &mut Self
    where
        I: IntoIterator<Item = D>,
        D: Into<MessageDraft>,
    {
        self.extend_traces(
            traces
                .into_iter()
                .map(|draft| message_or_substitute(draft.into())),
        );
        self
    }

    /// By-value twin of [`Traced::add_traces`].
    fn with_traces<I, D>(mut self, traces: I) -> Self
    where
        Self: Sized,
        I: IntoIterator<Item = D>,
        D: Into<MessageDraft>,
    {
        self.add_traces(traces);
        self
    }
}

/// Append `carried` after `target`'s own traces.
pub fn carry_traces<T: Traced>(mut target: T, carried: Vec<Message>) -> T {
    target.extend_traces(carried);
    target
}

/// Demote an error list to plain trace messages, keeping order.
pub fn demote_errors(errors: Vec<ErrorMessage>) -> impl Iterator<Item = Message> {
    errors.into_iter().map(ErrorMessage::into_message)
}
