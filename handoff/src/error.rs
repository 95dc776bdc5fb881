use core::fmt;

use crate::message::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The bounded wait elapsed before the peer took its turn.
    Timeout,
    /// End-of-stream has already been written; nothing more can be handed off.
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Error { kind }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::Timeout => write!(f, "Timed out waiting for the peer"),
            ErrorKind::Closed => write!(f, "Channel already closed by end-of-stream"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;

/// A write that could not be delivered.
///
/// The message is handed back so the caller can retry or dispose of it.
pub struct Rejected<T> {
    error: Error,
    message: Message<T>,
}

impl<T> Rejected<T> {
    pub(crate) fn new(kind: ErrorKind, message: Message<T>) -> Self {
        Self {
            error: Error::new(kind),
            message,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    pub fn error(&self) -> &Error {
        &self.error
    }

    /// Returns the message that was not written.
    pub fn into_message(self) -> Message<T> {
        self.message
    }
}

// Manual impl so `Rejected<T>` is usable with `?` for payloads that are not `Debug`.
impl<T> fmt::Debug for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejected")
            .field("kind", &self.error.kind)
            .field("end_of_stream", &self.message.is_end_of_stream())
            .finish()
    }
}

impl<T> fmt::Display for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "write rejected: {}", self.error)
    }
}

impl<T> std::error::Error for Rejected<T> {}

impl<T> From<Rejected<T>> for Error {
    fn from(rejected: Rejected<T>) -> Self {
        rejected.error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::new(ErrorKind::Timeout).to_string(),
            "Timed out waiting for the peer"
        );
        assert_eq!(
            Error::from(ErrorKind::Closed).to_string(),
            "Channel already closed by end-of-stream"
        );
    }

    #[test]
    fn test_rejected_returns_message() {
        let rejected = Rejected::new(ErrorKind::Closed, Message::Payload(7u32));
        assert_eq!(rejected.kind(), ErrorKind::Closed);
        assert_eq!(
            rejected.to_string(),
            "write rejected: Channel already closed by end-of-stream"
        );
        assert_eq!(rejected.into_message(), Message::Payload(7));
    }

    #[test]
    fn test_rejected_into_error() {
        let rejected: Rejected<u32> = Rejected::new(ErrorKind::Timeout, Message::EndOfStream);
        let error: Error = rejected.into();
        assert_eq!(error.kind(), ErrorKind::Timeout);
    }
}
