//! Values carried through the slot.
//!
//! End-of-stream is its own variant rather than a reserved payload value, so
//! no payload can ever collide with it.

/// A value written into a handoff channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message<T> {
    /// A real value produced by the writer.
    Payload(T),

    /// The terminal marker. Once read, the channel is closed.
    EndOfStream,
}

impl<T> Message<T> {
    /// Returns true if this is the end-of-stream marker.
    #[inline]
    pub const fn is_end_of_stream(&self) -> bool {
        matches!(self, Message::EndOfStream)
    }

    /// Returns the payload, or `None` for end-of-stream.
    #[inline]
    pub fn into_payload(self) -> Option<T> {
        match self {
            Message::Payload(value) => Some(value),
            Message::EndOfStream => None,
        }
    }

    /// Borrows the payload, if any.
    #[inline]
    pub const fn as_payload(&self) -> Option<&T> {
        match self {
            Message::Payload(value) => Some(value),
            Message::EndOfStream => None,
        }
    }
}

impl<T> From<T> for Message<T> {
    fn from(value: T) -> Self {
        Message::Payload(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_is_not_end_of_stream() {
        let message = Message::from(0u8);
        assert!(!message.is_end_of_stream());
        assert_eq!(message.as_payload(), Some(&0));
        assert_eq!(message.into_payload(), Some(0));
    }

    #[test]
    fn test_end_of_stream() {
        let message: Message<u8> = Message::EndOfStream;
        assert!(message.is_end_of_stream());
        assert_eq!(message.into_payload(), None);
    }

    #[test]
    fn test_unit_payload_distinct_from_end_of_stream() {
        // A payload type with a single value still cannot alias the marker.
        assert_ne!(Message::Payload(()), Message::EndOfStream);
    }
}
