//! The blocking single-slot channel.

use core::fmt;
use core::iter::FusedIterator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use log::{debug, trace, warn};

use super::ChannelState;
use super::gate::Gate;
use crate::error::{Error, ErrorKind, Rejected, Result};
use crate::message::Message;

/// A one-element buffer shared by exactly one producer and one consumer.
///
/// Writes and reads strictly alternate: `write` blocks while the slot holds an
/// unread value, `read` blocks while it is empty. The N-th read returns the
/// N-th write.
///
/// Share it by wrapping it in an [`Arc`](std::sync::Arc) and handing a clone to
/// each side. Calling `write` from two producers, or `read` from two
/// consumers, at the same time is outside the contract.
///
/// # Blocking
///
/// [`write`](Self::write) and [`read`](Self::read) wait without limit for the
/// peer. Use [`write_timeout`](Self::write_timeout) and
/// [`read_timeout`](Self::read_timeout) for a bounded wait.
pub struct SingleSlotChannel<T> {
    /// Open while the slot may be written.
    producer_may_write: Gate,

    /// Open while the slot holds an unread value.
    consumer_may_read: Gate,

    /// Only touched by whichever side currently holds the turn.
    slot: Mutex<Option<Message<T>>>,

    /// Set once end-of-stream has been stored.
    end_written: AtomicBool,

    /// Set once end-of-stream has been read.
    end_read: AtomicBool,
}

impl<T> SingleSlotChannel<T> {
    /// Creates an empty channel: the producer may write, the consumer waits.
    pub fn new() -> Self {
        Self {
            producer_may_write: Gate::new(true),
            consumer_may_read: Gate::new(false),
            slot: Mutex::new(None),
            end_written: AtomicBool::new(false),
            end_read: AtomicBool::new(false),
        }
    }

    /// Returns the consumer-side state.
    ///
    /// The channel is [`Closed`](ChannelState::Closed) once end-of-stream has
    /// been read.
    pub fn state(&self) -> ChannelState {
        if self.end_read.load(Ordering::Acquire) {
            ChannelState::Closed
        } else {
            ChannelState::Open
        }
    }

    /// Returns true once end-of-stream has been read.
    pub fn is_closed(&self) -> bool {
        self.state() == ChannelState::Closed
    }

    /// Writes a message, blocking until the previous one has been read.
    ///
    /// `tag` only labels trace output. Returns [`ErrorKind::Closed`] with the
    /// message handed back if end-of-stream was already written.
    pub fn write(&self, message: Message<T>, tag: &str) -> core::result::Result<(), Rejected<T>> {
        let message = self.check_writable(message, tag)?;

        trace!("{tag}: about to acquire write gate");
        self.producer_may_write.acquire();
        trace!("{tag}: have write gate");
        self.hand_over(message, tag);
        Ok(())
    }

    /// Like [`write`](Self::write), but gives up after `timeout`.
    ///
    /// On [`ErrorKind::Timeout`] the channel is unchanged and the message is
    /// handed back.
    pub fn write_timeout(
        &self,
        message: Message<T>,
        tag: &str,
        timeout: Duration,
    ) -> core::result::Result<(), Rejected<T>> {
        let message = self.check_writable(message, tag)?;

        trace!("{tag}: about to acquire write gate (timeout {timeout:?})");
        if !self.producer_may_write.acquire_timeout(timeout) {
            debug!("{tag}: write timed out after {timeout:?}");
            return Err(Rejected::new(ErrorKind::Timeout, message));
        }
        trace!("{tag}: have write gate");
        self.hand_over(message, tag);
        Ok(())
    }

    /// Writes a payload.
    pub fn send(&self, value: T, tag: &str) -> core::result::Result<(), Rejected<T>> {
        self.write(Message::Payload(value), tag)
    }

    /// Writes end-of-stream. The consumer will stop after reading it.
    pub fn close(&self, tag: &str) -> core::result::Result<(), Rejected<T>> {
        self.write(Message::EndOfStream, tag)
    }

    /// Reads the next message, blocking until one has been written.
    ///
    /// Each written message is returned exactly once. After end-of-stream has
    /// been read, every further call returns [`Message::EndOfStream`] without
    /// blocking.
    pub fn read(&self, tag: &str) -> Message<T> {
        if self.is_closed() {
            return Message::EndOfStream;
        }

        trace!("{tag}: about to acquire read gate");
        self.consumer_may_read.acquire();
        trace!("{tag}: have read gate");
        self.take_over(tag)
    }

    /// Like [`read`](Self::read), but gives up after `timeout`.
    pub fn read_timeout(&self, tag: &str, timeout: Duration) -> Result<Message<T>> {
        if self.is_closed() {
            return Ok(Message::EndOfStream);
        }

        trace!("{tag}: about to acquire read gate (timeout {timeout:?})");
        if !self.consumer_may_read.acquire_timeout(timeout) {
            debug!("{tag}: read timed out after {timeout:?}");
            return Err(Error::new(ErrorKind::Timeout));
        }
        trace!("{tag}: have read gate");
        Ok(self.take_over(tag))
    }

    /// Returns a blocking iterator over payloads that ends at end-of-stream.
    pub fn iter<'a>(&'a self, tag: &'a str) -> Iter<'a, T> {
        Iter { channel: self, tag }
    }

    fn check_writable(
        &self,
        message: Message<T>,
        tag: &str,
    ) -> core::result::Result<Message<T>, Rejected<T>> {
        if self.end_written.load(Ordering::Acquire) {
            warn!("{tag}: write after end-of-stream rejected");
            return Err(Rejected::new(ErrorKind::Closed, message));
        }
        Ok(message)
    }

    // Caller holds the write turn.
    fn hand_over(&self, message: Message<T>, tag: &str) {
        if message.is_end_of_stream() {
            self.end_written.store(true, Ordering::Release);
        }
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(message);

        trace!("{tag}: about to release read gate");
        self.consumer_may_read.release();
        trace!("{tag}: read gate released");
    }

    // Caller holds the read turn.
    fn take_over(&self, tag: &str) -> Message<T> {
        let taken = self.slot.lock().unwrap_or_else(PoisonError::into_inner).take();
        let message = match taken {
            Some(message) => message,
            None => unreachable!("read gate opened on an empty slot"),
        };

        if message.is_end_of_stream() {
            self.end_read.store(true, Ordering::Release);
            debug!("{tag}: end-of-stream read, channel closed");
        }

        trace!("{tag}: about to release write gate");
        self.producer_may_write.release();
        trace!("{tag}: write gate released");
        message
    }
}

impl<T> Default for SingleSlotChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SingleSlotChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleSlotChannel")
            .field("state", &self.state())
            .field("producer_may_write", &self.producer_may_write.is_open())
            .field("consumer_may_read", &self.consumer_may_read.is_open())
            .finish_non_exhaustive()
    }
}

/// Blocking iterator returned by [`SingleSlotChannel::iter`].
#[derive(Debug)]
pub struct Iter<'a, T> {
    channel: &'a SingleSlotChannel<T>,
    tag: &'a str,
}

impl<T> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.channel.read(self.tag).into_payload()
    }
}

impl<T> FusedIterator for Iter<'_, T> {}
