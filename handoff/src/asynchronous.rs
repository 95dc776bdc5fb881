//! Single-slot handoff between one producer task and one consumer task.
//!
//! Same contract as [`SingleSlotChannel`](crate::SingleSlotChannel), with the
//! two gates realised as tokio semaphores so waiting suspends the task instead
//! of the thread. Bound the wait with `tokio::time::timeout` where needed.
//!
//! Both `write` and `read` are cancellation safe: a future dropped while it is
//! still waiting for its turn leaves the channel untouched.

use core::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use futures::Stream;
use futures::stream;
use log::{debug, trace, warn};
use tokio::sync::Semaphore;

use crate::channel::ChannelState;
use crate::error::{ErrorKind, Rejected};
use crate::message::Message;

/// Async counterpart of [`SingleSlotChannel`](crate::SingleSlotChannel).
pub struct AsyncSingleSlotChannel<T> {
    /// One permit while the slot may be written.
    producer_may_write: Semaphore,

    /// One permit while the slot holds an unread value.
    consumer_may_read: Semaphore,

    /// Only touched by whichever side currently holds the turn.
    slot: Mutex<Option<Message<T>>>,

    end_written: AtomicBool,
    end_read: AtomicBool,
}

impl<T> AsyncSingleSlotChannel<T> {
    /// Creates an empty channel: the producer may write, the consumer waits.
    pub fn new() -> Self {
        Self {
            producer_may_write: Semaphore::new(1),
            consumer_may_read: Semaphore::new(0),
            slot: Mutex::new(None),
            end_written: AtomicBool::new(false),
            end_read: AtomicBool::new(false),
        }
    }

    /// Returns the consumer-side state.
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

    /// Writes a message, waiting until the previous one has been read.
    pub async fn write(&self, message: Message<T>, tag: &str) -> Result<(), Rejected<T>> {
        if self.end_written.load(Ordering::Acquire) {
            warn!("{tag}: write after end-of-stream rejected");
            return Err(Rejected::new(ErrorKind::Closed, message));
        }

        trace!("{tag}: about to acquire write permit");
        match self.producer_may_write.acquire().await {
            Ok(permit) => permit.forget(),
            // The semaphores are never closed.
            Err(_) => return Err(Rejected::new(ErrorKind::Closed, message)),
        }
        trace!("{tag}: have write permit");

        if message.is_end_of_stream() {
            self.end_written.store(true, Ordering::Release);
        }
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(message);

        trace!("{tag}: about to release read permit");
        self.consumer_may_read.add_permits(1);
        trace!("{tag}: read permit released");
        Ok(())
    }

    /// Writes a payload.
    pub async fn send(&self, value: T, tag: &str) -> Result<(), Rejected<T>> {
        self.write(Message::Payload(value), tag).await
    }

    /// Writes end-of-stream.
    pub async fn close(&self, tag: &str) -> Result<(), Rejected<T>> {
        self.write(Message::EndOfStream, tag).await
    }

    /// Reads the next message, waiting until one has been written.
    ///
    /// After end-of-stream has been read, returns it again immediately.
    pub async fn read(&self, tag: &str) -> Message<T> {
        if self.is_closed() {
            return Message::EndOfStream;
        }

        trace!("{tag}: about to acquire read permit");
        match self.consumer_may_read.acquire().await {
            Ok(permit) => permit.forget(),
            Err(_) => return Message::EndOfStream,
        }
        trace!("{tag}: have read permit");

        let taken = self.slot.lock().unwrap_or_else(PoisonError::into_inner).take();
        let message = match taken {
            Some(message) => message,
            None => unreachable!("read permit issued on an empty slot"),
        };

        if message.is_end_of_stream() {
            self.end_read.store(true, Ordering::Release);
            debug!("{tag}: end-of-stream read, channel closed");
        }

        trace!("{tag}: about to release write permit");
        self.producer_may_write.add_permits(1);
        trace!("{tag}: write permit released");
        message
    }

    /// Returns a stream of payloads that ends at end-of-stream.
    pub fn into_stream<'a>(&'a self, tag: &'a str) -> impl Stream<Item = T> + 'a {
        stream::unfold(self, move |channel| async move {
            channel
                .read(tag)
                .await
                .into_payload()
                .map(|value| (value, channel))
        })
    }
}

impl<T> Default for AsyncSingleSlotChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for AsyncSingleSlotChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncSingleSlotChannel")
            .field("state", &self.state())
            .field("producer_may_write", &self.producer_may_write.available_permits())
            .field("consumer_may_read", &self.consumer_may_read.available_permits())
            .finish_non_exhaustive()
    }
}
