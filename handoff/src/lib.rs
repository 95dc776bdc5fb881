//! # Handoff - A Single-Slot Producer/Consumer Channel
//!
//! `handoff` moves values one at a time from exactly one producer to exactly
//! one consumer. The channel holds a single value and enforces strict
//! alternation:
//!
//! - **Write blocks** until the previous value has been read
//! - **Read blocks** until a value has been written
//! - **End-of-stream** is a dedicated [`Message`] variant, never a payload
//! - **Ordering**: the N-th read returns the N-th write, nothing dropped or repeated
//!
//! ## Architecture
//!
//! ```text
//!   producer                                          consumer
//!      │  write(msg)                                     │  read()
//!      ▼                                                 ▼
//! ┌───────────────────┐    ┌──────────┐    ┌───────────────────┐
//! │ producer_may_write│───►│   slot   │───►│ consumer_may_read │
//! │   (starts open)   │◄───┴──────────┴────│  (starts closed)  │
//! └───────────────────┘  read releases     └───────────────────┘
//!                        the write gate
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::thread;
//! use handoff::SingleSlotChannel;
//!
//! let channel = Arc::new(SingleSlotChannel::<i32>::new());
//!
//! let producer = {
//!     let channel = Arc::clone(&channel);
//!     thread::spawn(move || {
//!         for value in [5, 42, 7] {
//!             channel.send(value, "producer").unwrap();
//!         }
//!         channel.close("producer").unwrap();
//!     })
//! };
//!
//! let received: Vec<i32> = channel.iter("consumer").collect();
//! producer.join().unwrap();
//! assert_eq!(received, vec![5, 42, 7]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod asynchronous;
pub mod channel;
#[allow(missing_docs)]
pub mod error;
pub mod message;

// Re-export commonly used types
pub use asynchronous::AsyncSingleSlotChannel;
pub use channel::{ChannelState, SingleSlotChannel};
pub use error::{Error, ErrorKind, Rejected, Result};
pub use message::Message;
