//! Blocking single-slot handoff between one producer and one consumer thread.
//!
//! The slot is guarded by two binary gates. `producer_may_write` starts open
//! and `consumer_may_read` starts closed; each operation takes its own gate
//! and, once done with the slot, opens the other one.

mod gate;
mod slot;

pub use slot::{Iter, SingleSlotChannel};

/// Channel state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Messages are still flowing.
    Open,

    /// End-of-stream has been read. Irreversible.
    Closed,
}
