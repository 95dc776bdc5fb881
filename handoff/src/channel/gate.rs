//! Binary semaphore used for the two turn signals.
//!
//! Built on a crossbeam channel of capacity one: the single buffered token is
//! the permit.

use std::time::Duration;

use crossbeam_channel::{self as cc, RecvTimeoutError, TrySendError};

/// A binary semaphore: either open (one permit) or closed (none).
///
/// `acquire` takes the permit, blocking while the gate is closed;
/// `release` puts it back and wakes one waiter.
#[derive(Debug)]
pub(crate) struct Gate {
    permit_tx: cc::Sender<()>,
    permit_rx: cc::Receiver<()>,
}

impl Gate {
    /// Creates a gate in the given state.
    pub(crate) fn new(open: bool) -> Self {
        let (permit_tx, permit_rx) = cc::bounded(1);
        let gate = Self {
            permit_tx,
            permit_rx,
        };
        if open {
            gate.release();
        }
        gate
    }

    /// Blocks until the permit is available, then takes it.
    pub(crate) fn acquire(&self) {
        // Both ends live in `self`, so the channel never disconnects.
        if self.permit_rx.recv().is_err() {
            unreachable!("gate channel disconnected");
        }
    }

    /// Like [`acquire`](Self::acquire) but gives up after `timeout`.
    ///
    /// Returns true if the permit was taken. On expiry the gate is unchanged.
    /// A timeout too large to represent as a deadline waits without limit.
    pub(crate) fn acquire_timeout(&self, timeout: Duration) -> bool {
        match self.permit_rx.recv_timeout(timeout) {
            Ok(()) => true,
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => unreachable!("gate channel disconnected"),
        }
    }

    /// Makes the permit available and wakes one waiter.
    pub(crate) fn release(&self) {
        match self.permit_tx.try_send(()) {
            Ok(()) => {}
            Err(TrySendError::Full(())) => debug_assert!(false, "binary gate released twice"),
            Err(TrySendError::Disconnected(())) => unreachable!("gate channel disconnected"),
        }
    }

    /// Returns true if the permit is currently available.
    pub(crate) fn is_open(&self) -> bool {
        self.permit_rx.is_full()
    }
}
