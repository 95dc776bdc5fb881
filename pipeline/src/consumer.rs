//! Consumer side of the pipeline: drains the channel into a [`Store`].
//!
//! A failing store never stops the drain. The producer would otherwise be left
//! blocked on a slot nobody reads.

use handoff::{AsyncSingleSlotChannel, Message, SingleSlotChannel};
use log::{error, info};

use crate::store::Store;

pub const CONSUMER_TAG: &str = "Consumer";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConsumeReport {
    /// Reads performed, including the one that returned end-of-stream.
    pub reads: usize,
    /// Payloads the store accepted.
    pub stored: usize,
    /// Payloads the store rejected.
    pub failed: usize,
}

impl ConsumeReport {
    fn record(&mut self, value: u32, store: &mut impl Store) {
        match store.store(value) {
            Ok(()) => self.stored += 1,
            Err(e) => {
                error!("{CONSUMER_TAG} failed to store message {value}: {e:#}");
                self.failed += 1;
            }
        }
    }
}

/// Reads until end-of-stream, storing every payload.
pub fn consume(channel: &SingleSlotChannel<u32>, store: &mut impl Store) -> ConsumeReport {
    let mut report = ConsumeReport::default();
    loop {
        let message = channel.read(CONSUMER_TAG);
        report.reads += 1;
        match message {
            Message::Payload(value) => report.record(value, store),
            Message::EndOfStream => break,
        }
    }

    info!("{CONSUMER_TAG} reached end-of-stream after {} reads", report.reads);
    report
}

/// Async counterpart of [`consume`].
pub async fn consume_async(
    channel: &AsyncSingleSlotChannel<u32>,
    store: &mut impl Store,
) -> ConsumeReport {
    let mut report = ConsumeReport::default();
    loop {
        let message = channel.read(CONSUMER_TAG).await;
        report.reads += 1;
        match message {
            Message::Payload(value) => report.record(value, store),
            Message::EndOfStream => break,
        }
    }

    info!("{CONSUMER_TAG} reached end-of-stream after {} reads", report.reads);
    report
}
