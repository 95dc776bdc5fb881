//! Producer side of the pipeline: draws values and hands them off.

use std::ops::RangeInclusive;

use handoff::{AsyncSingleSlotChannel, SingleSlotChannel};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::PipelineConfig;

pub const PRODUCER_TAG: &str = "Producer";

/// Where produced values come from.
pub trait ValueSource {
    fn next_value(&mut self) -> u32;
}

impl<F: FnMut() -> u32> ValueSource for F {
    fn next_value(&mut self) -> u32 {
        self()
    }
}

/// Uniformly random values in the configured range.
#[derive(Debug)]
pub struct RandomSource {
    rng: StdRng,
    range: RangeInclusive<u32>,
}

impl RandomSource {
    pub fn new(config: &PipelineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng,
            range: config.min_value..=config.max_value,
        }
    }
}

impl ValueSource for RandomSource {
    fn next_value(&mut self) -> u32 {
        self.rng.random_range(self.range.clone())
    }
}

/// Writes `count` values from `source`, then end-of-stream.
///
/// Returns the values in the order they were written.
pub fn produce(
    channel: &SingleSlotChannel<u32>,
    source: &mut impl ValueSource,
    count: usize,
) -> anyhow::Result<Vec<u32>> {
    let mut produced = Vec::with_capacity(count);
    for _ in 0..count {
        let value = source.next_value();
        info!("{PRODUCER_TAG} got message: {value}");
        channel.send(value, PRODUCER_TAG)?;
        produced.push(value);
    }

    channel.close(PRODUCER_TAG)?;
    info!("{PRODUCER_TAG} sent end-of-stream after {count} messages");
    Ok(produced)
}

/// Async counterpart of [`produce`].
pub async fn produce_async(
    channel: &AsyncSingleSlotChannel<u32>,
    source: &mut impl ValueSource,
    count: usize,
) -> anyhow::Result<Vec<u32>> {
    let mut produced = Vec::with_capacity(count);
    for _ in 0..count {
        let value = source.next_value();
        info!("{PRODUCER_TAG} got message: {value}");
        channel.send(value, PRODUCER_TAG).await?;
        produced.push(value);
    }

    channel.close(PRODUCER_TAG).await?;
    info!("{PRODUCER_TAG} sent end-of-stream after {count} messages");
    Ok(produced)
}
