//! Destinations for consumed values.

use anyhow::bail;
use log::info;

use crate::consumer::CONSUMER_TAG;

/// Persists values handed to the consumer.
pub trait Store {
    fn store(&mut self, value: u32) -> anyhow::Result<()>;
}

/// In-memory store, optionally bounded.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Vec<u32>,
    capacity: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that fails once it holds `capacity` values.
    #[cfg(test)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    #[cfg(test)]
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn into_values(self) -> Vec<u32> {
        self.values
    }
}

impl Store for MemoryStore {
    fn store(&mut self, value: u32) -> anyhow::Result<()> {
        if let Some(capacity) = self.capacity
            && self.values.len() >= capacity
        {
            bail!("store full ({capacity} values)");
        }

        info!("{CONSUMER_TAG} storing message: {value}");
        self.values.push(value);
        Ok(())
    }
}
