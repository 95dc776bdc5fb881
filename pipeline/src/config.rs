use anyhow::ensure;
use clap::ValueEnum;

pub const DEFAULT_MESSAGE_COUNT: usize = 10;
pub const DEFAULT_MIN_VALUE: u32 = 1;
pub const DEFAULT_MAX_VALUE: u32 = 101;

/// How the producer and consumer are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Runtime {
    /// Two OS threads over the blocking channel.
    Threads,
    /// Two tokio tasks over the async channel.
    Tasks,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Number of payloads written before end-of-stream.
    pub message_count: usize,
    /// Smallest value the producer draws (inclusive).
    pub min_value: u32,
    /// Largest value the producer draws (inclusive).
    pub max_value: u32,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
    pub runtime: Runtime,
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self {
            message_count: DEFAULT_MESSAGE_COUNT,
            min_value: DEFAULT_MIN_VALUE,
            max_value: DEFAULT_MAX_VALUE,
            seed: None,
            runtime: Runtime::Threads,
        }
    }

    pub fn with_message_count(mut self, count: usize) -> Self {
        self.message_count = count;
        self
    }

    pub fn with_range(mut self, min: u32, max: u32) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_runtime(mut self, runtime: Runtime) -> Self {
        self.runtime = runtime;
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.min_value <= self.max_value,
            "invalid value range {}..={}",
            self.min_value,
            self.max_value
        );
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}
