mod config;
mod consumer;
mod producer;
mod store;

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use anyhow::{anyhow, bail};
use clap::Parser;
use handoff::{AsyncSingleSlotChannel, SingleSlotChannel};
use log::{LevelFilter, error, info};

use crate::config::{
    DEFAULT_MAX_VALUE, DEFAULT_MESSAGE_COUNT, DEFAULT_MIN_VALUE, PipelineConfig, Runtime,
};
use crate::consumer::{ConsumeReport, consume, consume_async};
use crate::producer::{RandomSource, produce, produce_async};
use crate::store::MemoryStore;

/// Hands random values from a producer to a consumer through a single-slot channel.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Number of values to produce before end-of-stream.
    #[arg(short = 'n', long, default_value_t = DEFAULT_MESSAGE_COUNT)]
    count: usize,

    /// Smallest value to produce (inclusive).
    #[arg(long, default_value_t = DEFAULT_MIN_VALUE)]
    min: u32,

    /// Largest value to produce (inclusive).
    #[arg(long, default_value_t = DEFAULT_MAX_VALUE)]
    max: u32,

    /// Seed for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Run producer and consumer on threads or tokio tasks.
    #[arg(long, value_enum, default_value_t = Runtime::Threads)]
    runtime: Runtime,

    /// Default log level; `RUST_LOG` takes precedence.
    #[arg(long, env = "PIPELINE_LOG_LEVEL", default_value = "info")]
    log_level: LevelFilter,
}

impl From<&Cli> for PipelineConfig {
    fn from(cli: &Cli) -> Self {
        PipelineConfig::new()
            .with_message_count(cli.count)
            .with_range(cli.min, cli.max)
            .with_seed(cli.seed)
            .with_runtime(cli.runtime)
    }
}

struct Outcome {
    produced: Vec<u32>,
    stored: Vec<u32>,
    report: ConsumeReport,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    env_logger::builder()
        .filter_level(args.log_level)
        .parse_default_env()
        .init();

    let config = PipelineConfig::from(&args);
    config.validate()?;
    info!("Starting pipeline: {config:?}");

    let start = Instant::now();
    let outcome = match config.runtime {
        Runtime::Threads => run_threads(&config)?,
        Runtime::Tasks => run_tasks(&config)?,
    };
    let elapsed = start.elapsed();

    info!("=== Pipeline Complete ===");
    info!("Produced: {}", outcome.produced.len());
    info!("Stored: {}", outcome.report.stored);
    info!("Failed: {}", outcome.report.failed);
    info!("Reads: {}", outcome.report.reads);
    info!("Time: {:.3} ms", elapsed.as_secs_f64() * 1000.0);

    if outcome.stored != outcome.produced {
        error!(
            "Stored sequence {:?} differs from produced sequence {:?}",
            outcome.stored, outcome.produced
        );
        bail!("handoff lost or reordered values");
    }

    Ok(())
}

/// Producer and consumer on two OS threads.
fn run_threads(config: &PipelineConfig) -> anyhow::Result<Outcome> {
    let channel = Arc::new(SingleSlotChannel::<u32>::new());

    let producer = {
        let channel = Arc::clone(&channel);
        let mut source = RandomSource::new(config);
        let count = config.message_count;
        thread::Builder::new()
            .name("producer".into())
            .spawn(move || produce(&channel, &mut source, count))?
    };

    let consumer = {
        let channel = Arc::clone(&channel);
        thread::Builder::new().name("consumer".into()).spawn(move || {
            let mut store = MemoryStore::new();
            let report = consume(&channel, &mut store);
            (store, report)
        })?
    };

    let ((store, report), produced) = join_threads(consumer, producer)?;

    Ok(Outcome {
        produced,
        stored: store.into_values(),
        report,
    })
}

/// Joins the consumer first: if it died, the producer is stuck in `write` for good.
fn join_threads<C>(
    consumer: JoinHandle<C>,
    producer: JoinHandle<anyhow::Result<Vec<u32>>>,
) -> anyhow::Result<(C, Vec<u32>)> {
    let consumed = consumer
        .join()
        .map_err(|_| anyhow!("consumer thread panicked"))?;
    let produced = producer
        .join()
        .map_err(|_| anyhow!("producer thread panicked"))??;
    Ok((consumed, produced))
}

/// Producer and consumer as two tokio tasks.
fn run_tasks(config: &PipelineConfig) -> anyhow::Result<Outcome> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let mut source = RandomSource::new(config);
    let count = config.message_count;

    runtime.block_on(async move {
        let channel = Arc::new(AsyncSingleSlotChannel::<u32>::new());

        let producer = {
            let channel = Arc::clone(&channel);
            tokio::spawn(async move { produce_async(&channel, &mut source, count).await })
        };

        let consumer = {
            let channel = Arc::clone(&channel);
            tokio::spawn(async move {
                let mut store = MemoryStore::new();
                let report = consume_async(&channel, &mut store).await;
                (store, report)
            })
        };

        let produced = producer.await??;
        let (store, report) = consumer.await?;

        Ok::<_, anyhow::Error>(Outcome {
            produced,
            stored: store.into_values(),
            report,
        })
    })
}
