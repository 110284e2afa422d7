//! Train command implementation
//!
//! A toy training loop wired to configuration two ways. The eager policy
//! validates LEARNING_RATE and API_KEY before any work starts; the lazy
//! policy fetches raw strings up front and only parses them at their point
//! of use, so a bad value crashes mid-run after real work already happened.
//! The lazy path is the hazard, reproduced on purpose.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::thread;
use std::time::Duration;

use crate::load::{load, RawEnv};
use crate::schema::{FieldSpec, Schema};
use crate::source::ProcessEnv;
use crate::value::FieldType;

/// The epoch at which the optimizer is rebuilt from LEARNING_RATE,
/// i.e. the first dereference point on the lazy path.
const REBUILD_EPOCH: u32 = 3;

#[derive(Clone, Copy, ValueEnum)]
pub enum Policy {
    /// Validate everything at startup, before any work.
    Eager,
    /// Defer parsing to each point of use.
    Lazy,
}

#[derive(Args)]
pub struct TrainArgs {
    /// Configuration policy to demonstrate
    #[arg(long, value_enum, default_value = "eager")]
    pub policy: Policy,

    /// Number of simulated epochs
    #[arg(long, default_value_t = 6)]
    pub epochs: u32,

    /// Simulated work per step, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 250)]
    pub epoch_ms: u64,
}

/// LEARNING_RATE must be a positive float; API_KEY is a required secret.
fn training_schema() -> Schema {
    Schema::new("")
        .field(FieldSpec::new("learning_rate", FieldType::PositiveFloat))
        .field(FieldSpec::new("api_key", FieldType::Secret))
}

pub fn run(args: TrainArgs) -> Result<()> {
    match args.policy {
        Policy::Eager => run_eager(&args),
        Policy::Lazy => run_lazy(&args),
    }
}

fn run_eager(args: &TrainArgs) -> Result<()> {
    // Everything is read and validated here, before the first side effect.
    // A bad LEARNING_RATE or missing API_KEY stops the run right now, with
    // every problem listed at once.
    let config = load(&training_schema(), &ProcessEnv)?;

    println!("starting training run (eager policy)");
    heavy_setup(args.epoch_ms);

    for epoch in 1..=args.epochs {
        train_one_epoch(epoch, args.epoch_ms);
        if epoch == REBUILD_EPOCH {
            println!("rebuilding optimizer with learning rate {}", config.float("learning_rate")?);
        }
    }

    println!("pushing final metrics with api key {}", config.secret("api_key")?);
    println!("training completed");
    Ok(())
}

fn run_lazy(args: &TrainArgs) -> Result<()> {
    println!("starting training run (lazy policy)");
    heavy_setup(args.epoch_ms);

    // Raw strings only; nothing is parsed or checked yet.
    let raw = RawEnv::new(&ProcessEnv);
    let lr_raw = raw.get_raw("LEARNING_RATE");
    let api_key = raw.get_raw("API_KEY");

    for epoch in 1..=args.epochs {
        train_one_epoch(epoch, args.epoch_ms);
        if epoch == REBUILD_EPOCH {
            println!("rebuilding optimizer from LEARNING_RATE");
            // First dereference: the run has already burned epochs before
            // anyone looks at the value.
            let lr: f64 = lr_raw
                .as_deref()
                .context("LEARNING_RATE is not set")?
                .trim()
                .parse()
                .with_context(|| {
                    format!("cannot parse LEARNING_RATE {:?} as a float", lr_raw.as_deref().unwrap_or(""))
                })?;
            println!("set learning rate: {lr}");
        }
    }

    println!("pushing final metrics");
    let api_key = api_key.context("API_KEY is not set")?;
    // The raw string goes straight to the log; nothing redacts it here.
    println!("logged metrics with api key {api_key}");
    println!("training completed");
    Ok(())
}

fn heavy_setup(step_ms: u64) {
    println!("heavy setup...");
    sleep_ms(step_ms);
}

fn train_one_epoch(epoch: u32, step_ms: u64) {
    println!("epoch {epoch} running...");
    sleep_ms(step_ms);
}

fn sleep_ms(ms: u64) {
    if ms > 0 {
        thread::sleep(Duration::from_millis(ms));
    }
}
