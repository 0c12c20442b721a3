// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses the command line with clap and routes each subcommand
// to its use case. Reports are printed here and nowhere else.
//
//   digits    — softmax regression on MNIST
//   sentiment — logistic regression on review sentences

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, DigitsArgs, SentimentArgs};

use crate::application::{
    digits_use_case::{DigitsConfig, DigitsUseCase},
    sentiment_use_case::{SentimentConfig, SentimentUseCase},
};
use crate::infra::config_file::load_config;

#[derive(Parser, Debug)]
#[command(
    name = "linear-experiments",
    version,
    about = "Linear classifier experiments: MNIST softmax regression and review sentiment."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Digits(args)    => run_digits(args),
            Commands::Sentiment(args) => run_sentiment(args),
        }
    }
}

fn run_digits(args: DigitsArgs) -> Result<()> {
    let config: DigitsConfig = match args.config.clone() {
        Some(path) => load_config(&path)?,
        None => args.into(),
    };
    tracing::info!("Digits experiment ({:?} mode) on '{}'", config.mode, config.data_dir);

    let report = DigitsUseCase::new(config).execute()?;
    println!("\n{report}");
    Ok(())
}

fn run_sentiment(args: SentimentArgs) -> Result<()> {
    let config: SentimentConfig = match args.config.clone() {
        Some(path) => load_config(&path)?,
        None => args.into(),
    };
    tracing::info!("Sentiment experiment on {:?} in '{}'", config.sources, config.data_dir);

    let report = SentimentUseCase::new(config).execute()?;
    println!("\n{report}");
    Ok(())
}
