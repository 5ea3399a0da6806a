//! Command line driver for gibbs-rating
//!
//! Loads configuration and a match table, runs the rating sequence or the
//! single-match chain-length study, and prints the results as JSON for a
//! reporting tool to consume.

use anyhow::Result;
use clap::{Parser, Subcommand};
use gibbs_rating::config::AppConfig;
use gibbs_rating::data::MatchTable;
use gibbs_rating::rating::{GibbsRatingCalculator, RatingTracker};
use gibbs_rating::report::SequenceReport;
use gibbs_rating::study::{chain_length_study, SingleMatch};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Gibbs Rating - Bayesian skill ratings from match results
#[derive(Parser)]
#[command(
    name = "gibbs-rating",
    version,
    about = "Estimate team skills from match results with a Gibbs sampler",
    long_about = "Gibbs Rating models each match as two Gaussian team skills and a \
                 performance difference whose sign is the observed result, samples the \
                 posterior with a Gibbs sampler, and carries the fitted Gaussian forward as \
                 each team's prior for its next match."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        global = true,
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        global = true,
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// RNG seed override
    #[arg(long, value_name = "SEED", global = true, help = "Fix the RNG seed")]
    seed: Option<u64>,

    /// Chain length override
    #[arg(long, value_name = "K", global = true, help = "Override Gibbs chain length")]
    chain_length: Option<usize>,

    /// Burn-in override
    #[arg(long, value_name = "N", global = true, help = "Override burn-in length")]
    burn_in: Option<usize>,

    /// Enable debug mode
    #[arg(short, long, global = true, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, global = true, help = "Validate configuration and exit")]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rate every team over a chronological match table
    Sequence {
        /// CSV with team1, team2, score1, score2 columns
        #[arg(short, long, value_name = "FILE")]
        matches: PathBuf,
    },
    /// Run one match (two fresh teams, team A wins) at several chain lengths
    Chain {
        #[arg(
            long,
            value_name = "LIST",
            value_delimiter = ',',
            default_value = "20,40,80,1000"
        )]
        chain_lengths: Vec<usize>,

        /// Include raw samples in the output
        #[arg(long)]
        samples: bool,
    },
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from environment, file and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(seed) = args.seed {
        config.sampler.seed = Some(seed);
    }

    if let Some(chain_length) = args.chain_length {
        config.sampler.chain_length = chain_length;
    }

    if let Some(burn_in) = args.burn_in {
        config.sampler.burn_in = burn_in;
    }

    gibbs_rating::config::validate_config(&config)?;
    Ok(config)
}

fn display_startup_banner(config: &AppConfig) {
    info!("Gibbs Rating v{}", gibbs_rating::VERSION);
    info!("   Chain length: {}", config.sampler.chain_length);
    info!("   Burn-in: {}", config.sampler.burn_in);
    info!("   Performance noise: {}", config.sampler.performance_noise);
    info!(
        "   Initial belief: {} ± {:.3}",
        config.sampler.initial_mean, config.sampler.initial_stddev
    );
    match config.sampler.seed {
        Some(seed) => info!("   Seed: {}", seed),
        None => info!("   Seed: from entropy"),
    }
    info!("   Failure policy: {:?}", config.tracker.failure_policy);
}

fn run_sequence_command(config: &AppConfig, matches: &Path) -> Result<()> {
    let table = MatchTable::from_path(matches)?;

    let calculator = GibbsRatingCalculator::new(&config.sampler)?;
    let mut tracker = RatingTracker::new(calculator, config.tracker.failure_policy);
    // Every team in the table starts from the configured prior
    tracker.register_teams(table.team_names());

    let stats = tracker.run(&table.observations()?)?.clone();
    let report = SequenceReport::new(tracker.into_histories(), stats);

    if let Some(leader) = report.standings.first() {
        info!(
            "Top rated: {} ({:.3} ± {:.3})",
            leader.team, leader.belief.mean, leader.belief.stddev
        );
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_chain_command(config: &AppConfig, chain_lengths: &[usize], samples: bool) -> Result<()> {
    let setup = SingleMatch::from_config(&config.sampler);
    let reports = chain_length_study(&config.sampler, &setup, chain_lengths, samples)?;

    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    display_startup_banner(&config);

    if args.dry_run {
        info!("Configuration validation successful, exiting");
        return Ok(());
    }

    let result = match &args.command {
        Command::Sequence { matches } => run_sequence_command(&config, matches),
        Command::Chain {
            chain_lengths,
            samples,
        } => run_chain_command(&config, chain_lengths, *samples),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
