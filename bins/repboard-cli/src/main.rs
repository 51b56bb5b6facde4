//! Repboard operator CLI.
//!
//! Drives the scoreboard entry points against a local RocksDB record store.
//! Identities are base58. Request authentication is the caller's job: the
//! CLI trusts the `--authority`, `--voter`, and `--caller` it is given.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use repboard_core::constants::{DEFAULT_COOLDOWN_SECS, DEFAULT_TOP_CONTRIBUTOR_THRESHOLD};
use repboard_core::scoreboard::Scoreboard;
use repboard_core::types::{Identity, VoteDirection};
use repboard_store::{BalanceSnapshot, RocksStore};
use tracing::{info, warn};

use config::{CliConfig, LogFormat};

/// Repboard — token-gated reputation scoreboard.
#[derive(Parser, Debug)]
#[command(name = "repboard-cli", version, about = "Operate a Repboard reputation scoreboard")]
struct Args {
    /// Data directory for the record store
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// JSON balance snapshot of the board's token
    #[arg(long)]
    balances: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the board. The authority becomes its owner.
    Init {
        #[arg(long)]
        authority: Identity,
        #[arg(long)]
        token: Identity,
        /// Seconds between two votes of one voter on one target
        #[arg(long, default_value_t = DEFAULT_COOLDOWN_SECS, allow_negative_numbers = true)]
        cooldown: i64,
        /// Reputation needed to unlock the top contributor role
        #[arg(long, default_value_t = DEFAULT_TOP_CONTRIBUTOR_THRESHOLD, allow_negative_numbers = true)]
        threshold: i64,
    },
    /// Upvote a target.
    Upvote {
        #[arg(long)]
        voter: Identity,
        #[arg(long)]
        target: Identity,
        /// Vote time in Unix seconds (default: now)
        #[arg(long)]
        at: Option<i64>,
    },
    /// Downvote a target.
    Downvote {
        #[arg(long)]
        voter: Identity,
        #[arg(long)]
        target: Identity,
        /// Vote time in Unix seconds (default: now)
        #[arg(long)]
        at: Option<i64>,
    },
    /// Unlock the top contributor role for a target.
    Unlock {
        #[arg(long)]
        target: Identity,
    },
    /// Reset a target's score (authority only).
    Reset {
        #[arg(long)]
        caller: Identity,
        #[arg(long)]
        target: Identity,
    },
    /// Show a target's reputation entry.
    Show {
        #[arg(long)]
        target: Identity,
    },
    /// Show the board configuration.
    Board,
    /// List the highest-scoring targets.
    Top {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

impl Args {
    /// Layer CLI flags over the environment configuration.
    fn into_config(self) -> Result<(CliConfig, Command)> {
        self.into_config_with(|key| std::env::var(key).ok())
    }

    fn into_config_with(
        self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(CliConfig, Command)> {
        // A format flag masks the env value entirely.
        let format_flag = self.log_format.is_some();
        let env = CliConfig::from_lookup(|key| match key {
            "REPBOARD_LOG_FORMAT" if format_flag => None,
            _ => lookup(key),
        })?;
        let config = CliConfig {
            data_dir: self.data_dir.unwrap_or(env.data_dir),
            balances_path: self.balances.or(env.balances_path),
            log_level: self.log_level.unwrap_or(env.log_level),
            log_format: self.log_format.unwrap_or(env.log_format),
        };
        Ok((config, self.command))
    }
}

fn main() -> Result<()> {
    let (config, command) = Args::parse().into_config()?;
    init_logging(&config.log_level, config.log_format);

    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating data dir {}", config.data_dir.display()))?;
    let store = RocksStore::open(config.db_path())
        .with_context(|| format!("opening record store at {}", config.db_path().display()))?;
    let balances = match &config.balances_path {
        Some(path) => BalanceSnapshot::load(path)
            .with_context(|| format!("loading balances from {}", path.display()))?,
        None => BalanceSnapshot::default(),
    };
    let mut board = Scoreboard::new(store, balances);

    run(&mut board, &config, command)?;
    board.store().flush().context("flushing record store")?;
    Ok(())
}

fn run(
    board: &mut Scoreboard<RocksStore, BalanceSnapshot>,
    config: &CliConfig,
    command: Command,
) -> Result<()> {
    match command {
        Command::Init {
            authority,
            token,
            cooldown,
            threshold,
        } => {
            let cfg = board.initialize(authority, token, cooldown, threshold)?;
            print_json(&cfg)
        }
        Command::Upvote { voter, target, at } => cast(board, config, voter, target, VoteDirection::Up, at),
        Command::Downvote { voter, target, at } => {
            cast(board, config, voter, target, VoteDirection::Down, at)
        }
        Command::Unlock { target } => print_json(&board.unlock_role(target)?),
        Command::Reset { caller, target } => print_json(&board.reset_score(caller, target)?),
        Command::Show { target } => {
            let entry = board
                .entry(&target)?
                .with_context(|| format!("no reputation entry for {target}"))?;
            print_json(&entry)
        }
        Command::Board => {
            let cfg = board.board()?.context("board not initialized")?;
            print_json(&cfg)
        }
        Command::Top { limit } => print_json(&board.leaderboard(limit)?),
    }
}

fn cast(
    board: &mut Scoreboard<RocksStore, BalanceSnapshot>,
    config: &CliConfig,
    voter: Identity,
    target: Identity,
    direction: VoteDirection,
    at: Option<i64>,
) -> Result<()> {
    if config.balances_path.is_none() {
        warn!("no balance snapshot configured; every voter has zero balance");
    }
    let now = at.unwrap_or_else(|| chrono::Utc::now().timestamp());
    let entry = board.vote(voter, target, direction, now)?;
    info!(%voter, %target, %direction, now, "vote recorded");
    print_json(&entry)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Logs go to stderr so stdout stays JSON.
fn init_logging(level_str: &str, format: LogFormat) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
            .init();
    }
}
