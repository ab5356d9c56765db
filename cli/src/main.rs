//! lockrate: operator CLI for a persisted interest ledger.

mod commands;
mod config;
mod output;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::Parser;
use lockrate_accrual::{InterestLedger, LedgerEvent};
use lockrate_store_lmdb::LmdbEnvironment;
use lockrate_types::{Clock, SystemClock, Timestamp};

use crate::commands::Command;
use crate::config::LockrateConfig;

#[derive(Debug, Parser)]
#[command(name = "lockrate", version, about = "Interest ledger with locked-in holder rates")]
struct Cli {
    /// Path to a TOML configuration file. CLI flags and env vars override it.
    #[arg(long, env = "LOCKRATE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Data directory of the ledger store.
    #[arg(long, env = "LOCKRATE_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Evaluate the command at this timestamp (seconds) instead of the wall clock.
    #[arg(long, env = "LOCKRATE_AT", global = true)]
    at: Option<u64>,

    /// Log filter: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "LOCKRATE_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Print results and emitted events as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<LockrateConfig> {
        let mut config = match &self.config {
            Some(path) => LockrateConfig::from_toml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => LockrateConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        Ok(config)
    }

    fn now(&self) -> Timestamp {
        self.at.map(Timestamp::new).unwrap_or_else(|| SystemClock.now())
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;
    lockrate_utils::init_logging(config.log_format, &config.log_level);
    if let Some(path) = &cli.config {
        tracing::info!(path = %path.display(), "loaded config");
    }

    let env = LmdbEnvironment::open(&config.data_dir, config.map_size_bytes())
        .with_context(|| format!("opening ledger store at {}", config.data_dir.display()))?;
    let store = env.ledger_store();
    let mut ledger = InterestLedger::load_from_store(&store, &config.ledger)
        .context("loading ledger state")?;

    let events: Arc<Mutex<Vec<LedgerEvent>>> = Arc::default();
    {
        let events = Arc::clone(&events);
        ledger.subscribe(move |event| {
            tracing::info!(?event, "ledger event");
            if let Ok(mut events) = events.lock() {
                events.push(event.clone());
            }
        });
    }

    let now = cli.now();
    let outcome = cli.command.execute(&mut ledger, now)?;
    if let Some(touched) = &outcome.touched {
        ledger
            .save_holders(&store, touched)
            .context("saving ledger state")?;
    }

    let events = events.lock().map(|e| e.clone()).unwrap_or_default();
    println!("{}", output::render(&outcome.report, &events, cli.json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockrate_types::{AmountRequest, HolderId, Rate};

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "lockrate", "burn", "alice", "all", "--at", "180", "--json",
        ])
        .unwrap();
        assert_eq!(cli.at, Some(180));
        assert!(cli.json);
        match cli.command {
            Command::Burn { holder, amount } => {
                assert_eq!(holder, HolderId::new("alice"));
                assert_eq!(amount, AmountRequest::All);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rate_accepts_exponent_notation() {
        let cli = Cli::try_parse_from(["lockrate", "set-rate", "4e10"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::SetRate { rate } if rate == Rate::from_raw(40_000_000_000)
        ));
    }

    #[test]
    fn invalid_holder_is_rejected() {
        assert!(Cli::try_parse_from(["lockrate", "balance", ""]).is_err());
    }

    #[test]
    fn data_dir_flag_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lockrate.toml");
        std::fs::write(&path, "data_dir = \"/from/file\"\nlog_level = \"debug\"").unwrap();
        let cli = Cli::try_parse_from([
            "lockrate",
            "--config",
            path.to_str().unwrap(),
            "--data-dir",
            "/from/flag",
            "rate",
        ])
        .unwrap();
        let config = cli.load_config().unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/from/flag"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn commands_persist_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let alice = HolderId::new("alice");
        let params = lockrate_types::LedgerParams::with_rate(Rate::from_raw(1_000_000_000_000));
        {
            let env = LmdbEnvironment::open(dir.path(), LmdbEnvironment::DEFAULT_MAP_SIZE).unwrap();
            let store = env.ledger_store();
            let mut ledger = InterestLedger::load_from_store(&store, &params).unwrap();
            let outcome = Command::Mint {
                holder: alice.clone(),
                amount: 1_000_000,
                rate: None,
            }
            .execute(&mut ledger, Timestamp::EPOCH)
            .unwrap();
            ledger
                .save_holders(&store, outcome.touched.as_ref().unwrap())
                .unwrap();
        }
        let env = LmdbEnvironment::open(dir.path(), LmdbEnvironment::DEFAULT_MAP_SIZE).unwrap();
        let ledger = InterestLedger::load_from_store(&env.ledger_store(), &params).unwrap();
        assert_eq!(ledger.displayed_balance(&alice, Timestamp::new(360)), 1_000_360);
    }
}
