//! # Ledger Runtime
//!
//! Runs one bond ledger operation against a file-backed store and prints
//! the result as JSON on stdout. Logs go to stderr, filtered by `RUST_LOG`.
//!
//! ```text
//! ledger-runtime init
//! ledger-runtime mint --count 2 --amount 500 --days 1
//! ledger-runtime buy b_1 Alice
//! ledger-runtime bond b_1
//! ledger-runtime tx t_1
//! ledger-runtime status
//! ledger-runtime history b_1
//! ```
//!
//! A whole command can also be passed as JSON with `exec`:
//!
//! ```text
//! ledger-runtime exec '{"op":"buyBond","id":"b_1","newOwner":"Alice"}'
//! ```

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use bond_ledger::{
    BondLedgerDependencies, BondLedgerService, FileBackedKVStore, LedgerCommand, SystemTimeSource,
    TimeSource, Timestamp,
};

use crate::config::RuntimeConfig;

const SECONDS_PER_DAY: Timestamp = 86_400;

/// Bond ledger command-line runtime
#[derive(Parser, Debug)]
#[command(name = "ledger-runtime")]
#[command(about = "Issue, transfer and inspect bonds in a local ledger file")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Seed the ledger with the default bonds and reset both counters
    Init,

    /// Mint new bonds owned by the issuer
    Mint {
        /// Number of bonds to mint
        #[arg(long, default_value_t = 1)]
        count: i64,

        /// Face value of each bond
        #[arg(long)]
        amount: i64,

        /// Expiry as a unix timestamp in seconds
        #[arg(long, conflicts_with = "days")]
        expiry: Option<Timestamp>,

        /// Expiry as days from now (used when --expiry is absent)
        #[arg(long, default_value_t = 30)]
        days: i64,

        /// Requested owner; recorded in logs only, bonds go to the issuer
        #[arg(long)]
        owner: Option<String>,
    },

    /// Transfer a bond to a new owner
    Buy {
        /// Bond id, e.g. b_1
        id: String,
        /// New owner
        new_owner: String,
    },

    /// Show a bond
    Bond { id: String },

    /// Show a transaction
    Tx { id: String },

    /// Show both sequence counters
    Status,

    /// Show the mint record and transfers of a bond
    History { id: String },

    /// Execute a JSON-encoded command
    Exec { json: String },
}

impl Command {
    fn into_ledger_command(self, now: Timestamp) -> Result<LedgerCommand> {
        let command = match self {
            Command::Init => LedgerCommand::InitLedger,
            Command::Mint {
                count,
                amount,
                expiry,
                days,
                owner,
            } => {
                let expiry = match expiry {
                    Some(expiry) => expiry,
                    None => days
                        .checked_mul(SECONDS_PER_DAY)
                        .and_then(|span| now.checked_add(span))
                        .context("--days is out of range")?,
                };
                LedgerCommand::Mint {
                    count,
                    amount,
                    owner,
                    expiry,
                }
            }
            Command::Buy { id, new_owner } => LedgerCommand::BuyBond { id, new_owner },
            Command::Bond { id } => LedgerCommand::GetBond { id },
            Command::Tx { id } => LedgerCommand::GetTransaction { id },
            Command::Status => LedgerCommand::LedgerStatus,
            Command::History { id } => LedgerCommand::BondHistory { id },
            Command::Exec { json } => {
                serde_json::from_str(&json).context("parsing JSON command")?
            }
        };
        Ok(command)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load configuration
    let config = RuntimeConfig::from_env()?;
    config.validate()?;
    let ctx = config.invocation_context()?;

    let store = FileBackedKVStore::open(&config.data_file)
        .with_context(|| format!("opening ledger file {}", config.data_file.display()))?;
    let time_source = SystemTimeSource;
    let now = time_source.now();

    let command = args.command.into_ledger_command(now)?;
    debug!("Invoking {} at {}", command.name(), now);

    let deps = BondLedgerDependencies {
        kv_store: store,
        time_source,
    };
    let mut service = BondLedgerService::new(deps, config.ledger);
    let name = command.name();
    let response = service
        .execute(&ctx, command)
        .with_context(|| format!("{} failed", name))?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    info!("{} completed", name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bond_ledger::test_utils::{ONE_DAY, T0};

    #[test]
    fn test_mint_expiry_from_days() {
        let args = Args::parse_from([
            "ledger-runtime", "mint", "--count", "2", "--amount", "500", "--days", "1",
        ]);
        let command = args.command.into_ledger_command(T0).unwrap();

        assert_eq!(
            command,
            LedgerCommand::Mint {
                count: 2,
                amount: 500,
                owner: None,
                expiry: T0 + ONE_DAY,
            }
        );
    }

    #[test]
    fn test_explicit_expiry_wins() {
        let args = Args::parse_from([
            "ledger-runtime", "mint", "--amount", "10", "--expiry", "1800000000",
        ]);
        let command = args.command.into_ledger_command(T0).unwrap();

        assert!(matches!(
            command,
            LedgerCommand::Mint {
                count: 1,
                expiry: 1_800_000_000,
                ..
            }
        ));
    }

    #[test]
    fn test_buy_and_exec_map_to_same_command() {
        let buy = Args::parse_from(["ledger-runtime", "buy", "b_1", "Alice"])
            .command
            .into_ledger_command(T0)
            .unwrap();
        let exec = Args::parse_from([
            "ledger-runtime",
            "exec",
            r#"{"op":"buyBond","id":"b_1","newOwner":"Alice"}"#,
        ])
        .command
        .into_ledger_command(T0)
        .unwrap();

        assert_eq!(buy, exec);
    }

    #[test]
    fn test_exec_rejects_unknown_op() {
        let args = Args::parse_from(["ledger-runtime", "exec", r#"{"op":"burn"}"#]);
        assert!(args.command.into_ledger_command(T0).is_err());
    }

    #[test]
    fn test_runs_against_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");
        let ctx = bond_ledger::InvocationContext::anonymous();

        {
            let store = FileBackedKVStore::open(&path).unwrap();
            let mut service = BondLedgerService::new(
                BondLedgerDependencies {
                    kv_store: store,
                    time_source: SystemTimeSource,
                },
                bond_ledger::LedgerConfig::default(),
            );
            service.execute(&ctx, LedgerCommand::InitLedger).unwrap();
            service
                .execute(
                    &ctx,
                    LedgerCommand::BuyBond {
                        id: "b_1".to_string(),
                        new_owner: "Alice".to_string(),
                    },
                )
                .unwrap();
        }

        let store = FileBackedKVStore::open(&path).unwrap();
        let mut service = BondLedgerService::new(
            BondLedgerDependencies {
                kv_store: store,
                time_source: SystemTimeSource,
            },
            bond_ledger::LedgerConfig::default(),
        );
        let response = service
            .execute(&ctx, LedgerCommand::GetBond { id: "b_1".to_string() })
            .unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["value"]["Owner"], "Alice");
    }
}
