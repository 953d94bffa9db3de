//! CLI command handling for drip

use clap::{Args, Parser, Subcommand};
use colored::*;
use crate::config::{DripConfig, IndexRange};
use crate::error::DripResult;
use crate::funder::Funder;
use crate::keys::{Account, KeyDeriver};
use crate::report::FundingReport;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "drip")]
#[command(about = "Derive Ethereum test accounts from a mnemonic and fund them from a faucet")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Derive accounts and request faucet funds for each
    Run {
        #[command(flatten)]
        range: RangeArgs,

        #[arg(long, value_name = "URL")]
        faucet: Option<String>,

        /// Derive and list accounts without contacting the faucet
        #[arg(long)]
        dry_run: bool,

        /// Print per-address outcomes as JSON
        #[arg(long)]
        json: bool,
    },

    /// Derive accounts and print them
    Derive {
        #[command(flatten)]
        range: RangeArgs,

        #[arg(long)]
        show_keys: bool,

        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// Number of addresses to fund
    #[arg(long)]
    pub count: Option<u32>,

    /// First derivation index
    #[arg(long)]
    pub start: Option<u32>,

    /// Derive from index 0 up to start + count
    #[arg(long)]
    pub legacy_range: bool,
}

impl RangeArgs {
    pub fn apply(&self, config: &mut DripConfig) {
        if let Some(count) = self.count {
            config.ethereum.addresses_number = count;
        }
        if let Some(start) = self.start {
            config.ethereum.start_number = start;
        }
        if self.legacy_range {
            config.derivation.range = IndexRange::Legacy;
        }
    }
}


#[derive(Serialize)]
struct AccountRow {
    index: u32,
    path: String,
    address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    private_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    public_key: Option<String>,
}

impl AccountRow {
    fn new(account: &Account, show_keys: bool) -> Self {
        Self {
            index: account.index,
            path: account.path(),
            address: account.address.to_string(),
            private_key: show_keys.then(|| format!("0x{}", account.private_key_hex())),
            public_key: show_keys.then(|| format!("0x{}", account.public_key_hex())),
        }
    }
}


pub struct CliHandler {
    config: DripConfig,
}

impl CliHandler {

    pub fn new() -> Self {
        Self {
            config: DripConfig::default(),
        }
    }

    pub fn handle(&mut self, cli: &Cli) -> DripResult<()> {
        self.config = DripConfig::load(cli.config.as_deref())?;

        match &cli.command {
            Commands::Run { range, faucet, dry_run, json } => {
                range.apply(&mut self.config);
                if let Some(faucet) = faucet {
                    self.config.ethereum.faucet = faucet.clone();
                }
                self.handle_run(*dry_run, *json)
            }
            Commands::Derive { range, show_keys, json } => {
                range.apply(&mut self.config);
                self.handle_derive(*show_keys, *json)
            }
            Commands::Config => self.handle_config(),
        }
    }

    fn handle_run(&self, dry_run: bool, json: bool) -> DripResult<()> {
        if dry_run {
            self.config.validate_derivation()?;
        } else {
            self.config.validate()?;
        }

        let accounts = self.derive_accounts()?;

        if dry_run {
            print_accounts(&accounts, false);
            return Ok(());
        }

        println!("{}", "💧 Start sending funding requests".blue());
        println!("  Faucet: {}", self.config.ethereum.faucet);
        println!("  Addresses: {}", self.config.ethereum.addresses_number);

        let mut funder = Funder::from_config(&self.config)?;
        let report = funder.run(&accounts);

        if json {
            println!("{}", serde_json::to_string_pretty(&report.outcomes)?);
        } else {
            print_report(&report);
        }
        Ok(())
    }

    fn handle_derive(&self, show_keys: bool, json: bool) -> DripResult<()> {
        self.config.validate_derivation()?;
        let accounts = self.derive_accounts()?;

        if json {
            let rows: Vec<AccountRow> = accounts.values().map(|a| AccountRow::new(a, show_keys)).collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        } else {
            print_accounts(&accounts, show_keys);
        }
        Ok(())
    }

    fn handle_config(&self) -> DripResult<()> {
        println!("{}", "⚙️  Effective configuration:".blue());
        println!("{}", serde_json::to_string_pretty(&self.config.redacted())?);
        Ok(())
    }

    fn derive_accounts(&self) -> DripResult<BTreeMap<u32, Account>> {
        let range = self.config.derivation_range()?;
        println!("{}", format!("🔑 Generating addresses {}..{}", range.start, range.end).blue());

        let started = Instant::now();
        let deriver = KeyDeriver::new(&self.config.ethereum.mnemonic)?;
        let accounts = deriver.derive_range(range)?;

        println!("  Derived {} accounts in {:?}", accounts.len(), started.elapsed());
        Ok(accounts)
    }
}

impl Default for CliHandler {
    fn default() -> Self {
        Self::new()
    }
}


fn print_accounts(accounts: &BTreeMap<u32, Account>, show_keys: bool) {
    for account in accounts.values() {
        println!("  {:>4}  {}  {}", account.index, account.address, account.path().dimmed());
        if show_keys {
            println!("        private: 0x{}", account.private_key_hex());
            println!("        public:  0x{}", account.public_key_hex());
        }
    }
}

fn print_report(report: &FundingReport) {
    println!();
    println!("{}", "📋 Funding summary".blue());
    println!("  Started:  {}", report.started_at.to_rfc3339());
    if let Some(finished_at) = report.finished_at {
        println!("  Finished: {}", finished_at.to_rfc3339());
    }
    println!("  Elapsed:  {:?}", report.elapsed);
    println!("{}", format!("  ✅ Funded: {}", report.funded_count()).green());

    if report.unfunded.is_empty() {
        println!("{}", "  All requested addresses were funded.".green());
    } else {
        println!("{}", format!("  ❌ Not sent: {}", report.unfunded.len()).red());
        for (index, address) in report.unfunded_addresses() {
            let reason = report
                .outcome(index)
                .and_then(|o| o.failure.clone())
                .unwrap_or_default();
            println!("    {:>4}  {}  {}", index, address, reason.dimmed());
        }
    }

    if report.cancelled {
        println!("{}", "  ⚠️  Run stopped before completion.".yellow());
        let pending: Vec<String> = report.pending.iter().map(u32::to_string).collect();
        println!("  Never completed: {}", pending.join(", "));
    }
}
